//! Backend endpoints that feed the dashboard

use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

/// Container shape a resource is expected to come back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Array,
    Object,
}

/// One of the twelve collections or chart aggregations behind the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Students,
    Teachers,
    Rooms,
    Schedules,
    Subjects,
    Sections,
    StudentsPerSection,
    StudentsPerYear,
    StudentsPerProgram,
    SchedulesPerDay,
    SchedulesPerType,
    RoomStats,
}

impl Resource {
    pub const ALL: [Resource; 12] = [
        Resource::Students,
        Resource::Teachers,
        Resource::Rooms,
        Resource::Schedules,
        Resource::Subjects,
        Resource::Sections,
        Resource::StudentsPerSection,
        Resource::StudentsPerYear,
        Resource::StudentsPerProgram,
        Resource::SchedulesPerDay,
        Resource::SchedulesPerType,
        Resource::RoomStats,
    ];

    /// Path relative to the backend base URL.
    pub fn path(self) -> &'static str {
        match self {
            Resource::Students => "students",
            Resource::Teachers => "teachers",
            Resource::Rooms => "rooms",
            Resource::Schedules => "schedules",
            Resource::Subjects => "subjects",
            Resource::Sections => "sections",
            Resource::StudentsPerSection => "charts/students-per-section",
            Resource::StudentsPerYear => "charts/students-per-year",
            Resource::StudentsPerProgram => "charts/students-per-program",
            Resource::SchedulesPerDay => "charts/schedules-per-day",
            Resource::SchedulesPerType => "charts/schedules-per-type",
            Resource::RoomStats => "charts/room-stats",
        }
    }

    pub fn shape(self) -> Shape {
        match self {
            Resource::RoomStats => Shape::Object,
            _ => Shape::Array,
        }
    }

    pub fn is_chart(self) -> bool {
        self.path().starts_with("charts/")
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Keeps arrays, replaces anything else with an empty one.
pub fn coerce_array(resource: Resource, value: Value) -> Vec<Value> {
    match value {
        Value::Array(items) => items,
        other => {
            debug!("Expected an array from {}, got {}", resource, kind(&other));
            Vec::new()
        }
    }
}

/// Keeps objects, replaces anything else with an empty one.
pub fn coerce_object(resource: Resource, value: Value) -> Map<String, Value> {
    match value {
        Value::Object(fields) => fields,
        other => {
            debug!("Expected an object from {}, got {}", resource, kind(&other));
            Map::new()
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
