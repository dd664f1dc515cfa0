//! The aggregated dashboard dataset

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::resource::{coerce_array, coerce_object, Resource};

/// Pre-aggregated chart series, one per chart endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub students_per_section: Vec<Value>,
    pub students_per_year: Vec<Value>,
    pub students_per_program: Vec<Value>,
    pub schedules_per_day: Vec<Value>,
    pub schedules_per_type: Vec<Value>,
    pub room_stats: Map<String, Value>,
}

/// Everything the dashboard renders, with provenance flags.
///
/// Built fresh on every successful load and replaced wholesale in the cache.
/// Records are opaque JSON; cross-references between collections are not
/// resolved here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardDataset {
    pub students: Vec<Value>,
    pub teachers: Vec<Value>,
    pub rooms: Vec<Value>,
    pub schedules: Vec<Value>,
    pub subjects: Vec<Value>,
    pub sections: Vec<Value>,
    pub chart_data: ChartData,
    pub last_update: DateTime<Utc>,
    /// Served from the cache rather than fetched for this call
    #[serde(default)]
    pub from_cache: bool,
    /// Served from the cache because a refresh failed
    #[serde(default)]
    pub stale: bool,
}

/// Record counts for the dashboard's summary cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DashboardTotals {
    pub students: usize,
    pub teachers: usize,
    pub rooms: usize,
    pub schedules: usize,
    pub subjects: usize,
    pub sections: usize,
}

impl DashboardDataset {
    /// Builds a dataset from per-endpoint bodies, coercing each to its expected
    /// shape. Missing endpoints become empty containers.
    pub fn assemble(mut bodies: HashMap<Resource, Value>) -> Self {
        let mut array = |resource: Resource| {
            coerce_array(resource, bodies.remove(&resource).unwrap_or(Value::Null))
        };

        let students = array(Resource::Students);
        let teachers = array(Resource::Teachers);
        let rooms = array(Resource::Rooms);
        let schedules = array(Resource::Schedules);
        let subjects = array(Resource::Subjects);
        let sections = array(Resource::Sections);
        let students_per_section = array(Resource::StudentsPerSection);
        let students_per_year = array(Resource::StudentsPerYear);
        let students_per_program = array(Resource::StudentsPerProgram);
        let schedules_per_day = array(Resource::SchedulesPerDay);
        let schedules_per_type = array(Resource::SchedulesPerType);

        let room_stats = coerce_object(
            Resource::RoomStats,
            bodies.remove(&Resource::RoomStats).unwrap_or(Value::Null),
        );

        Self {
            students,
            teachers,
            rooms,
            schedules,
            subjects,
            sections,
            chart_data: ChartData {
                students_per_section,
                students_per_year,
                students_per_program,
                schedules_per_day,
                schedules_per_type,
                room_stats,
            },
            last_update: Utc::now(),
            from_cache: false,
            stale: false,
        }
    }

    pub fn totals(&self) -> DashboardTotals {
        DashboardTotals {
            students: self.students.len(),
            teachers: self.teachers.len(),
            rooms: self.rooms.len(),
            schedules: self.schedules.len(),
            subjects: self.subjects.len(),
            sections: self.sections.len(),
        }
    }
}
