//! Shared test support: a scriptable mock of the school REST backend.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::sync::RwLock;

use school_dashboard::cache::CacheManager;
use school_dashboard::dashboard::{DashboardService, Resource};
use school_dashboard::fetch::{FetchClient, RetryPolicy};

/// How the mock answers one path.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// 200 with this JSON body
    Json(Value),
    /// Bare status code, empty body
    Status(u16),
    /// Sleep, then 200 with this body
    Delay(Duration, Value),
    /// `failures` answers with `status`, then 200 with `body`
    FailThen {
        failures: usize,
        status: u16,
        body: Value,
    },
    /// 200 with a non-JSON body
    Text(&'static str),
    /// 200 echoing method, authorization header and JSON body
    Echo,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    behaviors: Arc<Mutex<HashMap<String, Behavior>>>,
    attempts: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
}

/// Body the mock serves for `resource` by default.
pub fn sample_body(resource: Resource) -> Value {
    match resource {
        Resource::Students => json!([
            {"id": "S-1", "name": "Ana Cruz", "section": "A"},
            {"id": "S-2", "name": "Ben Lim", "section": "B"},
            {"id": "S-3", "name": "Cara Sy", "section": "A"}
        ]),
        Resource::Teachers => json!([{"id": "T-1", "name": "Mr. Reyes"}]),
        Resource::Rooms => json!([{"id": "R-101"}, {"id": "R-102"}]),
        Resource::Schedules => json!([{"id": 1, "teacher": "T-1", "room": "R-101", "day": "Mon"}]),
        Resource::Subjects => json!([{"code": "MATH1"}, {"code": "SCI1"}]),
        Resource::Sections => json!([{"name": "A"}, {"name": "B"}]),
        Resource::StudentsPerSection => json!([
            {"section": "A", "count": 2},
            {"section": "B", "count": 1}
        ]),
        Resource::StudentsPerYear => json!([{"year": 1, "count": 3}]),
        Resource::StudentsPerProgram => json!([{"program": "STEM", "count": 3}]),
        Resource::SchedulesPerDay => json!([{"day": "Mon", "count": 1}]),
        Resource::SchedulesPerType => json!([{"type": "Lecture", "count": 1}]),
        Resource::RoomStats => json!({"total": 2, "occupied": 1}),
    }
}

impl MockBackend {
    /// A backend answering every dashboard endpoint with sample data.
    pub fn healthy() -> Self {
        let mock = Self::default();
        for resource in Resource::ALL {
            mock.set(resource.path(), Behavior::Json(sample_body(resource)));
        }
        mock
    }

    pub fn set(&self, path: &str, behavior: Behavior) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(path.to_string(), behavior);
    }

    /// Makes every dashboard endpoint answer `status`.
    pub fn fail_all(&self, status: u16) {
        for resource in Resource::ALL {
            self.set(resource.path(), Behavior::Status(status));
        }
    }

    pub fn hits(&self, path: &str) -> usize {
        self.attempts
            .lock()
            .unwrap()
            .get(path)
            .map_or(0, |times| times.len())
    }

    pub fn total_hits(&self) -> usize {
        self.attempts.lock().unwrap().values().map(Vec::len).sum()
    }

    pub fn attempt_times(&self, path: &str) -> Vec<Instant> {
        self.attempts
            .lock()
            .unwrap()
            .get(path)
            .cloned()
            .unwrap_or_default()
    }

    /// Serves the mock on an ephemeral port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = Router::new()
            .route("/api/*path", any(serve))
            .with_state(self.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api/", addr)
    }
}

async fn serve(
    State(mock): State<MockBackend>,
    Path(path): Path<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = path.trim_start_matches('/').to_string();
    let attempt = {
        let mut attempts = mock.attempts.lock().unwrap();
        let times = attempts.entry(path.clone()).or_default();
        times.push(Instant::now());
        times.len()
    };
    let behavior = mock.behaviors.lock().unwrap().get(&path).cloned();

    match behavior {
        None => StatusCode::NOT_FOUND.into_response(),
        Some(Behavior::Json(value)) => Json(value).into_response(),
        Some(Behavior::Status(code)) => status(code).into_response(),
        Some(Behavior::Delay(delay, value)) => {
            tokio::time::sleep(delay).await;
            Json(value).into_response()
        }
        Some(Behavior::FailThen {
            failures,
            status: code,
            body,
        }) => {
            if attempt <= failures {
                status(code).into_response()
            } else {
                Json(body).into_response()
            }
        }
        Some(Behavior::Text(text)) => (StatusCode::OK, text).into_response(),
        Some(Behavior::Echo) => {
            let body: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            let auth = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            Json(json!({
                "method": method.as_str(),
                "authorization": auth,
                "body": body
            }))
            .into_response()
        }
    }
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap()
}

/// Retry policy with millisecond backoff so tests stay fast.
pub fn fast_policy(retries: u32) -> RetryPolicy {
    RetryPolicy {
        retries,
        timeout: Duration::from_secs(2),
        base_delay: Duration::from_millis(10),
        max_delay: Duration::from_millis(40),
    }
}

pub fn service_for(base_url: &str, cache: CacheManager, retries: u32) -> DashboardService {
    let fetcher = FetchClient::new(base_url, fast_policy(retries)).unwrap();
    DashboardService::new(fetcher, Arc::new(RwLock::new(cache)))
}
