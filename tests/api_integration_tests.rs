//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle of the gateway against a mock
//! school backend.

mod common;

use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use common::{service_for, MockBackend};
use school_dashboard::api::create_router;
use school_dashboard::cache::CacheManager;
use school_dashboard::rate_limit::RateLimiter;
use school_dashboard::AppState;

// == Helper Functions ==

async fn create_test_app(mock: &MockBackend, limiter: RateLimiter) -> (Router, AppState) {
    let base = mock.spawn().await;
    let service = service_for(&base, CacheManager::memory_only(), 2);
    let state = AppState::new(service, limiter);
    (create_router(state.clone()), state)
}

async fn send(app: &Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

// == Dashboard Endpoint Tests ==

#[tokio::test]
async fn test_dashboard_endpoint_returns_dataset() {
    let mock = MockBackend::healthy();
    let (app, _) = create_test_app(&mock, RateLimiter::default()).await;

    let (status, json) = send(&app, "GET", "/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["students"].as_array().unwrap().len(), 3);
    assert_eq!(json["chartData"]["roomStats"]["total"], 2);
    assert_eq!(json["fromCache"], false);
    assert_eq!(json["stale"], false);
    assert!(json["lastUpdate"].is_string());
}

#[tokio::test]
async fn test_dashboard_endpoint_second_call_from_cache() {
    let mock = MockBackend::healthy();
    let (app, _) = create_test_app(&mock, RateLimiter::default()).await;

    send(&app, "GET", "/dashboard").await;
    let (status, json) = send(&app, "GET", "/dashboard").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["fromCache"], true);
    assert_eq!(mock.hits("students"), 1);
}

#[tokio::test]
async fn test_dashboard_endpoint_backend_down() {
    let mock = MockBackend::default();
    mock.fail_all(500);
    let (app, _) = create_test_app(&mock, RateLimiter::default()).await;

    let (status, json) = send(&app, "GET", "/dashboard").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(json["error"].as_str().unwrap().contains("12"));
}

#[tokio::test]
async fn test_summary_endpoint() {
    let mock = MockBackend::healthy();
    let (app, _) = create_test_app(&mock, RateLimiter::default()).await;

    let (status, json) = send(&app, "GET", "/dashboard/summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totals"]["students"], 3);
    assert_eq!(json["totals"]["sections"], 2);
}

// == Refresh Endpoint Tests ==

#[tokio::test]
async fn test_refresh_endpoint_rate_limited() {
    let mock = MockBackend::healthy();
    let limiter = RateLimiter::new(2, Duration::from_secs(60));
    let (app, _) = create_test_app(&mock, limiter).await;

    let (first, _) = send(&app, "POST", "/dashboard/refresh").await;
    let (second, _) = send(&app, "POST", "/dashboard/refresh").await;
    let (third, json) = send(&app, "POST", "/dashboard/refresh").await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(third, StatusCode::TOO_MANY_REQUESTS);
    let wait = json["retry_after_secs"].as_u64().unwrap();
    assert!(wait > 0 && wait <= 60);
    assert!(json["error"].is_string());
    assert_eq!(mock.hits("students"), 2);
}

#[tokio::test]
async fn test_refresh_endpoint_serves_stale_when_backend_fails() {
    let mock = MockBackend::healthy();
    let (app, _) = create_test_app(&mock, RateLimiter::default()).await;

    send(&app, "GET", "/dashboard").await;
    mock.fail_all(503);
    let (status, json) = send(&app, "POST", "/dashboard/refresh").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["stale"], true);
    assert_eq!(json["fromCache"], true);
    assert_eq!(json["students"].as_array().unwrap().len(), 3);
}

// == Cache Endpoint Tests ==

#[tokio::test]
async fn test_cache_age_and_clear_endpoints() {
    let mock = MockBackend::healthy();
    let (app, _) = create_test_app(&mock, RateLimiter::default()).await;

    send(&app, "GET", "/dashboard").await;

    let (status, json) = send(&app, "GET", "/cache/dashboard_data/age").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "dashboard_data");
    assert!(json["age_ms"].is_u64());

    let (status, json) = send(&app, "DELETE", "/cache/dashboard_data").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["key"], "dashboard_data");

    let (status, json) = send(&app, "GET", "/cache/dashboard_data/age").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("dashboard_data"));
}

#[tokio::test]
async fn test_clear_all_forces_refetch() {
    let mock = MockBackend::healthy();
    let (app, state) = create_test_app(&mock, RateLimiter::default()).await;

    send(&app, "GET", "/dashboard").await;
    let (status, _) = send(&app, "DELETE", "/cache").await;
    assert_eq!(status, StatusCode::OK);
    assert!(state.cache().read().await.is_empty());

    let (_, json) = send(&app, "GET", "/dashboard").await;
    assert_eq!(json["fromCache"], false);
    assert_eq!(mock.hits("students"), 2);
}

#[tokio::test]
async fn test_stats_endpoint() {
    let mock = MockBackend::healthy();
    let (app, _) = create_test_app(&mock, RateLimiter::default()).await;

    send(&app, "GET", "/dashboard").await;
    send(&app, "GET", "/dashboard").await;
    let (status, json) = send(&app, "GET", "/cache/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert!((json["hit_rate"].as_f64().unwrap() - 0.5).abs() < 0.001);
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let mock = MockBackend::default();
    let (app, _) = create_test_app(&mock, RateLimiter::default()).await;

    let (status, json) = send(&app, "GET", "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let mock = MockBackend::default();
    let (app, _) = create_test_app(&mock, RateLimiter::default()).await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
