//! HTTP tests for the download endpoint

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use tower::util::ServiceExt;

use download_events::api::{create_router, AppState};
use download_events::event_store::{DetailSource, MemoryEventStore, StoredEvent};
use download_events::{EventDetail, PageLimits, RawEventRecord, SourceError};

fn events() -> Vec<StoredEvent> {
    let base = Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap();
    vec![
        StoredEvent::new(
            RawEventRecord::new("a", 1),
            EventDetail::new("info", "server up", base)
                .with_tag("node-id", "n1")
                .with_tag("service-handle", "4")
                .with_tag("service-name", "gate"),
        )
        .with_environment("prod"),
        StoredEvent::new(
            RawEventRecord::new("b", 1),
            EventDetail::new("error", "Player kicked", base + Duration::minutes(5)).with_threads(
                json!([{"current": true, "stacktrace": {"frames": [
                    {"module": "m", "function": "f", "abs_path": "/a.py", "lineno": 10}
                ]}}]),
            ),
        )
        .with_environment("staging"),
        StoredEvent::new(
            RawEventRecord::new("c", 2),
            EventDetail::new("info", "other project", base),
        ),
    ]
}

fn app() -> Router {
    let store = MemoryEventStore::from_events(events());
    create_router(Arc::new(AppState::with_store(store, PageLimits::default())))
}

async fn get(app: Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, String) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_download_headers_and_body() {
    let (status, headers, body) = get(app(), "/api/projects/1/simple-events/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/plain");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"events.txt\""
    );
    assert_eq!(
        body,
        concat!(
            "Info 2023-01-01 00:00:00.00 [n1:4_gate] --- server up\n",
            "Error 2023-01-01 00:05:00.00 --- Player kicked\n",
            "   at m.f in /a.py:line 10\n",
        )
    );
}

#[tokio::test]
async fn test_path_without_trailing_slash() {
    let (status, _, body) = get(app(), "/api/projects/2/simple-events").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "Info 2023-01-01 00:00:00.00 --- other project\n");
}

#[tokio::test]
async fn test_filters_and_offset() {
    let (status, _, body) = get(
        app(),
        "/api/projects/1/simple-events/?environment=staging&start=2023-01-01T00:00:00.000Z&end=2023-01-01T01:00:00.000Z&tzoffset=480",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        "Error 2023-01-01 08:05:00.00 --- Player kicked\n   at m.f in /a.py:line 10\n"
    );
}

#[tokio::test]
async fn test_text_query() {
    let (_, _, body) = get(app(), "/api/projects/1/simple-events/?query=KICKED").await;
    assert!(body.starts_with("Error 2023-01-01 00:05:00.00 --- Player kicked"));
    assert_eq!(body.lines().count(), 2);
}

#[tokio::test]
async fn test_per_page_over_ceiling_is_bad_request() {
    let (status, headers, body) = get(app(), "/api/projects/1/simple-events/?per_page=101").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    let error: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(error["code"], "BAD_REQUEST");
    assert!(error["error"].as_str().unwrap().contains("Cannot exceed 100"));
}

#[tokio::test]
async fn test_per_page_at_ceiling_is_accepted() {
    let (status, _, _) = get(app(), "/api/projects/1/simple-events/?per_page=100").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_non_integer_per_page_is_bad_request() {
    let (status, _, body) = get(app(), "/api/projects/1/simple-events/?per_page=ten").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Invalid per_page parameter."));
}

#[tokio::test]
async fn test_offset_without_range_is_bad_request() {
    let (status, _, _) = get(app(), "/api/projects/1/simple-events/?tzoffset=60").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

/// Detail source that lost every event
struct NoDetails;

#[async_trait]
impl DetailSource for NoDetails {
    async fn fetch_detail(&self, project_id: u64, event_id: &str) -> Result<EventDetail, SourceError> {
        Err(SourceError::NotFound {
            project_id,
            event_id: event_id.to_string(),
        })
    }
}

#[tokio::test]
async fn test_mid_stream_failure_truncates_body() {
    let pages = Arc::new(MemoryEventStore::from_events(events()));
    let state = AppState::new(pages, Arc::new(NoDetails), PageLimits::default());
    let response = create_router(Arc::new(state))
        .oneshot(
            Request::builder()
                .uri("/api/projects/1/simple-events/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // Headers are already sent; the failure shows up while reading the body
    assert_eq!(response.status(), StatusCode::OK);
    assert!(to_bytes(response.into_body(), usize::MAX).await.is_err());
}
