//! Drives the webhook router in-process with `tower::ServiceExt::oneshot`

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use fitgen_functions::{webhook, AccountCleanupHandler};
use fitgen_store::{Document, DocumentPath, MemoryStore, StoreOp};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn record_path(uid: &str) -> DocumentPath {
    DocumentPath::new("special_user", uid).unwrap()
}

fn record() -> Document {
    json!({ "nickname": "lifter" }).as_object().unwrap().clone()
}

fn app(store: &MemoryStore) -> Router {
    let handler = AccountCleanupHandler::new(store.clone(), "special_user").unwrap();
    webhook::router(Arc::new(handler))
}

async fn post_event(app: Router, body: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/user-deleted")
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Vec<u8>) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

#[tokio::test]
async fn test_existing_record_deleted() {
    let store = MemoryStore::new();
    store.seed(record_path("abc123"), record());
    store.seed(record_path("keep-me"), record());

    let (status, body) = post_event(app(&store), r#"{"uid":"abc123"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uid"], "abc123");
    assert_eq!(body["outcome"], "deleted");
    assert!(!store.contains(&record_path("abc123")));
    assert!(store.contains(&record_path("keep-me")));
}

#[tokio::test]
async fn test_missing_record_succeeds_unchanged() {
    let store = MemoryStore::new();
    store.seed(record_path("abc123"), record());
    let before = store.snapshot();

    let (status, body) = post_event(app(&store), r#"{"uid":"zzz999"}"#).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "already_absent");
    assert_eq!(store.snapshot(), before);
}

#[tokio::test]
async fn test_redelivered_event_same_end_state() {
    let store = MemoryStore::new();
    store.seed(record_path("abc123"), record());
    let payload = r#"{"eventId":"evt-7","eventType":"providers/firebase.auth/eventTypes/user.delete","data":{"uid":"abc123"}}"#;

    let (first, _) = post_event(app(&store), payload).await;
    let after_first = store.snapshot();
    let (second, body) = post_event(app(&store), payload).await;

    assert_eq!(first, StatusCode::OK);
    assert_eq!(second, StatusCode::OK);
    assert_eq!(body["outcome"], "already_absent");
    assert_eq!(store.snapshot(), after_first);
}

#[tokio::test]
async fn test_invalid_payload_is_bad_request() {
    let store = MemoryStore::new();

    let (status, body) = post_event(app(&store), r#"{"email":"x@example.com"}"#).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code_str"], "E5002");
    assert_eq!(body["transient"], false);
    assert!(store.operations().is_empty());
}

#[tokio::test]
async fn test_malformed_and_unusable_payloads_are_bad_requests() {
    let store = MemoryStore::new();

    let (status, body) = post_event(app(&store), "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code_str"], "E5001");

    let (status, body) = post_event(app(&store), r#"{"uid":"a/b"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code_str"], "E5003");

    assert!(store.operations().is_empty());
}

#[tokio::test]
async fn test_store_outage_asks_for_redelivery() {
    let store = MemoryStore::new();
    store.seed(record_path("abc123"), record());
    store.set_unavailable(true);

    let (status, body) = post_event(app(&store), r#"{"uid":"abc123"}"#).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["transient"], true);
    assert_eq!(body["error"]["category"], "Store");
    assert!(store.contains(&record_path("abc123")));
}

#[tokio::test]
async fn test_permission_error_is_server_error() {
    let store = MemoryStore::new();
    store.set_permission_denied(true);

    let (status, body) = post_event(app(&store), r#"{"uid":"abc123"}"#).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code_str"], "E4002");
}

#[tokio::test]
async fn test_health_and_liveness() {
    let store = MemoryStore::new();

    let (status, body) = get(app(&store), "/health").await;
    let health: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["collection"], "special_user");

    let (status, body) = get(app(&store), "/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_readiness_probes_store() {
    let store = MemoryStore::new();

    let (status, _) = get(app(&store), "/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(store.operations(), vec![StoreOp::Probe("special_user".to_string())]);

    store.set_unavailable(true);
    let (status, _) = get(app(&store), "/ready").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_metrics_count_outcomes() {
    let store = MemoryStore::new();
    store.seed(record_path("metrics-user"), record());

    post_event(app(&store), r#"{"uid":"metrics-user"}"#).await;

    let (status, body) = get(app(&store), "/metrics").await;
    let metrics: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(status, StatusCode::OK);
    assert!(metrics["counters"]["cleanup.deleted"].as_u64().unwrap() >= 1);
    assert!(metrics["histograms"]["cleanup.duration_ms"]["count"].as_u64().unwrap() >= 1);
}
