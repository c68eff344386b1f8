//! End-to-end: handler over the REST store, store played by wiremock

use fitgen_functions::{webhook, AccountCleanupHandler, CleanupError};
use fitgen_store::{DeleteOutcome, FirestoreStore, StoreClientConfig};
use serde_json::json;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

const ABC123: &str = "/v1/projects/demo-fitgen/databases/(default)/documents/special_user/abc123";

fn handler_for(server: &MockServer) -> AccountCleanupHandler<FirestoreStore> {
    let config = StoreClientConfig::production("demo-fitgen")
        .with_base_url(format!("{}/v1", server.uri()))
        .with_access_token("owner");
    let store = FirestoreStore::with_config(config).unwrap();
    AccountCleanupHandler::new(store, "special_user").unwrap()
}

#[tokio::test]
async fn test_single_delete_and_no_read() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(ABC123))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let report = handler_for(&server)
        .handle_payload(br#"{"uid":"abc123"}"#)
        .await
        .unwrap();

    assert_eq!(report.outcome, DeleteOutcome::Deleted);
    assert_eq!(report.path, "special_user/abc123");
}

#[tokio::test]
async fn test_store_outage_fails_invocation() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(503).set_body_json(json!({
            "error": { "code": 503, "message": "The service is currently unavailable.", "status": "UNAVAILABLE" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = handler_for(&server)
        .handle_payload(br#"{"uid":"abc123"}"#)
        .await
        .unwrap_err();

    assert!(matches!(err, CleanupError::Store { .. }));
    assert!(err.is_transient());
}

#[tokio::test]
async fn test_missing_database_fails_invocation() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path(ABC123))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {
                "code": 404,
                "message": "The database (default) does not exist for project demo-fitgen",
                "status": "NOT_FOUND"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = handler_for(&server)
        .handle_payload(br#"{"uid":"abc123"}"#)
        .await
        .unwrap_err();

    assert!(matches!(err, CleanupError::Store { ref path, .. } if path == "special_user/abc123"));
    assert!(!err.is_transient());
    assert_eq!(
        webhook::status_for(&err),
        axum::http::StatusCode::INTERNAL_SERVER_ERROR
    );
}
