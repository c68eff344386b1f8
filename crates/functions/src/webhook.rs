//! HTTP surface for the auth event trigger
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /auth/user-deleted` | account-deleted event (bare record or envelope) |
//! | `GET /health` | status, version, configured collection |
//! | `GET /live` | liveness probe |
//! | `GET /ready` | readiness probe; checks the store is reachable |
//! | `GET /metrics` | cleanup counters and latency histogram as JSON |
//!
//! A non-2xx answer from `/auth/user-deleted` tells the invoking platform to
//! redeliver; 400 is reserved for payloads redelivery cannot fix.

use crate::cleanup::AccountCleanupHandler;
use crate::error::CleanupError;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use fitgen_store::DocumentStore;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

/// Build the router around a shared handler
pub fn router<S>(handler: Arc<AccountCleanupHandler<S>>) -> Router
where
    S: DocumentStore + 'static,
{
    Router::new()
        .route("/auth/user-deleted", post(user_deleted::<S>))
        .route("/health", get(health::<S>))
        .route("/live", get(liveness))
        .route("/ready", get(readiness::<S>))
        .route("/metrics", get(metrics_json))
        .with_state(handler)
}

/// HTTP status for a failed invocation
#[must_use]
pub fn status_for(err: &CleanupError) -> StatusCode {
    if err.is_invalid_event() {
        StatusCode::BAD_REQUEST
    } else if err.is_transient() {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn error_response(err: CleanupError) -> Response {
    let status = status_for(&err);
    let transient = err.is_transient();
    let report = fitgen_core::Error::from(err).to_report();
    (status, Json(json!({ "error": report, "transient": transient }))).into_response()
}

/// POST /auth/user-deleted
async fn user_deleted<S>(
    State(handler): State<Arc<AccountCleanupHandler<S>>>,
    body: Bytes,
) -> Response
where
    S: DocumentStore + 'static,
{
    match handler.handle_payload(&body).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(err) => error_response(err),
    }
}

/// GET /health
async fn health<S>(State(handler): State<Arc<AccountCleanupHandler<S>>>) -> Response
where
    S: DocumentStore + 'static,
{
    let health = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "collection": handler.collection(),
        "session_id": fitgen_telemetry::session_id(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    });

    (StatusCode::OK, Json(health)).into_response()
}

/// GET /live
async fn liveness() -> Response {
    (StatusCode::OK, "OK").into_response()
}

/// GET /ready
async fn readiness<S>(State(handler): State<Arc<AccountCleanupHandler<S>>>) -> Response
where
    S: DocumentStore + 'static,
{
    match handler.store().probe(handler.collection()).await {
        Ok(()) => (StatusCode::OK, "Ready").into_response(),
        Err(e) => {
            warn!(error = %e, "Readiness probe failed");
            (StatusCode::SERVICE_UNAVAILABLE, "Store unreachable").into_response()
        }
    }
}

/// GET /metrics
async fn metrics_json() -> Response {
    (StatusCode::OK, Json(fitgen_telemetry::metrics().export_json())).into_response()
}
