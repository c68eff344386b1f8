//! Account cleanup: delete the per-user record when an account is deleted
//!
//! One event, one delete. The handler does not read the record first, does
//! not retry, and does not touch any other collection. Deleting a record that
//! is already gone succeeds, so redelivered events converge on the same state.

use crate::error::{CleanupError, CleanupResult};
use crate::event::{UserDeletedEvent, UserId};
use fitgen_store::document::validate_id;
use fitgen_store::{DeleteOutcome, DocumentPath, DocumentStore};
use fitgen_telemetry::{metrics, Timer};
use serde::Serialize;
use tracing::{error, info, warn};

pub const DELETED: &str = "cleanup.deleted";
pub const ALREADY_ABSENT: &str = "cleanup.already_absent";
pub const FAILED: &str = "cleanup.failed";
pub const REJECTED: &str = "cleanup.rejected";
pub const DURATION_MS: &str = "cleanup.duration_ms";

/// Result of a successful invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub uid: String,
    pub path: String,
    pub outcome: DeleteOutcome,
    pub elapsed_ms: u64,
}

/// Deletes `collection/{uid}` for every account-deleted event
///
/// Holds the store client for the life of the process; construct once and
/// share (it is stateless per invocation).
pub struct AccountCleanupHandler<S> {
    store: S,
    collection: String,
}

impl<S: DocumentStore> AccountCleanupHandler<S> {
    /// Create a handler that cleans up `collection`
    pub fn new(store: S, collection: impl Into<String>) -> CleanupResult<Self> {
        let collection = collection.into();
        validate_id("collection", &collection).map_err(|e| CleanupError::Config(e.to_string()))?;
        Ok(Self { store, collection })
    }

    /// The store this handler deletes from
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The collection this handler deletes from
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Document path for a user's record
    pub fn record_path(&self, uid: &UserId) -> CleanupResult<DocumentPath> {
        DocumentPath::new(self.collection.as_str(), uid.as_str())
            .map_err(|e| CleanupError::invalid_uid(e.to_string()))
    }

    /// Decode a raw payload and handle it
    ///
    /// Payloads that cannot be decoded are counted and logged as rejected
    /// without touching the store.
    pub async fn handle_payload(&self, payload: &[u8]) -> CleanupResult<CleanupReport> {
        let event = match UserDeletedEvent::from_slice(payload) {
            Ok(event) => event,
            Err(e) => {
                metrics().increment(REJECTED);
                warn!(error = %e, bytes = payload.len(), "Rejected auth event");
                return Err(e);
            }
        };
        self.on_user_deleted(&event).await
    }

    /// Delete the record belonging to the deleted account
    pub async fn on_user_deleted(&self, event: &UserDeletedEvent) -> CleanupResult<CleanupReport> {
        let path = self.record_path(event.uid())?;
        let event_id = event.context.event_id.as_deref().unwrap_or("-");
        let lag_ms = event.context.delivery_lag_ms(chrono::Utc::now());

        let timer = Timer::start(DURATION_MS);
        let result = self.store.delete(&path).await;
        let elapsed = timer.stop();
        let elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);

        match result {
            Ok(outcome) => {
                metrics().increment(match outcome {
                    DeleteOutcome::Deleted => DELETED,
                    DeleteOutcome::AlreadyAbsent => ALREADY_ABSENT,
                });
                info!(
                    uid = %event.uid(),
                    event_id,
                    collection = %self.collection,
                    outcome = %outcome,
                    elapsed_ms,
                    lag_ms,
                    "Account record cleaned up"
                );
                Ok(CleanupReport {
                    uid: event.uid().to_string(),
                    path: path.to_string(),
                    outcome,
                    elapsed_ms,
                })
            }
            Err(source) => {
                metrics().increment(FAILED);
                error!(
                    uid = %event.uid(),
                    event_id,
                    collection = %self.collection,
                    code = %source.error_code(),
                    transient = source.is_transient(),
                    error = %source,
                    elapsed_ms,
                    "Account record cleanup failed"
                );
                Err(CleanupError::Store {
                    path: path.to_string(),
                    source,
                })
            }
        }
    }
}
