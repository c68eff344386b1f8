//! The document store seam

use crate::document::{Document, DocumentPath};
use crate::error::StoreResult;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// What a delete call observed
///
/// Both variants mean the document is gone afterwards. Stores that cannot
/// tell whether the document existed (the REST store) always report
/// `Deleted`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeleteOutcome {
    /// The document was removed (or the store does not distinguish)
    Deleted,
    /// There was nothing to remove
    AlreadyAbsent,
}

impl DeleteOutcome {
    /// Stable lowercase name used in logs and responses
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deleted => "deleted",
            Self::AlreadyAbsent => "already_absent",
        }
    }
}

impl fmt::Display for DeleteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value access to documents addressed by `collection/id`
///
/// Implementations must make `delete` idempotent: deleting a missing
/// document succeeds.
pub trait DocumentStore: Send + Sync {
    /// Read a document; `Ok(None)` when it does not exist
    fn get(
        &self,
        path: &DocumentPath,
    ) -> impl Future<Output = StoreResult<Option<Document>>> + Send;

    /// Create or overwrite a document
    fn set(
        &self,
        path: &DocumentPath,
        document: Document,
    ) -> impl Future<Output = StoreResult<()>> + Send;

    /// Remove a document
    fn delete(&self, path: &DocumentPath) -> impl Future<Output = StoreResult<DeleteOutcome>> + Send;

    /// Cheap reachability check against a collection
    fn probe(&self, collection: &str) -> impl Future<Output = StoreResult<()>> + Send;
}
