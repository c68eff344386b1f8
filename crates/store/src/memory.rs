//! In-process document store
//!
//! Used by tests and by `fitgen-fn invoke --dry-run`. Records every call so
//! callers can assert on exactly which operations were issued.

use crate::document::{validate_id, Document, DocumentPath};
use crate::error::{StoreError, StoreResult};
use crate::store::{DeleteOutcome, DocumentStore};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// An operation issued against a [`MemoryStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreOp {
    /// `get`
    Get(DocumentPath),
    /// `set`
    Set(DocumentPath),
    /// `delete`
    Delete(DocumentPath),
    /// `probe`
    Probe(String),
}

#[derive(Default)]
struct Inner {
    documents: Mutex<BTreeMap<DocumentPath, Document>>,
    ops: Mutex<Vec<StoreOp>>,
    unavailable: AtomicBool,
    denied: AtomicBool,
}

/// Shared in-memory store; clones see the same documents
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Inner>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a document directly, bypassing the operation log
    pub fn seed(&self, path: DocumentPath, document: Document) {
        self.documents().insert(path, document);
    }

    /// Whether a document exists
    #[must_use]
    pub fn contains(&self, path: &DocumentPath) -> bool {
        self.documents().contains_key(path)
    }

    /// Copy of every stored document
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<DocumentPath, Document> {
        self.documents().clone()
    }

    /// Operations issued so far, oldest first
    #[must_use]
    pub fn operations(&self) -> Vec<StoreOp> {
        self.inner
            .ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Make every subsequent call fail as if the store were unreachable
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Make every subsequent call fail with a permission error
    pub fn set_permission_denied(&self, denied: bool) {
        self.inner.denied.store(denied, Ordering::SeqCst);
    }

    fn documents(&self) -> std::sync::MutexGuard<'_, BTreeMap<DocumentPath, Document>> {
        self.inner
            .documents
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, op: StoreOp) -> StoreResult<()> {
        self.inner
            .ops
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(op);

        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable {
                status: 503,
                message: "memory store marked unavailable".to_string(),
            });
        }
        if self.inner.denied.load(Ordering::SeqCst) {
            return Err(StoreError::PermissionDenied {
                status: 403,
                message: "memory store marked permission denied".to_string(),
            });
        }
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    async fn get(&self, path: &DocumentPath) -> StoreResult<Option<Document>> {
        self.record(StoreOp::Get(path.clone()))?;
        Ok(self.documents().get(path).cloned())
    }

    async fn set(&self, path: &DocumentPath, document: Document) -> StoreResult<()> {
        self.record(StoreOp::Set(path.clone()))?;
        self.documents().insert(path.clone(), document);
        Ok(())
    }

    async fn delete(&self, path: &DocumentPath) -> StoreResult<DeleteOutcome> {
        self.record(StoreOp::Delete(path.clone()))?;
        Ok(match self.documents().remove(path) {
            Some(_) => DeleteOutcome::Deleted,
            None => DeleteOutcome::AlreadyAbsent,
        })
    }

    async fn probe(&self, collection: &str) -> StoreResult<()> {
        validate_id("collection", collection)?;
        self.record(StoreOp::Probe(collection.to_string()))
    }
}
