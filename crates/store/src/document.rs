//! Document addressing

use crate::error::{StoreError, StoreResult};
use fitgen_core::document_id::id_violation;
use std::fmt;

/// Document body: a JSON object of fields
pub type Document = serde_json::Map<String, serde_json::Value>;

pub use fitgen_core::document_id::MAX_ID_BYTES;

/// `collection/document_id` address of a top-level document
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    collection: String,
    document_id: String,
}

impl DocumentPath {
    /// Build a validated path
    pub fn new(collection: impl Into<String>, document_id: impl Into<String>) -> StoreResult<Self> {
        let collection = collection.into();
        let document_id = document_id.into();

        validate_id("collection", &collection)?;
        validate_id("document id", &document_id)?;

        Ok(Self {
            collection,
            document_id,
        })
    }

    /// Collection id
    #[must_use]
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Document id within the collection
    #[must_use]
    pub fn document_id(&self) -> &str {
        &self.document_id
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.document_id)
    }
}

/// Check a single path segment against the store's id rules
pub fn validate_id(kind: &str, id: &str) -> StoreResult<()> {
    match id_violation(kind, id) {
        Some(reason) => Err(StoreError::invalid_path(reason)),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let path = DocumentPath::new("special_user", "abc123").unwrap();
        assert_eq!(path.to_string(), "special_user/abc123");
        assert_eq!(path.collection(), "special_user");
        assert_eq!(path.document_id(), "abc123");
    }

    #[test]
    fn test_rejects_invalid_segments() {
        assert!(DocumentPath::new("", "abc").is_err());
        assert!(DocumentPath::new("special_user", "").is_err());
        assert!(DocumentPath::new("special_user", "a/b").is_err());
        assert!(DocumentPath::new("special_user", "..").is_err());
        assert!(DocumentPath::new("special_user", "__id__").is_err());
        assert!(DocumentPath::new("special_user", "x".repeat(MAX_ID_BYTES + 1)).is_err());
    }

    #[test]
    fn test_accepts_underscored_ids() {
        assert!(DocumentPath::new("special_user", "__").is_ok());
        assert!(DocumentPath::new("special_user", "__partial").is_ok());
        assert!(DocumentPath::new("special_user", "a.b-c_d").is_ok());
    }
}
