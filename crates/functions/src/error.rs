//! Errors raised while handling auth events

use fitgen_core::ErrorCode;
use fitgen_store::StoreError;
use thiserror::Error;

/// Result type alias for handler operations
pub type CleanupResult<T> = Result<T, CleanupError>;

/// Why an invocation did not complete
#[derive(Error, Debug)]
pub enum CleanupError {
    /// The payload can never be processed; redelivery will not help
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    /// The payload decoded but names no account
    #[error("Invalid event: payload has no uid")]
    MissingUid,

    /// The uid cannot be used as a document id
    #[error("Invalid event: unusable uid: {0}")]
    InvalidUid(String),

    /// The document store call failed
    #[error("Failed to delete {path}: {source}")]
    Store {
        /// `collection/id` that was being deleted
        path: String,
        /// Underlying store error
        #[source]
        source: StoreError,
    },

    /// Handler constructed with unusable settings
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CleanupError {
    /// Create an invalid event error
    pub fn invalid_event(msg: impl Into<String>) -> Self {
        Self::InvalidEvent(msg.into())
    }

    /// Create an invalid uid error
    pub fn invalid_uid(msg: impl Into<String>) -> Self {
        Self::InvalidUid(msg.into())
    }

    /// Whether the payload itself is at fault; such events are dropped
    #[must_use]
    pub fn is_invalid_event(&self) -> bool {
        matches!(
            self,
            Self::InvalidEvent(_) | Self::MissingUid | Self::InvalidUid(_)
        )
    }

    /// Whether the platform should redeliver this event
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store { source, .. } => source.is_transient(),
            Self::InvalidEvent(_) | Self::MissingUid | Self::InvalidUid(_) | Self::Config(_) => {
                false
            }
        }
    }

    /// Shared error code for reports and exit statuses
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidEvent(_) => ErrorCode::InvalidEvent,
            Self::MissingUid => ErrorCode::MissingUid,
            Self::InvalidUid(_) => ErrorCode::InvalidUid,
            Self::Store { source, .. } => source.error_code(),
            Self::Config(_) => ErrorCode::ConfigValidationError,
        }
    }
}

impl From<CleanupError> for fitgen_core::Error {
    fn from(err: CleanupError) -> Self {
        match err {
            CleanupError::Store { path, source } => {
                fitgen_core::Error::from(source).with_context(format!("deleting {path}"))
            }
            other => fitgen_core::Error::new(other.error_code(), other.to_string()),
        }
    }
}
