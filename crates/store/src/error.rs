//! Error types for the document store

use fitgen_core::ErrorCode;
use serde::Deserialize;
use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Collection or document id rejected locally
    #[error("Invalid document path: {0}")]
    InvalidPath(String),

    /// Document or database does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Credentials missing, expired or lacking access
    #[error("Permission denied ({status}): {message}")]
    PermissionDenied {
        /// HTTP status code
        status: u16,
        /// Error message from the store
        message: String,
    },

    /// Store overloaded, unreachable or timing out
    #[error("Store unavailable ({status}): {message}")]
    Unavailable {
        /// HTTP status code
        status: u16,
        /// Error message from the store
        message: String,
    },

    /// Any other non-success response
    #[error("Store rejected request ({status}): {message}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Error message from the store
        message: String,
    },

    /// Document could not be converted to or from the wire format
    #[error("Codec error: {0}")]
    Codec(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Error envelope returned by the REST API
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

impl StoreError {
    /// Create an invalid path error
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a codec error
    pub fn codec(msg: impl Into<String>) -> Self {
        Self::Codec(msg.into())
    }

    /// Classify a non-success HTTP response
    ///
    /// `body` is the raw response text; the store's error envelope is used
    /// for the message when it parses.
    #[must_use]
    pub fn from_response(status: u16, body: &str) -> Self {
        let message = match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) if !envelope.error.status.is_empty() => {
                format!("{}: {}", envelope.error.status, envelope.error.message)
            }
            Ok(envelope) => envelope.error.message,
            Err(_) if body.trim().is_empty() => "no response body".to_string(),
            Err(_) => body.trim().to_string(),
        };

        match status {
            401 | 403 => Self::PermissionDenied { status, message },
            404 => Self::NotFound(message),
            408 | 429 | 500 | 502 | 503 | 504 => Self::Unavailable { status, message },
            _ => Self::Rejected { status, message },
        }
    }

    /// Whether redelivering the same request later could succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_connect() || e.is_timeout() || e.is_request(),
            Self::Unavailable { .. } => true,
            Self::Json(_)
            | Self::InvalidPath(_)
            | Self::NotFound(_)
            | Self::PermissionDenied { .. }
            | Self::Rejected { .. }
            | Self::Codec(_)
            | Self::Config(_) => false,
        }
    }

    /// Shared error code for reports and exit statuses
    #[must_use]
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Transport(_) | Self::Unavailable { .. } => ErrorCode::StoreUnavailable,
            Self::PermissionDenied { .. } => ErrorCode::StorePermissionDenied,
            Self::InvalidPath(_) => ErrorCode::InvalidDocumentPath,
            Self::NotFound(_) => ErrorCode::StoreNotFound,
            Self::Rejected { .. } => ErrorCode::StoreRejected,
            Self::Json(_) | Self::Codec(_) => ErrorCode::StoreCodecError,
            Self::Config(_) => ErrorCode::ConfigError,
        }
    }
}

impl From<StoreError> for fitgen_core::Error {
    fn from(err: StoreError) -> Self {
        let code = err.error_code();
        let suggestion = match &err {
            StoreError::PermissionDenied { .. } => {
                Some("Check FIRESTORE_ACCESS_TOKEN and the service account's datastore role")
            }
            StoreError::Transport(_) | StoreError::Unavailable { .. } => {
                Some("The store is unreachable; the event will be redelivered")
            }
            StoreError::NotFound(_) => {
                Some("Check store.project_id and store.database point at an existing database")
            }
            _ => None,
        };
        let mut core = fitgen_core::Error::new(code, err.to_string());
        if let Some(s) = suggestion {
            core = core.with_suggestion(s);
        }
        core.with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_parses_envelope() {
        let body = r#"{"error":{"code":403,"message":"Missing or insufficient permissions.","status":"PERMISSION_DENIED"}}"#;
        let err = StoreError::from_response(403, body);

        assert!(matches!(err, StoreError::PermissionDenied { status: 403, .. }));
        assert!(err.to_string().contains("PERMISSION_DENIED: Missing or insufficient"));
        assert!(!err.is_transient());
        assert_eq!(err.error_code(), ErrorCode::StorePermissionDenied);
    }

    #[test]
    fn test_from_response_classifies_availability() {
        for status in [429, 500, 503, 504] {
            let err = StoreError::from_response(status, "");
            assert!(err.is_transient(), "{status} should be transient");
            assert_eq!(err.error_code(), ErrorCode::StoreUnavailable);
        }
    }

    #[test]
    fn test_from_response_plain_text_body() {
        let err = StoreError::from_response(400, "  bad request  ");
        assert!(matches!(err, StoreError::Rejected { status: 400, ref message } if message == "bad request"));
        assert!(!err.is_transient());
    }

    #[test]
    fn test_not_found() {
        let err = StoreError::from_response(404, r#"{"error":{"message":"gone"}}"#);
        assert!(matches!(err, StoreError::NotFound(ref m) if m == "gone"));
        assert!(!err.is_transient());
        assert_eq!(err.error_code(), ErrorCode::StoreNotFound);

        let core: fitgen_core::Error = err.into();
        assert!(core.suggestion.unwrap().contains("store.database"));
    }

    #[test]
    fn test_into_core_error() {
        let err: fitgen_core::Error = StoreError::from_response(503, "").into();
        assert_eq!(err.code, ErrorCode::StoreUnavailable);
        assert!(err.suggestion.is_some());
        assert!(err.source.is_some());
    }
}
