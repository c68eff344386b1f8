//! Auth "user deleted" events
//!
//! Two payload shapes are accepted: the bare user record the legacy auth
//! trigger delivers, and an envelope with the record under `data`.

use crate::error::{CleanupError, CleanupResult};
use chrono::{DateTime, Utc};
use fitgen_store::document::validate_id;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest uid the identity provider issues, in characters
pub const MAX_UID_CHARS: usize = 128;

/// Event types that announce an account deletion
const DELETE_EVENT_TYPES: &[&str] = &[
    "providers/firebase.auth/eventTypes/user.delete",
    "google.firebase.auth.user.v1.deleted",
];

/// Provider-issued account identifier, valid as a document id
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and wrap a uid
    pub fn parse(uid: impl Into<String>) -> CleanupResult<Self> {
        let uid = uid.into();
        if uid.chars().count() > MAX_UID_CHARS {
            return Err(CleanupError::invalid_uid(format!(
                "uid exceeds {MAX_UID_CHARS} characters"
            )));
        }
        validate_id("uid", &uid).map_err(|e| CleanupError::invalid_uid(e.to_string()))?;
        Ok(Self(uid))
    }

    /// The raw identifier
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = CleanupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Account timestamps as reported by the provider
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMetadata {
    #[serde(default)]
    pub creation_time: Option<String>,
    #[serde(default)]
    pub last_sign_in_time: Option<String>,
}

/// The deleted account. Only `uid` is required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub uid: UserId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub metadata: Option<UserMetadata>,
}

/// Delivery metadata from an envelope; empty for bare records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventContext {
    #[serde(default)]
    pub event_id: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl EventContext {
    /// When the provider emitted the event, if it said so in RFC 3339
    #[must_use]
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
    }

    /// Milliseconds between emission and `now`; negative skew clamps to zero
    #[must_use]
    pub fn delivery_lag_ms(&self, now: DateTime<Utc>) -> Option<i64> {
        self.occurred_at()
            .map(|at| (now - at).num_milliseconds().max(0))
    }
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(flatten)]
    context: EventContext,
    data: UserRecord,
}

/// A decoded account-deleted notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDeletedEvent {
    pub user: UserRecord,
    pub context: EventContext,
}

impl UserDeletedEvent {
    /// Event for a uid with no further metadata
    #[must_use]
    pub fn for_uid(uid: UserId) -> Self {
        Self {
            user: UserRecord {
                uid,
                email: None,
                display_name: None,
                metadata: None,
            },
            context: EventContext::default(),
        }
    }

    /// Decode either payload shape
    pub fn from_slice(payload: &[u8]) -> CleanupResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(payload)
            .map_err(|e| CleanupError::invalid_event(format!("payload is not JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Decode an already-parsed payload
    pub fn from_value(value: serde_json::Value) -> CleanupResult<Self> {
        if !value.is_object() {
            return Err(CleanupError::invalid_event("payload must be a JSON object"));
        }

        let enveloped = value.get("data").is_some_and(serde_json::Value::is_object);
        let record = if enveloped { &value["data"] } else { &value };
        match record.get("uid") {
            None | Some(serde_json::Value::Null) => return Err(CleanupError::MissingUid),
            Some(serde_json::Value::String(uid)) => {
                UserId::parse(uid.as_str())?;
            }
            Some(_) => return Err(CleanupError::invalid_uid("uid must be a string")),
        }

        let event = if enveloped {
            let envelope: Envelope = serde_json::from_value(value)
                .map_err(|e| CleanupError::invalid_event(format!("bad event envelope: {e}")))?;
            Self {
                user: envelope.data,
                context: envelope.context,
            }
        } else {
            let user: UserRecord = serde_json::from_value(value)
                .map_err(|e| CleanupError::invalid_event(format!("bad user record: {e}")))?;
            Self {
                user,
                context: EventContext::default(),
            }
        };

        if let Some(kind) = event.context.event_type.as_deref() {
            if !DELETE_EVENT_TYPES.contains(&kind) {
                return Err(CleanupError::invalid_event(format!(
                    "unexpected event type '{kind}'"
                )));
            }
        }

        Ok(event)
    }

    /// The deleted account's id
    #[must_use]
    pub fn uid(&self) -> &UserId {
        &self.user.uid
    }
}
