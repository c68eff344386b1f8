//! Configuration for the REST document store client

use crate::error::{StoreError, StoreResult};
use fitgen_core::config::{StoreConfig, DEFAULT_DATABASE};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Public REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Token the emulator accepts as an admin credential
const EMULATOR_TOKEN: &str = "owner";

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreClientConfig {
    /// REST base URL, up to and including the API version
    pub base_url: String,
    /// Cloud project id
    pub project_id: String,
    /// Database id
    pub database: String,
    /// Bearer token sent as `Authorization`
    #[serde(skip_serializing)]
    pub access_token: Option<String>,
    /// Request timeout
    #[serde(with = "duration_secs")]
    pub timeout: Duration,
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs().serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

impl StoreClientConfig {
    /// Configuration for the public endpoint
    #[must_use]
    pub fn production(project_id: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            access_token: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Configuration for a local emulator at `host` (`host:port`)
    #[must_use]
    pub fn emulator(host: &str, project_id: impl Into<String>) -> Self {
        Self {
            base_url: format!("http://{}/v1", host.trim_end_matches('/')),
            project_id: project_id.into(),
            database: DEFAULT_DATABASE.to_string(),
            access_token: Some(EMULATOR_TOKEN.to_string()),
            timeout: Duration::from_secs(10),
        }
    }

    /// Derive client settings from the `[store]` configuration section
    ///
    /// Precedence for the endpoint: explicit `base_url`, then
    /// `emulator_host`, then the public endpoint.
    #[must_use]
    pub fn from_store_config(store: &StoreConfig) -> Self {
        let mut config = match (&store.base_url, &store.emulator_host) {
            (Some(url), _) => Self::production(&store.project_id).with_base_url(url),
            (None, Some(host)) => Self::emulator(host, &store.project_id),
            (None, None) => Self::production(&store.project_id),
        };

        config.database.clone_from(&store.database);
        config.timeout = Duration::from_secs(store.timeout_secs);
        if store.access_token.is_some() {
            config.access_token.clone_from(&store.access_token);
        }
        config
    }

    /// Builder-style method to set base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder-style method to set the database id
    #[must_use]
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = database.into();
        self
    }

    /// Builder-style method to set the bearer token
    #[must_use]
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Builder-style method to set timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// URL of the database's document root
    #[must_use]
    pub fn documents_root(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.project_id,
            self.database
        )
    }

    /// Validate the configuration
    pub fn validate(&self) -> StoreResult<()> {
        if self.base_url.is_empty() {
            return Err(StoreError::config("base_url cannot be empty"));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(StoreError::config("base_url must start with http:// or https://"));
        }

        if self.project_id.trim().is_empty() || self.project_id.contains('/') {
            return Err(StoreError::config("project_id must be a non-empty id"));
        }

        if self.database.trim().is_empty() || self.database.contains('/') {
            return Err(StoreError::config("database must be a non-empty id"));
        }

        if self.timeout.is_zero() {
            return Err(StoreError::config("timeout cannot be zero"));
        }

        Ok(())
    }
}
