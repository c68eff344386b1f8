//! Configuration schema definitions
//!
//! Every field has a default so a partial (or missing) file is valid.

use crate::document_id::id_violation;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Collection holding the per-user auxiliary records.
pub const DEFAULT_COLLECTION: &str = "special_user";

/// Database id used when none is configured.
pub const DEFAULT_DATABASE: &str = "(default)";

/// Root configuration schema
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ConfigSchema {
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub cleanup: CleanupConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ConfigSchema {
    /// Apply environment overrides using the given variable lookup
    ///
    /// The lookup is injected so tests do not have to mutate the process
    /// environment.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(project) = non_empty("FITGEN_PROJECT_ID").or_else(|| non_empty("GOOGLE_CLOUD_PROJECT")) {
            self.store.project_id = project;
        }
        if let Some(database) = non_empty("FIRESTORE_DATABASE") {
            self.store.database = database;
        }
        if let Some(host) = non_empty("FIRESTORE_EMULATOR_HOST") {
            self.store.emulator_host = Some(host);
        }
        if let Some(url) = non_empty("FIRESTORE_BASE_URL") {
            self.store.base_url = Some(url);
        }
        if let Some(token) = non_empty("FIRESTORE_ACCESS_TOKEN") {
            self.store.access_token = Some(token);
        }
        if let Some(collection) = non_empty("FITGEN_COLLECTION") {
            self.cleanup.collection = collection;
        }
        if let Some(port) = non_empty("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(level) = non_empty("FITGEN_LOG") {
            self.logging.level = level;
        }
    }

    /// Validate the merged configuration
    pub fn validate(&self) -> Result<()> {
        if self.store.project_id.trim().is_empty() {
            return Err(Error::config_validation("store.project_id cannot be empty")
                .with_suggestion("Set FITGEN_PROJECT_ID or store.project_id in the config file"));
        }

        if self.store.database.trim().is_empty() {
            return Err(Error::config_validation("store.database cannot be empty"));
        }

        if let Some(url) = &self.store.base_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(Error::config_validation(
                    "store.base_url must start with http:// or https://",
                ));
            }
        }

        if self.store.timeout_secs == 0 {
            return Err(Error::config_validation("store.timeout_secs cannot be zero"));
        }

        if let Some(reason) = id_violation("cleanup.collection", &self.cleanup.collection) {
            return Err(Error::config_validation(reason));
        }

        Ok(())
    }
}

/// Document store connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Cloud project that owns the database
    #[serde(default)]
    pub project_id: String,

    /// Database id within the project
    #[serde(default = "default_database")]
    pub database: String,

    /// Override for the REST base URL (e.g. a proxy)
    #[serde(default)]
    pub base_url: Option<String>,

    /// `host:port` of a local emulator; takes precedence over the public endpoint
    #[serde(default)]
    pub emulator_host: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token; only ever read from the environment
    #[serde(skip)]
    pub access_token: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            database: default_database(),
            base_url: None,
            emulator_host: None,
            timeout_secs: default_timeout_secs(),
            access_token: None,
        }
    }
}

fn default_database() -> String {
    DEFAULT_DATABASE.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Account cleanup settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanupConfig {
    /// Collection whose document is deleted for a removed account
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
        }
    }
}

fn default_collection() -> String {
    DEFAULT_COLLECTION.to_string()
}

/// Webhook listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Log output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_level")]
    pub level: String,

    /// Emit JSON lines instead of compact text
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
        }
    }
}

fn default_level() -> String {
    "info".to_string()
}
