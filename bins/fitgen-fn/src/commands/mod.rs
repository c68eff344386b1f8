//! Subcommand implementations

pub mod config;
pub mod health;
pub mod invoke;
pub mod serve;

use fitgen_core::config::Config;
use fitgen_core::error::exit_codes;
use fitgen_functions::{AccountCleanupHandler, CleanupError};
use fitgen_store::{FirestoreStore, StoreClientConfig};

/// A failed command and the process exit code it maps to
pub struct CommandError {
    pub code: i32,
    pub error: anyhow::Error,
}

impl CommandError {
    pub fn new(code: i32, error: impl Into<anyhow::Error>) -> Self {
        Self {
            code,
            error: error.into(),
        }
    }

    pub fn config(error: impl Into<anyhow::Error>) -> Self {
        Self::new(exit_codes::CONFIG_ERROR, error)
    }
}

impl From<CleanupError> for CommandError {
    fn from(err: CleanupError) -> Self {
        let code = match &err {
            e if e.is_invalid_event() => exit_codes::INVALID_EVENT,
            CleanupError::Config(_) => exit_codes::CONFIG_ERROR,
            e if e.is_transient() => exit_codes::TEMPORARY_FAILURE,
            _ => exit_codes::STORE_ERROR,
        };
        Self::new(code, fitgen_core::Error::from(err))
    }
}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        Self::new(exit_codes::FAILURE, fitgen_core::Error::from(err))
    }
}

pub type CommandResult = Result<(), CommandError>;

/// Build the process-wide store client from validated configuration
pub fn build_store(config: &Config) -> Result<FirestoreStore, CommandError> {
    config.schema.validate().map_err(CommandError::config)?;

    let client_config = StoreClientConfig::from_store_config(&config.schema.store);
    FirestoreStore::with_config(client_config)
        .map_err(|e| CommandError::config(fitgen_core::Error::from(e)))
}

/// Build the cleanup handler around the configured store
pub fn build_handler(
    config: &Config,
) -> Result<AccountCleanupHandler<FirestoreStore>, CommandError> {
    let store = build_store(config)?;
    let handler = AccountCleanupHandler::new(store, config.schema.cleanup.collection.as_str())?;
    Ok(handler)
}
