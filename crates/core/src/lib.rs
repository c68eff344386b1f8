//! Core utilities for FitGen backend functions
//!
//! This crate provides shared functionality used by the store client, the
//! account cleanup handler and the `fitgen-fn` binary:
//!
//! - **Error handling**: errors with codes, context and recovery suggestions
//! - **Configuration**: TOML file + environment layering with validation
//! - **Document ids**: naming rules shared by config validation and the store
//!
//! # Example
//!
//! ```rust,no_run
//! use fitgen_core::config::Config;
//!
//! let config = Config::load(None).expect("config");
//! config.schema.validate().expect("valid config");
//! println!("cleaning up {}", config.schema.cleanup.collection);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod document_id;
pub mod error;

pub use error::{Error, ErrorCode, Result, ResultExt};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, ConfigSchema};
    pub use crate::error::{exit_codes, Error, ErrorCode, Result, ResultExt};
}
