//! Auth-event functions for the FitGen backend
//!
//! The only function today is account cleanup: when the identity provider
//! deletes an account, the account's record in `special_user` is deleted.
//!
//! - [`event`]: decoding of account-deleted payloads
//! - [`cleanup`]: the [`AccountCleanupHandler`]
//! - [`webhook`]: axum router exposing the handler over HTTP
//!
//! # Example
//!
//! ```rust,no_run
//! use fitgen_functions::{AccountCleanupHandler, UserDeletedEvent, UserId};
//! use fitgen_store::MemoryStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let handler = AccountCleanupHandler::new(MemoryStore::new(), "special_user")?;
//!     let event = UserDeletedEvent::for_uid(UserId::parse("abc123")?);
//!     let report = handler.on_user_deleted(&event).await?;
//!     println!("{}: {}", report.path, report.outcome);
//!     Ok(())
//! }
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cleanup;
pub mod error;
pub mod event;
pub mod webhook;

pub use cleanup::{AccountCleanupHandler, CleanupReport};
pub use error::{CleanupError, CleanupResult};
pub use event::{UserDeletedEvent, UserId, UserRecord};
