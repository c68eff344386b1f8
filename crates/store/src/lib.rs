//! Document store access for FitGen backend functions
//!
//! This crate provides the [`DocumentStore`] seam used by the account cleanup
//! handler and two implementations:
//!
//! - [`FirestoreStore`]: REST client for a Firestore-compatible document store
//!   (production project or local emulator)
//! - [`MemoryStore`]: in-process store for tests and local dry runs
//!
//! Neither implementation retries. Failed calls surface as [`StoreError`] and
//! the caller decides what a failure means; for event handlers that is
//! "let the platform redeliver".
//!
//! # Example
//!
//! ```rust,no_run
//! use fitgen_store::{DocumentPath, DocumentStore, FirestoreStore, StoreClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoreClientConfig::emulator("localhost:8080", "demo-fitgen");
//!     let store = FirestoreStore::with_config(config)?;
//!
//!     let path = DocumentPath::new("special_user", "abc123")?;
//!     let outcome = store.delete(&path).await?;
//!     println!("{path}: {outcome}");
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod codec;
pub mod config;
pub mod document;
pub mod error;
pub mod memory;
pub mod store;

pub use client::FirestoreStore;
pub use config::StoreClientConfig;
pub use document::{Document, DocumentPath};
pub use error::{StoreError, StoreResult};
pub use memory::{MemoryStore, StoreOp};
pub use store::{DeleteOutcome, DocumentStore};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::FirestoreStore;
    pub use crate::config::StoreClientConfig;
    pub use crate::document::{Document, DocumentPath};
    pub use crate::error::{StoreError, StoreResult};
    pub use crate::memory::MemoryStore;
    pub use crate::store::{DeleteOutcome, DocumentStore};
}
