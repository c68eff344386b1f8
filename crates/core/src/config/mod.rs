//! Configuration loading and schema definitions
//!
//! Layering: built-in defaults, then the TOML file, then environment
//! variables. CLI flags are applied by the binary on top of the result.

mod loader;
mod schema;

pub use loader::Config;
pub use schema::*;
