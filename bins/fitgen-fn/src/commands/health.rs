//! `health`: probe the configured store

use super::{build_store, CommandError, CommandResult};
use fitgen_core::config::Config;
use fitgen_store::DocumentStore;
use owo_colors::OwoColorize;
use serde_json::json;
use std::time::Instant;

pub async fn run(config: &Config, format: &str) -> CommandResult {
    let store = build_store(config)?;
    let collection = config.schema.cleanup.collection.as_str();

    let start = Instant::now();
    let result = store.probe(collection).await;
    let elapsed_ms = start.elapsed().as_millis();

    if format == "json" {
        let body = json!({
            "healthy": result.is_ok(),
            "endpoint": store.config().documents_root(),
            "collection": collection,
            "elapsed_ms": elapsed_ms,
            "error": result.as_ref().err().map(ToString::to_string),
        });
        println!("{body:#}");
    } else {
        println!("  Store:       {}", store.config().documents_root());
        println!("  Collection:  {collection}");
        match &result {
            Ok(()) => println!("  Status:      {} ({elapsed_ms}ms)", "✓ OK".green()),
            Err(e) => println!("  Status:      {} {e}", "✗ Error".red()),
        }
    }

    result.map_err(|e| {
        let transient = e.is_transient();
        let code = if transient {
            fitgen_core::error::exit_codes::TEMPORARY_FAILURE
        } else {
            fitgen_core::error::exit_codes::STORE_ERROR
        };
        CommandError::new(code, fitgen_core::Error::from(e))
    })
}
