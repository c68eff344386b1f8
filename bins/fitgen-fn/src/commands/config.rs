//! `config`: show what the process would run with

use super::{CommandError, CommandResult};
use fitgen_core::config::Config;
use fitgen_core::Error;
use fitgen_core::error::exit_codes;

pub fn run(config: &Config, format: &str) -> CommandResult {
    let rendered = if format == "json" {
        serde_json::to_string_pretty(&config.schema).map_err(render_error)?
    } else {
        toml::to_string_pretty(&config.schema).map_err(render_error)?
    };

    match &config.path {
        Some(path) => println!("# loaded from {}", path.display()),
        None => println!("# no config file found, using defaults"),
    }
    println!("{rendered}");

    if let Err(e) = config.schema.validate() {
        eprintln!("# warning: {e}");
    }
    if config.schema.store.access_token.is_some() {
        println!("# access token: set (from FIRESTORE_ACCESS_TOKEN)");
    }
    Ok(())
}

fn render_error(err: impl Into<Error>) -> CommandError {
    CommandError::new(exit_codes::FAILURE, err.into())
}
