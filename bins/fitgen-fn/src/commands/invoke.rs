//! `invoke`: handle one event, the way a serverless platform would call us
//!
//! Exit status tells the caller what to do: 0 done, 75 redeliver later,
//! 2 drop the event, anything else needs an operator.

use super::{build_handler, CommandError, CommandResult};
use fitgen_core::config::Config;
use fitgen_core::error::exit_codes;
use fitgen_functions::{AccountCleanupHandler, CleanupReport, UserDeletedEvent, UserId};
use fitgen_store::MemoryStore;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

pub async fn run(
    config: &Config,
    uid: Option<String>,
    event: Option<PathBuf>,
    dry_run: bool,
    format: &str,
) -> CommandResult {
    let report = if dry_run {
        let handler =
            AccountCleanupHandler::new(MemoryStore::new(), config.schema.cleanup.collection.as_str())?;
        dispatch(&handler, uid, event).await?
    } else {
        let handler = build_handler(config)?;
        dispatch(&handler, uid, event).await?
    };

    print_report(&report, dry_run, format)
}

async fn dispatch<S: fitgen_store::DocumentStore>(
    handler: &AccountCleanupHandler<S>,
    uid: Option<String>,
    event: Option<PathBuf>,
) -> Result<CleanupReport, CommandError> {
    let report = match (uid, event) {
        (Some(uid), _) => {
            let event = UserDeletedEvent::for_uid(UserId::parse(uid)?);
            handler.on_user_deleted(&event).await?
        }
        (None, Some(path)) => {
            let payload = tokio::fs::read(&path).await?;
            handler.handle_payload(&payload).await?
        }
        (None, None) => {
            let mut payload = Vec::new();
            tokio::io::stdin().read_to_end(&mut payload).await?;
            handler.handle_payload(&payload).await?
        }
    };
    Ok(report)
}

fn print_report(report: &CleanupReport, dry_run: bool, format: &str) -> CommandResult {
    if format == "json" {
        let json = serde_json::to_string_pretty(report)
            .map_err(|e| CommandError::new(exit_codes::FAILURE, fitgen_core::Error::from(e)))?;
        println!("{json}");
        return Ok(());
    }

    let suffix = if dry_run {
        " (dry run: empty in-memory store, nothing was deleted)"
    } else {
        ""
    };
    println!(
        "{} {} {} in {}ms{}",
        "✓".green(),
        report.path,
        report.outcome.as_str().bold(),
        report.elapsed_ms,
        suffix.dimmed()
    );
    Ok(())
}
