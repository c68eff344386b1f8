//! FitGen functions host
//!
//! Runs the account cleanup handler as a webhook service or as a single
//! serverless-style invocation.

use clap::{Parser, Subcommand};
use fitgen_core::config::Config;
use fitgen_core::error::exit_codes;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

mod commands;

use commands::{config as config_cmd, health, invoke, serve, CommandError};

/// Host for FitGen auth-event functions
#[derive(Parser)]
#[command(name = "fitgen-fn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    json_logs: bool,

    /// Output format (text, json)
    #[arg(short, long, global = true, default_value = "text")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the auth event webhook
    Serve {
        /// Bind host (overrides server.host)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides server.port and PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Handle one account-deleted event and exit
    Invoke {
        /// Deleted account uid (instead of an event payload)
        #[arg(long, conflicts_with = "event")]
        uid: Option<String>,

        /// Event payload file; reads stdin when neither --uid nor --event is given
        #[arg(short, long)]
        event: Option<PathBuf>,

        /// Decode and route the event against an empty in-memory store
        /// instead of the configured one; the outcome is always already_absent
        #[arg(long)]
        dry_run: bool,
    },

    /// Check that the document store is reachable
    Health,

    /// Print the resolved configuration
    Config,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            return exit(exit_codes::CONFIG_ERROR);
        }
    };

    let level = match cli.verbose {
        0 => config.schema.logging.level.clone(),
        1 => "debug".to_string(),
        _ => "trace".to_string(),
    };
    let telemetry = fitgen_telemetry::TelemetryConfig::default()
        .with_log_level(level)
        .with_json(cli.json_logs || config.schema.logging.json);
    if let Err(e) = fitgen_telemetry::init_with_config(telemetry) {
        eprintln!("{} {}", "Warning:".yellow().bold(), e);
    }

    let result = match cli.command {
        Commands::Serve { host, port } => serve::run(config, host, port).await,
        Commands::Invoke { uid, event, dry_run } => {
            invoke::run(&config, uid, event, dry_run, &cli.format).await
        }
        Commands::Health => health::run(&config, &cli.format).await,
        Commands::Config => config_cmd::run(&config, &cli.format),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(CommandError { code, error }) => {
            eprintln!("{} {:#}", "Error:".red().bold(), error);
            exit(code)
        }
    }
}

fn exit(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
