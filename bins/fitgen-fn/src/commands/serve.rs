//! `serve`: run the webhook until Ctrl-C

use super::{build_handler, CommandError, CommandResult};
use fitgen_core::config::Config;
use fitgen_core::error::exit_codes;
use fitgen_functions::webhook;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub async fn run(mut config: Config, host: Option<String>, port: Option<u16>) -> CommandResult {
    if let Some(host) = host {
        config.schema.server.host = host;
    }
    if let Some(port) = port {
        config.schema.server.port = port;
    }

    let handler = Arc::new(build_handler(&config)?);
    let addr = config.schema.server.bind_addr();

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| CommandError::new(exit_codes::FAILURE, anyhow::anyhow!("bind {addr}: {e}")))?;

    info!(
        addr = %addr,
        project = %config.schema.store.project_id,
        collection = %handler.collection(),
        "Serving auth event webhook"
    );

    axum::serve(listener, webhook::router(handler))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Webhook stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received, draining in-flight requests");
    }
}
