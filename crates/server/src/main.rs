mod bootstrap;
mod customers;
mod health;
mod payload;

use std::future::IntoFuture;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clientes_core::config::{AppConfig, LoadOptions};
use tokio::sync::Notify;
use tracing::{error, info, warn};

fn init_logging(config: &AppConfig) {
    use clientes_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Log level and format come from config, so it loads first.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    let address = app.config.listen_address();
    let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("could not bind `{address}`"))?;

    info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        bind_address = %address,
        "clientes-server listening"
    );

    let shutdown = Arc::new(Notify::new());
    let server_shutdown = Arc::clone(&shutdown);
    let server = axum::serve(listener, app.router())
        .with_graceful_shutdown(async move { server_shutdown.notified().await })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            if let Err(error) = &result {
                error!(
                    event_name = "system.server.error",
                    correlation_id = "runtime",
                    error = %error,
                    "http server terminated unexpectedly"
                );
            }
            result?;
        }
        signal = wait_for_shutdown() => {
            signal?;
            info!(
                event_name = "system.server.stopping",
                correlation_id = "shutdown",
                grace_secs = grace.as_secs(),
                "clientes-server draining in-flight requests"
            );
            shutdown.notify_one();
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result?,
                Err(_) => warn!(
                    event_name = "system.server.shutdown_timeout",
                    correlation_id = "shutdown",
                    "graceful shutdown window elapsed; dropping remaining connections"
                ),
            }
        }
    }

    info!(
        event_name = "system.server.stopped",
        correlation_id = "shutdown",
        "clientes-server stopped"
    );
    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
