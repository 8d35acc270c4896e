//! Watch Sync server
//!
//! Serves the shared playback state of one synchronized viewing session.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use watch_sync::api::{self, ApiState};
use watch_sync::config::AppConfig;
use watch_sync::state::SyncStore;

/// Watch Sync - keep every viewer's player on the same frame
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    /// Listen port (overrides the config file)
    #[arg(short, long, env = "SYNC_PORT")]
    port: Option<u16>,

    /// Listen address (overrides the config file)
    #[arg(long, env = "SYNC_HOST")]
    host: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_logging(&args.log_level, args.json_logs)?;

    info!("Starting Watch Sync...");

    let config = resolve_config(&args).await?;
    let addr = config.server.socket_addr()?;

    let state = Arc::new(ApiState::new(SyncStore::new()));
    api::start_server(state, addr, shutdown_signal()).await?;

    info!("Watch Sync shutdown complete");
    Ok(())
}

/// Config file values with command-line overrides applied
async fn resolve_config(args: &Args) -> Result<AppConfig> {
    let mut config = AppConfig::load_or_default(&args.config).await?;

    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(host) = &args.host {
        config.server.host = host.clone();
    }

    config.validate()?;
    Ok(config)
}

fn init_logging(level: &str, json: bool) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let text_layer = (!json).then(|| {
        tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
    });
    let json_layer = json.then(|| tracing_subscriber::fmt::layer().json().with_target(false));

    tracing_subscriber::registry()
        .with(filter)
        .with(text_layer)
        .with(json_layer)
        .try_init()?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for CTRL+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
