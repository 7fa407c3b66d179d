//! greenhouse-proxy - species search proxy daemon
//!
//! Fronts the plant database so the API key never reaches clients.

use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use greenhouse::config::Args;
use greenhouse::server::ProxyServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize tracing/logging
    let log_level = args.log_level.clone();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("greenhouse={},info", log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Validate configuration
    if let Err(e) = args.validate() {
        error!("Configuration error: {}", e);
        std::process::exit(1);
    }

    info!("======================================");
    info!("  greenhouse-proxy - species search");
    info!("======================================");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!(
        "Commit: {}",
        option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown")
    );
    info!("Listen: {}", args.listen);
    info!("Upstream: {}", args.upstream_base);
    info!("======================================");

    if args.api_key.is_none() {
        warn!("PERENUAL_API_KEY is not set; search requests will return 500 until it is");
    }

    let server = Arc::new(ProxyServer::new(args));
    server.run().await?;
    Ok(())
}
