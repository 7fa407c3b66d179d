//! Configuration for the species proxy
//!
//! CLI arguments and environment variable handling using clap. Flags
//! win over environment variables; `.env` files are loaded by the
//! binary before parsing.

use clap::Parser;
use std::net::SocketAddr;
use url::Url;

/// greenhouse-proxy - species search proxy for the greenhouse tracker
///
/// Keeps the plant-database API key server-side; clients only ever see
/// this proxy.
#[derive(Parser, Debug, Clone)]
#[command(name = "greenhouse-proxy")]
#[command(about = "Species search proxy for the greenhouse plant tracker")]
pub struct Args {
    /// Address to listen on
    #[arg(long, env = "GREENHOUSE_LISTEN", default_value = "127.0.0.1:8799")]
    pub listen: SocketAddr,

    /// API key for the upstream plant database
    ///
    /// Optional at startup: /health still answers without one, search
    /// returns 500 until it is configured.
    #[arg(long, env = "PERENUAL_API_KEY")]
    pub api_key: Option<String>,

    /// Upstream species-list endpoint
    #[arg(
        long,
        env = "GREENHOUSE_UPSTREAM",
        default_value = "https://perenual.com/api/v2/species-list"
    )]
    pub upstream_base: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "GREENHOUSE_LOG", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration after parsing
    pub fn validate(&self) -> Result<(), String> {
        let upstream = Url::parse(&self.upstream_base)
            .map_err(|err| format!("GREENHOUSE_UPSTREAM is not a valid URL: {err}"))?;
        if !matches!(upstream.scheme(), "http" | "https") {
            return Err(format!(
                "GREENHOUSE_UPSTREAM must be http or https, got {}",
                upstream.scheme()
            ));
        }
        Ok(())
    }
}
