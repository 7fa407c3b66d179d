//! Species search proxy
//!
//! Fronts the upstream plant database so the API key stays server-side.
//! One route does the work:
//!
//! - `GET /api/plants/search?q=QUERY` - forward the query upstream and
//!   pass the JSON response through verbatim
//! - `GET /health` - liveness and build info
//!
//! Contract for the search route:
//! - 400 when `q` is missing, empty after trimming, or over 100 chars
//! - 500 when no upstream API key is configured
//! - 502 when the upstream errors, times out, or answers non-JSON
//! - 200 with the upstream body otherwise
//!
//! Every response carries a permissive CORS origin; browser clients call
//! this from other origins.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::Args;

const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(5);
const MAX_QUERY_CHARS: usize = 100;

/// Server failures (bind/accept)
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("proxy io error: {0}")]
    Io(#[from] std::io::Error),
}

/// What went wrong talking to the plant database
#[derive(Debug, Error)]
enum UpstreamError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("upstream body was not JSON: {0}")]
    Body(String),
}

/// Proxy server state
pub struct ProxyServer {
    args: Args,
    http: reqwest::Client,
    bind_addr: SocketAddr,
}

impl ProxyServer {
    /// Create a server; `run` starts listening
    pub fn new(args: Args) -> Self {
        let http = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .user_agent(concat!("greenhouse-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();
        let bind_addr = args.listen;
        Self {
            args,
            http,
            bind_addr,
        }
    }

    /// Accept connections until the process exits
    pub async fn run(self: Arc<Self>) -> Result<(), ServerError> {
        let listener = TcpListener::bind(self.bind_addr).await?;
        info!(addr = %self.bind_addr, "species proxy listening");

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let server = self.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req| {
                    let server = server.clone();
                    async move { server.handle_request(req).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    warn!(addr = %remote_addr, error = %err, "connection error");
                }
            });
        }
    }

    /// Route requests to handlers
    async fn handle_request(
        &self,
        req: Request<Incoming>,
    ) -> Result<Response<Full<Bytes>>, hyper::Error> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        debug!(method = %method, path = %path, "incoming request");

        if method == Method::OPTIONS {
            return Ok(preflight_response());
        }

        let response = match (method, path.as_str()) {
            (Method::GET, "/health") => self.handle_health(),
            (Method::GET, "/api/plants/search") => self.handle_search(req.uri().query()).await,
            (_, "/health") | (_, "/api/plants/search") => method_not_allowed_response(),
            _ => not_found_response(&path),
        };
        Ok(response)
    }

    /// The proxy contract: validate, forward upstream, pass through
    async fn handle_search(&self, query_string: Option<&str>) -> Response<Full<Bytes>> {
        let query = match extract_query(query_string) {
            Some(query) => query,
            None => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    "Missing search query parameter \"q\"",
                );
            }
        };
        if query.chars().count() > MAX_QUERY_CHARS {
            return error_response(StatusCode::BAD_REQUEST, "Search query is too long");
        }

        let api_key = match self.args.api_key.as_deref() {
            Some(key) => key,
            None => {
                error!("upstream API key is not configured");
                return error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Server configuration error",
                );
            }
        };

        match self.fetch_upstream(api_key, &query).await {
            Ok(body) => json_response(StatusCode::OK, body),
            Err(UpstreamError::Status(status)) => {
                warn!(status = status, "plant database returned an error");
                error_response(StatusCode::BAD_GATEWAY, "Plant database unavailable")
            }
            Err(err) => {
                warn!(error = %err, "plant database unreachable");
                error_response(StatusCode::BAD_GATEWAY, "Failed to reach plant database")
            }
        }
    }

    /// One bounded GET against the plant database
    async fn fetch_upstream(&self, api_key: &str, query: &str) -> Result<String, UpstreamError> {
        let response = self
            .http
            .get(&self.args.upstream_base)
            .query(&[("key", api_key), ("q", query)])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        // Re-serialize rather than streaming bytes through: a non-JSON
        // body surfaces here instead of reaching clients
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|err| UpstreamError::Body(err.to_string()))?;
        Ok(body.to_string())
    }

    /// Liveness plus build info
    fn handle_health(&self) -> Response<Full<Bytes>> {
        let health = HealthResponse {
            status: "ok",
            service: "greenhouse-proxy",
            version: env!("CARGO_PKG_VERSION"),
            commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
            timestamp: chrono::Utc::now().to_rfc3339(),
            upstream_configured: self.args.api_key.is_some(),
        };
        let body =
            serde_json::to_string(&health).unwrap_or_else(|_| r#"{"status":"ok"}"#.to_string());
        json_response(StatusCode::OK, body)
    }
}

/// Health payload
#[derive(Serialize)]
struct HealthResponse {
    /// Always "ok" when the process answers at all
    status: &'static str,
    /// Service name for fleet dashboards
    service: &'static str,
    /// Cargo package version
    version: &'static str,
    /// Git commit hash (short)
    commit: &'static str,
    /// Current timestamp
    timestamp: String,
    /// Whether search can work (API key present)
    #[serde(rename = "upstreamConfigured")]
    upstream_configured: bool,
}

/// Pull a trimmed, non-empty `q` out of the query string
fn extract_query(query_string: Option<&str>) -> Option<String> {
    let qs = query_string?;
    url::form_urlencoded::parse(qs.as_bytes())
        .find(|(key, _)| key == "q")
        .map(|(_, value)| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// JSON response with the shared headers
fn json_response(status: StatusCode, body: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Full::new(Bytes::from(body)))
        .unwrap()
}

/// Error body in the `{"error": ...}` shape clients expect
fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({ "error": message });
    json_response(status, body.to_string())
}

/// CORS preflight response
fn preflight_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Headers", "*")
        .header("Access-Control-Allow-Methods", "GET, OPTIONS")
        .body(Full::new(Bytes::new()))
        .unwrap()
}

/// Method not allowed response
fn method_not_allowed_response() -> Response<Full<Bytes>> {
    error_response(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

/// Not found response
fn not_found_response(path: &str) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": "Not found",
        "path": path,
        "hint": "Use GET /api/plants/search?q=... or GET /health"
    });
    json_response(StatusCode::NOT_FOUND, body.to_string())
}
