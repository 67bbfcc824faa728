//! HTTP endpoint for telemetry summaries.
//!
//! A small hyper server exposing the aggregation engine:
//!
//! - `POST /api/telemetry`: summary request/response (JSON)
//! - `GET /`: liveness probe
//! - `OPTIONS *`: CORS preflight
//!
//! Every response carries permissive CORS headers; the upstream consumers
//! are browser dashboards.
//!
//! ## Example
//!
//! ```rust,no_run
//! use regionwatch::http::{run_server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = ServerConfig::builder()
//!         .listen_addr("0.0.0.0:8000")
//!         .data_dir("data")
//!         .build();
//!
//!     run_server(config).await.expect("server failed");
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::http::response::Builder;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

use regionwatch_types::{SummaryRequest, SummaryResponse};

use crate::aggregate::summarize;
use crate::error::Error;
use crate::source::{CachedLoader, Loader};

/// Configuration for the summary endpoint.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8000")
    pub listen_addr: String,
    /// Directory probed for telemetry snapshot files
    pub data_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
            data_dir: PathBuf::from("data"),
        }
    }
}

impl ServerConfig {
    /// Create a new builder for ServerConfig.
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }
}

/// Builder for ServerConfig.
#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    listen_addr: Option<String>,
    data_dir: Option<PathBuf>,
}

impl ServerConfigBuilder {
    /// Set the listen address.
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.listen_addr = Some(addr.into());
        self
    }

    /// Set the data directory.
    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(dir.into());
        self
    }

    /// Build the ServerConfig.
    pub fn build(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        ServerConfig {
            listen_addr: self.listen_addr.unwrap_or(defaults.listen_addr),
            data_dir: self.data_dir.unwrap_or(defaults.data_dir),
        }
    }
}

/// The summary service: a cached loader shared across connections.
///
/// Stateless beyond the snapshot cache: each request independently loads
/// and aggregates, so concurrent requests need no further coordination.
#[derive(Debug)]
pub struct SummaryService {
    loader: CachedLoader,
}

impl SummaryService {
    /// Create a service reading snapshots from the configured data directory.
    pub fn new(config: &ServerConfig) -> Self {
        Self {
            loader: CachedLoader::new(Loader::new(&config.data_dir)),
        }
    }

    /// Compute a summary response for one request body.
    ///
    /// This is the whole request pipeline minus HTTP framing: load (cached),
    /// aggregate, wrap.
    pub fn summarize_request(&self, request: &SummaryRequest) -> Result<SummaryResponse, Error> {
        let records = self.loader.load()?;
        let regions = summarize(&records, &request.regions, request.threshold_ms)?;
        Ok(SummaryResponse::new(regions))
    }

    /// Handle one HTTP request, infallibly producing a response.
    pub async fn handle(&self, req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        debug!(%method, %path, "handling request");

        let response = match (&method, path.as_str()) {
            (&Method::OPTIONS, _) => preflight(),
            (&Method::GET, "/") => json_response(StatusCode::OK, &serde_json::json!({"ok": true})),
            (&Method::POST, "/api/telemetry") => self.telemetry(req).await,
            _ => error_response(StatusCode::NOT_FOUND, "not found"),
        };

        Ok(response)
    }

    async fn telemetry(&self, req: Request<Incoming>) -> Response<Full<Bytes>> {
        let body = match req.into_body().collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("failed to read request body: {}", e),
                )
            }
        };

        let request: SummaryRequest = match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(e) => {
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &format!("invalid request body: {}", e),
                )
            }
        };

        match self.summarize_request(&request) {
            Ok(response) => json_response(StatusCode::OK, &response),
            Err(e) => {
                debug!(error = %e, "summary request failed");
                error_response(status_for(&e), &e.to_string())
            }
        }
    }
}

/// Run the server until the listener fails.
pub async fn run_server(config: ServerConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, data_dir = %config.data_dir.display(), "regionwatch listening");

    let service = Arc::new(SummaryService::new(&config));

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let service = service.clone();

        tokio::spawn(async move {
            let svc = service_fn(move |req: Request<Incoming>| {
                let service = service.clone();
                async move { service.handle(req).await }
            });

            if let Err(e) = http1::Builder::new().serve_connection(io, svc).await {
                warn!("connection error: {}", e);
            }
        });
    }
}

/// Map an engine error to a response status.
fn status_for(error: &Error) -> StatusCode {
    if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

fn cors(builder: Builder) -> Builder {
    builder
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "*")
}

fn preflight() -> Response<Full<Bytes>> {
    cors(Response::builder().status(StatusCode::NO_CONTENT))
        .body(Full::new(Bytes::new()))
        .unwrap()
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let payload = serde_json::to_vec(body).unwrap_or_default();
    cors(Response::builder().status(status))
        .header("Content-Type", "application/json")
        .body(Full::new(Bytes::from(payload)))
        .unwrap()
}

fn error_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    json_response(status, &serde_json::json!({ "error": message }))
}
