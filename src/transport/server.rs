//! Hyper-backed transport implementation.
//!
//! Routes are collected into a plain map while the manager registers
//! endpoints, then frozen into an `Arc` snapshot when serving begins, so
//! concurrent requests share immutable state without locking.

use crate::http::{ApiRequest, ApiResponse, Method, StatusCode};
use crate::transport::{CorsConfig, RouteHandler, ServerConfig, Transport, TransportError};
use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Request, Response};
use hyper_util::rt::TokioIo;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

/// Exact-match route table shared by the serve loop and [`dispatch`].
///
/// [`dispatch`]: HyperTransport::dispatch
#[derive(Clone, Default)]
struct RouteTable {
    routes: HashMap<(Method, String), Arc<dyn RouteHandler>>,
    cors: Option<CorsConfig>,
}

impl RouteTable {
    fn insert(
        &mut self,
        method: Method,
        path: &str,
        handler: Arc<dyn RouteHandler>,
    ) -> Result<(), TransportError> {
        let key = (method, path.to_string());
        if self.routes.contains_key(&key) {
            return Err(TransportError::DuplicateRoute {
                method,
                path: path.to_string(),
            });
        }
        self.routes.insert(key, handler);
        Ok(())
    }

    async fn dispatch(&self, request: ApiRequest) -> ApiResponse {
        // The origin is captured up front; the handler consumes the request.
        let origin = request.origin().map(str::to_string);
        let key = (request.method, request.path.clone());

        let mut response = match self.routes.get(&key) {
            Some(handler) => handler.handle(request).await,
            None => ApiResponse::error(StatusCode::NOT_FOUND, "Not Found"),
        };

        if let Some(cors) = &self.cors {
            cors.apply(&mut response, origin.as_deref());
        }
        response
    }
}

/// HTTP transport over hyper 1.x, one spawned task per connection.
pub struct HyperTransport {
    config: ServerConfig,
    table: RouteTable,
}

impl HyperTransport {
    /// Create a transport with the given server configuration.
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            table: RouteTable::default(),
        }
    }

    /// Create a transport with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ServerConfig::default())
    }

    /// The server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Route a request through the table in-process, without a socket.
    ///
    /// This is the same lookup and CORS post-processing the serve loop
    /// performs, which makes end-to-end tests possible without binding a
    /// port.
    pub async fn dispatch(&self, request: ApiRequest) -> ApiResponse {
        self.table.dispatch(request).await
    }
}

#[async_trait]
impl Transport for HyperTransport {
    fn register_post(
        &mut self,
        path: &str,
        handler: Arc<dyn RouteHandler>,
    ) -> Result<(), TransportError> {
        self.table.insert(Method::Post, path, handler)
    }

    fn register_get(
        &mut self,
        path: &str,
        handler: Arc<dyn RouteHandler>,
    ) -> Result<(), TransportError> {
        self.table.insert(Method::Get, path, handler)
    }

    fn register_options(
        &mut self,
        path: &str,
        handler: Arc<dyn RouteHandler>,
    ) -> Result<(), TransportError> {
        self.table.insert(Method::Options, path, handler)
    }

    fn set_cors(&mut self, cors: CorsConfig) {
        self.table.cors = Some(cors);
    }

    async fn serve(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr: SocketAddr = self.config.bind_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;

        info!("API server listening on {}", addr);

        let table = Arc::new(self.table.clone());
        let max_body_size = self.config.max_body_size;

        loop {
            let (stream, remote_addr) = listener.accept().await?;
            let io = TokioIo::new(stream);
            let table = table.clone();

            tokio::task::spawn(async move {
                let service = service_fn(move |req| {
                    let table = table.clone();
                    async move { handle_request(req, table, max_body_size, remote_addr).await }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    error!("Error serving connection: {:?}", err);
                }
            });
        }
    }
}

/// Handle one incoming hyper request.
async fn handle_request(
    req: Request<Incoming>,
    table: Arc<RouteTable>,
    max_body_size: usize,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, hyper::Error> {
    debug!("{} {} from {}", req.method(), req.uri().path(), remote_addr);

    let request = match convert_request(req, max_body_size).await {
        Ok(request) => request,
        Err(e) => {
            warn!("Failed to read request: {}", e);
            return Ok(build_response(ApiResponse::error(
                StatusCode::BAD_REQUEST,
                e.to_string(),
            )));
        }
    };

    Ok(build_response(table.dispatch(request).await))
}

/// Convert a hyper request into an [`ApiRequest`].
async fn convert_request(
    req: Request<Incoming>,
    max_body_size: usize,
) -> Result<ApiRequest, Box<dyn std::error::Error + Send + Sync>> {
    let method = Method::from(req.method());
    let path = req.uri().path().to_string();

    let mut headers = HashMap::new();
    for (name, value) in req.headers() {
        if let Ok(v) = value.to_str() {
            // hyper exposes header names lowercased already.
            headers.insert(name.as_str().to_string(), v.to_string());
        }
    }

    let body_bytes = req.collect().await?.to_bytes();
    let body = if body_bytes.len() > max_body_size {
        return Err("Request body too large".into());
    } else if body_bytes.is_empty() {
        None
    } else {
        Some(body_bytes)
    };

    Ok(ApiRequest {
        method,
        path,
        headers,
        body,
    })
}

/// Build a hyper response from an [`ApiResponse`].
fn build_response(response: ApiResponse) -> Response<Full<Bytes>> {
    let status = hyper::StatusCode::from_u16(response.status.0).unwrap_or_else(|_| {
        warn!(
            "Invalid status code {}, falling back to 500 Internal Server Error",
            response.status.0
        );
        hyper::StatusCode::INTERNAL_SERVER_ERROR
    });

    let mut builder = Response::builder().status(status);

    for (name, value) in response.headers {
        builder = builder.header(name, value);
    }

    let body = response.body.unwrap_or_default();
    builder.body(Full::new(body)).unwrap()
}
