//! Backend transport seam.
//!
//! The [`Manager`](crate::api::Manager) never touches a concrete HTTP
//! server; it talks to the [`Transport`] capability trait, implemented
//! once per backend. This crate ships a hyper-based implementation in
//! [`HyperTransport`]; tests and embeddings can provide their own.

mod config;
mod cors;
mod server;

pub use config::ServerConfig;
pub use cors::CorsConfig;
pub use server::HyperTransport;

use crate::http::{ApiRequest, ApiResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// A handler mounted at one route.
#[async_trait]
pub trait RouteHandler: Send + Sync {
    /// Handle one incoming request.
    async fn handle(&self, request: ApiRequest) -> ApiResponse;
}

/// Route handler replying with a fixed, precomputed response.
///
/// Used for documentation probes and the documentation index, whose
/// bodies are rendered once at finalization time.
pub struct StaticResponse {
    response: ApiResponse,
}

impl StaticResponse {
    /// Serve the given response for every request.
    pub fn new(response: ApiResponse) -> Self {
        Self { response }
    }

    /// Serve a fixed plain-text body.
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ApiResponse::text(content))
    }

    /// Serve a fixed HTML body.
    pub fn html(content: impl Into<String>) -> Self {
        Self::new(ApiResponse::html(content))
    }
}

#[async_trait]
impl RouteHandler for StaticResponse {
    async fn handle(&self, _request: ApiRequest) -> ApiResponse {
        self.response.clone()
    }
}

/// Capabilities a backend transport must expose to the manager.
///
/// Registration happens single-threaded at startup; implementations may
/// freeze their route table when [`serve`](Transport::serve) begins.
#[async_trait]
pub trait Transport {
    /// Register a handler for `POST path`.
    fn register_post(
        &mut self,
        path: &str,
        handler: Arc<dyn RouteHandler>,
    ) -> Result<(), TransportError>;

    /// Register a handler for `GET path`.
    fn register_get(
        &mut self,
        path: &str,
        handler: Arc<dyn RouteHandler>,
    ) -> Result<(), TransportError>;

    /// Register a handler for `OPTIONS path` (the documentation probe).
    fn register_options(
        &mut self,
        path: &str,
        handler: Arc<dyn RouteHandler>,
    ) -> Result<(), TransportError>;

    /// Attach a CORS policy applied to every response from now on.
    fn set_cors(&mut self, cors: CorsConfig);

    /// Listen and serve until the process is stopped.
    async fn serve(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Transport-level registration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// A handler is already mounted at this method and path.
    DuplicateRoute {
        /// HTTP method of the clashing registration.
        method: crate::http::Method,
        /// Path of the clashing registration.
        path: String,
    },
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::DuplicateRoute { method, path } => {
                write!(f, "a handler is already registered for {} {}", method, path)
            }
        }
    }
}

impl std::error::Error for TransportError {}
