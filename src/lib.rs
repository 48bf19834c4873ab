//! # Jolt - JSON Function Endpoints
//!
//! Jolt turns plain async functions into validated JSON-over-HTTP
//! endpoints. Each endpoint declares its parameters once; jolt derives the
//! route from the function identifier, validates incoming payloads against
//! the declaration and serves live, self-describing documentation for the
//! whole API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Transport (hyper 1.x)                          │
//! │            POST /1/say/hi   OPTIONS /1/say/hi   GET /1/docs          │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                   │
//!                                   ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                             Manager                                  │
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │            Request Adapter (per endpoint)                    │    │
//! │  │   content type ─▶ JSON parse ─▶ binding ─▶ user function     │    │
//! │  └─────────────────────────────────────────────────────────────┘    │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────┐      │
//! │  │ Route Deriver│  │Binding Engine│  │    Doc Generator     │      │
//! │  │ say_hi ─▶    │  │ ParamSpec ─▶ │  │ probe text + index   │      │
//! │  │ /1/say/hi    │  │ typed Args   │  │ page per endpoint    │      │
//! │  └──────────────┘  └──────────────┘  └──────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use jolt::prelude::*;
//! use serde_json::json;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     // Declare an endpoint: identifier, description, parameters, function.
//!     let say_hi = Endpoint::new(
//!         "say_hi",
//!         "Says hi if you say please",
//!         ParamSpec::new()
//!             .required("name", ParamKind::String)
//!             .required("please", ParamKind::Boolean),
//!         FnHandler::new(|args: Args| async move {
//!             if args.get_bool("please").unwrap_or(false) {
//!                 Ok(json!(format!("hi {}!", args.get_str("name").unwrap_or(""))))
//!             } else {
//!                 Ok(json!("you have to say please"))
//!             }
//!         }),
//!     );
//!
//!     // Mount it at POST /1/say/hi and serve, docs at GET /1/docs.
//!     let mut manager = Manager::new(HyperTransport::with_defaults());
//!     manager.register(say_hi)?;
//!     manager.run().await
//! }
//! ```
//!
//! ## Request Pipeline
//!
//! Every registered endpoint answers `POST` with the same contract:
//!
//! 1. Requests must declare `Content-Type: application/json` (415 otherwise)
//! 2. The body must be a JSON object; parameters are validated against the
//!    declared spec in order, stopping at the first failure (400)
//! 3. The function runs with the validated arguments and returns a JSON
//!    value; `null` becomes the canonical `"ok"` body
//!
//! Finalizing (done automatically by [`Manager::run`]) additionally mounts
//! an `OPTIONS` documentation probe per endpoint, the aggregate docs page
//! at `GET /{version}/docs` and a CORS policy on every response.

pub mod api;
pub mod binding;
pub mod http;
pub mod transport;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::api::{
        ApiFunction, CallContext, Endpoint, FnHandler, HandlerError, Manager,
    };
    pub use crate::binding::{Args, ParamKind, ParamSpec};
    pub use crate::http::{ApiRequest, ApiResponse, Method, StatusCode};
    pub use crate::transport::{CorsConfig, HyperTransport, ServerConfig, Transport};
    pub use async_trait::async_trait;
}

// Re-export for convenience
pub use api::{ApiFunction, Endpoint, FnHandler, HandlerError, Manager};
pub use binding::{Args, ParamKind, ParamSpec};
pub use http::{ApiRequest, ApiResponse};
pub use transport::{HyperTransport, ServerConfig};
