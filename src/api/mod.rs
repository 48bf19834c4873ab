//! Endpoint declaration, request adaptation and route management.

pub mod adapter;
pub mod docs;
pub mod endpoint;
pub mod handler;
pub mod manager;
pub mod route;

pub use adapter::EndpointHandler;
pub use docs::{describe_endpoint, render_index};
pub use endpoint::Endpoint;
pub use handler::{ApiFunction, CallContext, FnHandler, HandlerError};
pub use manager::{ConfigError, Manager, RouteObserver};
pub use route::derive_route;
