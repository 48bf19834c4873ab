//! Endpoint function trait and invocation context.

use crate::binding::Args;
use crate::http::ApiRequest;
use async_trait::async_trait;
use serde_json::Value;
use std::future::Future;

/// Invocation context handed to an endpoint function.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    /// Request ID for tracing.
    pub request_id: String,
    /// The raw incoming request.
    ///
    /// Populated only for endpoints registered with the pass-through flag;
    /// `None` otherwise. Reaching for this couples a handler to the
    /// transport's request shape, so it is meant for the rare handler that
    /// genuinely needs transport-native data such as headers.
    pub request: Option<ApiRequest>,
}

impl CallContext {
    /// Create a context carrying only a request ID.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            request: None,
        }
    }

    /// Attach the raw request for pass-through endpoints.
    pub fn with_request(mut self, request: ApiRequest) -> Self {
        self.request = Some(request);
        self
    }
}

/// An endpoint's business logic.
///
/// Implementations receive arguments already validated against the
/// endpoint's [`ParamSpec`](crate::binding::ParamSpec) and return a JSON
/// value. Returning `Value::Null` signals plain success; the adapter turns
/// it into the canonical `"ok"` body.
#[async_trait]
pub trait ApiFunction: Send + Sync {
    /// Handle one validated invocation.
    async fn call(&self, args: Args, ctx: &CallContext) -> Result<Value, HandlerError>;
}

/// Adapter letting a plain async closure act as an [`ApiFunction`].
///
/// The closure receives the validated [`Args`] only. Handlers that need
/// the [`CallContext`] (pass-through endpoints, request-ID logging)
/// implement [`ApiFunction`] directly instead.
pub struct FnHandler<F> {
    f: F,
}

impl<F> FnHandler<F> {
    /// Wrap a closure.
    ///
    /// The bounds here mirror the [`ApiFunction`] impl so the closure's
    /// return type is pinned at the call site.
    pub fn new<Fut>(f: F) -> Self
    where
        F: Fn(Args) -> Fut + Send + Sync,
        Fut: Future<Output = Result<Value, HandlerError>> + Send,
    {
        Self { f }
    }
}

#[async_trait]
impl<F, Fut> ApiFunction for FnHandler<F>
where
    F: Fn(Args) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Value, HandlerError>> + Send,
{
    async fn call(&self, args: Args, _ctx: &CallContext) -> Result<Value, HandlerError> {
        (self.f)(args).await
    }
}

/// Failure raised by an endpoint function.
#[derive(Debug, Clone)]
pub struct HandlerError {
    /// Error message, sent as the response body.
    pub message: String,
    /// HTTP status code for the response.
    pub code: u16,
}

impl HandlerError {
    /// Create a new error with the conventional 500 status.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: 500,
        }
    }

    /// Create an error with a specific status code.
    pub fn with_code(code: u16, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
        }
    }

    /// Create a bad-request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_code(400, message)
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_code(404, message)
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl From<std::io::Error> for HandlerError {
    fn from(err: std::io::Error) -> Self {
        HandlerError::new(err.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::new(err.to_string())
    }
}
