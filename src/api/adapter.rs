//! Request adapter: wraps an endpoint declaration into a transport-facing
//! route handler.
//!
//! The adapter owns the request-time pipeline: content-type check, body
//! parsing, argument binding, function invocation and return-value
//! normalization. Binding failures never reach the endpoint function, and
//! function failures never escape as anything but an error response.

use crate::api::endpoint::Endpoint;
use crate::api::handler::{ApiFunction, CallContext};
use crate::binding::ParamSpec;
use crate::http::{ApiRequest, ApiResponse, StatusCode};
use crate::transport::RouteHandler;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Per-endpoint route handler produced at registration time.
///
/// Holds only immutable state, so any number of requests can run through
/// it concurrently.
pub struct EndpointHandler {
    spec: ParamSpec,
    function: Arc<dyn ApiFunction>,
    pass_request: bool,
}

impl EndpointHandler {
    /// Build the handler for an endpoint declaration.
    pub fn new(endpoint: &Endpoint) -> Self {
        Self {
            spec: endpoint.spec().clone(),
            function: endpoint.function(),
            pass_request: endpoint.passes_request(),
        }
    }
}

#[async_trait]
impl RouteHandler for EndpointHandler {
    async fn handle(&self, request: ApiRequest) -> ApiResponse {
        let request_id = generate_request_id();
        debug!("Handling {} {} [{}]", request.method, request.path, request_id);

        if !request.is_json() {
            return ApiResponse::error(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Expected \"application/json\"",
            );
        }

        let payload = match request.json_object() {
            Some(payload) => payload,
            None => {
                return ApiResponse::error(
                    StatusCode::BAD_REQUEST,
                    "Expected a JSON object body",
                );
            }
        };

        let args = match self.spec.bind(&payload) {
            Ok(args) => args,
            Err(err) => {
                debug!("Binding failed on {}: {} [{}]", request.path, err, request_id);
                return ApiResponse::error(StatusCode::BAD_REQUEST, err.to_string());
            }
        };

        let mut ctx = CallContext::new(&request_id);
        if self.pass_request {
            ctx = ctx.with_request(request.clone());
        }

        match self.function.call(args, &ctx).await {
            Ok(value) => render_value(value),
            Err(err) => {
                warn!("Handler failed on {}: {} [{}]", request.path, err, request_id);
                ApiResponse::error(err.code, err.message)
            }
        }
    }
}

/// Normalize an endpoint function's return value into a response.
///
/// `Null` is the canonical success marker, strings pass through as plain
/// text, everything else is JSON-encoded.
fn render_value(value: Value) -> ApiResponse {
    match value {
        Value::Null => ApiResponse::text("ok"),
        Value::String(text) => ApiResponse::text(text),
        other => ApiResponse::json(&other).unwrap_or_else(|_| ApiResponse::text("{}")),
    }
}

/// Generate a unique request ID.
fn generate_request_id() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    format!("{:x}", timestamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handler::{FnHandler, HandlerError};
    use crate::binding::{Args, ParamKind};
    use crate::http::Method;
    use serde_json::json;

    fn say_hi() -> Endpoint {
        Endpoint::new(
            "say_hi",
            "Says hi if you say please",
            ParamSpec::new()
                .required("name", ParamKind::String)
                .required("please", ParamKind::Boolean),
            FnHandler::new(|args: Args| async move {
                if args.get_bool("please").unwrap_or(false) {
                    Ok(json!(format!("hi {}", args.get_str("name").unwrap_or(""))))
                } else {
                    Ok(json!("um hmm"))
                }
            }),
        )
    }

    fn post(path: &str, body: Value) -> ApiRequest {
        ApiRequest::new(Method::Post, path).json_body(&body)
    }

    #[tokio::test]
    async fn test_missing_content_type_is_415() {
        let handler = EndpointHandler::new(&say_hi());
        let request = ApiRequest::new(Method::Post, "/1/say/hi").body("{}");

        let response = handler.handle(request).await;
        assert_eq!(response.status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(
            response.text_body(),
            Some("Expected \"application/json\"".to_string())
        );
    }

    #[tokio::test]
    async fn test_non_object_body_is_400() {
        let handler = EndpointHandler::new(&say_hi());
        let request = ApiRequest::new(Method::Post, "/1/say/hi")
            .header("content-type", "application/json")
            .body("[1, 2, 3]");

        let response = handler.handle(request).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_binding_failure_skips_function() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        let called = Arc::new(AtomicBool::new(false));
        let seen = called.clone();
        let endpoint = Endpoint::new(
            "check",
            "",
            ParamSpec::new().required("flag", ParamKind::Boolean),
            FnHandler::new(move |_args: Args| {
                let seen = seen.clone();
                async move {
                    seen.store(true, Ordering::SeqCst);
                    Ok(json!(null))
                }
            }),
        );
        let handler = EndpointHandler::new(&endpoint);

        let response = handler.handle(post("/1/check", json!({"flag": "yes"}))).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            response.text_body(),
            Some("Wrong type for \"flag\"".to_string())
        );
        assert!(!called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_null_return_becomes_ok_marker() {
        let endpoint = Endpoint::new(
            "touch",
            "",
            ParamSpec::new(),
            FnHandler::new(|_args: Args| async move { Ok(json!(null)) }),
        );
        let handler = EndpointHandler::new(&endpoint);

        let response = handler.handle(post("/1/touch", json!({}))).await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.text_body(), Some("ok".to_string()));
    }

    #[tokio::test]
    async fn test_string_return_passes_through_as_text() {
        let handler = EndpointHandler::new(&say_hi());

        let response = handler
            .handle(post("/1/say/hi", json!({"name": "myname", "please": true})))
            .await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.text_body(), Some("hi myname".to_string()));
        assert_eq!(response.get_header("Content-Type"), Some("text/plain"));
    }

    #[tokio::test]
    async fn test_other_values_are_json_encoded() {
        let endpoint = Endpoint::new(
            "stats",
            "",
            ParamSpec::new(),
            FnHandler::new(|_args: Args| async move { Ok(json!({"count": 3})) }),
        );
        let handler = EndpointHandler::new(&endpoint);

        let response = handler.handle(post("/1/stats", json!({}))).await;
        assert_eq!(response.get_header("Content-Type"), Some("application/json"));
        assert_eq!(
            response.json_body::<Value>().unwrap().unwrap(),
            json!({"count": 3})
        );
    }

    #[tokio::test]
    async fn test_function_error_becomes_error_response() {
        let endpoint = Endpoint::new(
            "fail",
            "",
            ParamSpec::new(),
            FnHandler::new(|_args: Args| async move {
                Err(HandlerError::new("database unreachable"))
            }),
        );
        let handler = EndpointHandler::new(&endpoint);

        let response = handler.handle(post("/1/fail", json!({}))).await;
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.text_body(),
            Some("database unreachable".to_string())
        );
    }

    #[tokio::test]
    async fn test_empty_body_with_empty_spec_succeeds() {
        let endpoint = Endpoint::new(
            "touch",
            "",
            ParamSpec::new(),
            FnHandler::new(|_args: Args| async move { Ok(json!(null)) }),
        );
        let handler = EndpointHandler::new(&endpoint);

        let request = ApiRequest::new(Method::Post, "/1/touch")
            .header("content-type", "application/json");
        let response = handler.handle(request).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_pass_request_exposes_raw_request() {
        struct EchoPath;

        #[async_trait]
        impl ApiFunction for EchoPath {
            async fn call(&self, _args: Args, ctx: &CallContext) -> Result<Value, HandlerError> {
                let path = ctx
                    .request
                    .as_ref()
                    .map(|r| r.path.clone())
                    .unwrap_or_default();
                Ok(json!(path))
            }
        }

        let endpoint =
            Endpoint::new("where_am_i", "", ParamSpec::new(), EchoPath).pass_request(true);
        let handler = EndpointHandler::new(&endpoint);

        let response = handler.handle(post("/1/where/am/i", json!({}))).await;
        assert_eq!(response.text_body(), Some("/1/where/am/i".to_string()));
    }

    #[tokio::test]
    async fn test_context_is_empty_without_pass_request() {
        struct SeesNothing;

        #[async_trait]
        impl ApiFunction for SeesNothing {
            async fn call(&self, _args: Args, ctx: &CallContext) -> Result<Value, HandlerError> {
                Ok(json!(ctx.request.is_some()))
            }
        }

        let endpoint = Endpoint::new("peek", "", ParamSpec::new(), SeesNothing);
        let handler = EndpointHandler::new(&endpoint);

        let response = handler.handle(post("/1/peek", json!({}))).await;
        assert_eq!(response.json_body::<Value>().unwrap().unwrap(), json!(false));
    }
}
