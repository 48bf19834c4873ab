//! Jolt - Example API Server
//!
//! This example serves a small API with validated JSON endpoints and live
//! documentation at `/1/docs`.

use jolt::prelude::*;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Function that reads the raw request via the pass-through context.
struct EchoOrigin;

#[async_trait]
impl ApiFunction for EchoOrigin {
    async fn call(&self, _args: Args, ctx: &CallContext) -> Result<Value, HandlerError> {
        let origin = ctx
            .request
            .as_ref()
            .and_then(|r| r.origin())
            .unwrap_or("unknown")
            .to_string();

        Ok(json!({
            "origin": origin,
            "request_id": ctx.request_id,
        }))
    }
}

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

fn shorten_text() -> Endpoint {
    Endpoint::new(
        "shorten_text",
        "Shortens text to at most limit characters",
        ParamSpec::new()
            .required("text", ParamKind::String)
            .optional("limit", ParamKind::Integer, json!(40)),
        FnHandler::new(|args: Args| async move {
            let text = args.get_str("text").unwrap_or("").to_string();
            let limit = args.get_i64("limit").unwrap_or(40).max(0) as usize;

            let length = text.chars().count();
            let shortened = if length > limit {
                let cut: String = text.chars().take(limit).collect();
                format!("{}...", cut)
            } else {
                text
            };

            Ok(json!({
                "text": shortened,
                "shortened": length > limit,
            }))
        }),
    )
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting jolt example server...");

    let config = ServerConfig::new().host("0.0.0.0").port(8080);
    let mut manager = Manager::new(HyperTransport::new(config));

    manager.register(say_hi())?;
    manager.register(shorten_text())?;
    manager.register(
        Endpoint::new(
            "echo_origin",
            "Echoes the Origin header of the raw request",
            ParamSpec::new(),
            EchoOrigin,
        )
        .pass_request(true),
    )?;

    tracing::info!("Registered routes: /1/say/hi, /1/shorten/text, /1/echo/origin");
    tracing::info!(
        "Try: curl -X POST -H 'Content-Type: application/json' \
         -d '{{\"name\":\"ada\",\"please\":true}}' http://localhost:8080/1/say/hi"
    );
    tracing::info!("Docs: http://localhost:8080/1/docs");

    manager.run().await
}
