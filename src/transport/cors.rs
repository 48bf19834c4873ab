//! CORS header policy.
//!
//! The transport applies the policy to every response once it is set; the
//! allow-origin value echoes the request's `Origin` header so credentialed
//! browser requests work.

use crate::http::ApiResponse;
use serde::{Deserialize, Serialize};

/// CORS header values attached to every response after finalization.
///
/// The defaults match the adapter's documented contract; individual values
/// may be overridden before finalization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorsConfig {
    /// `Access-Control-Allow-Methods` value.
    pub allow_methods: String,
    /// `Access-Control-Allow-Headers` value.
    pub allow_headers: String,
    /// Whether to send `Access-Control-Allow-Credentials: true`.
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_methods: "POST, OPTIONS, GET".to_string(),
            allow_headers: "Origin, Accept , Content-Type, X-Requested-With, X-CSRF-Token"
                .to_string(),
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    /// Create the default policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the allowed methods.
    pub fn allow_methods(mut self, methods: impl Into<String>) -> Self {
        self.allow_methods = methods.into();
        self
    }

    /// Override the allowed headers.
    pub fn allow_headers(mut self, headers: impl Into<String>) -> Self {
        self.allow_headers = headers.into();
        self
    }

    /// Toggle the credentials header.
    pub fn allow_credentials(mut self, allow: bool) -> Self {
        self.allow_credentials = allow;
        self
    }

    /// Attach the policy headers to a response.
    ///
    /// `origin` is the request's `Origin` header; absent, the allow-origin
    /// falls back to `*`.
    pub fn apply(&self, response: &mut ApiResponse, origin: Option<&str>) {
        response.set_header("Access-Control-Allow-Methods", &self.allow_methods);
        response.set_header("Access-Control-Allow-Headers", &self.allow_headers);
        if self.allow_credentials {
            response.set_header("Access-Control-Allow-Credentials", "true");
        }
        response.set_header("Access-Control-Allow-Origin", origin.unwrap_or("*"));
    }
}
