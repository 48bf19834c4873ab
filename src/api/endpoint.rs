//! Endpoint declaration record.

use crate::api::handler::ApiFunction;
use crate::binding::ParamSpec;
use std::sync::Arc;

/// Everything an integrator declares about one endpoint: the function
/// identifier the route is derived from, a free-text description used by
/// the documentation generator, the parameter spec, and the function
/// itself.
///
/// The record is handed to [`Manager::register`](crate::api::Manager::register),
/// which derives the path and freezes it for the process lifetime.
#[derive(Clone)]
pub struct Endpoint {
    name: String,
    description: String,
    spec: ParamSpec,
    function: Arc<dyn ApiFunction>,
    pass_request: bool,
}

impl Endpoint {
    /// Declare an endpoint.
    ///
    /// `name` is the function identifier (underscores become path
    /// separators), `description` the human-readable text served by the
    /// documentation probe.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        spec: ParamSpec,
        function: impl ApiFunction + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            spec,
            function: Arc::new(function),
            pass_request: false,
        }
    }

    /// Also hand the raw incoming request to the function via
    /// [`CallContext`](crate::api::CallContext).
    ///
    /// Rarely needed; it ties the handler to the transport's request
    /// shape.
    pub fn pass_request(mut self, pass: bool) -> Self {
        self.pass_request = pass;
        self
    }

    /// The function identifier.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The documentation text.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// The declared parameter spec.
    pub fn spec(&self) -> &ParamSpec {
        &self.spec
    }

    /// Whether the raw request is passed through to the function.
    pub fn passes_request(&self) -> bool {
        self.pass_request
    }

    /// The endpoint function.
    pub fn function(&self) -> Arc<dyn ApiFunction> {
        self.function.clone()
    }
}
