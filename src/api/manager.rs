//! Endpoint registry and composition root.
//!
//! The manager owns the transport, derives a route per declared endpoint,
//! wires the request adapter in front of each function and finalizes the
//! documentation and CORS surface before serving begins. Registration is
//! single-threaded startup work; once [`Manager::finalize`] has run the
//! route table is frozen.

use crate::api::adapter::EndpointHandler;
use crate::api::docs::{describe_endpoint, render_index};
use crate::api::endpoint::Endpoint;
use crate::api::route::derive_route;
use crate::transport::{CorsConfig, StaticResponse, Transport, TransportError};
use std::sync::Arc;
use tracing::info;

/// Hook invoked once per registered route, with the derived path and the
/// endpoint declaration.
pub type RouteObserver = Box<dyn Fn(&str, &Endpoint) + Send + Sync>;

/// Registration-time configuration failure.
///
/// These abort startup; none of them can occur at request time.
#[derive(Debug)]
pub enum ConfigError {
    /// Two endpoint identifiers derived the same path.
    DuplicateRoute { path: String },
    /// An endpoint's parameter spec violates its invariants.
    InvalidSpec { endpoint: String, reason: String },
    /// Routes cannot be added once the table is frozen.
    Finalized,
    /// The transport rejected a registration.
    Transport(TransportError),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::DuplicateRoute { path } => {
                write!(f, "another endpoint already derives the path \"{}\"", path)
            }
            ConfigError::InvalidSpec { endpoint, reason } => {
                write!(f, "invalid parameter spec for \"{}\": {}", endpoint, reason)
            }
            ConfigError::Finalized => {
                write!(f, "routes cannot be registered after finalize")
            }
            ConfigError::Transport(err) => write!(f, "transport error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<TransportError> for ConfigError {
    fn from(err: TransportError) -> Self {
        ConfigError::Transport(err)
    }
}

struct RegisteredRoute {
    path: String,
    endpoint: Endpoint,
}

/// Composes endpoints, documentation and CORS against a transport.
pub struct Manager<T: Transport> {
    transport: T,
    version: String,
    routes: Vec<RegisteredRoute>,
    observer: RouteObserver,
    cors: CorsConfig,
    finalized: bool,
}

impl<T: Transport> Manager<T> {
    /// Create a manager over the given transport, version prefix `"1"`.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            version: "1".to_string(),
            routes: Vec::new(),
            observer: Box::new(|path, _endpoint| {
                info!("Route registered: POST {}", path);
            }),
            cors: CorsConfig::default(),
            finalized: false,
        }
    }

    /// Set the API version prefix used in derived paths.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Replace the CORS policy applied to every response.
    pub fn with_cors(mut self, cors: CorsConfig) -> Self {
        self.cors = cors;
        self
    }

    /// Replace the per-route observer hook.
    pub fn with_route_observer(
        mut self,
        observer: impl Fn(&str, &Endpoint) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// The API version prefix.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Derived paths of all registered endpoints, in registration order.
    pub fn paths(&self) -> Vec<&str> {
        self.routes.iter().map(|r| r.path.as_str()).collect()
    }

    /// Whether [`finalize`](Manager::finalize) has run.
    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// Register an endpoint.
    ///
    /// Derives the path from the endpoint's identifier, wraps the function
    /// in the request adapter and mounts it as a POST route. Fails fast on
    /// malformed specs and on path collisions.
    pub fn register(&mut self, endpoint: Endpoint) -> Result<(), ConfigError> {
        if self.finalized {
            return Err(ConfigError::Finalized);
        }

        endpoint
            .spec()
            .validate()
            .map_err(|reason| ConfigError::InvalidSpec {
                endpoint: endpoint.name().to_string(),
                reason,
            })?;

        let path = derive_route(endpoint.name(), &self.version);
        if self.routes.iter().any(|r| r.path == path) {
            return Err(ConfigError::DuplicateRoute { path });
        }

        let handler = Arc::new(EndpointHandler::new(&endpoint));
        self.transport.register_post(&path, handler)?;

        (self.observer)(&path, &endpoint);
        self.routes.push(RegisteredRoute { path, endpoint });
        Ok(())
    }

    /// Freeze the route table and mount the documentation surface.
    ///
    /// Registers a documentation probe (`OPTIONS`) per endpoint, hands the
    /// CORS policy to the transport and mounts the index page at
    /// `GET /{version}/docs`. Calling it again is a no-op.
    pub fn finalize(&mut self) -> Result<(), ConfigError> {
        if self.finalized {
            return Ok(());
        }

        for route in &self.routes {
            let text = describe_endpoint(route.endpoint.spec(), route.endpoint.description());
            self.transport
                .register_options(&route.path, Arc::new(StaticResponse::text(text)))?;
        }

        self.transport.set_cors(self.cors.clone());

        let mut paths: Vec<String> = self.routes.iter().map(|r| r.path.clone()).collect();
        paths.sort();

        let docs_path = format!("/{}/docs", self.version);
        let page = render_index(&self.version, &paths);
        self.transport
            .register_get(&docs_path, Arc::new(StaticResponse::html(page)))?;

        info!("Documentation available at GET {}", docs_path);
        self.finalized = true;
        Ok(())
    }

    /// Finalize if needed, then serve on the transport.
    pub async fn run(mut self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.finalize()?;
        self.transport.serve().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::handler::FnHandler;
    use crate::binding::{Args, ParamKind, ParamSpec};
    use crate::http::Method;
    use crate::transport::RouteHandler;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::Mutex;

    /// Transport double that records registrations instead of serving.
    #[derive(Default)]
    struct RecordingTransport {
        registered: Vec<(Method, String)>,
        cors_set: usize,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        fn register_post(
            &mut self,
            path: &str,
            _handler: Arc<dyn RouteHandler>,
        ) -> Result<(), TransportError> {
            self.registered.push((Method::Post, path.to_string()));
            Ok(())
        }

        fn register_get(
            &mut self,
            path: &str,
            _handler: Arc<dyn RouteHandler>,
        ) -> Result<(), TransportError> {
            self.registered.push((Method::Get, path.to_string()));
            Ok(())
        }

        fn register_options(
            &mut self,
            path: &str,
            _handler: Arc<dyn RouteHandler>,
        ) -> Result<(), TransportError> {
            self.registered.push((Method::Options, path.to_string()));
            Ok(())
        }

        fn set_cors(&mut self, _cors: CorsConfig) {
            self.cors_set += 1;
        }

        async fn serve(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            Ok(())
        }
    }

    fn say_hi() -> Endpoint {
        Endpoint::new(
            "say_hi",
            "Says hi if you say please",
            ParamSpec::new()
                .required("name", ParamKind::String)
                .required("please", ParamKind::Boolean),
            FnHandler::new(|_args: Args| async move { Ok(json!(null)) }),
        )
    }

    #[test]
    fn test_register_derives_path_and_mounts_post_route() {
        let mut manager = Manager::new(RecordingTransport::default());
        manager.register(say_hi()).unwrap();

        assert_eq!(manager.paths(), vec!["/1/say/hi"]);
        assert_eq!(
            manager.transport().registered,
            vec![(Method::Post, "/1/say/hi".to_string())]
        );
    }

    #[test]
    fn test_register_respects_version_prefix() {
        let mut manager = Manager::new(RecordingTransport::default()).with_version("2");
        manager.register(say_hi()).unwrap();

        assert_eq!(manager.paths(), vec!["/2/say/hi"]);
    }

    #[test]
    fn test_register_rejects_colliding_paths() {
        let mut manager = Manager::new(RecordingTransport::default());
        manager.register(say_hi()).unwrap();

        let err = manager.register(say_hi()).unwrap_err();
        match err {
            ConfigError::DuplicateRoute { path } => assert_eq!(path, "/1/say/hi"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_register_rejects_malformed_spec() {
        let mut manager = Manager::new(RecordingTransport::default());
        let endpoint = Endpoint::new(
            "broken",
            "Required after defaulted",
            ParamSpec::new()
                .optional("greeting", ParamKind::String, json!("hi"))
                .required("name", ParamKind::String),
            FnHandler::new(|_args: Args| async move { Ok(json!(null)) }),
        );

        let err = manager.register(endpoint).unwrap_err();
        match err {
            ConfigError::InvalidSpec { endpoint, .. } => assert_eq!(endpoint, "broken"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_route_observer_sees_each_registration() {
        let observed = Arc::new(Mutex::new(Vec::new()));
        let sink = observed.clone();

        let mut manager = Manager::new(RecordingTransport::default())
            .with_route_observer(move |path, endpoint| {
                sink.lock()
                    .unwrap()
                    .push(format!("{} {}", path, endpoint.name()));
            });
        manager.register(say_hi()).unwrap();

        assert_eq!(
            observed.lock().unwrap().as_slice(),
            ["/1/say/hi say_hi".to_string()]
        );
    }

    #[test]
    fn test_finalize_mounts_probes_cors_and_docs() {
        let mut manager = Manager::new(RecordingTransport::default());
        manager.register(say_hi()).unwrap();
        manager.finalize().unwrap();

        let transport = manager.transport();
        assert!(transport
            .registered
            .contains(&(Method::Options, "/1/say/hi".to_string())));
        assert!(transport
            .registered
            .contains(&(Method::Get, "/1/docs".to_string())));
        assert_eq!(transport.cors_set, 1);
        assert!(manager.is_finalized());
    }

    #[test]
    fn test_finalize_twice_is_a_no_op() {
        let mut manager = Manager::new(RecordingTransport::default());
        manager.register(say_hi()).unwrap();
        manager.finalize().unwrap();

        let mounted = manager.transport().registered.len();
        manager.finalize().unwrap();

        assert_eq!(manager.transport().registered.len(), mounted);
        assert_eq!(manager.transport().cors_set, 1);
    }

    #[test]
    fn test_register_after_finalize_fails() {
        let mut manager = Manager::new(RecordingTransport::default());
        manager.finalize().unwrap();

        let err = manager.register(say_hi()).unwrap_err();
        assert!(matches!(err, ConfigError::Finalized));
    }

    #[test]
    fn test_config_error_messages_name_the_conflict() {
        let duplicate = ConfigError::DuplicateRoute {
            path: "/1/say/hi".to_string(),
        };
        assert_eq!(
            duplicate.to_string(),
            "another endpoint already derives the path \"/1/say/hi\""
        );

        let invalid = ConfigError::InvalidSpec {
            endpoint: "say_hi".to_string(),
            reason: "duplicate parameter \"name\"".to_string(),
        };
        assert!(invalid.to_string().contains("say_hi"));
        assert!(invalid.to_string().contains("duplicate parameter"));
    }
}
