//! Transport-agnostic HTTP request type consumed by endpoint handlers.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

/// HTTP method enumeration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    #[default]
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
            Method::Patch => write!(f, "PATCH"),
            Method::Head => write!(f, "HEAD"),
            Method::Options => write!(f, "OPTIONS"),
        }
    }
}

impl From<&hyper::Method> for Method {
    fn from(method: &hyper::Method) -> Self {
        match *method {
            hyper::Method::GET => Method::Get,
            hyper::Method::POST => Method::Post,
            hyper::Method::PUT => Method::Put,
            hyper::Method::DELETE => Method::Delete,
            hyper::Method::PATCH => Method::Patch,
            hyper::Method::HEAD => Method::Head,
            hyper::Method::OPTIONS => Method::Options,
            _ => Method::Post,
        }
    }
}

/// An incoming request as seen by the adapter layer.
///
/// Header names are stored lowercased so lookups behave the same whether
/// the request came off the wire (hyper lowercases names) or was built by
/// hand in a test.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Request path, without query string.
    pub path: String,
    /// HTTP headers, keys lowercased.
    pub headers: HashMap<String, String>,
    /// Request body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Bytes>,
}

impl ApiRequest {
    /// Create a new request for the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header. Names are lowercased on insertion.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into().to_lowercase(), value.into());
        self
    }

    /// Set the request body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a JSON body together with the matching content type.
    pub fn json_body(self, value: &Value) -> Self {
        self.header("Content-Type", "application/json")
            .body(value.to_string())
    }

    /// Get a header value by case-insensitive name.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    /// The declared content type, without parameters such as charset.
    pub fn content_type(&self) -> Option<&str> {
        self.get_header("content-type")
            .map(|v| v.split(';').next().unwrap_or(v).trim())
    }

    /// Whether the request declares a JSON content type.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.eq_ignore_ascii_case("application/json"))
    }

    /// The request `Origin` header, if any.
    pub fn origin(&self) -> Option<&str> {
        self.get_header("origin")
    }

    /// Get the body as text if present.
    pub fn text(&self) -> Option<String> {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).to_string())
    }

    /// Interpret the body as a JSON object.
    ///
    /// A missing or empty body counts as `{}`. Returns `None` when the
    /// body is present but is not valid JSON or not a JSON object.
    pub fn json_object(&self) -> Option<Map<String, Value>> {
        let body = match &self.body {
            None => return Some(Map::new()),
            Some(b) if b.is_empty() => return Some(Map::new()),
            Some(b) => b,
        };
        match serde_json::from_slice(body) {
            Ok(Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}
