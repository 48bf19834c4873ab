//! Payload-to-arguments binding.
//!
//! [`ParamSpec::bind`] walks the spec in declaration order and either
//! produces a complete [`Args`] mapping or stops at the first parameter
//! that is missing or has the wrong kind. The walk is pure: the same spec
//! and payload always produce the same result.

use crate::binding::spec::ParamSpec;
use serde_json::{Map, Value};

/// Why a parameter failed to bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindReason {
    /// The payload has no value and the spec declares no default.
    Missing,
    /// The payload value's JSON kind does not match the declared kind.
    WrongType,
}

/// Binding failure for a single parameter.
///
/// The `Display` rendering is the client-facing response text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindError {
    /// Name of the offending parameter.
    pub param: String,
    /// What went wrong.
    pub reason: BindReason,
}

impl BindError {
    fn missing(param: &str) -> Self {
        Self {
            param: param.to_string(),
            reason: BindReason::Missing,
        }
    }

    fn wrong_type(param: &str) -> Self {
        Self {
            param: param.to_string(),
            reason: BindReason::WrongType,
        }
    }
}

impl std::fmt::Display for BindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.reason {
            BindReason::Missing => write!(f, "Please provide \"{}\"", self.param),
            BindReason::WrongType => write!(f, "Wrong type for \"{}\"", self.param),
        }
    }
}

impl std::error::Error for BindError {}

/// Validated arguments, one entry per spec parameter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    values: Map<String, Value>,
}

impl Args {
    /// Get an argument value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Get a string argument.
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Get a boolean argument.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        self.get(name).and_then(Value::as_bool)
    }

    /// Get an integer argument.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(Value::as_i64)
    }

    /// Get a float argument.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        self.get(name).and_then(Value::as_f64)
    }

    /// Number of bound arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no arguments were bound.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Consume the arguments, yielding the underlying JSON object.
    pub fn into_inner(self) -> Map<String, Value> {
        self.values
    }
}

impl From<Map<String, Value>> for Args {
    fn from(values: Map<String, Value>) -> Self {
        Self { values }
    }
}

impl ParamSpec {
    /// Bind a JSON payload against this spec.
    ///
    /// Parameters are checked in declaration order; the first failure wins
    /// and later parameters are not evaluated. Payload keys the spec does
    /// not declare are ignored. An empty spec succeeds against any
    /// payload.
    pub fn bind(&self, payload: &Map<String, Value>) -> Result<Args, BindError> {
        let mut values = Map::new();
        for param in self.params() {
            match payload.get(&param.name) {
                Some(value) => {
                    if !param.kind.matches(value) {
                        return Err(BindError::wrong_type(&param.name));
                    }
                    values.insert(param.name.clone(), value.clone());
                }
                None => match &param.default {
                    Some(default) => {
                        values.insert(param.name.clone(), default.clone());
                    }
                    None => return Err(BindError::missing(&param.name)),
                },
            }
        }
        Ok(Args { values })
    }
}
