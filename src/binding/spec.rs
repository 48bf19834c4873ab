//! Parameter specifications declared alongside endpoint handlers.
//!
//! A [`ParamSpec`] is the statically-declared description of a handler's
//! expected JSON payload: parameter names, shallow kinds and optional
//! default values, in declaration order.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shallow JSON kind expected for a parameter.
///
/// Kind checks are exact: a JSON string `"1"` does not satisfy
/// [`ParamKind::Integer`], and an integral number does not satisfy
/// [`ParamKind::Float`]. Composite kinds are matched on the outer shape
/// only; element and field types are never inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
    /// Accepts any JSON value, including `null`.
    Any,
}

impl ParamKind {
    /// Whether the given JSON value has this kind.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            ParamKind::Boolean => value.is_boolean(),
            ParamKind::Integer => value.is_i64() || value.is_u64(),
            ParamKind::Float => value.is_f64(),
            ParamKind::String => value.is_string(),
            ParamKind::Array => value.is_array(),
            ParamKind::Object => value.is_object(),
            ParamKind::Any => true,
        }
    }

    /// Human-readable kind name used in documentation.
    pub fn name(&self) -> &'static str {
        match self {
            ParamKind::Boolean => "boolean",
            ParamKind::Integer => "integer",
            ParamKind::Float => "float",
            ParamKind::String => "string",
            ParamKind::Array => "array",
            ParamKind::Object => "object",
            ParamKind::Any => "any",
        }
    }
}

impl std::fmt::Display for ParamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A single declared parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Param {
    /// Parameter name, the key expected in the JSON payload.
    pub name: String,
    /// Expected shallow kind.
    pub kind: ParamKind,
    /// Default value used when the payload omits the parameter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl Param {
    /// Whether the parameter can be omitted from the payload.
    pub fn is_required(&self) -> bool {
        self.default.is_none()
    }
}

/// Ordered parameter specification for one endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    params: Vec<Param>,
}

impl ParamSpec {
    /// Create an empty spec (an endpoint taking no parameters).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a required parameter.
    pub fn required(mut self, name: impl Into<String>, kind: ParamKind) -> Self {
        self.params.push(Param {
            name: name.into(),
            kind,
            default: None,
        });
        self
    }

    /// Append an optional parameter with a default value.
    ///
    /// The default is used verbatim when the payload omits the parameter;
    /// it is not checked against `kind`.
    pub fn optional(mut self, name: impl Into<String>, kind: ParamKind, default: Value) -> Self {
        self.params.push(Param {
            name: name.into(),
            kind,
            default: Some(default),
        });
        self
    }

    /// The declared parameters, in declaration order.
    pub fn params(&self) -> &[Param] {
        &self.params
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// Whether the spec declares no parameters.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Check the spec invariants.
    ///
    /// Names must be unique, and no required parameter may follow a
    /// defaulted one (defaults are keyword-style). Violations are
    /// registration-time configuration mistakes, reported as a message
    /// naming the offending parameter.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen_default = false;
        for (i, param) in self.params.iter().enumerate() {
            if self.params[..i].iter().any(|p| p.name == param.name) {
                return Err(format!("duplicate parameter \"{}\"", param.name));
            }
            if param.default.is_some() {
                seen_default = true;
            } else if seen_default {
                return Err(format!(
                    "required parameter \"{}\" follows a defaulted one",
                    param.name
                ));
            }
        }
        Ok(())
    }
}
