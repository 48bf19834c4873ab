//! The binding engine: validates JSON payloads against declared parameter
//! specs, producing typed arguments or a structured error.

mod engine;
mod spec;

pub use engine::{Args, BindError, BindReason};
pub use spec::{Param, ParamKind, ParamSpec};
