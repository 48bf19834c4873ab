//! Protocol-agnostic request/response types shared by adapters and transports.

mod request;
mod response;

pub use request::{ApiRequest, Method};
pub use response::{ApiResponse, StatusCode};
