//! HTTP transport with per-request deadlines.

mod http;

pub use http::{HttpRequest, HttpResponse, HttpTransport, TransportError};
pub use reqwest::Method;
