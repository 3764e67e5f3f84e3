//! HTTP transport layer

mod http;
pub mod routes;

pub use http::{router, run, AppState};
