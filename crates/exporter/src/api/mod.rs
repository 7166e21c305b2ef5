//! HTTP exposition endpoint
//!
//! # API Endpoints
//!
//! - `GET /` - Landing page linking to the metrics
//! - `GET /metrics` - Registry contents in the Prometheus text format

use core::error::Error;

pub mod handlers;
pub mod server;

/// API errors
#[derive(Debug, derive_more::Display)]
pub enum ApiError {
    #[display("Failed to bind {addr}: {message}")]
    Bind { addr: String, message: String },
    #[display("Server error: {message}")]
    ServerError { message: String },
}

impl Error for ApiError {}
