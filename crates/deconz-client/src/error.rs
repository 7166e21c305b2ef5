//! Error types for talking to the deCONZ gateway.

use core::error::Error;

use derive_more::Display;
use error_stack::Report;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, Report<GatewayError>>;

/// Errors that can occur while fetching or decoding sensor data.
#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Invalid endpoint settings (empty host or token, zero port, bad URL)
    #[display("Configuration error: {message}")]
    Configuration { message: String },

    /// Transport failure reaching the gateway (DNS, refused, timeout, truncated body)
    #[display("Fetch error: {message}")]
    Fetch { message: String },

    /// Response body is not a sensor collection
    #[display("Decode error: {message}")]
    Decode { message: String },
}

impl Error for GatewayError {}
