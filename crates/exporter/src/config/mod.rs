use core::error::Error;

pub mod cli;

pub use cli::*;

/// Invalid startup settings
#[derive(Debug, derive_more::Display)]
pub enum ConfigError {
    #[display("Invalid gateway settings")]
    InvalidGateway,
}

impl Error for ConfigError {}
