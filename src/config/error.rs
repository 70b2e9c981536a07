#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing configuration key: {path}")]
    MissingKey { path: String },

    #[error("failed to decrypt configuration value: {path}")]
    Decrypt { path: String },

    #[error("encryption key file error: {0}")]
    KeyFile(String),

    #[error("invalid configuration structure: {0}")]
    Invalid(String),

    #[error("configuration io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
