//! Error types for configuration synthesis.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Normalization errors (base config / options fail to retype)
    #[error("invalid base config value: {0}")]
    InvalidValue(String),

    #[error("invalid options value: {0}")]
    InvalidOptions(String),

    // I/O errors (deferred stats write only)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
