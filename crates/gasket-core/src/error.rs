//! Error types for gasket

use thiserror::Error;

/// The main error type for gasket operations
#[derive(Debug, Error)]
pub enum GasketError {
    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Sequence error: {0}")]
    SequenceError(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Value out of range: {field} must be between {min} and {max}, got {value}")]
    ValueOutOfRange {
        field: String,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParseError(String),

    #[error("TOML serialization error: {0}")]
    TomlSerError(String),
}

/// Result type alias for gasket operations
pub type Result<T> = std::result::Result<T, GasketError>;

impl From<toml::de::Error> for GasketError {
    fn from(err: toml::de::Error) -> Self {
        GasketError::TomlParseError(err.to_string())
    }
}

impl From<toml::ser::Error> for GasketError {
    fn from(err: toml::ser::Error) -> Self {
        GasketError::TomlSerError(err.to_string())
    }
}
