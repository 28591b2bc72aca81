//! Error types for schedularr.

use thiserror::Error;

/// Errors that can occur in schedularr-core operations.
#[derive(Error, Debug)]
pub enum SchedularrError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unknown setting '{0}'")]
    UnknownSetting(String),

    #[error("Invalid value for {key}: {reason}")]
    InvalidSetting { key: String, reason: String },

    #[error("Unknown theme '{0}'")]
    UnknownTheme(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for schedularr-core operations.
pub type SchedularrResult<T> = Result<T, SchedularrError>;

impl From<toml::de::Error> for SchedularrError {
    fn from(e: toml::de::Error) -> Self {
        SchedularrError::Serialization(e.to_string())
    }
}

impl From<toml::ser::Error> for SchedularrError {
    fn from(e: toml::ser::Error) -> Self {
        SchedularrError::Serialization(e.to_string())
    }
}
