//! Input error types

use thiserror::Error;

/// Input-related errors
#[derive(Error, Debug)]
pub enum InputError {
    /// Configuration could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<toml::de::Error> for InputError {
    fn from(error: toml::de::Error) -> Self {
        InputError::Config(error.message().to_string())
    }
}

impl From<toml::ser::Error> for InputError {
    fn from(error: toml::ser::Error) -> Self {
        InputError::Config(error.to_string())
    }
}

/// Result type for input operations
pub type Result<T> = std::result::Result<T, InputError>;
