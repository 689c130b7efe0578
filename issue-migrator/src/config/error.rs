//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse settings in '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// Missing required file.
    #[error("Missing required file: {path}")]
    MissingFile { path: String },

    /// A required setting was not provided by any layer.
    #[error("Missing required setting: {field}")]
    MissingSetting { field: String },

    /// Repository identifier is not in `owner/name` form.
    #[error("Invalid repository '{value}': {reason}")]
    InvalidRepository { value: String, reason: String },

    /// Validation error in a setting value.
    #[error("Validation error in '{field}': {message}")]
    ValidationError { field: String, message: String },
}
