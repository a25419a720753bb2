//! Error types for configuration loading and validation.

/// Errors that can occur when loading or validating a `crg.toml` configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An I/O error occurred while reading the configuration file.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A required field is missing or empty.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// A configuration value failed validation.
    #[error("invalid value for '{key}': {message}")]
    ValidationError {
        /// The dotted key of the offending option (e.g. `clocks.sdram_rate`).
        key: String,
        /// What is wrong with the value.
        message: String,
    },
}

impl ConfigError {
    /// Creates a validation error for the given key.
    pub fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Returns the configuration key this error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingField(key) => Some(key),
            Self::ValidationError { key, .. } => Some(key),
            Self::IoError(_) | Self::ParseError(_) => None,
        }
    }
}
