//! Error types for inkdash.
//!
//! The engagement core has no recoverable runtime errors; the only failures
//! are rejected configuration and the host-side clipboard.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Clipboard errors.
#[derive(Error, Debug)]
pub enum ClipboardError {
    /// Writing the escape sequence to the terminal failed
    #[error("Failed to write to clipboard: {0}")]
    Write(#[from] std::io::Error),

    /// Payload exceeds what the terminal accepts in one OSC 52 sequence
    #[error("Clipboard payload of {len} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { len: usize, max: usize },
}
