//! Error types for Solidafy Paginator
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use crate::cursor::CursorError;
use thiserror::Error;

/// The main error type for Solidafy Paginator
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Request Validation Errors
    // ============================================================================
    #[error("No paging rule given")]
    NoRule,

    #[error("Invalid paging limit: {limit} (must be positive)")]
    InvalidLimit { limit: usize },

    #[error("Invalid order '{value}': expected ASC or DESC")]
    InvalidOrder { value: String },

    #[error("Key '{key}' does not resolve on model '{model}'")]
    InvalidModel { key: String, model: String },

    #[error("Duplicate paging key: {key}")]
    DuplicateKey { key: String },

    #[error("Invalid cursor: {0}")]
    InvalidCursor(#[source] CursorError),

    // ============================================================================
    // Cursor Encoding Errors
    // ============================================================================
    #[error("Failed to encode cursor: {0}")]
    CursorEncode(#[source] CursorError),

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Query Execution Errors
    // ============================================================================
    #[error("Query execution failed: {0}")]
    Database(#[from] duckdb::Error),

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid order error
    pub fn invalid_order(value: impl Into<String>) -> Self {
        Self::InvalidOrder {
            value: value.into(),
        }
    }

    /// Create an invalid model error
    pub fn invalid_model(key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::InvalidModel {
            key: key.into(),
            model: model.into(),
        }
    }

    /// Check if this error was caused by the request rather than the engine.
    ///
    /// Callers map these to client-fault responses; everything else (query
    /// execution, cursor encoding, I/O) is a server fault.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            Error::NoRule
                | Error::InvalidLimit { .. }
                | Error::InvalidOrder { .. }
                | Error::InvalidModel { .. }
                | Error::DuplicateKey { .. }
                | Error::InvalidCursor(_)
        )
    }
}

/// Result type alias for Solidafy Paginator
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
