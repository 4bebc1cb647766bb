//! Top-level error types.

use thiserror::Error;

/// Errors surfaced by configuration loading, shell parsing and the binary.
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("Config parse error: {0}")]
    ConfigParse(String),
    #[error("Invalid config: {0}")]
    ConfigInvalid(String),
    #[error("Shell document error: {0}")]
    Shell(String),
    #[error("Source error: {0}")]
    Source(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for ComposeError {
    fn from(e: serde_json::Error) -> Self {
        ComposeError::ConfigParse(e.to_string())
    }
}
