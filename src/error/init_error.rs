use thiserror::Error;

/// Errors raised by page initializers after composition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InitError {
    #[error("Element not found: {0}")]
    MissingElement(String),
    #[error("Initializer failed: {0}")]
    Failed(String),
}
