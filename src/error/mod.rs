//! Error types for section composition.
//!
//! - [`FragmentError`] — Errors raised while loading a single fragment. These never
//!   escape the composer; they end up as placeholders and in the compose report.
//! - [`InitError`] — Errors raised by page initializers; isolated per initializer.
//! - [`ComposeError`] — Top-level errors for configuration, shell parsing and I/O.
//! - [`ErrorContext`] — Structured error metadata (code, severity, status).

pub mod compose_error;
pub mod error_context;
pub mod fragment_error;
pub mod init_error;

pub use compose_error::ComposeError;
pub use error_context::{ErrorCode, ErrorContext, ErrorSeverity};
pub use fragment_error::FragmentError;
pub use init_error::InitError;

/// Convenience alias for top-level results.
pub type ComposeResult<T> = Result<T, ComposeError>;
/// Convenience alias for fragment-level results.
pub type FragmentResult<T> = Result<T, FragmentError>;
