use thiserror::Error;

use super::error_context::{ErrorCode, ErrorContext, ErrorSeverity};

/// Fragment-level errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FragmentError {
    #[error("Container not found: {0}")]
    ContainerMissing(String),
    #[error("HTTP error! status: {status}")]
    Fetch { status: u16 },
    #[error("Transport error: {0}")]
    Transport(String),
}

impl FragmentError {
    /// Deadline expiry is reported through the transport class.
    pub fn deadline_exceeded(timeout_ms: u64) -> Self {
        FragmentError::Transport(format!("fetch deadline of {}ms exceeded", timeout_ms))
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            FragmentError::ContainerMissing(_) => ErrorSeverity::Warning,
            FragmentError::Fetch { .. } | FragmentError::Transport(_) => ErrorSeverity::Error,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            FragmentError::ContainerMissing(_) => ErrorCode::ContainerMissing,
            FragmentError::Fetch { status } if *status >= 500 => ErrorCode::HttpServerError,
            FragmentError::Fetch { .. } => ErrorCode::HttpClientError,
            FragmentError::Transport(_) => ErrorCode::NetworkError,
        }
    }

    pub fn to_context(&self) -> ErrorContext {
        let ctx = ErrorContext::new(self.code(), self.severity(), self.to_string());
        match self {
            FragmentError::Fetch { status } => ctx.with_http_status(*status),
            _ => ctx,
        }
    }
}
