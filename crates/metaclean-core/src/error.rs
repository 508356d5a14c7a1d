//! Error types module
//!
//! All failures a request can hit are unified under [`AppError`]. Each variant
//! self-describes its HTTP presentation through [`ErrorMetadata`], so the API
//! layer renders every error the same way.

use std::io;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like malformed requests
    Debug,
    /// Warning level - for engine rejections and timeouts
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "ENGINE_FAILURE")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from clients
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Metadata engine failure: {0}")]
    EngineFailure(String),

    #[error("Metadata engine timed out after {seconds}s")]
    Timeout { seconds: u64 },

    #[error("IO failure: {0}")]
    IoFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::IoFailure(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidRequest(format!("JSON parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::InvalidRequest(_) => (400, "INVALID_REQUEST", false, LogLevel::Debug),
        AppError::DecodeFailure(_) => (400, "DECODE_FAILURE", false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::EngineFailure(_) => (500, "ENGINE_FAILURE", false, LogLevel::Warn),
        AppError::Timeout { .. } => (500, "ENGINE_TIMEOUT", false, LogLevel::Warn),
        AppError::IoFailure(_) => (500, "IO_FAILURE", true, LogLevel::Error),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::InvalidRequest(_) => "InvalidRequest",
            AppError::DecodeFailure(_) => "DecodeFailure",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::NotFound(_) => "NotFound",
            AppError::EngineFailure(_) => "EngineFailure",
            AppError::Timeout { .. } => "Timeout",
            AppError::IoFailure(_) => "IOFailure",
            AppError::Internal(_) => "UnhandledFailure",
            AppError::InternalWithSource { .. } => "UnhandledFailure",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidRequest(ref msg) => msg.clone(),
            AppError::DecodeFailure(ref msg) => format!("Invalid base64 payload: {}", msg),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => format!("Not found: {}", msg),
            AppError::EngineFailure(ref msg) => msg.clone(),
            AppError::Timeout { seconds } => {
                format!("Metadata engine timed out after {}s", seconds)
            }
            AppError::IoFailure(_) => "Failed to read or write temporary file".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_invalid_request() {
        let err = AppError::InvalidRequest("No file provided".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert_eq!(err.error_code(), "INVALID_REQUEST");
        assert_eq!(err.client_message(), "No file provided");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_engine_failure_keeps_engine_message() {
        let err = AppError::EngineFailure("Writing of TXT files is not yet supported".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "ENGINE_FAILURE");
        assert_eq!(
            err.client_message(),
            "Writing of TXT files is not yet supported"
        );
        assert_eq!(err.log_level(), LogLevel::Warn);
    }

    #[test]
    fn test_decode_failure_is_client_error() {
        let err = AppError::DecodeFailure("Invalid byte 33, offset 0.".to_string());
        assert_eq!(err.http_status_code(), 400);
        assert!(err.client_message().starts_with("Invalid base64 payload"));
    }

    #[test]
    fn test_timeout_message() {
        let err = AppError::Timeout { seconds: 30 };
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "ENGINE_TIMEOUT");
        assert!(err.client_message().contains("30s"));
    }

    #[test]
    fn test_io_failure_hides_details() {
        let err: AppError =
            io::Error::new(io::ErrorKind::PermissionDenied, "/tmp/secret denied").into();
        assert_eq!(err.http_status_code(), 500);
        assert!(err.is_sensitive());
        assert!(!err.client_message().contains("/tmp/secret"));
        assert_eq!(err.error_type(), "IOFailure");
    }

    #[test]
    fn test_detailed_message_includes_source_chain() {
        let err: AppError = anyhow::anyhow!("root cause")
            .context("while clearing")
            .into();
        assert_eq!(err.client_message(), "Internal server error");
        assert!(err.detailed_message().contains("Caused by"));
    }
}
