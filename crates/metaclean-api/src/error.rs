//! HTTP error response conversion
//!
//! Every failure leaves the service as the same JSON shape:
//! `{"success": false, "error": ..., "code": ..., "timestamp": ...}`.
//!
//! Handlers and extractors return `Result<_, HttpAppError>`; domain errors convert
//! into it with `?`.
//!
//! Responses never carry `details` on their own. Non-sensitive errors stash a
//! detailed copy in the response extensions, and [`expose_error_details`] swaps
//! it in when the service is not running in production.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    extract::rejection::{FormRejection, JsonRejection},
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use metaclean_core::time::serialize_iso_millis;
use metaclean_core::{AppError, ErrorMetadata, LogLevel};
use metaclean_processing::{ClearError, EngineError};
use serde::Serialize;
use std::any::Any;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    pub error: String,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code: code.into(),
            details: None,
            timestamp: Utc::now(),
        }
    }
}

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from metaclean-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

impl From<std::io::Error> for HttpAppError {
    fn from(err: std::io::Error) -> Self {
        HttpAppError(AppError::from(err))
    }
}

/// Oversized bodies surface as 413 from every body extractor; anything else is a malformed request.
fn rejection_error(status: StatusCode, body_text: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(body_text)
    } else {
        AppError::InvalidRequest(format!("Invalid request body: {}", body_text))
    }
}

impl From<JsonRejection> for HttpAppError {
    fn from(rejection: JsonRejection) -> Self {
        HttpAppError(rejection_error(rejection.status(), rejection.body_text()))
    }
}

impl From<FormRejection> for HttpAppError {
    fn from(rejection: FormRejection) -> Self {
        HttpAppError(rejection_error(rejection.status(), rejection.body_text()))
    }
}

impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        HttpAppError(rejection_error(rejection.status(), rejection.body_text()))
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        HttpAppError(rejection_error(err.status(), err.body_text()))
    }
}

impl From<EngineError> for HttpAppError {
    fn from(err: EngineError) -> Self {
        let app = match err {
            EngineError::Io(e) => AppError::from(e),
            other => AppError::EngineFailure(other.to_string()),
        };
        HttpAppError(app)
    }
}

impl From<ClearError> for HttpAppError {
    fn from(err: ClearError) -> Self {
        match err {
            ClearError::Engine(e) => HttpAppError::from(e),
            ClearError::Timeout(limit) => HttpAppError(AppError::Timeout {
                seconds: limit.as_secs(),
            }),
            ClearError::Io(e) => HttpAppError(AppError::from(e)),
        }
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, "Error occurred");
        }
    }
}

/// Error body with `details` filled in, carried in the response extensions
#[derive(Debug, Clone)]
pub struct ErrorDetails(pub ErrorResponse);

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = ErrorResponse::new(app_error.client_message(), app_error.error_code());
        let detailed = (!app_error.is_sensitive()).then(|| ErrorResponse {
            details: Some(app_error.detailed_message()),
            ..body.clone()
        });

        let mut response = (status, Json(body)).into_response();
        if let Some(detailed) = detailed {
            response.extensions_mut().insert(ErrorDetails(detailed));
        }
        response
    }
}

/// Middleware that renders the detailed error body when `expose` is set.
///
/// `expose` comes from configuration: it is `false` in production.
pub async fn expose_error_details(
    State(expose): State<bool>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    if !expose {
        return response;
    }

    match response.extensions_mut().remove::<ErrorDetails>() {
        Some(ErrorDetails(detailed)) => {
            let mut rebuilt = Json(detailed).into_response();
            *rebuilt.status_mut() = response.status();
            rebuilt
        }
        None => response,
    }
}

/// Response for a panic caught by `CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };
    tracing::error!(panic = %detail, "Request handler panicked");

    HttpAppError(AppError::Internal(detail)).into_response()
}
