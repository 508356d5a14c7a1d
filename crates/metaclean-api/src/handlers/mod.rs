pub mod clear_metadata;
pub mod health;
pub mod service_info;

use crate::error::HttpAppError;
use axum::http::Uri;
use metaclean_core::AppError;

/// Fallback for unmatched paths
pub async fn not_found(uri: Uri) -> HttpAppError {
    HttpAppError(AppError::NotFound(uri.path().to_string()))
}
