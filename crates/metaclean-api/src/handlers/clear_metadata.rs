//! Clear-metadata handler

use crate::error::HttpAppError;
use crate::state::AppState;
use crate::utils::upload::{decode_base64, ClearMetadataInput};
use axum::extract::State;
use axum::Json;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use metaclean_core::time::serialize_iso_millis;
use metaclean_processing::CleanedFile;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClearMetadataResponse {
    pub success: bool,
    pub message: &'static str,
    pub original_size: u64,
    pub cleaned_size: u64,
    /// Negative when the engine grew the file
    pub saved_bytes: i64,
    /// Cleaned file, base64-encoded
    pub file: String,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl From<CleanedFile> for ClearMetadataResponse {
    fn from(cleaned: CleanedFile) -> Self {
        Self {
            success: true,
            message: "Metadata cleared successfully",
            original_size: cleaned.original_size,
            cleaned_size: cleaned.cleaned_size,
            saved_bytes: cleaned.saved_bytes(),
            file: STANDARD.encode(&cleaned.bytes),
            timestamp: Utc::now(),
        }
    }
}

/// Strip all metadata from the submitted file and return the cleaned bytes.
#[tracing::instrument(skip(state, input))]
pub async fn clear_metadata(
    State(state): State<Arc<AppState>>,
    input: ClearMetadataInput,
) -> Result<Json<ClearMetadataResponse>, HttpAppError> {
    tracing::info!("Processing metadata clearing request");

    let cleaned = match input {
        ClearMetadataInput::Upload(staged) => {
            tracing::info!(filename = %staged.original_name(), "Processing uploaded file");
            state.clearer.clear(staged).await?
        }
        ClearMetadataInput::Base64 { file, filename } => {
            tracing::info!(filename = %filename, "Processing base64 file");
            let data = decode_base64(&file)?;
            state.clearer.clear_bytes(&filename, &data).await?
        }
    };

    Ok(Json(ClearMetadataResponse::from(cleaned)))
}
