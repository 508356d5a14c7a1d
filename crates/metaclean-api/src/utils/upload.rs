//! Request body extraction for clear-metadata uploads
//!
//! A clear request carries its file in one of three encodings, chosen by
//! `Content-Type`:
//!
//! - `multipart/form-data`: a file part named `file` (streamed to a staged file),
//!   or text fields `file` (base64) and `filename`
//! - `application/json`: `{"file": "<base64>", "filename": "..."}`
//! - `application/x-www-form-urlencoded`: the same two fields
//!
//! A multipart file part wins over base64 fields in the same request.

use crate::constants::{FILENAME_FIELD, FILE_FIELD, NO_FILE_MESSAGE};
use crate::error::HttpAppError;
use crate::state::AppState;
use axum::extract::multipart::Field;
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use metaclean_core::AppError;
use metaclean_processing::{StagedFile, StagingArea};
use serde::Deserialize;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

const LENIENT: GeneralPurposeConfig =
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent);
const STANDARD_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::STANDARD, LENIENT);
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(&alphabet::URL_SAFE, LENIENT);

/// The file a clear request carries
#[derive(Debug)]
pub enum ClearMetadataInput {
    /// Multipart file part, already written to a staged file
    Upload(StagedFile),
    /// Base64 payload with its client-supplied filename, not yet decoded
    Base64 { file: String, filename: String },
}

/// `file` + `filename` fields shared by the JSON, form and multipart-text encodings.
#[derive(Debug, Default, Deserialize)]
pub struct Base64Payload {
    pub file: Option<String>,
    pub filename: Option<String>,
}

impl Base64Payload {
    /// Both fields must be present and non-empty.
    fn into_input(self) -> Result<ClearMetadataInput, HttpAppError> {
        match (self.file, self.filename) {
            (Some(file), Some(filename)) if !file.is_empty() && !filename.is_empty() => {
                Ok(ClearMetadataInput::Base64 { file, filename })
            }
            _ => Err(no_file()),
        }
    }
}

fn no_file() -> HttpAppError {
    HttpAppError(AppError::InvalidRequest(NO_FILE_MESSAGE.to_string()))
}

/// Normalize MIME type by stripping parameters (e.g. "application/json; charset=utf-8" -> "application/json").
fn normalize_mime_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .map(|s| s.trim())
        .unwrap_or(content_type)
        .to_lowercase()
}

fn is_json(mime: &str) -> bool {
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

impl FromRequest<Arc<AppState>> for ClearMetadataInput {
    type Rejection = HttpAppError;

    async fn from_request(req: Request, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let mime = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(normalize_mime_type)
            .unwrap_or_default();

        if mime == "multipart/form-data" {
            let multipart = Multipart::from_request(req, state).await?;
            return read_multipart(multipart, state.clearer.staging()).await;
        }

        if is_json(&mime) {
            let Json(payload) = Json::<Base64Payload>::from_request(req, state).await?;
            return payload.into_input();
        }

        if mime == "application/x-www-form-urlencoded" {
            let Form(payload) = Form::<Base64Payload>::from_request(req, state).await?;
            return payload.into_input();
        }

        Err(no_file())
    }
}

/// Walk the multipart body. The first `file` part that carries a filename is
/// streamed to disk; `file`/`filename` text fields are the base64 fallback.
async fn read_multipart(
    mut multipart: Multipart,
    staging: &StagingArea,
) -> Result<ClearMetadataInput, HttpAppError> {
    let mut upload: Option<StagedFile> = None;
    let mut text = Base64Payload::default();

    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().map(|s| s.to_string()).unwrap_or_default();
        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(|s| s.to_string());

        match (field_name.as_str(), file_name) {
            (FILE_FIELD, Some(original_name)) => {
                if upload.is_some() {
                    return Err(HttpAppError(AppError::InvalidRequest(
                        "Multiple file fields are not allowed; send exactly one field named 'file'"
                            .to_string(),
                    )));
                }
                upload = Some(stream_to_staged_file(field, staging, &original_name).await?);
            }
            (FILE_FIELD, None) => text.file = Some(field.text().await?),
            (FILENAME_FIELD, _) => text.filename = Some(field.text().await?),
            _ => {}
        }
    }

    match upload {
        Some(staged) => Ok(ClearMetadataInput::Upload(staged)),
        None => text.into_input(),
    }
}

/// Copy a file part to a staged file chunk by chunk, never holding the whole upload in memory.
async fn stream_to_staged_file(
    mut field: Field<'_>,
    staging: &StagingArea,
    original_name: &str,
) -> Result<StagedFile, HttpAppError> {
    let (staged, mut file) = staging.create(original_name).await?;

    let mut written: u64 = 0;
    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;

    tracing::debug!(filename = %original_name, bytes = written, "Upload staged");
    Ok(staged)
}

/// Decode a base64 payload.
///
/// Accepts an optional `data:<mime>;base64,` prefix, embedded whitespace, missing
/// padding and the URL-safe alphabet.
pub fn decode_base64(payload: &str) -> Result<Vec<u8>, AppError> {
    let body = match payload.split_once(',') {
        Some((prefix, rest)) if prefix.starts_with("data:") && prefix.ends_with(";base64") => rest,
        _ => payload,
    };
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    if compact.is_empty() {
        return Err(AppError::DecodeFailure("payload is empty".to_string()));
    }

    STANDARD_LENIENT
        .decode(&compact)
        .or_else(|_| URL_SAFE_LENIENT.decode(&compact))
        .map_err(|e| AppError::DecodeFailure(e.to_string()))
}
