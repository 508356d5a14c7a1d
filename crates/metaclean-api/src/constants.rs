//! Service identity and route paths

/// Service name reported by the liveness endpoint
pub const SERVICE_NAME: &str = "metadata-cleaner-api";

/// Service version reported by the liveness endpoint
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

pub const ROOT_PATH: &str = "/";
pub const HEALTH_PATH: &str = "/health";
pub const CLEAR_METADATA_PATH: &str = "/clear-metadata";

/// Multipart part and JSON/form field carrying the file
pub const FILE_FIELD: &str = "file";
/// JSON/form field carrying the original filename for base64 uploads
pub const FILENAME_FIELD: &str = "filename";

/// Message returned when a clear request carries no usable file
pub const NO_FILE_MESSAGE: &str =
    "No file provided. Send either multipart file or base64 file with filename.";
