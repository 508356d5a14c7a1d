//! Metadata rewrite engine abstraction
//!
//! This module defines the trait every metadata engine implements, so the
//! clearing pipeline never depends on a concrete tool.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

/// Metadata engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// The engine ran and rejected the file; the message is the engine's own.
    #[error("{0}")]
    Failed(String),

    #[error("Metadata engine unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Metadata rewrite engine
///
/// One call to [`MetadataEngine::clear_metadata`] is one engine session: any
/// process or handle it opens must be released when the returned future
/// completes or is dropped.
#[async_trait]
pub trait MetadataEngine: Send + Sync {
    /// Short identifier used in logs and the startup banner
    fn name(&self) -> &'static str;

    /// Overwrite all metadata tags of the file at `path` in place.
    async fn clear_metadata(&self, path: &Path) -> Result<(), EngineError>;

    /// Report the engine version, failing if the engine cannot run.
    async fn version(&self) -> Result<String, EngineError> {
        Ok("built-in".to_string())
    }
}
