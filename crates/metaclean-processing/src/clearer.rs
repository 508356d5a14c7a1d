//! Clearing pipeline: staged file -> engine -> cleaned bytes

use crate::engine::{EngineError, MetadataEngine};
use crate::staging::{StagedFile, StagingArea};
use metaclean_core::Config;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum ClearError {
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Metadata engine timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("Temporary file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result of a successful clear
#[derive(Debug, Clone)]
pub struct CleanedFile {
    pub original_name: String,
    /// Size on disk before the engine ran
    pub original_size: u64,
    /// Size of the bytes re-read after the engine ran
    pub cleaned_size: u64,
    pub bytes: Vec<u8>,
}

impl CleanedFile {
    /// `original_size - cleaned_size`; negative when the engine grew the file.
    pub fn saved_bytes(&self) -> i64 {
        self.original_size as i64 - self.cleaned_size as i64
    }
}

/// Runs staged files through the metadata engine.
///
/// Engine sessions are capped by a semaphore; requests over the cap wait for a
/// permit. The wait is not counted against the engine timeout.
#[derive(Clone)]
pub struct MetadataClearer {
    engine: Arc<dyn MetadataEngine>,
    staging: StagingArea,
    sessions: Arc<Semaphore>,
    engine_timeout: Duration,
}

impl MetadataClearer {
    pub fn new(
        engine: Arc<dyn MetadataEngine>,
        staging: StagingArea,
        max_sessions: usize,
        engine_timeout: Duration,
    ) -> Self {
        Self {
            engine,
            staging,
            sessions: Arc::new(Semaphore::new(max_sessions.max(1))),
            engine_timeout,
        }
    }

    pub fn from_config(config: &Config, engine: Arc<dyn MetadataEngine>) -> Self {
        Self::new(
            engine,
            StagingArea::new(config.temp_dir()),
            config.max_concurrent_sessions(),
            config.engine_timeout(),
        )
    }

    pub fn staging(&self) -> &StagingArea {
        &self.staging
    }

    /// Stage an in-memory payload and clear it.
    pub async fn clear_bytes(&self, filename: &str, data: &[u8]) -> Result<CleanedFile, ClearError> {
        let staged = self.staging.stage_bytes(filename, data).await?;
        self.clear(staged).await
    }

    /// Clear all metadata from a staged file and return its cleaned content.
    ///
    /// The staged file is consumed: it is deleted before this returns, whatever
    /// the outcome.
    #[tracing::instrument(
        skip(self, staged),
        fields(file = %staged.original_name(), engine = self.engine.name())
    )]
    pub async fn clear(&self, staged: StagedFile) -> Result<CleanedFile, ClearError> {
        let original_size = tokio::fs::metadata(staged.path()).await?.len();

        // The semaphore is never closed, so acquiring only waits.
        let permit = self.sessions.acquire().await;

        let outcome =
            tokio::time::timeout(self.engine_timeout, self.engine.clear_metadata(staged.path()))
                .await;
        drop(permit);

        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(ClearError::Engine(e)),
            Err(_) => {
                warn!(timeout_secs = self.engine_timeout.as_secs(), "Metadata engine timed out");
                return Err(ClearError::Timeout(self.engine_timeout));
            }
        }

        let bytes = tokio::fs::read(staged.path()).await?;
        let cleaned = CleanedFile {
            original_name: staged.original_name().to_string(),
            original_size,
            cleaned_size: bytes.len() as u64,
            bytes,
        };

        if let Err(e) = staged.remove().await {
            warn!(error = %e, "Failed to remove temporary file after clearing");
        }

        info!(
            original_size = cleaned.original_size,
            cleaned_size = cleaned.cleaned_size,
            saved_bytes = cleaned.saved_bytes(),
            "Metadata cleared"
        );
        Ok(cleaned)
    }
}
