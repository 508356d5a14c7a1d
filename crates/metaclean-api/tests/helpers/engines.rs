//! Fake metadata engines for exercising failure paths.

use async_trait::async_trait;
use metaclean_processing::{EngineError, MetadataEngine};
use std::path::Path;
use std::time::Duration;

/// Rejects every file with a fixed message.
pub struct RejectingEngine(pub &'static str);

#[async_trait]
impl MetadataEngine for RejectingEngine {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    async fn clear_metadata(&self, _path: &Path) -> Result<(), EngineError> {
        Err(EngineError::Failed(self.0.to_string()))
    }
}

/// Never finishes within any reasonable timeout.
pub struct StallingEngine;

#[async_trait]
impl MetadataEngine for StallingEngine {
    fn name(&self) -> &'static str {
        "stalling"
    }

    async fn clear_metadata(&self, _path: &Path) -> Result<(), EngineError> {
        tokio::time::sleep(Duration::from_secs(300)).await;
        Ok(())
    }
}

/// Panics mid-session.
pub struct PanickingEngine;

#[async_trait]
impl MetadataEngine for PanickingEngine {
    fn name(&self) -> &'static str {
        "panicking"
    }

    async fn clear_metadata(&self, _path: &Path) -> Result<(), EngineError> {
        panic!("engine crashed");
    }
}

/// Appends bytes, so the cleaned file is larger than the original.
pub struct GrowingEngine(pub usize);

#[async_trait]
impl MetadataEngine for GrowingEngine {
    fn name(&self) -> &'static str {
        "growing"
    }

    async fn clear_metadata(&self, path: &Path) -> Result<(), EngineError> {
        let mut data = tokio::fs::read(path).await?;
        data.extend(std::iter::repeat(0u8).take(self.0));
        tokio::fs::write(path, data).await?;
        Ok(())
    }
}
