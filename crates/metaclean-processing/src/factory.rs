use crate::{ExifToolEngine, MetadataEngine, NativeEngine};
use metaclean_core::{Config, EngineKind};
use std::sync::Arc;

/// Create the metadata engine selected by configuration
pub fn create_engine(config: &Config) -> Arc<dyn MetadataEngine> {
    match config.engine() {
        EngineKind::ExifTool => Arc::new(ExifToolEngine::new(config.exiftool_path())),
        EngineKind::Native => Arc::new(NativeEngine),
    }
}
