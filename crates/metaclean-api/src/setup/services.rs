//! Metadata engine construction

use metaclean_core::Config;
use metaclean_processing::{create_engine, MetadataEngine};
use std::sync::Arc;

/// Build the configured engine and check that it can run.
///
/// An engine that fails its check is still returned: the service starts, and
/// clear requests fail with the engine's error until the problem is fixed.
pub async fn setup_engine(config: &Config) -> Arc<dyn MetadataEngine> {
    let engine = create_engine(config);

    match engine.version().await {
        Ok(version) => {
            tracing::info!(engine = engine.name(), version = %version, "Metadata engine ready");
        }
        Err(e) => {
            tracing::warn!(
                engine = engine.name(),
                error = %e,
                "Metadata engine check failed; clear requests will fail until it is available"
            );
        }
    }

    engine
}
