//! Application state shared by every handler.

use metaclean_core::Config;
use metaclean_processing::{MetadataClearer, MetadataEngine};
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub clearer: MetadataClearer,
}

impl AppState {
    pub fn new(config: Config, engine: Arc<dyn MetadataEngine>) -> Arc<Self> {
        let clearer = MetadataClearer::from_config(&config, engine);
        Arc::new(Self { config, clearer })
    }
}
