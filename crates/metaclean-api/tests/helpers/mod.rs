//! Shared setup for API integration tests.
//!
//! Each test gets its own router over a private staging directory, so tests can
//! assert that no temporary file outlives a request.

#![allow(dead_code)]

pub mod engines;
pub mod fixtures;

use axum_test::TestServer;
use metaclean_api::setup::routes::setup_routes;
use metaclean_api::AppState;
use metaclean_core::{Config, EngineKind};
use metaclean_processing::{MetadataEngine, NativeEngine};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;

pub struct TestApp {
    server: TestServer,
    temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Number of files left in the staging directory
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(self.temp_dir.path())
            .expect("Failed to read staging directory")
            .count()
    }
}

/// Test config pointing at `temp_dir`
pub fn test_config(temp_dir: &Path) -> Config {
    Config {
        temp_dir: temp_dir.to_path_buf(),
        engine: EngineKind::Native,
        ..Config::default()
    }
}

/// App backed by the native engine
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(Arc::new(NativeEngine), |_| {}).await
}

/// App backed by `engine`, with `configure` applied to the test config
pub async fn setup_test_app_with<F>(engine: Arc<dyn MetadataEngine>, configure: F) -> TestApp
where
    F: FnOnce(&mut Config),
{
    let temp_dir = tempfile::tempdir().expect("Failed to create staging directory");
    let mut config = test_config(temp_dir.path());
    configure(&mut config);

    let state = AppState::new(config.clone(), engine);
    let app = setup_routes(&config, state)
        .await
        .expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp { server, temp_dir }
}
