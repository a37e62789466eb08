//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p dropzone-api --test upload_test`.

pub mod fixtures;

use axum_test::TestServer;
use dropzone_api::setup::routes;
use dropzone_api::state::AppState;
use dropzone_core::Config;
use dropzone_storage::{LocalStorage, Storage};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Test application: server plus the temporary directory backing the upload dir.
pub struct TestApp {
    pub server: TestServer,
    pub upload_dir: PathBuf,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn stored(&self, name: &str) -> Option<Vec<u8>> {
        std::fs::read(self.upload_dir.join(name)).ok()
    }

    pub fn stored_count(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }
}

/// Setup a test app with the default policy and an isolated upload directory.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Setup a test app, letting the caller adjust the configuration first.
pub async fn setup_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let upload_dir = temp_dir.path().join("uploads");

    let mut config = Config {
        upload_dir: upload_dir.clone(),
        ..Config::default()
    };
    configure(&mut config);

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(&config.upload_dir)
            .await
            .expect("Failed to create local storage"),
    );
    let state = Arc::new(AppState::new(config.clone(), storage));

    let app = routes::setup_routes(&config, state);
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        upload_dir: config.upload_dir,
        _temp_dir: temp_dir,
    }
}
