//! Test helpers: build the router over in-memory collaborators.
//!
//! Run from workspace root: `cargo test -p glimpse-api`. No database or object
//! store is needed; the fakes come from `glimpse-services` (`test-helpers` feature).

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use glimpse_api::setup::routes::build_router;
use glimpse_api::AppState;
use glimpse_core::Config;
use glimpse_services::test_helpers::{CallLog, MemoryArtifactStore, MemoryStorage, StaticCaptioner};
use glimpse_storage::LocalStorage;
use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_CAPTION: &str = "A tabby cat asleep on a windowsill.";
pub const TEST_SIGNING_SECRET: &str = "test-signing-secret-0123456789abcdef";

/// Config with originals under `originals/` and an S3 backend that is never contacted.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("DATABASE_URL".to_string(), "postgres://localhost/glimpse_test".to_string()),
        ("S3_BUCKET".to_string(), "glimpse-test".to_string()),
        ("S3_REGION".to_string(), "us-east-1".to_string()),
        ("ORIGINALS_PREFIX".to_string(), "originals".to_string()),
        ("THUMBNAILS_PREFIX".to_string(), "thumbnails".to_string()),
    ]);
    for (key, value) in overrides {
        vars.insert(key.to_string(), value.to_string());
    }
    Config::from_lookup(|key| vars.get(key).cloned()).expect("valid test config")
}

/// Test application: server plus handles on the fakes behind it.
pub struct TestApp {
    pub server: TestServer,
    pub log: CallLog,
    pub storage: Arc<MemoryStorage>,
    pub artifacts: Arc<MemoryArtifactStore>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(StaticCaptioner::text(TEST_CAPTION), &[])
}

pub fn setup_test_app_with(captioner: StaticCaptioner, overrides: &[(&str, &str)]) -> TestApp {
    let log = CallLog::default();
    let storage = Arc::new(MemoryStorage::new(log.clone()));
    let artifacts = Arc::new(MemoryArtifactStore::new(log.clone()));
    let captioner = Arc::new(captioner.with_log(log.clone()));

    let state = Arc::new(AppState::new(
        test_config(overrides),
        storage.clone(),
        artifacts.clone(),
        captioner,
        None,
    ));
    let router = build_router(state).expect("Failed to build router");

    TestApp {
        server: TestServer::new(router).expect("Failed to start test server"),
        log,
        storage,
        artifacts,
    }
}

/// Test application on the local filesystem backend, so `/media` is live.
pub struct LocalTestApp {
    pub server: TestServer,
    pub storage: Arc<LocalStorage>,
    pub _temp_dir: TempDir,
}

pub async fn setup_local_test_app() -> LocalTestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let storage_path = temp_dir.path().to_string_lossy().to_string();
    let config = test_config(&[
        ("STORAGE_BACKEND", "local"),
        ("LOCAL_STORAGE_PATH", &storage_path),
        ("LOCAL_STORAGE_BASE_URL", "http://localhost:5000/media"),
        ("LOCAL_STORAGE_SIGNING_SECRET", TEST_SIGNING_SECRET),
    ]);

    let storage = Arc::new(
        glimpse_storage::create_local_storage(&config)
            .await
            .expect("Failed to create local storage"),
    );
    let log = CallLog::default();
    let artifacts = Arc::new(MemoryArtifactStore::new(log.clone()));
    let captioner = Arc::new(StaticCaptioner::text(TEST_CAPTION).with_log(log));

    let state = Arc::new(AppState::new(
        config,
        storage.clone(),
        artifacts,
        captioner,
        Some(storage.clone()),
    ));
    let router = build_router(state).expect("Failed to build router");

    LocalTestApp {
        server: TestServer::new(router).expect("Failed to start test server"),
        storage,
        _temp_dir: temp_dir,
    }
}
