//! In-memory collaborators for exercising the pipeline without S3, Postgres or a
//! caption provider. Enabled for this crate's tests and, through the
//! `test-helpers` feature, for dependent crates.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use glimpse_captions::{CaptionError, CaptionGenerator};
use glimpse_core::models::{ArtifactRecord, NewArtifact};
use glimpse_core::{AppError, StorageBackend};
use glimpse_db::ArtifactStore;
use glimpse_storage::{Storage, StorageError, StorageResult};

pub const TEST_BASE_URL: &str = "https://objects.test";

/// Shared, ordered record of calls made against the fakes.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().expect("call log poisoned").push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().expect("call log poisoned").clone()
    }
}

struct StoredObject {
    data: Vec<u8>,
    content_type: String,
}

/// Object store held in a `HashMap`.
///
/// Presigned URLs look like `https://objects.test/{key}?signature=test&expires_in={secs}`.
pub struct MemoryStorage {
    log: CallLog,
    objects: Mutex<HashMap<String, StoredObject>>,
    fail_puts: AtomicBool,
    fail_signing: AtomicBool,
    failing_probes: Mutex<HashSet<String>>,
    exists_delay: Mutex<Option<Duration>>,
}

impl MemoryStorage {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            objects: Mutex::new(HashMap::new()),
            fail_puts: AtomicBool::new(false),
            fail_signing: AtomicBool::new(false),
            failing_probes: Mutex::new(HashSet::new()),
            exists_delay: Mutex::new(None),
        }
    }

    /// Write an object without logging, the way the thumbnail producer would.
    pub fn insert_object(&self, key: &str, data: Vec<u8>) {
        self.objects.lock().expect("objects poisoned").insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: "image/jpeg".to_string(),
            },
        );
    }

    pub fn object(&self, key: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("objects poisoned")
            .get(key)
            .map(|o| o.data.clone())
    }

    pub fn content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .expect("objects poisoned")
            .get(key)
            .map(|o| o.content_type.clone())
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .objects
            .lock()
            .expect("objects poisoned")
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_signing(&self, fail: bool) {
        self.fail_signing.store(fail, Ordering::SeqCst);
    }

    /// Make `exists(key)` return a backend error.
    pub fn fail_exists_for(&self, key: &str) {
        self.failing_probes
            .lock()
            .expect("probes poisoned")
            .insert(key.to_string());
    }

    /// Delay every `exists` call.
    pub fn delay_exists(&self, delay: Duration) {
        *self.exists_delay.lock().expect("delay poisoned") = Some(delay);
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn put(&self, key: &str, data: Vec<u8>, content_type: &str) -> StorageResult<()> {
        self.log.record(format!("storage.put {}", key));
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::UploadFailed(
                "simulated object store outage".to_string(),
            ));
        }
        self.objects.lock().expect("objects poisoned").insert(
            key.to_string(),
            StoredObject {
                data,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    async fn download(&self, key: &str) -> StorageResult<Vec<u8>> {
        self.object(key)
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn exists(&self, key: &str) -> StorageResult<bool> {
        let delay = *self.exists_delay.lock().expect("delay poisoned");
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self
            .failing_probes
            .lock()
            .expect("probes poisoned")
            .contains(key)
        {
            return Err(StorageError::BackendError("403 Forbidden".to_string()));
        }
        Ok(self
            .objects
            .lock()
            .expect("objects poisoned")
            .contains_key(key))
    }

    async fn get_presigned_url(&self, key: &str, expires_in: Duration) -> StorageResult<String> {
        if self.fail_signing.load(Ordering::SeqCst) {
            return Err(StorageError::ConfigError("no credentials".to_string()));
        }
        Ok(format!(
            "{}/{}?signature=test&expires_in={}",
            TEST_BASE_URL,
            key,
            expires_in.as_secs()
        ))
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", TEST_BASE_URL, key)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Metadata store held in a `Vec`.
///
/// Inserted rows get increasing ids and strictly increasing `created_at`.
pub struct MemoryArtifactStore {
    log: CallLog,
    records: Mutex<Vec<ArtifactRecord>>,
    next_id: AtomicI64,
    fail_inserts: AtomicBool,
    fail_lists: AtomicBool,
}

impl MemoryArtifactStore {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            records: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
            fail_inserts: AtomicBool::new(false),
            fail_lists: AtomicBool::new(false),
        }
    }

    /// Add a record as-is, bypassing the insert path.
    pub fn seed(&self, record: ArtifactRecord) {
        self.next_id.fetch_max(record.id + 1, Ordering::SeqCst);
        self.records.lock().expect("records poisoned").push(record);
    }

    /// Records in insertion order.
    pub fn records(&self) -> Vec<ArtifactRecord> {
        self.records.lock().expect("records poisoned").clone()
    }

    pub fn fail_inserts(&self, fail: bool) {
        self.fail_inserts.store(fail, Ordering::SeqCst);
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    fn next_created_at(records: &[ArtifactRecord]) -> DateTime<Utc> {
        let now = Utc::now();
        match records.iter().map(|r| r.created_at).max() {
            Some(latest) if latest >= now => latest + chrono::Duration::microseconds(1),
            _ => now,
        }
    }
}

#[async_trait]
impl ArtifactStore for MemoryArtifactStore {
    async fn insert(&self, artifact: NewArtifact) -> Result<ArtifactRecord, AppError> {
        self.log
            .record(format!("artifacts.insert {}", artifact.storage_key));
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection reset by peer".to_string()));
        }

        let mut records = self.records.lock().expect("records poisoned");
        let record = ArtifactRecord {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            file_name: artifact.file_name,
            storage_key: artifact.storage_key,
            caption: artifact.caption,
            created_at: Self::next_created_at(&records),
        };
        records.push(record.clone());
        Ok(record)
    }

    async fn list_recent(&self) -> Result<Vec<ArtifactRecord>, AppError> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection refused".to_string()));
        }
        let mut records = self.records();
        records.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(records)
    }

    async fn ping(&self) -> Result<(), AppError> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(AppError::Internal("connection refused".to_string()));
        }
        Ok(())
    }
}

enum Reply {
    Text(String),
    Fail(CaptionError),
    Hang,
}

/// Caption provider with a fixed reply.
pub struct StaticCaptioner {
    reply: Reply,
    log: CallLog,
}

impl StaticCaptioner {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            reply: Reply::Text(text.into()),
            log: CallLog::default(),
        }
    }

    pub fn failing(error: CaptionError) -> Self {
        Self {
            reply: Reply::Fail(error),
            log: CallLog::default(),
        }
    }

    /// Never answers; pair with a short caption timeout.
    pub fn hanging() -> Self {
        Self {
            reply: Reply::Hang,
            log: CallLog::default(),
        }
    }

    pub fn with_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }
}

#[async_trait]
impl CaptionGenerator for StaticCaptioner {
    async fn caption(&self, _image: &[u8]) -> Result<String, CaptionError> {
        self.log.record("captions.caption");
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail(error) => Err(error.clone()),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        }
    }

    fn provider(&self) -> &'static str {
        "static"
    }
}
