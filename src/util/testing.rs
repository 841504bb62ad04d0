// src/util/testing.rs

use anyhow::Result;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};
use std::env;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

use crate::application::{NoteRepository, ObjectStore, ScanPage};
use crate::constants::{ATTR_IS_INCOMPLETE, ATTR_NOTE, ATTR_NOTE_ID, ATTR_USER_ID, INCOMPLETE_FLAG};
use crate::domain::{
    BucketStatus, DomainError, Note, NoteKey, NoteRecord, ObjectUpload, PresignedLink,
    ScanCursor,
};

fn lock<T>(state: &Mutex<T>) -> MutexGuard<'_, T> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Default)]
struct NoteState {
    tables: HashSet<String>,
    notes: BTreeMap<NoteKey, NoteRecord>,
    scripted_pages: VecDeque<ScanPage>,
    failures: HashMap<String, String>,
    creation_status: String,
    status: String,
    calls: Vec<String>,
}

impl NoteState {
    fn record(&mut self, call: impl Into<String>) -> Result<(), DomainError> {
        let call = call.into();
        let op = call.split(' ').next().unwrap_or_default().to_string();
        self.calls.push(call);
        match self.failures.get(&op) {
            Some(message) => Err(DomainError::Database(message.clone())),
            None => Ok(()),
        }
    }
}

/// In-memory stand-in for the notes table
///
/// Clones share state, so a test can hand one clone to a use case and inspect
/// the other afterwards.
///
/// # Examples
///
/// ```
/// use cloudnotes::util::testing::MockNoteRepository;
/// use cloudnotes::domain::Note;
///
/// let mock = MockNoteRepository::builder()
///     .with_table("Notes")
///     .with_note(Note::new("student", 1, "Read chapter 1"))
///     .build();
/// assert!(mock.has_table("Notes"));
/// ```
#[derive(Clone)]
pub struct MockNoteRepository {
    state: Arc<Mutex<NoteState>>,
}

impl MockNoteRepository {
    pub fn builder() -> MockNoteRepositoryBuilder {
        MockNoteRepositoryBuilder::new()
    }

    /// Operations performed so far, e.g. `"put_note Notes student/1"`
    pub fn calls(&self) -> Vec<String> {
        lock(&self.state).calls.clone()
    }

    pub fn has_table(&self, table: &str) -> bool {
        lock(&self.state).tables.contains(table)
    }

    pub fn records(&self) -> Vec<NoteRecord> {
        lock(&self.state).notes.values().cloned().collect()
    }

    pub fn record(&self, key: &NoteKey) -> Option<NoteRecord> {
        lock(&self.state).notes.get(key).cloned()
    }
}

#[async_trait]
impl NoteRepository for MockNoteRepository {
    async fn table_exists(&self, table: &str) -> Result<bool, DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("table_exists {}", table))?;
        Ok(state.tables.contains(table))
    }

    async fn create_table(&self, table: &str) -> Result<String, DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("create_table {}", table))?;
        state.tables.insert(table.to_string());
        Ok(state.creation_status.clone())
    }

    async fn wait_for_table(&self, table: &str, _max_wait: Duration) -> Result<(), DomainError> {
        lock(&self.state).record(format!("wait_for_table {}", table))
    }

    async fn table_status(&self, table: &str) -> Result<String, DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("table_status {}", table))?;
        if state.tables.contains(table) {
            Ok(state.status.clone())
        } else {
            Err(DomainError::TableNotFound(table.to_string()))
        }
    }

    async fn put_note(&self, table: &str, note: &Note) -> Result<(), DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("put_note {} {}", table, note.key()))?;
        state.notes.insert(note.key(), note.to_record());
        Ok(())
    }

    async fn mark_incomplete(
        &self,
        table: &str,
        key: &NoteKey,
    ) -> Result<NoteRecord, DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("mark_incomplete {} {}", table, key))?;
        let record = state.notes.entry(key.clone()).or_insert_with(|| {
            let mut record = NoteRecord::new();
            record.insert(ATTR_USER_ID, key.user_id.clone().into());
            record.insert(ATTR_NOTE_ID, key.note_id.to_string().into());
            record
        });
        record.insert(ATTR_IS_INCOMPLETE, INCOMPLETE_FLAG.into());
        Ok(record.clone())
    }

    async fn query_notes(
        &self,
        table: &str,
        user_id: &str,
    ) -> Result<Vec<NoteRecord>, DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("query_notes {} {}", table, user_id))?;
        Ok(state
            .notes
            .iter()
            .filter(|(key, _)| key.user_id == user_id)
            .map(|(_, record)| record.project(&[ATTR_NOTE_ID, ATTR_NOTE]))
            .collect())
    }

    async fn scan_page(
        &self,
        table: &str,
        page_size: u32,
        start: Option<ScanCursor>,
    ) -> Result<ScanPage, DomainError> {
        let mut state = lock(&self.state);
        let cursor = start
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_else(|| "-".to_string());
        state.record(format!("scan_page {} {} {}", table, page_size, cursor))?;

        if let Some(page) = state.scripted_pages.pop_front() {
            return Ok(page);
        }

        let remaining: Vec<(NoteKey, NoteRecord)> = state
            .notes
            .iter()
            .skip_while(|(key, _)| {
                start
                    .as_ref()
                    .map_or(false, |cursor| ScanCursor::from(*key) != *cursor)
            })
            .skip(usize::from(start.is_some()))
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect();
        let size = page_size as usize;
        let more = remaining.len() > size;
        let page: Vec<(NoteKey, NoteRecord)> = remaining.into_iter().take(size).collect();
        let next = if more {
            page.last().map(|(key, _)| ScanCursor::from(key))
        } else {
            None
        };
        Ok(ScanPage {
            records: page.into_iter().map(|(_, record)| record).collect(),
            next,
        })
    }

    async fn lookup(&self, table: &str, key: &NoteKey) -> Result<Vec<NoteRecord>, DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("lookup {} {}", table, key))?;
        Ok(state.notes.get(key).cloned().into_iter().collect())
    }

    async fn delete_table(&self, table: &str) -> Result<(), DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("delete_table {}", table))?;
        if state.tables.remove(table) {
            state.notes.clear();
            Ok(())
        } else {
            Err(DomainError::TableNotFound(table.to_string()))
        }
    }
}

/// Builder for MockNoteRepository
pub struct MockNoteRepositoryBuilder {
    state: NoteState,
}

impl MockNoteRepositoryBuilder {
    pub fn new() -> Self {
        Self {
            state: NoteState {
                creation_status: "CREATING".to_string(),
                status: "ACTIVE".to_string(),
                ..NoteState::default()
            },
        }
    }

    /// Mark a table as already existing
    pub fn with_table(mut self, table: &str) -> Self {
        self.state.tables.insert(table.to_string());
        self
    }

    /// Pre-load a note
    pub fn with_note(mut self, note: Note) -> Self {
        self.state.notes.insert(note.key(), note.to_record());
        self
    }

    /// Return these pages from scan_page, in order, before falling back to the stored notes
    pub fn with_scan_pages(mut self, pages: Vec<ScanPage>) -> Self {
        self.state.scripted_pages.extend(pages);
        self
    }

    /// Make every call of `operation` fail with a database error
    pub fn with_failure(mut self, operation: &str, message: &str) -> Self {
        self.state
            .failures
            .insert(operation.to_string(), message.to_string());
        self
    }

    pub fn with_status(mut self, status: &str) -> Self {
        self.state.status = status.to_string();
        self
    }

    pub fn build(self) -> MockNoteRepository {
        MockNoteRepository {
            state: Arc::new(Mutex::new(self.state)),
        }
    }
}

impl Default for MockNoteRepositoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default)]
struct ObjectState {
    buckets: BTreeMap<String, BTreeMap<String, ObjectUpload>>,
    foreign: HashSet<String>,
    failures: HashMap<String, String>,
    calls: Vec<String>,
}

impl ObjectState {
    fn record(&mut self, call: impl Into<String>) -> Result<(), DomainError> {
        let call = call.into();
        let op = call.split(' ').next().unwrap_or_default().to_string();
        self.calls.push(call);
        match self.failures.get(&op) {
            Some(message) => Err(DomainError::ObjectStore(message.clone())),
            None => Ok(()),
        }
    }

    fn bucket_mut(
        &mut self,
        bucket: &str,
    ) -> Result<&mut BTreeMap<String, ObjectUpload>, DomainError> {
        self.buckets
            .get_mut(bucket)
            .ok_or_else(|| DomainError::ObjectStore(format!("NoSuchBucket: {}", bucket)))
    }
}

/// In-memory stand-in for the object store; clones share state
#[derive(Clone)]
pub struct MockObjectStore {
    state: Arc<Mutex<ObjectState>>,
}

impl MockObjectStore {
    pub fn builder() -> MockObjectStoreBuilder {
        MockObjectStoreBuilder::new()
    }

    pub fn calls(&self) -> Vec<String> {
        lock(&self.state).calls.clone()
    }

    pub fn has_bucket(&self, bucket: &str) -> bool {
        lock(&self.state).buckets.contains_key(bucket)
    }

    pub fn object(&self, bucket: &str, key: &str) -> Option<ObjectUpload> {
        lock(&self.state)
            .buckets
            .get(bucket)
            .and_then(|objects| objects.get(key))
            .cloned()
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn probe_bucket(&self, bucket: &str) -> Result<BucketStatus, DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("probe_bucket {}", bucket))?;
        Ok(if state.foreign.contains(bucket) {
            BucketStatus::Foreign
        } else if state.buckets.contains_key(bucket) {
            BucketStatus::Owned
        } else {
            BucketStatus::Missing
        })
    }

    async fn create_bucket(&self, bucket: &str) -> Result<(), DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("create_bucket {}", bucket))?;
        if state.buckets.contains_key(bucket) || state.foreign.contains(bucket) {
            return Err(DomainError::ObjectStore(format!(
                "BucketAlreadyExists: {}",
                bucket
            )));
        }
        state.buckets.insert(bucket.to_string(), BTreeMap::new());
        Ok(())
    }

    async fn wait_for_bucket(&self, bucket: &str, _max_wait: Duration) -> Result<(), DomainError> {
        lock(&self.state).record(format!("wait_for_bucket {}", bucket))
    }

    async fn list_buckets(&self) -> Result<Vec<String>, DomainError> {
        let mut state = lock(&self.state);
        state.record("list_buckets")?;
        Ok(state.buckets.keys().cloned().collect())
    }

    async fn upload(&self, upload: &ObjectUpload) -> Result<(), DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("upload {} {}", upload.bucket, upload.key))?;
        state
            .bucket_mut(&upload.bucket)?
            .insert(upload.key.clone(), upload.clone());
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>, DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("list_objects {}", bucket))?;
        Ok(state.bucket_mut(bucket)?.keys().cloned().collect())
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<PresignedLink, DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("presign_get {} {}", bucket, key))?;
        Ok(PresignedLink {
            url: format!(
                "https://{}.s3.amazonaws.com/{}?X-Amz-Expires={}",
                bucket,
                key,
                expires_in.as_secs()
            ),
            expires_in,
        })
    }

    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<usize, DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("delete_objects {} {}", bucket, keys.len()))?;
        let objects = state.bucket_mut(bucket)?;
        Ok(keys.iter().filter(|key| objects.remove(*key).is_some()).count())
    }

    async fn delete_bucket(&self, bucket: &str) -> Result<(), DomainError> {
        let mut state = lock(&self.state);
        state.record(format!("delete_bucket {}", bucket))?;
        if !state.bucket_mut(bucket)?.is_empty() {
            return Err(DomainError::ObjectStore(format!("BucketNotEmpty: {}", bucket)));
        }
        state.buckets.remove(bucket);
        Ok(())
    }
}

/// Builder for MockObjectStore
pub struct MockObjectStoreBuilder {
    state: ObjectState,
}

impl MockObjectStoreBuilder {
    pub fn new() -> Self {
        Self {
            state: ObjectState::default(),
        }
    }

    /// Add an empty bucket owned by this account
    pub fn with_bucket(mut self, bucket: &str) -> Self {
        self.state
            .buckets
            .entry(bucket.to_string())
            .or_default();
        self
    }

    /// Add an object, creating its bucket if needed
    pub fn with_object(mut self, bucket: &str, key: &str) -> Self {
        let upload = ObjectUpload {
            bucket: bucket.to_string(),
            key: key.to_string(),
            source: key.into(),
            content_type: "application/octet-stream".to_string(),
            metadata: BTreeMap::new(),
        };
        self.state
            .buckets
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), upload);
        self
    }

    /// Make the bucket name look owned by another account
    pub fn with_foreign_bucket(mut self, bucket: &str) -> Self {
        self.state.foreign.insert(bucket.to_string());
        self
    }

    /// Make every call of `operation` fail with an object store error
    pub fn with_failure(mut self, operation: &str, message: &str) -> Self {
        self.state
            .failures
            .insert(operation.to_string(), message.to_string());
        self
    }

    pub fn build(self) -> MockObjectStore {
        MockObjectStore {
            state: Arc::new(Mutex::new(self.state)),
        }
    }
}

impl Default for MockObjectStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_test_setup() -> Result<()> {
    // Set up logging first
    setup_test_logging();

    info!("Test Setup complete");
    Ok(())
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "trace");
    }

    // Create a filter for noisy modules
    let noisy_modules = ["aws_smithy_runtime", "aws_config", "hyper", "rustls"];
    let module_filter = filter_fn(move |metadata| {
        !noisy_modules
            .iter()
            .any(|name| metadata.target().starts_with(name))
    });

    // Set up the subscriber with environment filter
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    // Build and set the subscriber
    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
