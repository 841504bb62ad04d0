// src/application/demo.rs
//
// End-to-end walkthroughs: each step is one use case call followed by printing its result.
use crate::application::{
    BucketManager, NoteLoader, NoteReader, NoteRepository, ObjectStore, TableProvisioner,
};
use crate::domain::{NoteKey, ObjectUpload};
use crate::ports::console::{emit, ConsolePresenter};
use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone)]
pub struct NotesDemoSettings {
    pub table: String,
    pub data_file: PathBuf,
    /// Note flagged as incomplete and looked up via PartiQL
    pub user_id: String,
    pub note_id: i64,
    pub page_size: u32,
    pub max_wait: Duration,
}

/// Table walkthrough: provision, load, update, query, paginate, PartiQL
pub struct NotesDemo<R: NoteRepository + Clone> {
    repository: R,
    presenter: ConsolePresenter,
}

impl<R: NoteRepository + Clone> NotesDemo<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository,
            presenter: ConsolePresenter::new(),
        }
    }

    pub async fn run<W: Write>(&self, settings: &NotesDemoSettings, out: &mut W) -> Result<()> {
        let table = settings.table.as_str();
        let p = &self.presenter;

        let provisioner = TableProvisioner::new(self.repository.clone());
        let provisioning = provisioner
            .ensure_table(table, settings.max_wait)
            .await
            .with_context(|| format!("Failed to provision table {}", table))?;
        emit(out, p.provisioning(&provisioning))?;

        let loader = NoteLoader::new(self.repository.clone());
        emit(
            out,
            [p.loading(table, &settings.data_file.display().to_string())],
        )?;
        let count = loader
            .load_file(table, &settings.data_file)
            .await
            .context("Failed to load notes")?;
        info!(count, "Notes loaded");

        emit(out, [p.heading("Updating a note")])?;
        let key = NoteKey::new(settings.user_id.clone(), settings.note_id);
        let updated = loader
            .mark_incomplete(table, &key)
            .await
            .with_context(|| format!("Failed to update note {}", key))?;
        emit(out, p.records(std::slice::from_ref(&updated)))?;

        let reader = NoteReader::new(self.repository.clone());
        let records = reader
            .query(table, &settings.user_id)
            .await
            .context("Failed to query notes")?;
        emit(out, p.records(&records))?;

        emit(out, [p.heading("Scanning using pagination")])?;
        let pages = reader
            .scan_pages(table, settings.page_size)
            .await
            .context("Failed to scan table")?;
        for page in &pages {
            emit(out, p.page(page))?;
        }

        emit(out, ["\nQuery using PartiQL".to_string()])?;
        let records = reader
            .lookup(table, &key)
            .await
            .context("PartiQL lookup failed")?;
        emit(out, p.records(&records))?;

        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct BucketDemoSettings {
    pub bucket: String,
    pub source_file: PathBuf,
    pub key: String,
    pub content_type: String,
    pub metadata: BTreeMap<String, String>,
    pub presign_expiry: Duration,
    pub max_wait: Duration,
}

/// Bucket walkthrough: verify name, create, upload, list, presign, tear down
pub struct BucketDemo<S: ObjectStore> {
    manager: BucketManager<S>,
    presenter: ConsolePresenter,
}

impl<S: ObjectStore> BucketDemo<S> {
    pub fn new(store: S) -> Self {
        Self {
            manager: BucketManager::new(store),
            presenter: ConsolePresenter::new(),
        }
    }

    pub async fn run<W: Write>(&self, settings: &BucketDemoSettings, out: &mut W) -> Result<()> {
        let bucket = settings.bucket.as_str();
        let p = &self.presenter;

        // Reject a bad link lifetime before anything is created
        BucketManager::<S>::check_expiry(settings.presign_expiry)?;
        self.manager.verify_available(bucket).await?;
        emit(out, ["Existing Bucket Not Found, ok to proceed".to_string()])?;

        emit(out, ["Creating bucket".to_string()])?;
        self.manager
            .create(bucket, settings.max_wait)
            .await
            .with_context(|| format!("Failed to create bucket {}", bucket))?;

        let names = self.manager.list_buckets().await?;
        emit(out, p.bucket_names(&names))?;

        let upload = ObjectUpload {
            bucket: bucket.to_string(),
            key: settings.key.clone(),
            source: settings.source_file.clone(),
            content_type: settings.content_type.clone(),
            metadata: settings.metadata.clone(),
        };
        self.manager
            .upload(&upload)
            .await
            .with_context(|| format!("Failed to upload {}", upload.source.display()))?;

        let keys = self.manager.list_contents(bucket).await?;
        emit(out, p.bucket_contents(bucket, &keys))?;

        let link = self
            .manager
            .presign(bucket, &settings.key, settings.presign_expiry)
            .await?;
        emit(out, [p.presigned(link.as_ref())])?;

        emit(out, ["Deleting bucket".to_string(), p.deleting_objects(bucket)])?;
        let deleted = self
            .manager
            .teardown(bucket)
            .await
            .with_context(|| format!("Failed to delete bucket {}", bucket))?;
        emit(out, [p.deleted_objects(bucket, deleted)])?;

        Ok(())
    }
}
