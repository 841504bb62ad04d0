// src/lib.rs
pub mod application;
pub mod cli;
pub mod config;
pub mod constants;
pub mod domain;
pub mod infrastructure;
pub mod ports;
pub mod util;

use anyhow::{Context, Result};
use application::{
    BucketDemo, BucketDemoSettings, BucketManager, NoteLoader, NoteReader, NoteRepository,
    NotesDemo, NotesDemoSettings, ObjectStore, TableProvisioner,
};
use config::Config;
use domain::{NoteKey, ObjectUpload};
use infrastructure::aws::{self, ConnectionSettings};
use infrastructure::{DynamoNoteRepository, S3ObjectStore};
use ports::console::emit;
use ports::ConsolePresenter;
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::cli::args::{Args, Command};

pub async fn run(args: Args) -> Result<()> {
    debug!(?args, "Starting cloudnotes with arguments");

    let config = Config::resolve(args.config.as_deref())?;
    debug!(?config, "Resolved configuration");

    // Initialize infrastructure
    let settings = connection_settings(&args, &config);
    let sdk_config = aws::load_sdk_config(&settings).await;
    let notes = DynamoNoteRepository::new(aws::dynamodb_client(&sdk_config));
    let objects = S3ObjectStore::new(aws::s3_client(&sdk_config, &settings));

    let mut stdout = std::io::stdout().lock();
    execute(args.command, &config, notes, objects, &mut stdout).await
}

/// Command-line flags win over the config file
pub fn connection_settings(args: &Args, config: &Config) -> ConnectionSettings {
    ConnectionSettings {
        profile: args.profile.clone().or_else(|| config.aws.profile.clone()),
        region: args.region.clone().or_else(|| config.aws.region.clone()),
        endpoint_url: args
            .endpoint_url
            .clone()
            .or_else(|| config.aws.endpoint_url.clone()),
        force_path_style: config.aws.force_path_style,
    }
}

/// Run one command against the given repositories, printing results to `out`
pub async fn execute<R, S, W>(
    command: Command,
    config: &Config,
    notes: R,
    objects: S,
    out: &mut W,
) -> Result<()>
where
    R: NoteRepository + Clone,
    S: ObjectStore,
    W: Write,
{
    let presenter = ConsolePresenter::new();
    let table = config.notes.table.as_str();
    let bucket = config.objects.bucket.as_str();

    match command {
        Command::NotesDemo { file, table } => {
            let settings = NotesDemoSettings {
                table: table.unwrap_or_else(|| config.notes.table.clone()),
                data_file: file.unwrap_or_else(|| config.notes.data_file.clone()),
                user_id: config.notes.user_id.clone(),
                note_id: config.notes.note_id,
                page_size: config.notes.page_size,
                max_wait: Duration::from_secs(config.notes.wait_secs),
            };
            info!(table = %settings.table, "Running notes walkthrough");
            NotesDemo::new(notes).run(&settings, out).await
        }
        Command::Load { file } => {
            let count = NoteLoader::new(notes).load_file(table, &file).await?;
            emit(out, [presenter.loaded(count)])
        }
        Command::Complete { user_id, note_id } => {
            let key = NoteKey::new(user_id, note_id);
            let record = NoteLoader::new(notes)
                .mark_incomplete(table, &key)
                .await
                .with_context(|| format!("Failed to update note {}", key))?;
            emit(out, presenter.records(std::slice::from_ref(&record)))
        }
        Command::Query { user_id } => {
            let records = NoteReader::new(notes).query(table, &user_id).await?;
            emit(out, presenter.records(&records))
        }
        Command::Scan { page_size } => {
            let page_size = page_size.unwrap_or(config.notes.page_size);
            let pages = NoteReader::new(notes).scan_pages(table, page_size).await?;
            for page in &pages {
                emit(out, presenter.page(page))?;
            }
            Ok(())
        }
        Command::Lookup { user_id, note_id } => {
            let key = NoteKey::new(user_id, note_id);
            let records = NoteReader::new(notes).lookup(table, &key).await?;
            if records.is_empty() {
                warn!(%key, "Lookup returned nothing");
                emit(out, [presenter.no_note(&key)])
            } else {
                emit(out, presenter.records(&records))
            }
        }
        Command::DropTable => {
            TableProvisioner::new(notes).drop_table(table).await?;
            emit(out, [presenter.table_deleted(table)])
        }
        Command::BucketDemo { bucket, file } => {
            let source_file = file.unwrap_or_else(|| config.objects.source_file.clone());
            let settings = BucketDemoSettings {
                bucket: bucket.unwrap_or_else(|| config.objects.bucket.clone()),
                key: object_key(&source_file)?,
                source_file,
                content_type: config.objects.content_type.clone(),
                metadata: config.objects.metadata.clone(),
                presign_expiry: Duration::from_secs(config.objects.presign_secs),
                max_wait: Duration::from_secs(config.objects.wait_secs),
            };
            info!(bucket = %settings.bucket, "Running bucket walkthrough");
            BucketDemo::new(objects).run(&settings, out).await
        }
        Command::Upload {
            file,
            key,
            content_type,
            metadata,
        } => {
            let upload = ObjectUpload {
                bucket: bucket.to_string(),
                key: match key {
                    Some(key) => key,
                    None => object_key(&file)?,
                },
                source: file,
                content_type: content_type.unwrap_or_else(|| config.objects.content_type.clone()),
                metadata: if metadata.is_empty() {
                    config.objects.metadata.clone()
                } else {
                    metadata.into_iter().collect()
                },
            };
            BucketManager::new(objects).upload(&upload).await?;
            emit(out, [presenter.uploaded(&upload.bucket, &upload.key)])
        }
        Command::ListBuckets => {
            let names = BucketManager::new(objects).list_buckets().await?;
            emit(out, presenter.bucket_names(&names))
        }
        Command::ListObjects => {
            let keys = BucketManager::new(objects).list_contents(bucket).await?;
            emit(out, presenter.bucket_contents(bucket, &keys))
        }
        Command::Presign { key, expires_in } => {
            let expires_in = Duration::from_secs(expires_in.unwrap_or(config.objects.presign_secs));
            let link = BucketManager::new(objects)
                .presign(bucket, &key, expires_in)
                .await?;
            emit(out, [presenter.presigned(link.as_ref())])
        }
        Command::Teardown => {
            let deleted = BucketManager::new(objects).teardown(bucket).await?;
            emit(out, [presenter.deleted_objects(bucket, deleted)])
        }
    }
}

/// Object key for an uploaded file: its file name
pub fn object_key(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .with_context(|| format!("Cannot derive an object key from {}", path.display()))
}
