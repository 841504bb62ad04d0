// src/infrastructure/s3.rs
use crate::application::ObjectStore;
use crate::constants::{DEFAULT_S3_REGION, DELETE_BATCH_SIZE};
use crate::domain::{BucketStatus, DomainError, ObjectUpload, PresignedLink};
use async_trait::async_trait;
use aws_sdk_s3::client::Waiters;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::operation::delete_objects::DeleteObjectsOutput;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{
    BucketLocationConstraint, CreateBucketConfiguration, Delete, ObjectIdentifier,
};
use aws_sdk_s3::Client;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

fn store_error<E: Error>(operation: &str, err: E) -> DomainError {
    DomainError::ObjectStore(format!("{} failed: {}", operation, DisplayErrorContext(err)))
}

/// Map the HTTP status of a failed HEAD bucket request.
///
/// 404 means the name is free, 403 means another account owns it. Anything else
/// says nothing about ownership.
pub fn classify_probe_status(status: Option<u16>) -> Option<BucketStatus> {
    match status {
        Some(404) => Some(BucketStatus::Missing),
        Some(403) => Some(BucketStatus::Foreign),
        _ => None,
    }
}

/// Location constraint to send on CreateBucket; us-east-1 must not send one.
pub fn location_constraint(region: Option<&str>) -> Option<&str> {
    region.filter(|r| !r.is_empty() && *r != DEFAULT_S3_REGION)
}

/// DeleteObjects request bodies, at most `DELETE_BATCH_SIZE` keys each
pub fn delete_batches(keys: &[String]) -> Result<Vec<Delete>, DomainError> {
    keys.chunks(DELETE_BATCH_SIZE)
        .map(|chunk| {
            let objects = chunk
                .iter()
                .map(|key| ObjectIdentifier::builder().key(key).build())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| store_error("DeleteObjects", e))?;
            Delete::builder()
                .set_objects(Some(objects))
                .build()
                .map_err(|e| store_error("DeleteObjects", e))
        })
        .collect()
}

/// Number of deleted keys; any per-key error fails the whole batch.
pub fn deleted_count(bucket: &str, output: &DeleteObjectsOutput) -> Result<usize, DomainError> {
    if output.errors().is_empty() {
        return Ok(output.deleted().len());
    }

    let failed: Vec<&str> = output.errors().iter().filter_map(|e| e.key()).collect();
    warn!(bucket, ?failed, "Some objects were not deleted");
    Err(DomainError::ObjectStore(format!(
        "Failed to delete {} objects from {}: {}",
        failed.len(),
        bucket,
        failed.join(", ")
    )))
}

/// Buckets and objects backed by S3
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
    region: Option<String>,
}

impl S3ObjectStore {
    pub fn new(client: Client) -> Self {
        let region = client.config().region().map(|r| r.to_string());
        Self { client, region }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(level = "debug", skip(self))]
    async fn probe_bucket(&self, bucket: &str) -> Result<BucketStatus, DomainError> {
        match self.client.head_bucket().bucket(bucket).send().await {
            Ok(_) => Ok(BucketStatus::Owned),
            Err(err) => {
                let status = err.raw_response().map(|r| r.status().as_u16());
                debug!(bucket, ?status, "HeadBucket failed");
                classify_probe_status(status).ok_or_else(|| store_error("HeadBucket", err))
            }
        }
    }

    #[instrument(level = "debug", skip(self))]
    async fn create_bucket(&self, bucket: &str) -> Result<(), DomainError> {
        let mut request = self.client.create_bucket().bucket(bucket);
        if let Some(region) = location_constraint(self.region.as_deref()) {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }
        request
            .send()
            .await
            .map_err(|e| store_error("CreateBucket", e))?;
        info!(bucket, region = ?self.region, "Created bucket");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn wait_for_bucket(&self, bucket: &str, max_wait: Duration) -> Result<(), DomainError> {
        self.client
            .wait_until_bucket_exists()
            .bucket(bucket)
            .wait(max_wait)
            .await
            .map_err(|e| store_error("Waiting for bucket", e))?;
        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<String>, DomainError> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| store_error("ListBuckets", e))?;
        Ok(output
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect())
    }

    #[instrument(level = "debug", skip(self))]
    async fn upload(&self, upload: &ObjectUpload) -> Result<(), DomainError> {
        let body = ByteStream::from_path(&upload.source).await.map_err(|e| {
            DomainError::ObjectStore(format!(
                "Failed to read {}: {}",
                upload.source.display(),
                e
            ))
        })?;

        let metadata = if upload.metadata.is_empty() {
            None
        } else {
            Some(upload.metadata.clone().into_iter().collect())
        };

        self.client
            .put_object()
            .bucket(&upload.bucket)
            .key(&upload.key)
            .content_type(&upload.content_type)
            .set_metadata(metadata)
            .body(body)
            .send()
            .await
            .map_err(|e| store_error("PutObject", e))?;
        info!(bucket = %upload.bucket, key = %upload.key, "Uploaded object");
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>, DomainError> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| store_error("ListObjectsV2", e))?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|object| object.key().map(str::to_string)),
            );
        }
        Ok(keys)
    }

    #[instrument(level = "debug", skip(self))]
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<PresignedLink, DomainError> {
        let config =
            PresigningConfig::expires_in(expires_in).map_err(|e| store_error("Presign", e))?;
        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(config)
            .await
            .map_err(|e| store_error("Presign GetObject", e))?;
        Ok(PresignedLink {
            url: request.uri().to_string(),
            expires_in,
        })
    }

    #[instrument(level = "debug", skip(self, keys), fields(count = keys.len()))]
    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<usize, DomainError> {
        let mut deleted = 0;

        for delete in delete_batches(keys)? {
            let output = self
                .client
                .delete_objects()
                .bucket(bucket)
                .delete(delete)
                .send()
                .await
                .map_err(|e| store_error("DeleteObjects", e))?;
            deleted += deleted_count(bucket, &output)?;
        }

        Ok(deleted)
    }

    #[instrument(level = "debug", skip(self))]
    async fn delete_bucket(&self, bucket: &str) -> Result<(), DomainError> {
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| store_error("DeleteBucket", e))?;
        info!(bucket, "Deleted bucket");
        Ok(())
    }
}
