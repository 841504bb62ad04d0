// src/application/bucket_manager.rs
use crate::application::ObjectStore;
use crate::constants::MAX_PRESIGN_EXPIRY_SECS;
use crate::domain::{BucketStatus, DomainError, ObjectUpload, PresignedLink};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

pub struct BucketManager<S: ObjectStore> {
    store: S,
}

impl<S: ObjectStore> BucketManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Succeeds only when no bucket by that name exists anywhere
    #[instrument(level = "debug", skip(self))]
    pub async fn verify_available(&self, bucket: &str) -> Result<(), DomainError> {
        match self.store.probe_bucket(bucket).await? {
            BucketStatus::Missing => {
                info!(bucket, "Existing bucket not found, ok to proceed");
                Ok(())
            }
            BucketStatus::Owned => Err(DomainError::BucketAlreadyOwned(bucket.to_string())),
            BucketStatus::Foreign => Err(DomainError::BucketOwnedElsewhere(bucket.to_string())),
        }
    }

    /// Create the bucket and wait until it is visible
    pub async fn create(&self, bucket: &str, max_wait: Duration) -> Result<(), DomainError> {
        info!(bucket, "Creating bucket");
        self.store.create_bucket(bucket).await?;
        self.store.wait_for_bucket(bucket, max_wait).await
    }

    pub async fn list_buckets(&self) -> Result<Vec<String>, DomainError> {
        self.store.list_buckets().await
    }

    pub async fn upload(&self, upload: &ObjectUpload) -> Result<(), DomainError> {
        debug!(?upload, "Uploading object");
        self.store.upload(upload).await
    }

    pub async fn list_contents(&self, bucket: &str) -> Result<Vec<String>, DomainError> {
        self.store.list_objects(bucket).await
    }

    /// A presigned URL must live between 1 second and 7 days
    pub fn check_expiry(expires_in: Duration) -> Result<(), DomainError> {
        let secs = expires_in.as_secs();
        if secs == 0 || secs > MAX_PRESIGN_EXPIRY_SECS {
            return Err(DomainError::InvalidRequest(format!(
                "presigned URL expiry must be between 1 and {} seconds, got {}",
                MAX_PRESIGN_EXPIRY_SECS, secs
            )));
        }
        Ok(())
    }

    /// Presigned GET link for `bucket/key`
    ///
    /// An expiry outside 1 second..=7 days is rejected. A signing failure is logged
    /// and reported as `Ok(None)` so the caller can carry on.
    pub async fn presign(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<Option<PresignedLink>, DomainError> {
        Self::check_expiry(expires_in)?;

        match self.store.presign_get(bucket, key, expires_in).await {
            Ok(link) => Ok(Some(link)),
            Err(e) => {
                error!(bucket, key, error = %e, "Failed to presign object");
                Ok(None)
            }
        }
    }

    /// Delete every object in the bucket and return how many were removed
    pub async fn clear(&self, bucket: &str) -> Result<usize, DomainError> {
        info!(bucket, "Deleting objects in bucket");
        let keys = self.store.list_objects(bucket).await?;
        if keys.is_empty() {
            return Ok(0);
        }
        self.store.delete_objects(bucket, &keys).await
    }

    /// Empty the bucket, then delete it
    pub async fn teardown(&self, bucket: &str) -> Result<usize, DomainError> {
        info!(bucket, "Deleting bucket");
        let deleted = self.clear(bucket).await?;
        self.store.delete_bucket(bucket).await?;
        Ok(deleted)
    }
}
