// src/application/object_store.rs
use crate::domain::{BucketStatus, DomainError, ObjectUpload, PresignedLink};
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn probe_bucket(&self, bucket: &str) -> Result<BucketStatus, DomainError>;

    /// Create a bucket in the store's configured region
    async fn create_bucket(&self, bucket: &str) -> Result<(), DomainError>;

    async fn wait_for_bucket(&self, bucket: &str, max_wait: Duration) -> Result<(), DomainError>;

    /// Names of all buckets in the account
    async fn list_buckets(&self) -> Result<Vec<String>, DomainError>;

    async fn upload(&self, upload: &ObjectUpload) -> Result<(), DomainError>;

    /// Keys of every object in the bucket, across all listing pages
    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>, DomainError>;

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<PresignedLink, DomainError>;

    /// Delete the given keys and return how many the service reported deleted
    async fn delete_objects(&self, bucket: &str, keys: &[String]) -> Result<usize, DomainError>;

    async fn delete_bucket(&self, bucket: &str) -> Result<(), DomainError>;
}
