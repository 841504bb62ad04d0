// src/domain/object.rs
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// A local file to be stored under `bucket/key`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectUpload {
    pub bucket: String,
    pub key: String,
    pub source: PathBuf,
    pub content_type: String,
    pub metadata: BTreeMap<String, String>,
}

/// Outcome of probing a bucket name before creating it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketStatus {
    /// No bucket by that name exists anywhere.
    Missing,
    /// The bucket already exists in this account.
    Owned,
    /// Another account owns the name.
    Foreign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PresignedLink {
    pub url: String,
    pub expires_in: Duration,
}
