// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Table not found: {0}")]
    TableNotFound(String),
    #[error("Bucket {0} has already been created in your account, nothing further to do")]
    BucketAlreadyOwned(String),
    #[error("Bucket {0} is owned by another AWS account, choose a different name")]
    BucketOwnedElsewhere(String),
    #[error("Invalid note: {0}")]
    InvalidNote(String),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Object store error: {0}")]
    ObjectStore(String),
}
