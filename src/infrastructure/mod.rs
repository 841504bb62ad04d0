// src/infrastructure/mod.rs
pub mod attribute;
pub mod aws;
pub mod dynamo;
pub mod s3;

pub use dynamo::DynamoNoteRepository;
pub use s3::S3ObjectStore;
