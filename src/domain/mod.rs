// src/domain/mod.rs
pub mod error;
pub mod note;
pub mod object;

pub use error::DomainError;
pub use note::{Note, NoteKey, NoteRecord, ScanCursor};
pub use object::{BucketStatus, ObjectUpload, PresignedLink};
