// src/application/note_repository.rs
use crate::domain::{DomainError, Note, NoteKey, NoteRecord, ScanCursor};
use async_trait::async_trait;
use std::time::Duration;

/// One page of a scan plus the cursor to continue from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage {
    pub records: Vec<NoteRecord>,
    /// `None` once the whole table has been read.
    pub next: Option<ScanCursor>,
}

#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// A missing table is `Ok(false)`; any other failure is an error.
    async fn table_exists(&self, table: &str) -> Result<bool, DomainError>;

    /// Create the notes table and return the status reported at creation time
    async fn create_table(&self, table: &str) -> Result<String, DomainError>;

    async fn wait_for_table(&self, table: &str, max_wait: Duration) -> Result<(), DomainError>;

    async fn table_status(&self, table: &str) -> Result<String, DomainError>;

    async fn put_note(&self, table: &str, note: &Note) -> Result<(), DomainError>;

    /// Flag a note as incomplete and return all of its attributes after the update
    async fn mark_incomplete(&self, table: &str, key: &NoteKey)
        -> Result<NoteRecord, DomainError>;

    /// All notes of one user, projected to `NoteId` and `Note`
    async fn query_notes(&self, table: &str, user_id: &str)
        -> Result<Vec<NoteRecord>, DomainError>;

    async fn scan_page(
        &self,
        table: &str,
        page_size: u32,
        start: Option<ScanCursor>,
    ) -> Result<ScanPage, DomainError>;

    /// Point lookup through a parameterised PartiQL statement
    async fn lookup(&self, table: &str, key: &NoteKey) -> Result<Vec<NoteRecord>, DomainError>;

    async fn delete_table(&self, table: &str) -> Result<(), DomainError>;
}
