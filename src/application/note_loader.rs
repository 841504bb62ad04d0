// src/application/note_loader.rs
use crate::application::NoteRepository;
use crate::domain::{DomainError, Note, NoteKey, NoteRecord};
use std::path::Path;
use tracing::{debug, info, instrument};

pub struct NoteLoader<R: NoteRepository> {
    repository: R,
}

impl<R: NoteRepository> NoteLoader<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    /// Read a JSON array of notes from `path` and write every one of them
    ///
    /// # Returns
    /// Number of notes written
    #[instrument(level = "debug", skip(self))]
    pub async fn load_file(&self, table: &str, path: &Path) -> Result<usize, DomainError> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::InvalidNote(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let notes = Note::parse_many(&content)?;
        debug!(count = notes.len(), "Parsed notes file");
        self.load(table, &notes).await
    }

    /// Write notes in order, stopping at the first failure
    pub async fn load(&self, table: &str, notes: &[Note]) -> Result<usize, DomainError> {
        for note in notes {
            self.repository.put_note(table, note).await?;
        }
        info!(table, count = notes.len(), "Loaded notes");
        Ok(notes.len())
    }

    pub async fn mark_incomplete(
        &self,
        table: &str,
        key: &NoteKey,
    ) -> Result<NoteRecord, DomainError> {
        self.repository.mark_incomplete(table, key).await
    }
}
