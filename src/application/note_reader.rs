// src/application/note_reader.rs
use crate::application::NoteRepository;
use crate::domain::{DomainError, NoteKey, NoteRecord};
use tracing::{debug, instrument};

/// A non-empty page of scan results, numbered from 1
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: usize,
    pub records: Vec<NoteRecord>,
}

pub struct NoteReader<R: NoteRepository> {
    repository: R,
}

impl<R: NoteRepository> NoteReader<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn query(&self, table: &str, user_id: &str) -> Result<Vec<NoteRecord>, DomainError> {
        self.repository.query_notes(table, user_id).await
    }

    pub async fn lookup(&self, table: &str, key: &NoteKey) -> Result<Vec<NoteRecord>, DomainError> {
        self.repository.lookup(table, key).await
    }

    /// Scan the whole table `page_size` items at a time
    ///
    /// The service may hand back empty pages (e.g. the final request after a full
    /// page). Those are dropped and do not consume a page number.
    #[instrument(level = "debug", skip(self))]
    pub async fn scan_pages(&self, table: &str, page_size: u32) -> Result<Vec<Page>, DomainError> {
        if page_size == 0 {
            return Err(DomainError::InvalidRequest(
                "page size must be at least 1".to_string(),
            ));
        }

        let mut pages = Vec::new();
        let mut cursor = None;
        let mut requests = 0usize;

        loop {
            let page = self.repository.scan_page(table, page_size, cursor).await?;
            requests += 1;

            if !page.records.is_empty() {
                pages.push(Page {
                    number: pages.len() + 1,
                    records: page.records,
                });
            }

            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        debug!(requests, pages = pages.len(), "Scan finished");
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ScanPage;
    use crate::domain::{Note, ScanCursor};
    use crate::util::testing::MockNoteRepository;

    fn seven_notes() -> MockNoteRepository {
        let mut builder = MockNoteRepository::builder().with_table("Notes");
        for id in 1..=7 {
            builder = builder.with_note(Note::new("student", id, format!("note {}", id)));
        }
        builder.build()
    }

    #[tokio::test]
    async fn given_seven_notes_when_scanning_by_three_then_returns_three_pages() {
        // Arrange
        let reader = NoteReader::new(seven_notes());

        // Act
        let pages = reader.scan_pages("Notes", 3).await.unwrap();

        // Assert
        let sizes: Vec<usize> = pages.iter().map(|p| p.records.len()).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
        let numbers: Vec<usize> = pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn given_empty_pages_when_scanning_then_skips_them_without_numbering() {
        // Arrange
        let record = Note::new("student", 1, "only").to_record();
        let mock = MockNoteRepository::builder()
            .with_scan_pages(vec![
                ScanPage {
                    records: vec![],
                    next: Some(ScanCursor::new("student", "0")),
                },
                ScanPage {
                    records: vec![record.clone()],
                    next: Some(ScanCursor::new("student", "1.5")),
                },
                ScanPage {
                    records: vec![],
                    next: None,
                },
            ])
            .build();
        let reader = NoteReader::new(mock.clone());

        // Act
        let pages = reader.scan_pages("Notes", 3).await.unwrap();

        // Assert
        assert_eq!(pages, vec![Page { number: 1, records: vec![record] }]);
        assert_eq!(
            mock.calls(),
            vec![
                "scan_page Notes 3 -",
                "scan_page Notes 3 student/0",
                "scan_page Notes 3 student/1.5",
            ]
        );
    }

    #[tokio::test]
    async fn given_zero_page_size_when_scanning_then_rejects_request() {
        let mock = seven_notes();
        let reader = NoteReader::new(mock.clone());

        let result = reader.scan_pages("Notes", 0).await;

        assert!(matches!(result, Err(DomainError::InvalidRequest(_))));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn given_user_when_querying_then_returns_projected_records() {
        // Arrange
        let mock = MockNoteRepository::builder()
            .with_note(Note::new("student", 1, "mine"))
            .with_note(Note::new("other", 2, "theirs"))
            .build();
        let reader = NoteReader::new(mock);

        // Act
        let records = reader.query("Notes", "student").await.unwrap();

        // Assert
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("UserId"), None);
        assert_eq!(records[0].get_str("NoteId"), Some("1"));
    }

    #[tokio::test]
    async fn given_unknown_key_when_looking_up_then_returns_no_records() {
        let reader = NoteReader::new(seven_notes());

        let records = reader
            .lookup("Notes", &NoteKey::new("student", 99))
            .await
            .unwrap();

        assert!(records.is_empty());
    }
}
