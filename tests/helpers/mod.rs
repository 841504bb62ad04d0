use anyhow::{Context, Result};
use cloudnotes::application::{BucketDemoSettings, NotesDemoSettings};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// Sample notes in the load-file format; NoteId mixes numbers and numeric strings
pub const NOTES_JSON: &str = r#"[
    {"UserId": "student", "NoteId": 1, "Note": "Read the DynamoDB developer guide"},
    {"UserId": "student", "NoteId": "2", "Note": "Try a PartiQL select"},
    {"UserId": "student", "NoteId": 5, "Note": "Finish the lab"},
    {"UserId": "testuser", "NoteId": "1", "Note": "Hello world"},
    {"UserId": "newbie", "NoteId": 3, "Note": "Install the CLI"}
]"#;

pub const NOTES_CSV: &str = "UserId,NoteId,Note\nstudent,1,Read the guide\n";

/// Temporary directory holding the data files used by the walkthroughs
#[allow(dead_code)]
pub struct TestData {
    _temp_dir: TempDir,
    pub notes_json: PathBuf,
    pub notes_csv: PathBuf,
}

impl TestData {
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir().context("Failed to create temporary directory")?;

        let notes_json = temp_dir.path().join("notes.json");
        std::fs::write(&notes_json, NOTES_JSON).context("Failed to write notes.json")?;

        let notes_csv = temp_dir.path().join("notes.csv");
        std::fs::write(&notes_csv, NOTES_CSV).context("Failed to write notes.csv")?;

        Ok(Self {
            _temp_dir: temp_dir,
            notes_json,
            notes_csv,
        })
    }

    #[allow(dead_code)]
    pub fn write(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self._temp_dir.path().join(name);
        std::fs::write(&path, content)?;
        Ok(path)
    }
}

#[allow(dead_code)]
pub fn notes_settings(data_file: &Path) -> NotesDemoSettings {
    NotesDemoSettings {
        table: "Notes".to_string(),
        data_file: data_file.to_path_buf(),
        user_id: "student".to_string(),
        note_id: 5,
        page_size: 3,
        max_wait: Duration::from_secs(5),
    }
}

#[allow(dead_code)]
pub fn bucket_settings(source_file: &Path) -> BucketDemoSettings {
    BucketDemoSettings {
        bucket: "cloudnotes-test-bucket".to_string(),
        source_file: source_file.to_path_buf(),
        key: "notes.csv".to_string(),
        content_type: "text/csv".to_string(),
        metadata: BTreeMap::from([("myVal2".to_string(), "lab2-testing-upload".to_string())]),
        presign_expiry: Duration::from_secs(3600),
        max_wait: Duration::from_secs(5),
    }
}

/// Output lines written by a workflow
#[allow(dead_code)]
pub fn lines(out: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(out)
        .lines()
        .map(str::to_string)
        .collect()
}
