mod helpers;

use anyhow::Result;
use cloudnotes::application::{NoteRepository, NotesDemo};
use cloudnotes::domain::NoteKey;
use cloudnotes::util::testing::MockNoteRepository;
use helpers::{lines, notes_settings, TestData};

#[tokio::test]
async fn given_missing_table_when_running_demo_then_creates_and_reports_status() -> Result<()> {
    // Arrange
    let data = TestData::new()?;
    let mock = MockNoteRepository::builder().build();
    let demo = NotesDemo::new(mock.clone());
    let mut out: Vec<u8> = Vec::new();

    // Act
    demo.run(&notes_settings(&data.notes_json), &mut out).await?;

    // Assert
    let output = lines(&out);
    assert_eq!(output[0], "Table does not exist - creating it");
    assert_eq!(output[1], "Table Status: CREATING");
    assert!(output.contains(&"Table Status: ACTIVE".to_string()));
    assert!(mock.has_table("Notes"));
    Ok(())
}

#[tokio::test]
async fn given_existing_table_when_running_demo_then_skips_creation() -> Result<()> {
    // Arrange
    let data = TestData::new()?;
    let mock = MockNoteRepository::builder().with_table("Notes").build();
    let demo = NotesDemo::new(mock.clone());
    let mut out: Vec<u8> = Vec::new();

    // Act
    demo.run(&notes_settings(&data.notes_json), &mut out).await?;

    // Assert
    let output = lines(&out);
    assert_eq!(output[0], "Table Status: ACTIVE");
    assert!(!mock.calls().iter().any(|c| c.starts_with("create_table")));
    Ok(())
}

#[tokio::test]
async fn given_notes_file_when_running_demo_then_flags_note_and_reads_it_back() -> Result<()> {
    // Arrange
    let data = TestData::new()?;
    let mock = MockNoteRepository::builder().with_table("Notes").build();
    let demo = NotesDemo::new(mock.clone());
    let mut out: Vec<u8> = Vec::new();

    // Act
    demo.run(&notes_settings(&data.notes_json), &mut out).await?;

    // Assert
    assert_eq!(mock.records().len(), 5);
    let flagged = mock
        .record(&NoteKey::new("student", 5))
        .expect("note 5 should exist");
    assert_eq!(flagged.get_str("Is_Incomplete"), Some("Yes"));

    let output = lines(&out);
    let flagged_line =
        r#"{"Is_Incomplete":"Yes","Note":"Finish the lab","NoteId":"5","UserId":"student"}"#;
    // After the update, in the scan and from the PartiQL lookup
    assert_eq!(output.iter().filter(|l| *l == flagged_line).count(), 3);
    // Query projection drops UserId
    assert!(output.contains(&r#"{"Note":"Try a PartiQL select","NoteId":"2"}"#.to_string()));
    Ok(())
}

#[tokio::test]
async fn given_five_notes_when_running_demo_then_scans_two_pages_of_three() -> Result<()> {
    // Arrange
    let data = TestData::new()?;
    let mock = MockNoteRepository::builder().with_table("Notes").build();
    let demo = NotesDemo::new(mock.clone());
    let mut out: Vec<u8> = Vec::new();

    // Act
    demo.run(&notes_settings(&data.notes_json), &mut out).await?;

    // Assert
    let output = lines(&out);
    assert!(output.contains(&"Starting page 1".to_string()));
    assert!(output.contains(&"Starting page 2".to_string()));
    assert!(!output.contains(&"Starting page 3".to_string()));
    let scans = mock
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("scan_page"))
        .count();
    assert_eq!(scans, 2);
    Ok(())
}

#[tokio::test]
async fn given_invalid_notes_file_when_running_demo_then_fails_before_update() -> Result<()> {
    // Arrange
    let data = TestData::new()?;
    let bad = data.write("bad.json", r#"[{"UserId": "u", "NoteId": "abc", "Note": "x"}]"#)?;
    let mock = MockNoteRepository::builder().with_table("Notes").build();
    let demo = NotesDemo::new(mock.clone());
    let mut out: Vec<u8> = Vec::new();

    // Act
    let result = demo.run(&notes_settings(&bad), &mut out).await;

    // Assert
    let err = result.expect_err("Should fail on bad NoteId");
    assert!(format!("{:#}", err).contains("record 0"));
    assert!(!mock.calls().iter().any(|c| c.starts_with("mark_incomplete")));
    Ok(())
}

#[tokio::test]
async fn given_mock_used_directly_when_table_missing_then_status_is_not_found() {
    let mock = MockNoteRepository::builder().build();

    let result = mock.table_status("Missing").await;

    assert!(result.is_err());
}
