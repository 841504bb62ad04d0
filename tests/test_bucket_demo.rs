mod helpers;

use anyhow::Result;
use cloudnotes::application::BucketDemo;
use cloudnotes::domain::DomainError;
use cloudnotes::util::testing::MockObjectStore;
use helpers::{bucket_settings, lines, TestData};
use std::time::Duration;

#[tokio::test]
async fn given_free_bucket_name_when_running_demo_then_runs_full_lifecycle() -> Result<()> {
    // Arrange
    let data = TestData::new()?;
    let mock = MockObjectStore::builder().with_bucket("existing-bucket").build();
    let demo = BucketDemo::new(mock.clone());
    let mut out: Vec<u8> = Vec::new();

    // Act
    demo.run(&bucket_settings(&data.notes_csv), &mut out).await?;

    // Assert
    let output = lines(&out);
    assert_eq!(output[0], "Existing Bucket Not Found, ok to proceed");
    assert_eq!(output[1], "Creating bucket");
    assert!(output.contains(&"  existing-bucket".to_string()));
    assert!(output.contains(&"  cloudnotes-test-bucket".to_string()));
    assert!(output.contains(&"Contents of bucket cloudnotes-test-bucket : ".to_string()));
    assert!(output.contains(&" - notes.csv".to_string()));
    assert!(output
        .iter()
        .any(|l| l.starts_with("Presigned url = https://") && l.contains("notes.csv")));
    let deleting = output
        .iter()
        .position(|l| l == "Deleting bucket")
        .expect("teardown announced");
    assert_eq!(
        output[deleting + 1],
        "Deleting objects in bucket: cloudnotes-test-bucket"
    );
    assert!(!mock.has_bucket("cloudnotes-test-bucket"));
    assert_eq!(
        mock.calls(),
        vec![
            "probe_bucket cloudnotes-test-bucket",
            "create_bucket cloudnotes-test-bucket",
            "wait_for_bucket cloudnotes-test-bucket",
            "list_buckets",
            "upload cloudnotes-test-bucket notes.csv",
            "list_objects cloudnotes-test-bucket",
            "presign_get cloudnotes-test-bucket notes.csv",
            "list_objects cloudnotes-test-bucket",
            "delete_objects cloudnotes-test-bucket 1",
            "delete_bucket cloudnotes-test-bucket",
        ]
    );
    Ok(())
}

#[tokio::test]
async fn given_owned_bucket_when_running_demo_then_stops_without_changes() -> Result<()> {
    // Arrange
    let data = TestData::new()?;
    let mock = MockObjectStore::builder()
        .with_object("cloudnotes-test-bucket", "keep.txt")
        .build();
    let demo = BucketDemo::new(mock.clone());
    let mut out: Vec<u8> = Vec::new();

    // Act
    let result = demo.run(&bucket_settings(&data.notes_csv), &mut out).await;

    // Assert
    let err = result.expect_err("Should refuse an existing bucket");
    assert!(matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::BucketAlreadyOwned(_))
    ));
    assert!(mock.object("cloudnotes-test-bucket", "keep.txt").is_some());
    assert!(out.is_empty());
    Ok(())
}

#[tokio::test]
async fn given_foreign_bucket_when_running_demo_then_reports_other_owner() -> Result<()> {
    // Arrange
    let data = TestData::new()?;
    let mock = MockObjectStore::builder()
        .with_foreign_bucket("cloudnotes-test-bucket")
        .build();
    let demo = BucketDemo::new(mock.clone());
    let mut out: Vec<u8> = Vec::new();

    // Act
    let result = demo.run(&bucket_settings(&data.notes_csv), &mut out).await;

    // Assert
    let err = result.expect_err("Should refuse a foreign bucket");
    assert!(matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::BucketOwnedElsewhere(_))
    ));
    assert_eq!(mock.calls(), vec!["probe_bucket cloudnotes-test-bucket"]);
    Ok(())
}

#[tokio::test]
async fn given_signing_failure_when_running_demo_then_prints_none_and_still_cleans_up() -> Result<()> {
    // Arrange
    let data = TestData::new()?;
    let mock = MockObjectStore::builder()
        .with_failure("presign_get", "credentials expired")
        .build();
    let demo = BucketDemo::new(mock.clone());
    let mut out: Vec<u8> = Vec::new();

    // Act
    demo.run(&bucket_settings(&data.notes_csv), &mut out).await?;

    // Assert
    assert!(lines(&out).contains(&"Presigned url = None".to_string()));
    assert!(!mock.has_bucket("cloudnotes-test-bucket"));
    Ok(())
}

#[tokio::test]
async fn given_cleanup_failure_when_running_demo_then_upload_kept_type_and_metadata() -> Result<()> {
    // Arrange
    let data = TestData::new()?;
    let mock = MockObjectStore::builder()
        .with_failure("delete_objects", "access denied")
        .build();
    let demo = BucketDemo::new(mock.clone());
    let mut out: Vec<u8> = Vec::new();

    // Act
    let result = demo.run(&bucket_settings(&data.notes_csv), &mut out).await;

    // Assert
    assert!(result.is_err());
    let stored = mock
        .object("cloudnotes-test-bucket", "notes.csv")
        .expect("object should survive the failed cleanup");
    assert_eq!(stored.content_type, "text/csv");
    assert_eq!(
        stored.metadata.get("myVal2").map(String::as_str),
        Some("lab2-testing-upload")
    );
    assert!(mock.has_bucket("cloudnotes-test-bucket"));
    Ok(())
}

#[tokio::test]
async fn given_out_of_range_expiry_when_running_demo_then_fails_before_creating_bucket(
) -> Result<()> {
    // Arrange
    let data = TestData::new()?;
    let mock = MockObjectStore::builder().build();
    let demo = BucketDemo::new(mock.clone());
    let mut settings = bucket_settings(&data.notes_csv);
    settings.presign_expiry = Duration::ZERO;
    let mut out: Vec<u8> = Vec::new();

    // Act
    let result = demo.run(&settings, &mut out).await;

    // Assert
    let err = result.expect_err("Should reject a zero expiry");
    assert!(matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::InvalidRequest(_))
    ));
    assert!(mock.calls().is_empty());
    assert!(!mock.has_bucket("cloudnotes-test-bucket"));
    assert!(out.is_empty());
    Ok(())
}
