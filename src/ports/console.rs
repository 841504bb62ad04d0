// src/ports/console.rs
use crate::application::{Page, Provisioning};
use crate::domain::{NoteKey, NoteRecord, PresignedLink};
use anyhow::{Context, Result};
use std::io::Write;

/// Write each line followed by a newline
pub fn emit<W: Write>(out: &mut W, lines: impl IntoIterator<Item = String>) -> Result<()> {
    for line in lines {
        writeln!(out, "{}", line).context("Failed to write output")?;
    }
    Ok(())
}

/// Formats workflow results as the lines printed to stdout
#[derive(Debug, Default)]
pub struct ConsolePresenter;

impl ConsolePresenter {
    pub fn new() -> Self {
        Self
    }

    pub fn table_status(&self, status: &str) -> String {
        format!("Table Status: {}", status)
    }

    pub fn provisioning(&self, provisioning: &Provisioning) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(status) = &provisioning.creation_status {
            lines.push("Table does not exist - creating it".to_string());
            lines.push(self.table_status(status));
            lines.push("\nWaiting for the table to be available...\n".to_string());
        }
        lines.push(self.table_status(&provisioning.status));
        lines
    }

    pub fn loading(&self, table: &str, file: &str) -> String {
        format!(
            "\n Loading \"{}\" table with data from file \"{}\"\n\n",
            table, file
        )
    }

    pub fn loaded(&self, count: usize) -> String {
        format!("Loaded {} notes", count)
    }

    pub fn heading(&self, title: &str) -> String {
        format!("\n{}\n", title)
    }

    /// One JSON object per record
    pub fn records(&self, records: &[NoteRecord]) -> Vec<String> {
        records.iter().map(ToString::to_string).collect()
    }

    pub fn page(&self, page: &Page) -> Vec<String> {
        let mut lines = Vec::with_capacity(page.records.len() + 2);
        lines.push(format!("Starting page {}", page.number));
        lines.extend(self.records(&page.records));
        lines.push(format!("End of page {}\n", page.number));
        lines
    }

    pub fn bucket_names(&self, names: &[String]) -> Vec<String> {
        names.iter().map(|name| format!("  {}", name)).collect()
    }

    pub fn bucket_contents(&self, bucket: &str, keys: &[String]) -> Vec<String> {
        let mut lines = vec![format!("Contents of bucket {} : ", bucket)];
        lines.extend(keys.iter().map(|key| format!(" - {}", key)));
        lines
    }

    pub fn presigned(&self, link: Option<&PresignedLink>) -> String {
        match link {
            Some(link) => format!("Presigned url = {}", link.url),
            None => "Presigned url = None".to_string(),
        }
    }

    pub fn deleting_objects(&self, bucket: &str) -> String {
        format!("Deleting objects in bucket: {}", bucket)
    }

    pub fn deleted_objects(&self, bucket: &str, count: usize) -> String {
        format!("Deleted {} objects from bucket {}", count, bucket)
    }

    pub fn uploaded(&self, bucket: &str, key: &str) -> String {
        format!("Uploaded {} to bucket {}", key, bucket)
    }

    pub fn no_note(&self, key: &NoteKey) -> String {
        format!("No note found for {}", key)
    }

    pub fn table_deleted(&self, table: &str) -> String {
        format!("Deleted table {}", table)
    }
}
