// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// TOML configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub notes: NotesConfig,
    #[serde(default)]
    pub objects: ObjectsConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct AwsConfig {
    #[serde(default)]
    pub profile: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub endpoint_url: Option<String>,
    #[serde(default)]
    pub force_path_style: bool,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct NotesConfig {
    #[serde(default = "default_table")]
    pub table: String,
    #[serde(default = "default_data_file")]
    pub data_file: PathBuf,
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default = "default_note_id")]
    pub note_id: i64,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_wait_secs")]
    pub wait_secs: u64,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ObjectsConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default = "default_source_file")]
    pub source_file: PathBuf,
    #[serde(default = "default_content_type")]
    pub content_type: String,
    #[serde(default = "default_presign_secs")]
    pub presign_secs: u64,
    #[serde(default = "default_wait_secs")]
    pub wait_secs: u64,
    #[serde(default = "default_metadata")]
    pub metadata: BTreeMap<String, String>,
}

// Default value functions
fn default_table() -> String { "Notes".to_string() }
fn default_data_file() -> PathBuf { PathBuf::from("notes.json") }
fn default_user_id() -> String { "student".to_string() }
fn default_note_id() -> i64 { 5 }
fn default_page_size() -> u32 { 3 }
fn default_wait_secs() -> u64 { 120 }
fn default_bucket() -> String { "cloudnotes-demo-bucket".to_string() }
fn default_source_file() -> PathBuf { PathBuf::from("notes.csv") }
fn default_content_type() -> String { "text/csv".to_string() }
fn default_metadata() -> BTreeMap<String, String> {
    BTreeMap::from([("myVal2".to_string(), "lab2-testing-upload".to_string())])
}
fn default_presign_secs() -> u64 { 3600 }

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            table: default_table(),
            data_file: default_data_file(),
            user_id: default_user_id(),
            note_id: default_note_id(),
            page_size: default_page_size(),
            wait_secs: default_wait_secs(),
        }
    }
}

impl Default for ObjectsConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            source_file: default_source_file(),
            content_type: default_content_type(),
            presign_secs: default_presign_secs(),
            wait_secs: default_wait_secs(),
            metadata: default_metadata(),
        }
    }
}

impl Config {
    /// Load configuration from TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content)
            .context("Failed to parse TOML config")?;

        Ok(config)
    }

    /// Load an explicitly given file, or the default file if it exists, or defaults
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load(path),
                _ => Ok(Self::default()),
            },
        }
    }

    /// `<config_dir>/cloudnotes/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cloudnotes").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn given_toml_file_when_loading_then_reads_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("load_test.toml");

        let toml_content = r#"
[aws]
profile = "app-user"
region = "eu-central-1"
endpoint_url = "http://localhost:4566"
force_path_style = true

[notes]
table = "TestNotes"
data_file = "/data/notes.json"
page_size = 10

[objects]
bucket = "my-bucket-123"
presign_secs = 600

[objects.metadata]
owner = "lab"
"#;
        fs::write(&config_path, toml_content).unwrap();

        let config = Config::load(&config_path).unwrap();

        assert_eq!(config.aws.profile.as_deref(), Some("app-user"));
        assert_eq!(config.aws.region.as_deref(), Some("eu-central-1"));
        assert!(config.aws.force_path_style);
        assert_eq!(config.notes.table, "TestNotes");
        assert_eq!(config.notes.page_size, 10);
        assert_eq!(config.objects.bucket, "my-bucket-123");
        assert_eq!(config.objects.presign_secs, 600);
        assert_eq!(config.objects.metadata.get("owner").map(String::as_str), Some("lab"));
    }

    #[test]
    fn given_partial_toml_when_loading_then_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("partial.toml");

        fs::write(&config_path, "[notes]\ntable = \"Other\"\n").unwrap();

        let config = Config::load(&config_path).unwrap();

        // Specified value
        assert_eq!(config.notes.table, "Other");
        // Default values
        assert_eq!(config.notes.user_id, "student");
        assert_eq!(config.notes.note_id, 5);
        assert_eq!(config.aws.profile, None);
        assert_eq!(config.objects.content_type, "text/csv");
        assert_eq!(
            config.objects.metadata.get("myVal2").map(String::as_str),
            Some("lab2-testing-upload")
        );
    }

    #[test]
    fn given_sample_config_when_loading_then_points_at_sample_data() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/cloudnotes.toml");

        let config = Config::load(&path).unwrap();

        assert_eq!(config.notes.data_file, PathBuf::from("data/notes.json"));
        assert_eq!(config.objects.source_file, PathBuf::from("data/notes.csv"));
        assert_eq!(config.objects.presign_secs, 3600);
    }

    #[test]
    fn given_nonexistent_file_when_loading_then_returns_error() {
        let result = Config::load("/nonexistent/path/config.toml");

        assert!(result.is_err());
    }

    #[test]
    fn given_explicit_missing_file_when_resolving_then_returns_error() {
        let result = Config::resolve(Some(Path::new("/nonexistent/cloudnotes.toml")));

        assert!(result.is_err());
    }
}
