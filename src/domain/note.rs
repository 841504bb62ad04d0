// src/domain/note.rs
use crate::constants::{ATTR_IS_INCOMPLETE, ATTR_NOTE, ATTR_NOTE_ID, ATTR_USER_ID};
use crate::domain::DomainError;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A note as written to the table.
///
/// Field names follow the table's attribute names so the load file can be
/// deserialized directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    #[serde(rename = "UserId")]
    pub user_id: String,
    #[serde(rename = "NoteId", deserialize_with = "note_id_from_number_or_string")]
    pub note_id: i64,
    #[serde(rename = "Note")]
    pub text: String,
    #[serde(
        rename = "Is_Incomplete",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub is_incomplete: Option<String>,
}

impl Note {
    pub fn new(user_id: impl Into<String>, note_id: i64, text: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            note_id,
            text: text.into(),
            is_incomplete: None,
        }
    }

    pub fn key(&self) -> NoteKey {
        NoteKey::new(self.user_id.clone(), self.note_id)
    }

    /// Parse a JSON array of notes.
    ///
    /// Each element is converted on its own so a bad record is reported by position.
    pub fn parse_many(json: &str) -> Result<Vec<Note>, DomainError> {
        let values: Vec<Value> = serde_json::from_str(json)
            .map_err(|e| DomainError::InvalidNote(format!("expected a JSON array: {}", e)))?;

        values
            .into_iter()
            .enumerate()
            .map(|(idx, value)| {
                serde_json::from_value(value)
                    .map_err(|e| DomainError::InvalidNote(format!("record {}: {}", idx, e)))
            })
            .collect()
    }

    /// Render the note the way a full-item read returns it.
    pub fn to_record(&self) -> NoteRecord {
        let mut record = NoteRecord::new();
        record.insert(ATTR_USER_ID, Value::String(self.user_id.clone()));
        record.insert(ATTR_NOTE_ID, Value::String(self.note_id.to_string()));
        record.insert(ATTR_NOTE, Value::String(self.text.clone()));
        if let Some(flag) = &self.is_incomplete {
            record.insert(ATTR_IS_INCOMPLETE, Value::String(flag.clone()));
        }
        record
    }
}

fn note_id_from_number_or_string<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(i64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::Text(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| de::Error::custom(format!("NoteId {:?} is not an integer", s))),
    }
}

/// Compound primary key: partition key `UserId`, sort key `NoteId`.
///
/// Also used as the continuation cursor of a paginated scan.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NoteKey {
    pub user_id: String,
    pub note_id: i64,
}

impl NoteKey {
    pub fn new(user_id: impl Into<String>, note_id: i64) -> Self {
        Self {
            user_id: user_id.into(),
            note_id,
        }
    }
}

impl fmt::Display for NoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.note_id)
    }
}

/// Where a paginated scan continues.
///
/// Key values keep the text the table sent back, so a key that is not an `i64`
/// (decimals, wider numbers) still resumes the scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCursor {
    pub user_id: String,
    pub note_id: String,
}

impl ScanCursor {
    pub fn new(user_id: impl Into<String>, note_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            note_id: note_id.into(),
        }
    }
}

impl From<&NoteKey> for ScanCursor {
    fn from(key: &NoteKey) -> Self {
        Self::new(key.user_id.clone(), key.note_id.to_string())
    }
}

impl fmt::Display for ScanCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.user_id, self.note_id)
    }
}

/// An item read back from the table.
///
/// Projections can drop attributes, so reads yield records rather than [`Note`]s.
/// Values are already in display form: numbers are kept as their decimal text.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NoteRecord(Map<String, Value>);

impl NoteRecord {
    pub fn new() -> Self {
        Self(Map::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.0.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keep only the named attributes.
    pub fn project(&self, names: &[&str]) -> NoteRecord {
        let mut projected = NoteRecord::new();
        for name in names {
            if let Some(value) = self.0.get(*name) {
                projected.insert(*name, value.clone());
            }
        }
        projected
    }
}

impl FromIterator<(String, Value)> for NoteRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl fmt::Display for NoteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Value::Object(self.0.clone()))
    }
}
