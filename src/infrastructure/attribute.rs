// src/infrastructure/attribute.rs
//
// Conversions between table items and the domain types.
use crate::constants::{ATTR_IS_INCOMPLETE, ATTR_NOTE, ATTR_NOTE_ID, ATTR_USER_ID};
use crate::domain::{DomainError, Note, NoteKey, NoteRecord, ScanCursor};
use aws_sdk_dynamodb::types::AttributeValue;
use base64::engine::general_purpose::STANDARD as B64;
use base64::Engine as _;
use serde_json::Value;
use std::collections::HashMap;

pub type Item = HashMap<String, AttributeValue>;

/// Display form of a single attribute value.
///
/// Numbers keep their exact decimal text as a JSON string, sets become lists and
/// binary data is base64 encoded.
pub fn attribute_to_json(value: &AttributeValue) -> Value {
    match value {
        AttributeValue::S(s) => Value::String(s.clone()),
        AttributeValue::N(n) => Value::String(n.clone()),
        AttributeValue::Bool(b) => Value::Bool(*b),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::B(blob) => Value::String(B64.encode(blob.as_ref())),
        AttributeValue::L(list) => Value::Array(list.iter().map(attribute_to_json).collect()),
        AttributeValue::M(map) => Value::Object(
            map.iter()
                .map(|(name, v)| (name.clone(), attribute_to_json(v)))
                .collect(),
        ),
        AttributeValue::Ss(set) | AttributeValue::Ns(set) => {
            Value::Array(set.iter().cloned().map(Value::String).collect())
        }
        AttributeValue::Bs(set) => Value::Array(
            set.iter()
                .map(|blob| Value::String(B64.encode(blob.as_ref())))
                .collect(),
        ),
        _ => Value::Null,
    }
}

pub fn item_to_record(item: &Item) -> NoteRecord {
    item.iter()
        .map(|(name, value)| (name.clone(), attribute_to_json(value)))
        .collect()
}

pub fn note_to_item(note: &Note) -> Item {
    let mut item = key_to_item(&note.key());
    item.insert(ATTR_NOTE.to_string(), AttributeValue::S(note.text.clone()));
    if let Some(flag) = &note.is_incomplete {
        item.insert(ATTR_IS_INCOMPLETE.to_string(), AttributeValue::S(flag.clone()));
    }
    item
}

pub fn key_to_item(key: &NoteKey) -> Item {
    HashMap::from([
        (
            ATTR_USER_ID.to_string(),
            AttributeValue::S(key.user_id.clone()),
        ),
        (
            ATTR_NOTE_ID.to_string(),
            AttributeValue::N(key.note_id.to_string()),
        ),
    ])
}

/// A scan's `LastEvaluatedKey` as a cursor; the number text is kept verbatim.
pub fn item_to_cursor(item: &Item) -> Result<ScanCursor, DomainError> {
    let user_id = match item.get(ATTR_USER_ID) {
        Some(AttributeValue::S(s)) => s.clone(),
        other => {
            return Err(DomainError::Database(format!(
                "item key has no string {}: {:?}",
                ATTR_USER_ID, other
            )))
        }
    };
    let note_id = match item.get(ATTR_NOTE_ID) {
        Some(AttributeValue::N(n)) => n.clone(),
        other => {
            return Err(DomainError::Database(format!(
                "item key has no numeric {}: {:?}",
                ATTR_NOTE_ID, other
            )))
        }
    };
    Ok(ScanCursor { user_id, note_id })
}

/// `ExclusiveStartKey` to resume a scan from
pub fn cursor_to_item(cursor: &ScanCursor) -> Item {
    HashMap::from([
        (
            ATTR_USER_ID.to_string(),
            AttributeValue::S(cursor.user_id.clone()),
        ),
        (
            ATTR_NOTE_ID.to_string(),
            AttributeValue::N(cursor.note_id.clone()),
        ),
    ])
}
