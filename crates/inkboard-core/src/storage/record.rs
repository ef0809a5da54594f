//! The persisted board record.
//!
//! ```json
//! { "version": "1.0", "strokes": [ ... ], "timestamp": "2024-05-01T12:00:00Z" }
//! ```
//!
//! Older saves are a bare array of elements, and the oldest ones have no
//! `type` on pen strokes. Both are still accepted.

use super::{StorageError, StorageResult};
use crate::shapes::Shape;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

#[cfg(target_arch = "wasm32")]
use web_time::{SystemTime, UNIX_EPOCH};
#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

pub const RECORD_VERSION: &str = "1.0";

/// Tag assumed for elements saved without one.
const LEGACY_DEFAULT_TYPE: &str = "pen";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneRecord {
    pub version: String,
    pub strokes: Vec<Shape>,
    /// RFC 3339 save time; empty for records that carried none.
    #[serde(default)]
    pub timestamp: String,
}

/// Outcome of lenient parsing.
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    pub record: SceneRecord,
    /// Elements that could not be parsed and were left out.
    pub skipped: usize,
}

fn now_utc() -> OffsetDateTime {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as i128)
        .unwrap_or_default();
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

impl SceneRecord {
    /// Wrap `strokes` in a record stamped with the current time.
    pub fn new(strokes: Vec<Shape>) -> Self {
        Self::with_time(strokes, now_utc())
    }

    pub fn with_time(strokes: Vec<Shape>, time: OffsetDateTime) -> Self {
        let timestamp = time.format(&Rfc3339).unwrap_or_else(|e| {
            log::warn!("Failed to format save timestamp: {}", e);
            String::new()
        });
        Self {
            version: RECORD_VERSION.to_string(),
            strokes,
            timestamp,
        }
    }

    pub fn to_json(&self) -> StorageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a record, dropping elements that fail to parse.
    pub fn from_json(json: &str) -> StorageResult<Self> {
        Self::parse(json).map(|parsed| parsed.record)
    }

    /// Parse a record or a bare element array.
    ///
    /// Only a document that is not JSON, or whose element list is not an
    /// array, is an error. Individual bad elements are skipped and counted.
    pub fn parse(json: &str) -> StorageResult<ParsedRecord> {
        let value: Value = serde_json::from_str(json)?;

        let (version, timestamp, elements) = match value {
            Value::Array(elements) => (RECORD_VERSION.to_string(), String::new(), elements),
            Value::Object(mut map) => {
                let version = match map.remove("version") {
                    Some(Value::String(v)) => v,
                    _ => RECORD_VERSION.to_string(),
                };
                let timestamp = match map.remove("timestamp") {
                    Some(Value::String(t)) => t,
                    _ => String::new(),
                };
                match map.remove("strokes") {
                    Some(Value::Array(elements)) => (version, timestamp, elements),
                    Some(_) => {
                        return Err(StorageError::Serialization(
                            "\"strokes\" is not an array".to_string(),
                        ));
                    }
                    None => {
                        return Err(StorageError::Serialization(
                            "missing \"strokes\" array".to_string(),
                        ));
                    }
                }
            }
            _ => {
                return Err(StorageError::Serialization(
                    "expected an object or an array".to_string(),
                ));
            }
        };

        let total = elements.len();
        let strokes: Vec<Shape> = elements
            .into_iter()
            .enumerate()
            .filter_map(|(index, element)| parse_element(index, element))
            .collect();
        let skipped = total - strokes.len();
        if skipped > 0 {
            log::warn!("Skipped {} of {} unreadable elements", skipped, total);
        }

        Ok(ParsedRecord {
            record: SceneRecord {
                version,
                strokes,
                timestamp,
            },
            skipped,
        })
    }
}

fn parse_element(index: usize, mut element: Value) -> Option<Shape> {
    let Some(map) = element.as_object_mut() else {
        log::warn!("Element {} is not an object", index);
        return None;
    };
    let untyped = match map.get("type") {
        None | Some(Value::Null) => true,
        Some(Value::String(kind)) => kind.is_empty(),
        Some(_) => false,
    };
    if untyped {
        map.insert("type".to_string(), Value::from(LEGACY_DEFAULT_TYPE));
    }

    match serde_json::from_value(element) {
        Ok(shape) => Some(shape),
        Err(e) => {
            log::warn!("Element {} could not be read: {}", index, e);
            None
        }
    }
}
