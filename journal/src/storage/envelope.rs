//! Persisted document format
//!
//! The trip collection is written as `{"schemaVersion": 1, "trips": [...]}`.
//! Documents written before versioning are a bare JSON array of trips and
//! load as schema version 0.

use crate::config::SCHEMA_VERSION;
use crate::error::{AppError, Result};
use crate::models::Trip;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    schema_version: u32,
    trips: &'a [Trip],
}

/// Serialize the collection inside a versioned envelope
pub fn encode(trips: &[Trip]) -> Result<Vec<u8>> {
    let envelope = Envelope {
        schema_version: SCHEMA_VERSION,
        trips,
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Decode stored bytes, accepting the current envelope or a legacy array
pub fn decode(bytes: &[u8]) -> Result<Vec<Trip>> {
    let document: Value = serde_json::from_slice(bytes)?;

    let (version, trips) = match document {
        Value::Array(items) => (0, Value::Array(items)),
        Value::Object(mut fields) => {
            let version = fields
                .get("schemaVersion")
                .and_then(Value::as_u64)
                .ok_or_else(|| AppError::CorruptData("missing schemaVersion".to_string()))?;
            let trips = fields
                .remove("trips")
                .ok_or_else(|| AppError::CorruptData("missing trips".to_string()))?;
            (version, trips)
        }
        other => {
            return Err(AppError::CorruptData(format!(
                "expected a trip list, found {}",
                json_kind(&other)
            )))
        }
    };

    if version > u64::from(SCHEMA_VERSION) {
        return Err(AppError::CorruptData(format!(
            "schema version {} is newer than supported version {}",
            version, SCHEMA_VERSION
        )));
    }

    let trips: Vec<Trip> = serde_json::from_value(trips)?;

    let mut seen = HashSet::new();
    if let Some(dup) = trips.iter().find(|t| !seen.insert(t.id.as_str())) {
        return Err(AppError::CorruptData(format!("duplicate trip id {}", dup.id)));
    }

    if version < u64::from(SCHEMA_VERSION) {
        tracing::info!(
            "Loaded {} trips from schema version {}, will upgrade on next write",
            trips.len(),
            version
        );
    }

    Ok(trips)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LEGACY: &str = r##"[
        {"id":"a","destination":"Paris, France","date":"June 15-22, 2024","image":"🗼","memories":12,"gradient":["#FF6B6B","#FF8E53"],"days":7},
        {"id":"b","destination":"Tokyo, Japan","date":"March 10-20, 2024","image":"🗾","memories":24,"gradient":["#4E65FF","#92EFFD"],"days":10}
    ]"##;

    #[test]
    fn test_decodes_legacy_array() {
        let trips = decode(LEGACY.as_bytes()).unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[1].destination, "Tokyo, Japan");
    }

    #[test]
    fn test_encode_writes_versioned_envelope() {
        let trips = decode(LEGACY.as_bytes()).unwrap();
        let bytes = encode(&trips).unwrap();

        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["schemaVersion"], 1);
        assert_eq!(value["trips"].as_array().unwrap().len(), 2);

        assert_eq!(decode(&bytes).unwrap(), trips);
    }

    #[test]
    fn test_empty_list_is_not_absent() {
        assert!(decode(b"[]").unwrap().is_empty());
        assert!(decode(br#"{"schemaVersion":1,"trips":[]}"#).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(decode(b"not json"), Err(AppError::CorruptData(_))));
        assert!(matches!(decode(b"42"), Err(AppError::CorruptData(_))));
        assert!(matches!(
            decode(br#"{"trips":[]}"#),
            Err(AppError::CorruptData(_))
        ));
    }

    #[test]
    fn test_rejects_newer_schema() {
        let err = decode(br#"{"schemaVersion":2,"trips":[]}"#).unwrap_err();
        assert!(err.to_string().contains("newer"));
    }

    #[test]
    fn test_text_notes_do_not_sink_the_collection() {
        let raw = r##"[
            {"id":"a","destination":"Rome, Italy","notes":"Loved the food"},
            {"id":"b","destination":"Oslo, Norway","notes":[]}
        ]"##;

        let trips = decode(raw.as_bytes()).unwrap();
        assert_eq!(trips.len(), 2);
        assert_eq!(trips[0].description, "Loved the food");
        assert!(trips[0].notes.is_empty());
        assert_eq!(trips[1].destination, "Oslo, Norway");
    }

    #[test]
    fn test_rejects_duplicate_trip_ids() {
        let raw = br#"[{"id":"a","destination":"X"},{"id":"a","destination":"Y"}]"#;
        assert!(matches!(decode(raw), Err(AppError::CorruptData(_))));
    }
}
