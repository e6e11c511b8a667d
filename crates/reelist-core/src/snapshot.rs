//! On-disk shape of a watchlist snapshot.
//!
//! Current format is a versioned envelope:
//!
//! ```json
//! {"version": 1, "entries": [{"id": 27205, "title": "Inception", "poster_path": "/x.jpg",
//!   "vote_average": 8.8, "release_date": null}]}
//! ```
//!
//! A bare JSON array of entries (the format written before versioning) is
//! still accepted and migrated to version 1 in memory.

use reelist_models::{WatchlistCollection, WatchlistEntry};
use serde::ser::Error as _;
use serde::Serialize;
use serde_json::Value;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize)]
struct Envelope<'a> {
    version: u32,
    entries: &'a WatchlistCollection,
}

/// Result of decoding a stored snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSnapshot {
    pub collection: WatchlistCollection,
    /// The bytes used the pre-versioning bare-array layout.
    pub migrated_from_legacy: bool,
    /// Entries dropped because their id appeared earlier in the snapshot.
    pub duplicates_dropped: usize,
}

/// Encode `collection` as a current-version snapshot.
///
/// Non-finite ratings are refused: JSON would store them as `null` and the
/// snapshot could not be read back.
pub fn encode(collection: &WatchlistCollection) -> Result<Vec<u8>, serde_json::Error> {
    if let Some(entry) = collection.entries().iter().find(|e| !e.vote_average.is_finite()) {
        return Err(serde_json::Error::custom(format!(
            "movie {} has a non-finite rating ({})",
            entry.id, entry.vote_average
        )));
    }
    serde_json::to_vec_pretty(&Envelope {
        version: SNAPSHOT_VERSION,
        entries: collection,
    })
}

/// Decode snapshot bytes. The error string describes why the bytes are unusable.
pub fn decode(bytes: &[u8]) -> Result<DecodedSnapshot, String> {
    let value: Value = serde_json::from_slice(bytes).map_err(|e| format!("invalid JSON: {}", e))?;

    let (entries_value, migrated_from_legacy) = match value {
        Value::Array(entries) => (Value::Array(entries), true),
        Value::Object(mut map) => {
            let version = map
                .get("version")
                .and_then(Value::as_u64)
                .ok_or_else(|| "missing or non-numeric \"version\"".to_string())?;
            if version != u64::from(SNAPSHOT_VERSION) {
                return Err(format!(
                    "unsupported snapshot version {} (this build reads version {})",
                    version, SNAPSHOT_VERSION
                ));
            }
            let entries = map
                .remove("entries")
                .ok_or_else(|| "missing \"entries\"".to_string())?;
            (entries, false)
        }
        other => return Err(format!("expected an object or array, found {}", type_name(&other))),
    };

    let entries: Vec<WatchlistEntry> =
        serde_json::from_value(entries_value).map_err(|e| format!("invalid entry: {}", e))?;
    let (collection, duplicates_dropped) = WatchlistCollection::from_entries(entries);

    Ok(DecodedSnapshot {
        collection,
        migrated_from_legacy,
        duplicates_dropped,
    })
}

fn type_name(value: &Value) -> &'static str {
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
    use chrono::NaiveDate;
    use reelist_models::MovieId;

    fn entry(id: u64) -> WatchlistEntry {
        WatchlistEntry {
            id: MovieId(id),
            title: format!("Movie {}", id),
            poster_path: format!("/{}.jpg", id),
            vote_average: 7.5,
            release_date: NaiveDate::from_ymd_opt(2001, 1, 1),
        }
    }

    #[test]
    fn test_encode_writes_versioned_envelope() {
        let (collection, _) = WatchlistCollection::from_entries(vec![entry(1)]);
        let bytes = encode(&collection).unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["version"], 1);
        assert_eq!(value["entries"][0]["id"], 1);
        assert_eq!(value["entries"][0]["release_date"], "2001-01-01");

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.collection, collection);
        assert!(!decoded.migrated_from_legacy);
    }

    #[test]
    fn test_encode_refuses_non_finite_rating() {
        let mut collection = WatchlistCollection::new();
        let mut bad = entry(7);
        bad.vote_average = f64::NAN;
        collection.insert(bad);

        let err = encode(&collection).unwrap_err();
        assert!(err.to_string().contains("movie 7"));
    }

    #[test]
    fn test_decode_legacy_array() {
        let legacy = br#"[
            {"id": 27205, "title": "Inception", "poster_path": "/i.jpg", "vote_average": 8.8, "release_date": "2010-07-15"},
            {"id": 680, "title": "Pulp Fiction", "poster_path": "/p.jpg", "vote_average": 8.5}
        ]"#;
        let decoded = decode(legacy).unwrap();
        assert!(decoded.migrated_from_legacy);
        assert_eq!(decoded.collection.ids(), vec![MovieId(27205), MovieId(680)]);
        assert_eq!(decoded.collection.get(MovieId(680)).unwrap().release_date, None);
    }

    #[test]
    fn test_decode_rejects_newer_version() {
        let err = decode(br#"{"version": 2, "entries": []}"#).unwrap_err();
        assert!(err.contains("unsupported snapshot version 2"), "{}", err);
    }

    #[test]
    fn test_decode_rejects_truncated_and_wrong_shapes() {
        assert!(decode(br#"{"version": 1, "entries": [{"id": 1, "tit"#).is_err());
        assert!(decode(b"").is_err());
        assert!(decode(b"\"watchlist\"").is_err());
        assert!(decode(br#"{"entries": []}"#).is_err());
        assert!(decode(br#"[{"id": "not-a-number", "title": "x", "poster_path": "", "vote_average": 1.0}]"#).is_err());
    }

    #[test]
    fn test_decode_collapses_duplicates() {
        let bytes = br#"{"version": 1, "entries": [
            {"id": 1, "title": "First", "poster_path": "", "vote_average": 1.0, "release_date": null},
            {"id": 1, "title": "Again", "poster_path": "", "vote_average": 2.0, "release_date": null}
        ]}"#;
        let decoded = decode(bytes).unwrap();
        assert_eq!(decoded.duplicates_dropped, 1);
        assert_eq!(decoded.collection.get(MovieId(1)).unwrap().title, "First");
    }
}
