//! JSON record files.
//!
//! Datasets are stored as a single JSON array of objects, the shape the
//! scraper and CSV ingest produce and the normalizer writes back out.

use std::fs;
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::IngestError;

/// Loads a JSON array of records from `path`.
///
/// A missing file is not an error: it logs a warning and returns an empty
/// collection so a pipeline run can proceed with the datasets it has.
///
/// # Errors
///
/// * [`IngestError::Io`] if the file exists but cannot be read
/// * [`IngestError::Json`] if the contents are not an array of `T`
pub fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, IngestError> {
    if !path.exists() {
        log::warn!("{} not found, skipping", path.display());
        return Ok(Vec::new());
    }

    let contents = fs::read_to_string(path)?;
    let records: Vec<T> = serde_json::from_str(&contents)?;
    log::info!("Loaded {} records from {}", records.len(), path.display());

    Ok(records)
}

/// Writes `records` to `path` as pretty-printed JSON, replacing any
/// existing file.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn save_records<T: Serialize>(path: &Path, records: &[T]) -> Result<(), IngestError> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    log::info!("Saved {} records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use lease_lens_address_models::{NormalizedRecord, RawRecord};
    use serde_json::{Value, json};

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lease_lens_{}_{name}", std::process::id()))
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let path = temp_path("does_not_exist.json");
        let records: Vec<RawRecord> = load_records(&path).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn saved_records_load_back() {
        let path = temp_path("normalized.json");
        let mut fields = RawRecord::new();
        fields.insert("property_name".to_string(), json!("Sage Apartments"));
        fields.insert("address".to_string(), json!("200 Sage St"));
        let records = vec![NormalizedRecord {
            fields,
            normalized_address: "200 Sage Street".to_string(),
        }];

        save_records(&path, &records).unwrap();
        let raw: Vec<RawRecord> = load_records(&path).unwrap();
        let typed: Vec<NormalizedRecord> = load_records(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(raw[0]["normalized_address"], json!("200 Sage Street"));
        assert_eq!(raw[0]["address"], json!("200 Sage St"));
        assert_eq!(typed[0].normalized_address, "200 Sage Street");
        assert_eq!(
            typed[0].fields.get("property_name"),
            Some(&json!("Sage Apartments"))
        );
    }

    #[test]
    fn non_array_contents_are_an_error() {
        let path = temp_path("object.json");
        fs::write(&path, r#"{"address": "1 Oak Ave"}"#).unwrap();
        let result: Result<Vec<Value>, _> = load_records(&path);
        fs::remove_file(&path).unwrap();

        assert!(matches!(result, Err(IngestError::Json(_))));
    }
}
