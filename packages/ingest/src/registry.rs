//! Dataset registry, loaded from embedded TOML configs.
//!
//! Each `.toml` file in `packages/ingest/datasets/` is baked into the
//! binary via [`include_str!`]. A dataset names the raw input file, where
//! its normalized output goes, and which record fields the match report
//! shows next to an address.

use std::path::PathBuf;

use serde::Deserialize;

use crate::IngestError;

/// TOML configs embedded at compile time, in report order.
const DATASET_TOMLS: &[(&str, &str)] = &[
    ("yelp", include_str!("../datasets/yelp.toml")),
    ("violations", include_str!("../datasets/violations.toml")),
];

#[cfg(test)]
const EXPECTED_DATASET_COUNT: usize = 2;

/// One record collection the CLI knows how to normalize and match.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Short identifier used on the command line (`--datasets yelp`).
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Raw JSON records to normalize.
    pub input: PathBuf,
    /// Where the normalized records are written.
    pub output: PathBuf,
    /// Record field holding the free-text address.
    #[serde(default = "default_address_field")]
    pub address_field: String,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Record fields printed alongside matches.
    #[serde(default)]
    pub display_fields: Vec<String>,
}

fn default_address_field() -> String {
    "address".to_string()
}

const fn default_true() -> bool {
    true
}

/// Parses a single dataset config.
///
/// # Errors
///
/// Returns [`IngestError::Toml`] if the document is malformed or missing
/// required keys.
pub fn parse_dataset_toml(toml_str: &str) -> Result<DatasetConfig, IngestError> {
    Ok(toml::de::from_str(toml_str)?)
}

/// Returns all configured datasets, parsed from embedded TOML.
///
/// # Panics
///
/// Panics if any embedded config is malformed.
#[must_use]
pub fn all_datasets() -> Vec<DatasetConfig> {
    DATASET_TOMLS
        .iter()
        .map(|(name, toml)| {
            parse_dataset_toml(toml).unwrap_or_else(|e| panic!("Failed to parse {name}.toml: {e}"))
        })
        .collect()
}

/// Returns the enabled datasets, optionally restricted to the given ids.
///
/// An explicitly requested id is returned even if its config is disabled.
///
/// # Errors
///
/// Returns [`IngestError::UnknownDataset`] if a requested id is not
/// configured.
pub fn select_datasets(ids: Option<&[String]>) -> Result<Vec<DatasetConfig>, IngestError> {
    let all = all_datasets();

    let Some(ids) = ids else {
        return Ok(all.into_iter().filter(|d| d.enabled).collect());
    };

    if let Some(unknown) = ids
        .iter()
        .find(|id| !all.iter().any(|d| d.id.eq_ignore_ascii_case(id)))
    {
        return Err(IngestError::UnknownDataset(unknown.clone()));
    }

    Ok(all
        .into_iter()
        .filter(|d| ids.iter().any(|id| d.id.eq_ignore_ascii_case(id)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_all_datasets() {
        assert_eq!(all_datasets().len(), EXPECTED_DATASET_COUNT);
    }

    #[test]
    fn dataset_ids_are_unique() {
        let datasets = all_datasets();
        let mut ids: Vec<&str> = datasets.iter().map(|d| d.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), EXPECTED_DATASET_COUNT);
    }

    #[test]
    fn all_datasets_have_required_fields() {
        for dataset in &all_datasets() {
            assert!(!dataset.id.is_empty(), "dataset id is empty");
            assert!(!dataset.name.is_empty(), "{}: name is empty", dataset.id);
            assert!(
                !dataset.address_field.is_empty(),
                "{}: address_field is empty",
                dataset.id
            );
            assert_ne!(dataset.input, dataset.output, "{}", dataset.id);
        }
    }

    #[test]
    fn default_datasets_point_at_expected_files() {
        let datasets = all_datasets();
        assert_eq!(datasets[0].id, "yelp");
        assert_eq!(datasets[0].input, PathBuf::from("yelp_data.json"));
        assert_eq!(datasets[0].output, PathBuf::from("normalized_yelp.json"));
        assert_eq!(datasets[1].id, "violations");
        assert_eq!(
            datasets[1].input,
            PathBuf::from("city_violations_clean.json")
        );
        assert_eq!(
            datasets[1].display_fields,
            vec!["violation_type".to_string(), "date".to_string()]
        );
    }

    #[test]
    fn optional_keys_take_defaults() {
        let dataset = parse_dataset_toml(
            r#"
            id = "x"
            name = "X"
            input = "in.json"
            output = "out.json"
            "#,
        )
        .unwrap();
        assert_eq!(dataset.address_field, "address");
        assert!(dataset.enabled);
        assert!(dataset.display_fields.is_empty());
    }

    #[test]
    fn missing_required_key_is_an_error() {
        let err = parse_dataset_toml(r#"id = "x""#).unwrap_err();
        assert!(matches!(err, IngestError::Toml(_)));
    }

    #[test]
    fn selects_requested_ids_in_registry_order() {
        let ids = vec!["violations".to_string(), "YELP".to_string()];
        let selected = select_datasets(Some(&ids)).unwrap();
        let ids: Vec<&str> = selected.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, ["yelp", "violations"]);
    }

    #[test]
    fn selects_all_enabled_without_filter() {
        assert_eq!(select_datasets(None).unwrap().len(), EXPECTED_DATASET_COUNT);
    }

    #[test]
    fn rejects_unknown_dataset() {
        let ids = vec!["zillow".to_string()];
        let err = select_datasets(Some(&ids)).unwrap_err();
        assert!(matches!(err, IngestError::UnknownDataset(id) if id == "zillow"));
    }
}
