#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset plumbing around the address engine.
//!
//! Reads municipal CSV exports into raw records ([`csv_ingest`]), loads and
//! saves JSON record files ([`json_io`]), and describes the known datasets
//! through an embedded TOML registry ([`registry`]).

pub mod csv_ingest;
pub mod json_io;
pub mod registry;

/// Errors that can occur while loading or saving datasets.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A dataset config could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// No CSV header matched any known address column name.
    #[error("Could not find an address column. Available columns: {}", .available.join(", "))]
    MissingAddressColumn {
        /// Headers present in the file.
        available: Vec<String>,
    },

    /// A dataset id was requested that the registry does not know.
    #[error("Unknown dataset: {0}")]
    UnknownDataset(String),
}
