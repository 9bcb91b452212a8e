//! Dataset pipeline: CSV ingest, batch normalization, and cross-source
//! matching over the configured datasets.

use std::path::{Path, PathBuf};

use indicatif::MultiProgress;
use lease_lens_address::{AddressNormalizer, MatchGroup, NormalizedRecord, RawRecord};
use lease_lens_address::{find_matches, match_groups};
use lease_lens_ingest::registry::DatasetConfig;
use lease_lens_ingest::{csv_ingest, json_io};

use crate::progress::IndicatifProgress;

/// Matched addresses printed after a normalize run before eliding the rest.
const MATCH_PREVIEW: usize = 20;

/// A dataset's config together with its normalized records.
pub struct LoadedDataset {
    pub config: DatasetConfig,
    pub records: Vec<NormalizedRecord>,
}

fn resolve(data_dir: &Path, path: &Path) -> PathBuf {
    data_dir.join(path)
}

/// Reads a city violations CSV, tags each row with `city`/`state`, and
/// writes the cleaned records to `output`.
///
/// # Errors
///
/// Returns an error if the CSV cannot be read or has no address column, or
/// if the output cannot be written.
pub fn ingest_csv(
    csv: &Path,
    output: &Path,
    city: &str,
    state: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    log::info!("Reading {}", csv.display());
    let file = std::fs::File::open(csv)?;
    let records = csv_ingest::ingest_csv(file, &[("city", city), ("state", state)])?;

    json_io::save_records(output, &records)?;
    println!(
        "Saved {} violation record(s) to {}",
        records.len(),
        output.display()
    );

    Ok(())
}

/// Normalizes every selected dataset, writes each to its configured output,
/// and prints the addresses shared between datasets.
///
/// Datasets whose input file is missing or empty are skipped.
///
/// # Errors
///
/// Returns an error if no dataset had any records, or if loading or saving
/// a dataset fails.
pub fn normalize(
    multi: &MultiProgress,
    datasets: Vec<DatasetConfig>,
    data_dir: &Path,
    parallel: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut raw: Vec<(DatasetConfig, Vec<RawRecord>)> = Vec::new();
    for config in datasets {
        let records: Vec<RawRecord> = json_io::load_records(&resolve(data_dir, &config.input))?;
        if records.is_empty() {
            log::warn!("{}: no records to normalize", config.id);
            continue;
        }
        raw.push((config, records));
    }

    if raw.is_empty() {
        return Err(
            "No data files found. Run the scraper and/or `lease_lens ingest-csv` first.".into(),
        );
    }

    let normalizer = AddressNormalizer::default();
    let mut loaded = Vec::with_capacity(raw.len());

    for (config, records) in raw {
        let sample = records
            .first()
            .and_then(|r| r.get(&config.address_field))
            .map(|v| v.as_str().map_or_else(|| v.to_string(), str::to_string));

        let normalized = if parallel {
            normalizer.normalize_records_parallel(records, &config.address_field)
        } else {
            let progress =
                IndicatifProgress::records_bar(multi, &format!("Normalizing {}", config.name));
            normalizer.normalize_records(records, &config.address_field, progress.as_ref())
        };

        json_io::save_records(&resolve(data_dir, &config.output), &normalized)?;

        if let (Some(sample), Some(first)) = (sample, normalized.first()) {
            println!(
                "{}: '{sample}' -> '{}'",
                config.id, first.normalized_address
            );
        }

        loaded.push(LoadedDataset {
            config,
            records: normalized,
        });
    }

    print_match_preview(&loaded);

    Ok(())
}

fn print_match_preview(loaded: &[LoadedDataset]) {
    if loaded.len() < 2 {
        println!("\n(Cross-matching skipped: need at least two datasets loaded.)");
        return;
    }

    let collections: Vec<&[NormalizedRecord]> =
        loaded.iter().map(|d| d.records.as_slice()).collect();
    let matches = find_matches(&collections);

    println!(
        "\n{} address(es) found in more than one dataset:",
        matches.len()
    );
    for address in matches.iter().take(MATCH_PREVIEW) {
        println!("  * {address}");
    }
    if matches.len() > MATCH_PREVIEW {
        println!("  ... and {} more", matches.len() - MATCH_PREVIEW);
    }
}

/// Loads the normalized output of each dataset. Missing outputs load as
/// empty collections.
///
/// # Errors
///
/// Returns an error if an existing output file cannot be read or parsed.
pub fn load_normalized(
    datasets: Vec<DatasetConfig>,
    data_dir: &Path,
) -> Result<Vec<LoadedDataset>, Box<dyn std::error::Error>> {
    let mut loaded = Vec::with_capacity(datasets.len());
    for config in datasets {
        let records = json_io::load_records(&resolve(data_dir, &config.output))?;
        loaded.push(LoadedDataset { config, records });
    }
    Ok(loaded)
}

/// Groups the records behind every address shared between datasets.
#[must_use]
pub fn groups(loaded: &[LoadedDataset]) -> Vec<MatchGroup> {
    let collections: Vec<&[NormalizedRecord]> =
        loaded.iter().map(|d| d.records.as_slice()).collect();
    match_groups(&collections)
}
