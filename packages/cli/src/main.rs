#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for LeaseLens.
//!
//! Ingests city violation CSVs, normalizes the addresses of every
//! configured dataset, and reports properties that show up in more than
//! one dataset.
//!
//! Uses `indicatif-log-bridge` (via [`progress::init_logger`]) to route
//! `log` output through `indicatif::MultiProgress` so that log lines and
//! progress bars never fight for the terminal.

mod pipeline;
mod progress;
mod report;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use lease_lens_address::{AddressNormalizer, Normalized};
use lease_lens_ingest::IngestError;
use lease_lens_ingest::registry::{DatasetConfig, all_datasets, select_datasets};

#[derive(Parser)]
#[command(
    name = "lease_lens",
    about = "Address normalization and cross-source matching for rental listings"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract address, violation type and date from a city violations CSV
    IngestCsv {
        /// CSV export to read
        csv: PathBuf,
        /// Where to write the cleaned JSON records
        #[arg(long, default_value = "city_violations_clean.json")]
        output: PathBuf,
        /// City tagged onto every record
        #[arg(long, default_value = "Davis")]
        city: String,
        /// State tagged onto every record
        #[arg(long, default_value = "CA")]
        state: String,
    },
    /// Normalize all configured datasets and cross-match their addresses
    Normalize {
        /// Comma-separated list of dataset IDs (e.g., "yelp,violations")
        #[arg(long)]
        datasets: Option<String>,
        /// Directory that dataset input and output paths are relative to
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
        /// Normalize on all cores (no progress bar)
        #[arg(long)]
        parallel: bool,
    },
    /// Show the records behind every address shared between datasets
    Matches {
        /// Comma-separated list of dataset IDs
        #[arg(long)]
        datasets: Option<String>,
        /// Directory that dataset output paths are relative to
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
    },
    /// Show the normalized records of one dataset
    Show {
        /// Dataset identifier (e.g., "yelp")
        dataset: String,
        /// Directory that dataset output paths are relative to
        #[arg(long, default_value = ".")]
        data_dir: PathBuf,
    },
    /// Print the canonical form of a single address
    Address {
        /// Free-text address (quote it)
        raw: String,
        /// Also print the parsed components
        #[arg(long)]
        components: bool,
    },
    /// List all configured datasets
    Datasets,
}

fn parse_ids(ids: Option<String>) -> Option<Vec<String>> {
    ids.map(|s| {
        s.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
}

fn selected(ids: Option<String>) -> Result<Vec<DatasetConfig>, IngestError> {
    select_datasets(parse_ids(ids).as_deref())
}

fn print_address(raw: &str, components: bool) {
    let normalizer = AddressNormalizer::default();

    match normalizer.normalize_detailed(raw) {
        Normalized::Empty => println!("(empty address)"),
        Normalized::Canonical(address) => println!("{address}"),
        Normalized::Fallback(address) => println!("{address}  (ambiguous parse, title-cased)"),
    }

    if !components {
        return;
    }

    match normalizer.components(raw) {
        Ok(map) => {
            for (key, value) in map.iter() {
                println!("  {:<22} {value}", key.as_ref());
            }
        }
        Err(e) => println!("  {e}"),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = progress::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Commands::IngestCsv {
            csv,
            output,
            city,
            state,
        } => pipeline::ingest_csv(&csv, &output, &city, &state)?,
        Commands::Normalize {
            datasets,
            data_dir,
            parallel,
        } => {
            let datasets = selected(datasets)?;
            pipeline::normalize(&multi, datasets, &data_dir, parallel)?;
        }
        Commands::Matches { datasets, data_dir } => {
            let loaded = pipeline::load_normalized(selected(datasets)?, &data_dir)?;
            let configs: Vec<DatasetConfig> = loaded.iter().map(|d| d.config.clone()).collect();
            print!("{}", report::render_matches(&pipeline::groups(&loaded), &configs));
        }
        Commands::Show { dataset, data_dir } => {
            let loaded = pipeline::load_normalized(selected(Some(dataset))?, &data_dir)?;
            for dataset in &loaded {
                print!("{}", report::render_dataset(&dataset.config, &dataset.records));
            }
        }
        Commands::Address { raw, components } => print_address(&raw, components),
        Commands::Datasets => {
            println!("{:<12} {:<8} {:<30} OUTPUT", "ID", "ENABLED", "INPUT");
            println!("{}", "-".repeat(80));
            for dataset in &all_datasets() {
                println!(
                    "{:<12} {:<8} {:<30} {}",
                    dataset.id,
                    dataset.enabled,
                    dataset.input.display(),
                    dataset.output.display()
                );
            }
        }
    }

    Ok(())
}
