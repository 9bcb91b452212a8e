//! Record normalization: parse, expand, assemble.
//!
//! [`AddressNormalizer`] is a pure function of the raw address and the
//! abbreviation tables it was built with. It holds no mutable state and is
//! `Send + Sync`, so records can be normalized independently, in any order,
//! on any thread.

use std::sync::LazyLock;

use lease_lens_address_models::{
    ComponentMap, NORMALIZED_ADDRESS_FIELD, NormalizedRecord, RawRecord,
};
use rayon::prelude::*;
use regex::Regex;

use crate::assemble::assemble;
use crate::expand::{expand, title_case};
use crate::parser::{AddressParser, ParseError, RuleParser};
use crate::progress::ProgressCallback;
use crate::synonyms::AbbreviationTables;

/// Regex to collapse runs of whitespace into a single space.
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Collapses whitespace runs and strips any mix of leading or trailing
/// whitespace and commas.
#[must_use]
pub fn clean_whitespace(text: &str) -> String {
    WHITESPACE_RE
        .replace_all(text, " ")
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
}

/// Outcome of normalizing one raw address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// The input was empty or whitespace only.
    Empty,
    /// Full parse, expand, and assemble pipeline.
    Canonical(String),
    /// The parse was ambiguous; this is the title-cased cleaned input and
    /// is not guaranteed to be in canonical form.
    Fallback(String),
}

impl Normalized {
    /// The normalized address text (empty for [`Normalized::Empty`]).
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Canonical(s) | Self::Fallback(s) => s,
        }
    }

    /// Consumes the outcome, returning the address text.
    #[must_use]
    pub fn into_string(self) -> String {
        match self {
            Self::Empty => String::new(),
            Self::Canonical(s) | Self::Fallback(s) => s,
        }
    }

    /// Returns `true` if the ambiguous-parse fallback was used.
    #[must_use]
    pub const fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback(_))
    }
}

/// Parses, expands, and reassembles addresses into canonical form.
#[derive(Debug, Clone)]
pub struct AddressNormalizer<'a, P = RuleParser<'a>> {
    parser: P,
    tables: &'a AbbreviationTables,
}

impl Default for AddressNormalizer<'static> {
    fn default() -> Self {
        Self::new(RuleParser::default(), AbbreviationTables::standard())
    }
}

impl<'a, P: AddressParser> AddressNormalizer<'a, P> {
    /// Creates a normalizer from a parser and the tables used to expand its
    /// output.
    #[must_use]
    pub const fn new(parser: P, tables: &'a AbbreviationTables) -> Self {
        Self { parser, tables }
    }

    /// Parses and expands `raw` without assembling it.
    ///
    /// # Errors
    ///
    /// Returns the parser's error if `raw` cannot be labeled uniquely.
    pub fn components(&self, raw: &str) -> Result<ComponentMap, ParseError> {
        let cleaned = clean_whitespace(raw);
        let parsed = self.parser.parse(&cleaned)?;
        Ok(expand(&parsed, self.tables))
    }

    /// Normalizes one raw address, reporting which path produced it.
    #[must_use]
    pub fn normalize_detailed(&self, raw: &str) -> Normalized {
        if raw.trim().is_empty() {
            return Normalized::Empty;
        }

        let cleaned = clean_whitespace(raw);
        if cleaned.is_empty() {
            return Normalized::Empty;
        }

        match self.parser.parse(&cleaned) {
            Ok(parsed) => Normalized::Canonical(assemble(&expand(&parsed, self.tables))),
            Err(ParseError::Empty) => Normalized::Empty,
            Err(e) => {
                log::debug!("Falling back to title case for '{cleaned}': {e}");
                Normalized::Fallback(title_case(&cleaned))
            }
        }
    }

    /// Normalizes one raw address to its canonical string.
    ///
    /// Empty input yields an empty string, never an error.
    #[must_use]
    pub fn normalize(&self, raw: &str) -> String {
        self.normalize_detailed(raw).into_string()
    }

    fn normalize_record_detailed(
        &self,
        mut record: RawRecord,
        address_field: &str,
    ) -> (NormalizedRecord, bool) {
        let raw = raw_address(&record, address_field);
        let normalized = self.normalize_detailed(&raw);
        let fallback = normalized.is_fallback();

        record.remove(NORMALIZED_ADDRESS_FIELD);
        (
            NormalizedRecord {
                fields: record,
                normalized_address: normalized.into_string(),
            },
            fallback,
        )
    }

    /// Attaches the canonical form of `record[address_field]` to `record`.
    ///
    /// A missing or `null` address field is treated as empty. A stale
    /// `normalized_address` field on the input is replaced.
    #[must_use]
    pub fn normalize_record(&self, record: RawRecord, address_field: &str) -> NormalizedRecord {
        self.normalize_record_detailed(record, address_field).0
    }

    /// Normalizes a collection in order, reporting progress per record.
    #[must_use]
    pub fn normalize_records(
        &self,
        records: Vec<RawRecord>,
        address_field: &str,
        progress: &dyn ProgressCallback,
    ) -> Vec<NormalizedRecord> {
        progress.set_total(records.len() as u64);

        let mut fallbacks = 0usize;
        let normalized: Vec<NormalizedRecord> = records
            .into_iter()
            .map(|record| {
                let (record, fallback) = self.normalize_record_detailed(record, address_field);
                if fallback {
                    fallbacks += 1;
                }
                progress.inc(1);
                record
            })
            .collect();

        log::debug!(
            "Normalized {} record(s), {fallbacks} via ambiguous-parse fallback",
            normalized.len()
        );
        progress.finish(format!("Normalized {} record(s)", normalized.len()));

        normalized
    }

    /// Normalizes a collection across the rayon thread pool. Output order
    /// matches input order.
    #[must_use]
    pub fn normalize_records_parallel(
        &self,
        records: Vec<RawRecord>,
        address_field: &str,
    ) -> Vec<NormalizedRecord> {
        records
            .into_par_iter()
            .map(|record| self.normalize_record(record, address_field))
            .collect()
    }
}

/// Normalizes `raw` with the built-in parser and USPS tables.
#[must_use]
pub fn normalize_address(raw: &str) -> String {
    AddressNormalizer::default().normalize(raw)
}

/// Reads the raw address text from a record. Missing and `null` fields are
/// empty; non-string values use their JSON text.
fn raw_address(record: &RawRecord, address_field: &str) -> String {
    match record.get(address_field) {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
