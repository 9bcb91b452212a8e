//! CSV ingestion for municipal violation exports.
//!
//! City exports name the same column a dozen different ways. Each canonical
//! field has an ordered alias list; the first alias present in the header
//! row (compared trimmed and lower-cased) wins.

use std::io;

use lease_lens_address_models::RawRecord;
use serde_json::Value;

use crate::IngestError;

/// Canonical field name for the free-text address.
pub const ADDRESS: &str = "address";
pub const VIOLATION_TYPE: &str = "violation_type";
pub const DATE: &str = "date";

/// Canonical field name to accepted header spellings, in priority order.
pub const COLUMN_ALIASES: &[(&str, &[&str])] = &[
    (
        ADDRESS,
        &[
            "address",
            "street_address",
            "location",
            "site_address",
            "violation_address",
            "property_address",
            "addr",
            "street",
            "full_address",
            "incident_address",
        ],
    ),
    (
        VIOLATION_TYPE,
        &[
            "violation_type",
            "violationtype",
            "type",
            "violation",
            "violation_description",
            "description",
            "code_violation",
            "violation_code",
            "offense",
            "category",
        ],
    ),
    (
        DATE,
        &[
            "date",
            "violation_date",
            "opened_date",
            "case_opened",
            "date_opened",
            "incident_date",
            "created_date",
            "entry_date",
            "reported_date",
            "case_date",
            "status_date",
        ],
    ),
];

/// Returns the index of the first header matching one of `aliases`.
#[must_use]
pub fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    let lowered: Vec<String> = headers.iter().map(|h| h.trim().to_lowercase()).collect();
    aliases
        .iter()
        .find_map(|alias| lowered.iter().position(|h| h == alias))
}

/// Reads a violations CSV into raw records with canonical field names.
///
/// Every record gets `address`, `violation_type` and `date` (the latter two
/// `null` when the export has no such column or the cell is blank) plus
/// each `(key, value)` in `extra_fields`. Rows with a blank address, or the
/// literal `nan`, are dropped.
///
/// # Errors
///
/// * [`IngestError::Csv`] if the input is not valid CSV
/// * [`IngestError::MissingAddressColumn`] if no header matches an address
///   alias
pub fn ingest_csv<R: io::Read>(
    reader: R,
    extra_fields: &[(&str, &str)],
) -> Result<Vec<RawRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_owned())
        .collect();

    let columns: Vec<(&str, Option<usize>)> = COLUMN_ALIASES
        .iter()
        .map(|(field, aliases)| {
            let found = find_column(&headers, aliases);
            match found {
                Some(idx) => log::info!("{field:<16} -> '{}'", headers[idx]),
                None => log::info!("{field:<16} -> NOT FOUND"),
            }
            (*field, found)
        })
        .collect();

    let Some(address_idx) = columns
        .iter()
        .find(|(field, _)| *field == ADDRESS)
        .and_then(|(_, idx)| *idx)
    else {
        return Err(IngestError::MissingAddressColumn { available: headers });
    };

    let mut records = Vec::new();
    let mut skipped = 0_usize;

    for result in reader.records() {
        let row = result?;

        let address = row.get(address_idx).unwrap_or("").trim();
        if address.is_empty() || address.eq_ignore_ascii_case("nan") {
            skipped += 1;
            continue;
        }

        let mut record = RawRecord::new();
        for (field, idx) in &columns {
            let value = idx
                .and_then(|i| row.get(i))
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map_or(Value::Null, |v| Value::String(v.to_owned()));
            record.insert((*field).to_owned(), value);
        }
        for (key, value) in extra_fields {
            record.insert((*key).to_owned(), Value::String((*value).to_owned()));
        }
        records.push(record);
    }

    log::info!(
        "Extracted {} valid records ({skipped} without an address)",
        records.len()
    );

    Ok(records)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const DAVIS: &[(&str, &str)] = &[("city", "Davis"), ("state", "CA")];

    #[test]
    fn resolves_aliased_columns() {
        let csv = "Case Number, Site_Address ,Violation Description,Opened_Date\n\
                   1,200 Sage St,Overgrown weeds,2024-01-05\n";
        let records = ingest_csv(csv.as_bytes(), DAVIS).unwrap();

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["address"], json!("200 Sage St"));
        assert_eq!(record["violation_type"], Value::Null);
        assert_eq!(record["date"], json!("2024-01-05"));
        assert_eq!(record["city"], json!("Davis"));
        assert_eq!(record["state"], json!("CA"));
        assert!(!record.contains_key("Case Number"));
    }

    #[test]
    fn first_alias_wins() {
        let headers = vec!["Location".to_string(), "ADDRESS".to_string()];
        assert_eq!(find_column(&headers, COLUMN_ALIASES[0].1), Some(1));
    }

    #[test]
    fn drops_rows_without_address() {
        let csv = "address,type,date\n\
                   ,Trash,2024-01-01\n\
                   nan,Trash,2024-01-02\n\
                   NaN,Trash,2024-01-03\n\
                   12 F St,Trash,2024-01-04\n";
        let records = ingest_csv(csv.as_bytes(), &[]).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["address"], json!("12 F St"));
        assert_eq!(records[0]["violation_type"], json!("Trash"));
    }

    #[test]
    fn blank_optional_cells_become_null() {
        let csv = "address,violation\n100 Oak Ct,\n";
        let records = ingest_csv(csv.as_bytes(), &[]).unwrap();

        assert_eq!(records[0]["violation_type"], Value::Null);
        assert_eq!(records[0]["date"], Value::Null);
    }

    #[test]
    fn short_rows_are_tolerated() {
        let csv = "address,type,date\n100 Oak Ct\n";
        let records = ingest_csv(csv.as_bytes(), &[]).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["date"], Value::Null);
    }

    #[test]
    fn missing_address_column_lists_headers() {
        let csv = "case,type\n1,Trash\n";
        let err = ingest_csv(csv.as_bytes(), &[]).unwrap_err();

        match err {
            IngestError::MissingAddressColumn { available } => {
                assert_eq!(available, vec!["case".to_string(), "type".to_string()]);
            }
            other => panic!("Expected MissingAddressColumn, got {other}"),
        }
    }

    #[test]
    fn header_only_file_yields_no_records() {
        let records = ingest_csv("address,date\n".as_bytes(), DAVIS).unwrap();
        assert!(records.is_empty());
    }
}
