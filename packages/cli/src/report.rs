//! Plain-text rendering of datasets and match reports.

use lease_lens_address::{MatchGroup, NormalizedRecord};
use lease_lens_ingest::registry::DatasetConfig;

const MISSING: &str = "-";
const ADDRESS_WIDTH: usize = 36;
const SOURCE_WIDTH: usize = 12;
const DETAIL_WIDTH: usize = 32;

/// One line of the match table: a record from the first collection holding
/// the address, paired with one record from another collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub address: String,
    pub left_source: String,
    pub left: String,
    pub right_source: String,
    pub right: String,
}

/// Joins a record's display fields, or falls back to the raw address when
/// the dataset configures none.
fn details(record: &NormalizedRecord, fields: &[String]) -> String {
    if fields.is_empty() {
        return record
            .field_display("address")
            .unwrap_or_else(|| MISSING.to_string());
    }
    fields
        .iter()
        .map(|f| {
            record
                .field_display(f)
                .unwrap_or_else(|| MISSING.to_string())
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn source_id(datasets: &[DatasetConfig], collection: usize) -> String {
    datasets
        .get(collection)
        .map_or_else(|| format!("#{collection}"), |d| d.id.clone())
}

fn display_fields(datasets: &[DatasetConfig], collection: usize) -> &[String] {
    datasets
        .get(collection)
        .map(|d| d.display_fields.as_slice())
        .unwrap_or_default()
}

/// Expands match groups into table rows. `datasets[i]` describes
/// collection `i` of the groups.
#[must_use]
pub fn match_rows(groups: &[MatchGroup], datasets: &[DatasetConfig]) -> Vec<MatchRow> {
    let mut rows = Vec::new();

    for group in groups {
        let Some((first, others)) = group.members.split_first() else {
            continue;
        };
        let left_source = source_id(datasets, first.collection);
        let left_fields = display_fields(datasets, first.collection);

        for left in &first.records {
            for other in others {
                let right_source = source_id(datasets, other.collection);
                let right_fields = display_fields(datasets, other.collection);
                for right in &other.records {
                    rows.push(MatchRow {
                        address: group.address.clone(),
                        left_source: left_source.clone(),
                        left: details(left, left_fields),
                        right_source: right_source.clone(),
                        right: details(right, right_fields),
                    });
                }
            }
        }
    }

    rows
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('~');
    out
}

/// Terminates every line, including the last, with `\n`.
fn join_lines(lines: &[String]) -> String {
    lines.iter().map(|line| format!("{line}\n")).collect()
}

/// Renders the match table followed by the
/// `"N match(es) across M address(es)"` summary.
#[must_use]
pub fn render_matches(groups: &[MatchGroup], datasets: &[DatasetConfig]) -> String {
    if groups.is_empty() {
        return "No matching addresses found between the loaded datasets.\n".to_string();
    }

    let rows = match_rows(groups, datasets);

    let mut lines = vec![
        format!(
            "{:<ADDRESS_WIDTH$} {:<SOURCE_WIDTH$} {:<DETAIL_WIDTH$} {:<SOURCE_WIDTH$} DETAILS",
            "ADDRESS", "SOURCE", "DETAILS", "SOURCE"
        ),
        "-".repeat(ADDRESS_WIDTH + DETAIL_WIDTH * 2 + SOURCE_WIDTH * 2 + 4),
    ];
    lines.extend(rows.iter().map(|row| {
        format!(
            "{:<ADDRESS_WIDTH$} {:<SOURCE_WIDTH$} {:<DETAIL_WIDTH$} {:<SOURCE_WIDTH$} {}",
            truncate(&row.address, ADDRESS_WIDTH),
            truncate(&row.left_source, SOURCE_WIDTH),
            truncate(&row.left, DETAIL_WIDTH),
            truncate(&row.right_source, SOURCE_WIDTH),
            row.right,
        )
    }));
    lines.push(String::new());
    lines.push(format!(
        "{} match(es) across {} address(es)",
        rows.len(),
        groups.len()
    ));

    join_lines(&lines)
}

/// Renders one normalized dataset as an address table.
#[must_use]
pub fn render_dataset(dataset: &DatasetConfig, records: &[NormalizedRecord]) -> String {
    let mut lines = vec![
        dataset.name.clone(),
        format!(
            "{:<ADDRESS_WIDTH$} {}",
            "ADDRESS",
            dataset.display_fields.join(" | ").to_uppercase()
        ),
        "-".repeat(ADDRESS_WIDTH + DETAIL_WIDTH + 1),
    ];
    for record in records {
        let address = if record.normalized_address.is_empty() {
            record
                .field_display(&dataset.address_field)
                .unwrap_or_else(|| MISSING.to_string())
        } else {
            record.normalized_address.clone()
        };
        let detail_text = if dataset.display_fields.is_empty() {
            String::new()
        } else {
            details(record, &dataset.display_fields)
        };
        lines.push(format!(
            "{:<ADDRESS_WIDTH$} {detail_text}",
            truncate(&address, ADDRESS_WIDTH)
        ));
    }
    lines.push(String::new());
    lines.push(format!("{} record(s)", records.len()));

    join_lines(&lines)
}

#[cfg(test)]
mod tests {
    use lease_lens_address::{MatchMember, RawRecord};
    use lease_lens_ingest::registry::all_datasets;
    use serde_json::json;

    use super::*;

    fn rec(address: &str, fields: serde_json::Value) -> NormalizedRecord {
        let fields: RawRecord = match fields {
            serde_json::Value::Object(map) => map,
            _ => RawRecord::new(),
        };
        NormalizedRecord {
            fields,
            normalized_address: address.to_string(),
        }
    }

    fn sage_group() -> MatchGroup {
        MatchGroup {
            address: "200 Sage Street".to_string(),
            members: vec![
                MatchMember {
                    collection: 0,
                    records: vec![rec(
                        "200 Sage Street",
                        json!({"property_name": "Sage Apartments", "star_rating": 4.5}),
                    )],
                },
                MatchMember {
                    collection: 1,
                    records: vec![
                        rec(
                            "200 Sage Street",
                            json!({"violation_type": "Weeds", "date": "2024-01-05"}),
                        ),
                        rec("200 Sage Street", json!({"violation_type": "Trash"})),
                    ],
                },
            ],
        }
    }

    #[test]
    fn pairs_first_collection_with_each_other_record() {
        let rows = match_rows(&[sage_group()], &all_datasets());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].address, "200 Sage Street");
        assert_eq!(rows[0].left_source, "yelp");
        assert_eq!(rows[0].left, "Sage Apartments | 4.5");
        assert_eq!(rows[0].right_source, "violations");
        assert_eq!(rows[0].right, "Weeds | 2024-01-05");
        assert_eq!(rows[1].right, "Trash | -");
    }

    #[test]
    fn unknown_collection_uses_index() {
        let rows = match_rows(&[sage_group()], &[]);
        assert_eq!(rows[0].left_source, "#0");
        assert_eq!(rows[0].right_source, "#1");
        assert_eq!(rows[0].left, "-");
    }

    #[test]
    fn summary_counts_rows_and_addresses() {
        let rendered = render_matches(&[sage_group()], &all_datasets());
        assert!(rendered.ends_with("\n\n2 match(es) across 1 address(es)\n"));
        assert_eq!(rendered.lines().count(), 2 + 2 + 2);
        assert!(rendered.lines().nth(2).unwrap().starts_with("200 Sage Street"));
    }

    #[test]
    fn empty_report_says_so() {
        let rendered = render_matches(&[], &all_datasets());
        assert!(rendered.starts_with("No matching addresses"));
    }

    #[test]
    fn truncates_long_cells() {
        assert_eq!(truncate("abcdef", 4), "abc~");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn dataset_view_prefers_normalized_address() {
        let datasets = all_datasets();
        let records = vec![
            rec("200 Sage Street", json!({"property_name": "Sage"})),
            rec("", json!({"address": "somewhere"})),
        ];
        let rendered = render_dataset(&datasets[0], &records);

        assert!(rendered.contains("200 Sage Street"));
        assert!(rendered.contains("somewhere"));
        assert!(rendered.contains("Sage | -"));
        assert!(rendered.ends_with("2 record(s)\n"));
    }
}
