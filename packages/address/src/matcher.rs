//! Cross-source address matching.
//!
//! Two records match when their canonical addresses are equal ignoring
//! case. An address is reported when it appears in at least two distinct
//! input collections. Empty addresses never match.

use std::collections::{BTreeMap, BTreeSet};

use lease_lens_address_models::{MatchGroup, MatchMember, MatchSet, NormalizedRecord};

/// Records indexed by lower-cased canonical address.
struct AddressIndex<'r> {
    /// Lower-cased address to (first-seen spelling, collection index, record).
    entries: BTreeMap<String, (&'r str, Vec<(usize, &'r NormalizedRecord)>)>,
}

impl<'r> AddressIndex<'r> {
    fn build<C: AsRef<[NormalizedRecord]>>(collections: &'r [C]) -> Self {
        let mut entries: BTreeMap<String, (&'r str, Vec<(usize, &'r NormalizedRecord)>)> =
            BTreeMap::new();

        for (idx, collection) in collections.iter().enumerate() {
            for record in collection.as_ref() {
                let address = record.normalized_address.as_str();
                if address.is_empty() {
                    continue;
                }
                entries
                    .entry(address.to_lowercase())
                    .or_insert_with(|| (address, Vec::new()))
                    .1
                    .push((idx, record));
            }
        }

        Self { entries }
    }

    /// Entries seen in at least two distinct collections, in key order.
    fn shared(&self) -> impl Iterator<Item = (&'r str, &[(usize, &'r NormalizedRecord)])> {
        self.entries.values().filter_map(|(display, hits)| {
            let distinct: BTreeSet<usize> = hits.iter().map(|(idx, _)| *idx).collect();
            (distinct.len() >= 2).then_some((*display, hits.as_slice()))
        })
    }
}

/// Returns `true` if at least two collections have records to compare.
fn has_enough_collections<C: AsRef<[NormalizedRecord]>>(collections: &[C]) -> bool {
    let usable = collections
        .iter()
        .filter(|c| !c.as_ref().is_empty())
        .count();
    if usable < 2 {
        log::debug!(
            "Cross-source matching needs at least two non-empty collections, got {usable}"
        );
        return false;
    }
    true
}

/// Computes the canonical addresses present in at least two collections.
///
/// Comparison is case-insensitive and the result is sorted by the
/// lower-cased address. Each address is reported in the spelling of its
/// first occurrence (earliest collection, then earliest record). Fewer than
/// two non-empty collections yields an empty set.
#[must_use]
pub fn find_matches<C: AsRef<[NormalizedRecord]>>(collections: &[C]) -> MatchSet {
    if !has_enough_collections(collections) {
        return MatchSet::default();
    }

    let index = AddressIndex::build(collections);
    MatchSet::new(index.shared().map(|(display, _)| display.to_string()).collect())
}

/// Like [`find_matches`], but returns the records behind each matched
/// address grouped by collection.
#[must_use]
pub fn match_groups<C: AsRef<[NormalizedRecord]>>(collections: &[C]) -> Vec<MatchGroup> {
    if !has_enough_collections(collections) {
        return Vec::new();
    }

    let index = AddressIndex::build(collections);
    index
        .shared()
        .map(|(display, hits)| {
            let mut members: Vec<MatchMember> = Vec::new();
            for &(idx, record) in hits {
                match members.iter_mut().find(|m| m.collection == idx) {
                    Some(member) => member.records.push(record.clone()),
                    None => members.push(MatchMember {
                        collection: idx,
                        records: vec![record.clone()],
                    }),
                }
            }
            members.sort_by_key(|m| m.collection);
            MatchGroup {
                address: display.to_string(),
                members,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use lease_lens_address_models::RawRecord;
    use serde_json::json;

    use super::*;
    use crate::normalize::AddressNormalizer;
    use crate::progress::NullProgress;

    fn rec(address: &str) -> NormalizedRecord {
        NormalizedRecord {
            fields: RawRecord::new(),
            normalized_address: address.to_string(),
        }
    }

    fn raw(value: serde_json::Value) -> RawRecord {
        match value {
            serde_json::Value::Object(map) => map,
            other => panic!("Expected object, got {other}"),
        }
    }

    #[test]
    fn matches_case_insensitively() {
        let a = vec![rec("123 Main Street")];
        let b = vec![rec("123 MAIN STREET")];
        let matches = find_matches(&[a, b]);
        assert_eq!(matches.as_slice(), ["123 Main Street"]);
    }

    #[test]
    fn excludes_empty_addresses() {
        let a = vec![rec(""), rec("1 Oak Avenue")];
        let b = vec![rec(""), rec("2 Elm Street")];
        assert!(find_matches(&[a, b]).is_empty());
    }

    #[test]
    fn degrades_with_fewer_than_two_collections() {
        let none: [Vec<NormalizedRecord>; 0] = [];
        assert!(find_matches(&none).is_empty());

        let only = vec![rec("1 Oak Avenue"), rec("1 Oak Avenue")];
        assert!(find_matches(&[only.clone()]).is_empty());
        assert!(find_matches(&[only, Vec::new()]).is_empty());
    }

    #[test]
    fn duplicates_within_one_collection_do_not_match() {
        let a = vec![rec("1 Oak Avenue"), rec("1 oak avenue")];
        let b = vec![rec("2 Elm Street")];
        assert!(find_matches(&[a, b]).is_empty());
    }

    #[test]
    fn output_is_sorted_and_deduplicated() {
        let a = vec![rec("9 Z Street"), rec("1 A Street"), rec("1 a street")];
        let b = vec![rec("1 A STREET"), rec("9 z street")];
        let matches = find_matches(&[a, b]);
        assert_eq!(matches.as_slice(), ["1 A Street", "9 Z Street"]);
    }

    #[test]
    fn matches_across_three_collections() {
        let a = vec![rec("1 Oak Avenue")];
        let b = vec![rec("2 Elm Street")];
        let c = vec![rec("2 elm street"), rec("3 Pine Road")];
        let matches = find_matches(&[a, b, c]);
        assert_eq!(matches.as_slice(), ["2 Elm Street"]);
    }

    #[test]
    fn accepts_slices() {
        let a = [rec("1 Oak Avenue")];
        let b = [rec("1 Oak Avenue")];
        let collections: [&[NormalizedRecord]; 2] = [&a, &b];
        assert_eq!(find_matches(&collections).len(), 1);
    }

    #[test]
    fn groups_records_by_collection() {
        let a = vec![rec("1 Oak Avenue")];
        let b = vec![rec("1 OAK AVENUE"), rec("1 oak avenue"), rec("5 Elm Street")];
        let groups = match_groups(&[a, b]);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].address, "1 Oak Avenue");
        assert_eq!(groups[0].members.len(), 2);
        assert_eq!(groups[0].members[0].collection, 0);
        assert_eq!(groups[0].members[0].records.len(), 1);
        assert_eq!(groups[0].members[1].collection, 1);
        assert_eq!(groups[0].members[1].records.len(), 2);
    }

    #[test]
    fn matches_normalized_sources_end_to_end() {
        let normalizer = AddressNormalizer::default();
        let reviews = normalizer.normalize_records(
            vec![raw(json!({"name": "X", "address": "200 Sage St"}))],
            "address",
            &NullProgress,
        );
        let violations = normalizer.normalize_records(
            vec![raw(json!({"case": "1", "address": "200 sage street"}))],
            "address",
            &NullProgress,
        );

        assert_eq!(reviews[0].normalized_address, "200 Sage Street");
        assert_eq!(violations[0].normalized_address, "200 Sage Street");

        let matches = find_matches(&[reviews, violations]);
        assert_eq!(matches.as_slice(), ["200 Sage Street"]);
    }
}
