//! Abbreviation expansion over a parsed [`ComponentMap`].

use lease_lens_address_models::{ComponentKey, ComponentMap};

use crate::synonyms::{AbbreviationTable, AbbreviationTables};

/// Title-cases `text`.
///
/// A word starts at the beginning of the string or after whitespace, `-`,
/// or `/`. The first letter of each word is uppercased and every other
/// letter lowercased, so `"1ST ST"` becomes `"1st St"`.
#[must_use]
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for c in text.chars() {
        if word_start && c.is_alphabetic() {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        word_start = c.is_whitespace() || c == '-' || c == '/';
    }
    out
}

/// Expands `value` through `table`, falling back to title case on a miss.
#[must_use]
pub fn expand_value(value: &str, table: &AbbreviationTable) -> String {
    table
        .lookup(value)
        .map_or_else(|| title_case(value), str::to_string)
}

/// Returns a copy of `map` with abbreviations expanded and casing
/// normalized.
///
/// * Directionals, street type, and occupancy type go through their tables
/// * Street name and place are title-cased
/// * State is uppercased
/// * Numbers, the unit identifier, and the postal code pass through
///
/// Absent components stay absent and empty components stay empty.
#[must_use]
pub fn expand(map: &ComponentMap, tables: &AbbreviationTables) -> ComponentMap {
    let mut out = map.clone();

    out.map_value(ComponentKey::PreDirectional, |v| {
        expand_value(v, &tables.directional)
    });
    out.map_value(ComponentKey::PostDirectional, |v| {
        expand_value(v, &tables.directional)
    });
    out.map_value(ComponentKey::StreetType, |v| expand_value(v, &tables.suffix));
    out.map_value(ComponentKey::OccupancyType, |v| {
        expand_value(v, &tables.occupancy)
    });
    out.map_value(ComponentKey::StreetName, title_case);
    out.map_value(ComponentKey::Place, title_case);
    out.map_value(ComponentKey::State, str::to_uppercase);

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_cases_words() {
        assert_eq!(title_case("SAGE street"), "Sage Street");
        assert_eq!(title_case("1ST ST"), "1st St");
        assert_eq!(title_case("o'neil"), "O'neil");
        assert_eq!(title_case("winston-salem"), "Winston-Salem");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn expands_table_fields() {
        let mut map = ComponentMap::default();
        map.set(ComponentKey::PreDirectional, "n");
        map.set(ComponentKey::StreetName, "ELM");
        map.set(ComponentKey::StreetType, "Ave.");
        map.set(ComponentKey::PostDirectional, "SW");
        map.set(ComponentKey::OccupancyType, "apt");

        let out = expand(&map, AbbreviationTables::standard());
        assert_eq!(out.pre_directional.as_deref(), Some("North"));
        assert_eq!(out.street_name.as_deref(), Some("Elm"));
        assert_eq!(out.street_type.as_deref(), Some("Avenue"));
        assert_eq!(out.post_directional.as_deref(), Some("Southwest"));
        assert_eq!(out.occupancy_type.as_deref(), Some("Apartment"));
    }

    #[test]
    fn title_cases_table_misses() {
        let mut map = ComponentMap::default();
        map.set(ComponentKey::StreetType, "ESPLANADE");
        map.set(ComponentKey::OccupancyType, "SUITE");

        let out = expand(&map, AbbreviationTables::standard());
        assert_eq!(out.street_type.as_deref(), Some("Esplanade"));
        assert_eq!(out.occupancy_type.as_deref(), Some("Suite"));
    }

    #[test]
    fn cases_place_and_state() {
        let mut map = ComponentMap::default();
        map.set(ComponentKey::Place, "west sacramento");
        map.set(ComponentKey::State, "ca");

        let out = expand(&map, AbbreviationTables::standard());
        assert_eq!(out.place.as_deref(), Some("West Sacramento"));
        assert_eq!(out.state.as_deref(), Some("CA"));
    }

    #[test]
    fn passes_numbers_through() {
        let mut map = ComponentMap::default();
        map.set(ComponentKey::StreetNumber, "12b");
        map.set(ComponentKey::OccupancyIdentifier, "4c");
        map.set(ComponentKey::PostalCode, "95616-1234");

        let out = expand(&map, AbbreviationTables::standard());
        assert_eq!(out, map);
    }

    #[test]
    fn preserves_absent_and_empty() {
        let mut map = ComponentMap::default();
        map.set(ComponentKey::StreetType, "");

        let out = expand(&map, AbbreviationTables::standard());
        assert_eq!(out.street_type.as_deref(), Some(""));
        assert_eq!(out.pre_directional, None);
        assert_eq!(out.place, None);
    }

    #[test]
    fn uses_injected_tables() {
        let tables = AbbreviationTables {
            suffix: AbbreviationTable::from_pairs(&[("st", "Saint")]),
            ..AbbreviationTables::default()
        };
        let mut map = ComponentMap::default();
        map.set(ComponentKey::StreetType, "St");
        map.set(ComponentKey::PreDirectional, "N");

        let out = expand(&map, &tables);
        assert_eq!(out.street_type.as_deref(), Some("Saint"));
        assert_eq!(out.pre_directional.as_deref(), Some("N"));
    }
}
