//! Canonical reassembly of expanded components.
//!
//! Output shape:
//!
//! ```text
//! {prefix} {number} {suffix} {pre-dir} {name} {type} {post-dir}, {unit type} {unit id}, {place} {state} {zip}
//! ```
//!
//! Absent and empty components are skipped along with their separators.

use lease_lens_address_models::{ComponentKey, ComponentMap};

const STREET_LINE: &[ComponentKey] = &[
    ComponentKey::StreetNumberPrefix,
    ComponentKey::StreetNumber,
    ComponentKey::StreetNumberSuffix,
    ComponentKey::PreDirectional,
    ComponentKey::StreetName,
    ComponentKey::StreetType,
    ComponentKey::PostDirectional,
];

const UNIT_LINE: &[ComponentKey] = &[
    ComponentKey::OccupancyType,
    ComponentKey::OccupancyIdentifier,
];

const PLACE_LINE: &[ComponentKey] = &[
    ComponentKey::Place,
    ComponentKey::State,
    ComponentKey::PostalCode,
];

/// Joins the non-empty `keys` of `map` with single spaces. Whitespace runs
/// inside a value are collapsed.
fn join_line(map: &ComponentMap, keys: &[ComponentKey]) -> String {
    keys.iter()
        .filter_map(|&key| map.get(key))
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Builds the canonical address string.
///
/// Returns an empty string when every component is absent or empty.
#[must_use]
pub fn assemble(map: &ComponentMap) -> String {
    [STREET_LINE, UNIT_LINE, PLACE_LINE]
        .iter()
        .map(|keys| join_line(map, keys))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(ComponentKey, &str)]) -> ComponentMap {
        let mut map = ComponentMap::default();
        for &(key, value) in pairs {
            map.set(key, value);
        }
        map
    }

    #[test]
    fn assembles_all_segments() {
        let expanded = map(&[
            (ComponentKey::StreetNumber, "123"),
            (ComponentKey::PreDirectional, "North"),
            (ComponentKey::StreetName, "Main"),
            (ComponentKey::StreetType, "Street"),
            (ComponentKey::OccupancyType, "Apartment"),
            (ComponentKey::OccupancyIdentifier, "4"),
            (ComponentKey::Place, "Davis"),
            (ComponentKey::State, "CA"),
            (ComponentKey::PostalCode, "95616"),
        ]);
        assert_eq!(
            assemble(&expanded),
            "123 North Main Street, Apartment 4, Davis CA 95616"
        );
    }

    #[test]
    fn assembles_unit_segment() {
        let expanded = map(&[
            (ComponentKey::OccupancyType, "Apartment"),
            (ComponentKey::OccupancyIdentifier, "4"),
        ]);
        assert_eq!(assemble(&expanded), "Apartment 4");
    }

    #[test]
    fn unit_with_only_identifier() {
        let expanded = map(&[
            (ComponentKey::StreetNumber, "5"),
            (ComponentKey::StreetName, "Oak"),
            (ComponentKey::OccupancyIdentifier, "B"),
        ]);
        assert_eq!(assemble(&expanded), "5 Oak, B");
    }

    #[test]
    fn omits_missing_place_line() {
        let expanded = map(&[
            (ComponentKey::StreetNumber, "200"),
            (ComponentKey::StreetName, "Sage"),
            (ComponentKey::StreetType, "Street"),
        ]);
        let out = assemble(&expanded);
        assert_eq!(out, "200 Sage Street");
        assert!(!out.ends_with(','));
        assert!(!out.contains("  "));
    }

    #[test]
    fn place_line_without_place() {
        let expanded = map(&[
            (ComponentKey::StreetName, "Main"),
            (ComponentKey::State, "CA"),
            (ComponentKey::PostalCode, "95616"),
        ]);
        assert_eq!(assemble(&expanded), "Main, CA 95616");
    }

    #[test]
    fn skips_present_but_empty() {
        let expanded = map(&[
            (ComponentKey::StreetNumber, "1"),
            (ComponentKey::PreDirectional, ""),
            (ComponentKey::StreetName, "Main"),
            (ComponentKey::OccupancyType, " "),
            (ComponentKey::Place, ""),
        ]);
        assert_eq!(assemble(&expanded), "1 Main");
    }

    #[test]
    fn collapses_inner_whitespace() {
        let expanded = map(&[(ComponentKey::StreetName, "  Spring   Valley ")]);
        assert_eq!(assemble(&expanded), "Spring Valley");
    }

    #[test]
    fn empty_map_assembles_to_empty_string() {
        assert_eq!(assemble(&ComponentMap::default()), "");
    }
}
