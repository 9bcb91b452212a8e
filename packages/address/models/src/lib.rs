#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for address normalization and cross-source matching.
//!
//! This crate contains only data types and simple conversions. It has no
//! parsing logic and no I/O; the normalization engine lives in
//! `lease_lens_address`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Name of the field attached to every normalized record.
pub const NORMALIZED_ADDRESS_FIELD: &str = "normalized_address";

/// A raw record as produced by a scraper or CSV ingest: an open-ended
/// mapping of field names to JSON values.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Label assigned to a piece of a parsed address.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(serialize_all = "PascalCase")]
pub enum ComponentKey {
    /// House number (`123`).
    StreetNumber,
    /// Letter preceding the house number (`W` in `W 123`).
    StreetNumberPrefix,
    /// Fraction or letter following the house number (`1/2`, `B`).
    StreetNumberSuffix,
    /// Directional before the street name (`N` in `N Elm Ave`).
    PreDirectional,
    /// The street name proper.
    StreetName,
    /// Street suffix (`St`, `Ave`).
    StreetType,
    /// Directional after the street type (`NW` in `Elm St NW`).
    PostDirectional,
    /// Unit designator (`Apt`, `Ste`, `#`).
    OccupancyType,
    /// Unit number (`4`, `2B`).
    OccupancyIdentifier,
    /// City or town.
    Place,
    /// State code or name.
    State,
    /// ZIP or ZIP+4.
    PostalCode,
}

impl ComponentKey {
    /// Every key, in canonical assembly order.
    pub const ALL: &[Self] = &[
        Self::StreetNumberPrefix,
        Self::StreetNumber,
        Self::StreetNumberSuffix,
        Self::PreDirectional,
        Self::StreetName,
        Self::StreetType,
        Self::PostDirectional,
        Self::OccupancyType,
        Self::OccupancyIdentifier,
        Self::Place,
        Self::State,
        Self::PostalCode,
    ];
}

/// Structured decomposition of an address string.
///
/// Each component is `None` when absent. `Some("")` (present but empty)
/// is preserved through expansion, and both are omitted on assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMap {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_number_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_number_suffix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_directional: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub street_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_directional: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupancy_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupancy_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl ComponentMap {
    const fn slot(&self, key: ComponentKey) -> &Option<String> {
        match key {
            ComponentKey::StreetNumber => &self.street_number,
            ComponentKey::StreetNumberPrefix => &self.street_number_prefix,
            ComponentKey::StreetNumberSuffix => &self.street_number_suffix,
            ComponentKey::PreDirectional => &self.pre_directional,
            ComponentKey::StreetName => &self.street_name,
            ComponentKey::StreetType => &self.street_type,
            ComponentKey::PostDirectional => &self.post_directional,
            ComponentKey::OccupancyType => &self.occupancy_type,
            ComponentKey::OccupancyIdentifier => &self.occupancy_identifier,
            ComponentKey::Place => &self.place,
            ComponentKey::State => &self.state,
            ComponentKey::PostalCode => &self.postal_code,
        }
    }

    fn slot_mut(&mut self, key: ComponentKey) -> &mut Option<String> {
        match key {
            ComponentKey::StreetNumber => &mut self.street_number,
            ComponentKey::StreetNumberPrefix => &mut self.street_number_prefix,
            ComponentKey::StreetNumberSuffix => &mut self.street_number_suffix,
            ComponentKey::PreDirectional => &mut self.pre_directional,
            ComponentKey::StreetName => &mut self.street_name,
            ComponentKey::StreetType => &mut self.street_type,
            ComponentKey::PostDirectional => &mut self.post_directional,
            ComponentKey::OccupancyType => &mut self.occupancy_type,
            ComponentKey::OccupancyIdentifier => &mut self.occupancy_identifier,
            ComponentKey::Place => &mut self.place,
            ComponentKey::State => &mut self.state,
            ComponentKey::PostalCode => &mut self.postal_code,
        }
    }

    /// Returns the raw value for `key`, which may be present but empty.
    #[must_use]
    pub fn get(&self, key: ComponentKey) -> Option<&str> {
        self.slot(key).as_deref()
    }

    /// Returns the value for `key` only if it is present and non-empty.
    #[must_use]
    pub fn non_empty(&self, key: ComponentKey) -> Option<&str> {
        self.get(key).filter(|v| !v.is_empty())
    }

    /// Sets `key` to `value`, returning the previous value if any.
    pub fn set(&mut self, key: ComponentKey, value: impl Into<String>) -> Option<String> {
        self.slot_mut(key).replace(value.into())
    }

    /// Removes `key`, returning its value if it was present.
    pub fn remove(&mut self, key: ComponentKey) -> Option<String> {
        self.slot_mut(key).take()
    }

    /// Applies `f` to the value of `key` if present (including present but
    /// empty); absent keys stay absent.
    pub fn map_value(&mut self, key: ComponentKey, f: impl FnOnce(&str) -> String) {
        let slot = self.slot_mut(key);
        if let Some(value) = slot.take() {
            *slot = Some(f(&value));
        }
    }

    /// Iterates over present components in canonical assembly order.
    pub fn iter(&self) -> impl Iterator<Item = (ComponentKey, &str)> {
        ComponentKey::ALL
            .iter()
            .filter_map(|&key| self.get(key).map(|value| (key, value)))
    }

    /// Returns `true` if no component is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// A raw record augmented with its canonical address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// The original source-defined fields.
    #[serde(flatten)]
    pub fields: RawRecord,
    /// Canonical address, empty when the input address was empty.
    #[serde(default)]
    pub normalized_address: String,
}

impl NormalizedRecord {
    /// Returns a source field as a display string.
    ///
    /// Strings are returned as-is, `null` and missing fields as `None`, and
    /// other JSON values in their compact JSON form.
    #[must_use]
    pub fn field_display(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Sorted, de-duplicated set of canonical addresses present in at least two
/// record collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchSet(Vec<String>);

impl MatchSet {
    /// Builds a match set, dropping empty strings and case-insensitive
    /// duplicates and sorting by the lower-cased form.
    ///
    /// When two entries differ only in case, the first one wins.
    #[must_use]
    pub fn new(addresses: Vec<String>) -> Self {
        let mut keyed: BTreeMap<String, String> = BTreeMap::new();
        for address in addresses {
            if address.is_empty() {
                continue;
            }
            keyed.entry(address.to_lowercase()).or_insert(address);
        }
        Self(keyed.into_values().collect())
    }

    /// Number of matched addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over the matched addresses in order.
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Returns the matched addresses as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Case-insensitive membership test.
    #[must_use]
    pub fn contains(&self, address: &str) -> bool {
        let key = address.to_lowercase();
        self.0.iter().any(|a| a.to_lowercase() == key)
    }
}

impl<'a> IntoIterator for &'a MatchSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Records from one collection that share a matched address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMember {
    /// Index of the collection in the matcher input.
    pub collection: usize,
    /// Records from that collection with the matched address.
    pub records: Vec<NormalizedRecord>,
}

/// A matched address with the records that produced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchGroup {
    /// The matched canonical address.
    pub address: String,
    /// One entry per collection that contains the address, in collection
    /// order.
    pub members: Vec<MatchMember>,
}
