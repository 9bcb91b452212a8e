//! Address parsing: raw string to labeled [`ComponentMap`].
//!
//! [`AddressParser`] is the seam. [`RuleParser`] is the built-in grammar:
//! it uses commas as hard boundaries when they are present, peels the ZIP
//! and state off the tail, and labels the street line with the suffix,
//! directional, and occupancy vocabularies from [`crate::synonyms`].
//!
//! The parser never guesses. When a label could go to two different
//! candidates (two streets, two places, two units) it returns
//! [`ParseError::Ambiguous`].

use std::sync::LazyLock;

use lease_lens_address_models::{ComponentKey, ComponentMap};
use regex::Regex;
use thiserror::Error;

use crate::synonyms::{self, AbbreviationTables};

/// Five-digit ZIP with optional +4.
static ZIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}(?:-\d{4})?$").expect("valid regex"));

/// House number fractions (`1/2`).
static FRACTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+/\d+$").expect("valid regex"));

/// Tokens that join two street names into an intersection.
const INTERSECTION_TOKENS: &[&str] = &["&", "and", "/", "@", "at"];

/// Errors from address parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A component label would be assigned to two different candidates.
    #[error("Ambiguous {key}: '{first}' and '{second}' are both candidates")]
    Ambiguous {
        /// The label that could not be assigned uniquely.
        key: ComponentKey,
        /// The first candidate value.
        first: String,
        /// The competing candidate value.
        second: String,
    },

    /// The input contained no tokens.
    #[error("No address tokens")]
    Empty,
}

impl ParseError {
    fn ambiguous(key: ComponentKey, first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::Ambiguous {
            key,
            first: first.into(),
            second: second.into(),
        }
    }
}

/// Decomposes a raw address string into labeled components.
///
/// Implementations must be deterministic and must fail with
/// [`ParseError::Ambiguous`] instead of mislabeling.
pub trait AddressParser: Send + Sync {
    /// Parses whitespace-cleaned address text.
    ///
    /// # Errors
    ///
    /// * [`ParseError::Ambiguous`] if a label cannot be assigned uniquely
    /// * [`ParseError::Empty`] if `raw` has no tokens
    fn parse(&self, raw: &str) -> Result<ComponentMap, ParseError>;
}

/// Deterministic rule-based US address grammar.
#[derive(Debug, Clone, Copy)]
pub struct RuleParser<'a> {
    tables: &'a AbbreviationTables,
}

impl Default for RuleParser<'static> {
    fn default() -> Self {
        Self::new(AbbreviationTables::standard())
    }
}

impl<'a> RuleParser<'a> {
    /// Creates a parser that recognizes the vocabularies in `tables`.
    #[must_use]
    pub const fn new(tables: &'a AbbreviationTables) -> Self {
        Self { tables }
    }

    fn is_directional(&self, token: &str) -> bool {
        self.tables.directional.contains(token)
    }

    fn is_suffix(&self, token: &str) -> bool {
        self.tables.suffix.contains(token)
    }

    fn is_designator(&self, token: &str) -> bool {
        self.tables.occupancy.contains(token)
    }

    /// Pops a trailing ZIP and state into `map`.
    fn take_tail(&self, segments: &mut Vec<Vec<&str>>, map: &mut ComponentMap) {
        if token_count(segments) > 1 {
            if let Some(last) = segments.last_mut() {
                if last.last().is_some_and(|t| ZIP_RE.is_match(t)) {
                    if let Some(zip) = last.pop() {
                        map.set(ComponentKey::PostalCode, zip);
                    }
                }
            }
            drop_trailing_empty(segments);
        }

        let zip_found = map.postal_code.is_some();
        for width in [2, 1] {
            if self.accepts_state(segments, width, zip_found) {
                if let Some(last) = segments.last_mut() {
                    let words = last.split_off(last.len() - width);
                    map.set(ComponentKey::State, words.join(" "));
                }
                drop_trailing_empty(segments);
                return;
            }
        }
    }

    /// Whether the last `width` tokens form a state that can be labeled
    /// as such.
    fn accepts_state(&self, segments: &[Vec<&str>], width: usize, zip_found: bool) -> bool {
        let Some(last) = segments.last() else {
            return false;
        };
        if last.len() < width {
            return false;
        }
        let words = &last[last.len() - width..];
        if !synonyms::is_state(&words.join(" ")) {
            return false;
        }

        let before = token_count(segments) - width;
        if before == 0 {
            return false;
        }
        if zip_found || segments.len() > 1 {
            return true;
        }

        // Single comma-less segment with no ZIP: `CT`, `NE`, and friends
        // double as street vocabulary.
        if before < 2 {
            return false;
        }
        if width == 2 {
            return true;
        }
        let token = words[0];
        if self.is_directional(token) {
            return false;
        }
        if !self.is_suffix(token) {
            return true;
        }
        last[..before.saturating_sub(1)]
            .iter()
            .skip(1)
            .any(|t| self.is_suffix(t))
    }

    /// Labels a comma segment after the street line as a unit or a place.
    fn take_segment(&self, segment: &[&str], map: &mut ComponentMap) -> Result<(), ParseError> {
        let first = segment[0];

        if self.is_designator(first) {
            return set_unit(map, segment, segment.len());
        }

        if starts_with_digit(first) {
            return Err(ParseError::ambiguous(
                ComponentKey::StreetNumber,
                map.street_number.clone().unwrap_or_default(),
                segment.join(" "),
            ));
        }

        if let Some(existing) = &map.place {
            return Err(ParseError::ambiguous(
                ComponentKey::Place,
                existing.clone(),
                segment.join(" "),
            ));
        }

        set_place(map, segment)
    }

    /// Labels the street line. When `allow_place` is set, trailing tokens
    /// after the street type are taken as the place.
    fn take_street(
        &self,
        tokens: &[&str],
        allow_place: bool,
        map: &mut ComponentMap,
    ) -> Result<(), ParseError> {
        if let Some(idx) = tokens
            .iter()
            .position(|t| INTERSECTION_TOKENS.contains(&t.to_lowercase().as_str()))
        {
            return Err(ParseError::ambiguous(
                ComponentKey::StreetName,
                tokens[..idx].join(" "),
                tokens[idx + 1..].join(" "),
            ));
        }

        let rest = self.take_number(tokens, map);

        let (mut street, unit) = match self.find_designator(rest) {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, &[][..]),
        };

        let mut place: &[&str] = &[];
        if unit.is_empty() {
            if allow_place {
                if let Some(end) = self.street_end(street) {
                    let mut split = end + 1;
                    if split < street.len() && self.is_directional(street[split]) {
                        split += 1;
                    }
                    place = &street[split..];
                    street = &street[..split];
                }
            }
        } else {
            if let Some(existing) = &map.occupancy_type {
                return Err(ParseError::ambiguous(
                    ComponentKey::OccupancyType,
                    unit[0],
                    existing.clone(),
                ));
            }
            if let Some(second) = unit[1..].iter().find(|t| self.is_designator(t)) {
                return Err(ParseError::ambiguous(
                    ComponentKey::OccupancyType,
                    unit[0],
                    *second,
                ));
            }
            if allow_place {
                set_unit(map, unit, 2)?;
                place = &unit[2.min(unit.len())..];
            } else {
                set_unit(map, unit, unit.len())?;
            }
        }

        self.peel_street(street, map);

        if !place.is_empty() {
            if let Some(second) = place.iter().find(|t| self.tables.suffix.is_abbreviation(t)) {
                return Err(ParseError::ambiguous(
                    ComponentKey::StreetType,
                    map.street_type.clone().unwrap_or_default(),
                    *second,
                ));
            }
            if starts_with_digit(place[0]) {
                return Err(ParseError::ambiguous(
                    ComponentKey::StreetNumber,
                    map.street_number.clone().unwrap_or_default(),
                    place.join(" "),
                ));
            }
            set_place(map, place)?;
        }

        Ok(())
    }

    /// Labels the house number prefix, number, and suffix at the start of
    /// the street line and returns the remaining tokens.
    fn take_number<'t, 's>(&self, tokens: &'t [&'s str], map: &mut ComponentMap) -> &'t [&'s str] {
        let mut rest = tokens;

        if rest.len() >= 2 && is_single_letter(rest[0]) && starts_with_digit(rest[1]) {
            map.set(ComponentKey::StreetNumberPrefix, rest[0]);
            rest = &rest[1..];
        }

        if rest.first().is_some_and(|t| starts_with_digit(t)) {
            map.set(ComponentKey::StreetNumber, rest[0]);
            rest = &rest[1..];

            if let Some(&next) = rest.first() {
                // `123 B Main St` has a letter suffix; `12 F St` is F Street.
                let letter_suffix = is_single_letter(next)
                    && !self.is_directional(next)
                    && rest.get(1).is_some_and(|t| !self.is_suffix(t));
                if FRACTION_RE.is_match(next) || letter_suffix {
                    map.set(ComponentKey::StreetNumberSuffix, next);
                    rest = &rest[1..];
                }
            }
        }

        rest
    }

    /// Index of an inline unit designator that has an identifier after it.
    fn find_designator(&self, tokens: &[&str]) -> Option<usize> {
        (1..tokens.len().saturating_sub(1)).find(|&i| {
            self.is_designator(tokens[i])
                && !(i + 2 == tokens.len() && self.is_suffix(tokens[i + 1]))
        })
    }

    /// Index of the street type that ends the street name in a comma-less
    /// address. Abbreviations win over full words.
    fn street_end(&self, tokens: &[&str]) -> Option<usize> {
        (1..tokens.len())
            .find(|&i| self.tables.suffix.is_abbreviation(tokens[i]))
            .or_else(|| {
                (1..tokens.len()).find(|&i| {
                    self.is_suffix(tokens[i])
                        && tokens.get(i + 1).is_none_or(|next| !self.is_suffix(next))
                })
            })
    }

    /// Splits directionals and the street type off the street name. Each
    /// is only peeled while at least one name token would remain.
    fn peel_street(&self, tokens: &[&str], map: &mut ComponentMap) {
        let mut name = tokens;

        if name.len() >= 2 && self.is_directional(name[name.len() - 1]) {
            map.set(ComponentKey::PostDirectional, name[name.len() - 1]);
            name = &name[..name.len() - 1];
        }
        if name.len() >= 2 && self.is_suffix(name[name.len() - 1]) {
            map.set(ComponentKey::StreetType, name[name.len() - 1]);
            name = &name[..name.len() - 1];
        }
        if name.len() >= 2 && self.is_directional(name[0]) {
            map.set(ComponentKey::PreDirectional, name[0]);
            name = &name[1..];
        }
        if !name.is_empty() {
            map.set(ComponentKey::StreetName, name.join(" "));
        }
    }
}

impl AddressParser for RuleParser<'_> {
    fn parse(&self, raw: &str) -> Result<ComponentMap, ParseError> {
        let mut segments = tokenize(raw);
        if segments.is_empty() {
            return Err(ParseError::Empty);
        }

        let mut map = ComponentMap::default();
        self.take_tail(&mut segments, &mut map);

        let mut segments = segments.into_iter();
        let street = segments.next().unwrap_or_default();
        for segment in segments.filter(|s| !s.is_empty()) {
            self.take_segment(&segment, &mut map)?;
        }

        let allow_place = map.place.is_none();
        self.take_street(&street, allow_place, &mut map)?;

        log::trace!("Parsed '{raw}' into {map:?}");
        Ok(map)
    }
}

/// Splits on commas, then whitespace. A `#` glued to an identifier
/// (`#4`) becomes two tokens. Empty segments are dropped.
fn tokenize(raw: &str) -> Vec<Vec<&str>> {
    raw.split(',')
        .map(|segment| {
            segment
                .split_whitespace()
                .flat_map(|token| match token.strip_prefix('#') {
                    Some(rest) if !rest.is_empty() => vec![&token[..1], rest],
                    _ => vec![token],
                })
                .collect::<Vec<_>>()
        })
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn token_count(segments: &[Vec<&str>]) -> usize {
    segments.iter().map(Vec::len).sum()
}

fn drop_trailing_empty(segments: &mut Vec<Vec<&str>>) {
    while segments.last().is_some_and(Vec::is_empty) {
        segments.pop();
    }
}

fn starts_with_digit(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn is_single_letter(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic()) && chars.next().is_none()
}

/// Labels `unit[0]` as the occupancy type and `unit[1..id_end]` as the
/// identifier.
fn set_unit(map: &mut ComponentMap, unit: &[&str], id_end: usize) -> Result<(), ParseError> {
    if let Some(existing) = &map.occupancy_type {
        return Err(ParseError::ambiguous(
            ComponentKey::OccupancyType,
            existing.clone(),
            unit.join(" "),
        ));
    }
    map.set(ComponentKey::OccupancyType, unit[0]);
    let id_end = id_end.min(unit.len());
    if id_end > 1 {
        map.set(ComponentKey::OccupancyIdentifier, unit[1..id_end].join(" "));
    }
    Ok(())
}

/// Labels place tokens, taking a trailing ZIP when none was found yet.
fn set_place(map: &mut ComponentMap, tokens: &[&str]) -> Result<(), ParseError> {
    let mut tokens = tokens;
    if map.postal_code.is_none() && tokens.len() > 1 && ZIP_RE.is_match(tokens[tokens.len() - 1]) {
        map.set(ComponentKey::PostalCode, tokens[tokens.len() - 1]);
        tokens = &tokens[..tokens.len() - 1];
    }

    if let Some(zip) = tokens.iter().find(|t| ZIP_RE.is_match(t)) {
        return Err(ParseError::ambiguous(
            ComponentKey::PostalCode,
            map.postal_code.clone().unwrap_or_default(),
            *zip,
        ));
    }

    if !tokens.is_empty() {
        map.set(ComponentKey::Place, tokens.join(" "));
    }
    Ok(())
}
