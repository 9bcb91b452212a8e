#![allow(clippy::too_many_lines)]
//! Street suffix, directional, and occupancy abbreviation tables.
//!
//! Every table maps a lookup key (trimmed, trailing periods stripped,
//! lowercased) to its canonical title-cased expansion. The tables are
//! built once on first use and never mutated, so they can be shared freely
//! across threads.

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Street suffix abbreviations.
///
/// Source: USPS Publication 28 (Appendix C) street suffix abbreviations.
const STREET_SUFFIXES: &[(&str, &str)] = &[
    ("aly", "Alley"),
    ("anx", "Annex"),
    ("arc", "Arcade"),
    ("av", "Avenue"),
    ("ave", "Avenue"),
    ("bch", "Beach"),
    ("bg", "Burg"),
    ("bgs", "Burgs"),
    ("blf", "Bluff"),
    ("blfs", "Bluffs"),
    ("blv", "Boulevard"),
    ("blvd", "Boulevard"),
    ("bnd", "Bend"),
    ("br", "Branch"),
    ("brg", "Bridge"),
    ("brk", "Brook"),
    ("brks", "Brooks"),
    ("btm", "Bottom"),
    ("bvd", "Boulevard"),
    ("byp", "Bypass"),
    ("byu", "Bayou"),
    ("cir", "Circle"),
    ("cirs", "Circles"),
    ("clb", "Club"),
    ("clf", "Cliff"),
    ("clfs", "Cliffs"),
    ("cmn", "Common"),
    ("cmns", "Commons"),
    ("cntr", "Center"),
    ("cor", "Corner"),
    ("cors", "Corners"),
    ("cp", "Camp"),
    ("cpe", "Cape"),
    ("cres", "Crescent"),
    ("crk", "Creek"),
    ("crse", "Course"),
    ("crst", "Crest"),
    ("cswy", "Causeway"),
    ("ct", "Court"),
    ("ctr", "Center"),
    ("cts", "Courts"),
    ("curv", "Curve"),
    ("cv", "Cove"),
    ("cvs", "Coves"),
    ("cyn", "Canyon"),
    ("dl", "Dale"),
    ("dm", "Dam"),
    ("dr", "Drive"),
    ("drs", "Drives"),
    ("drv", "Drive"),
    ("dv", "Divide"),
    ("est", "Estate"),
    ("ests", "Estates"),
    ("expy", "Expressway"),
    ("ext", "Extension"),
    ("exts", "Extensions"),
    ("fld", "Field"),
    ("flds", "Fields"),
    ("fls", "Falls"),
    ("flt", "Flat"),
    ("flts", "Flats"),
    ("frd", "Ford"),
    ("frds", "Fords"),
    ("frg", "Forge"),
    ("frgs", "Forges"),
    ("frk", "Fork"),
    ("frks", "Forks"),
    ("frst", "Forest"),
    ("fry", "Ferry"),
    ("ft", "Fort"),
    ("fwy", "Freeway"),
    ("gdn", "Garden"),
    ("gdns", "Gardens"),
    ("gln", "Glen"),
    ("glns", "Glens"),
    ("grn", "Green"),
    ("grns", "Greens"),
    ("grv", "Grove"),
    ("grvs", "Groves"),
    ("gtwy", "Gateway"),
    ("hbr", "Harbor"),
    ("hbrs", "Harbors"),
    ("hl", "Hill"),
    ("hls", "Hills"),
    ("holw", "Hollow"),
    ("hts", "Heights"),
    ("hvn", "Haven"),
    ("hwy", "Highway"),
    ("inlt", "Inlet"),
    ("is", "Island"),
    ("iss", "Islands"),
    ("jct", "Junction"),
    ("jcts", "Junctions"),
    ("knl", "Knoll"),
    ("knls", "Knolls"),
    ("ky", "Key"),
    ("kys", "Keys"),
    ("lck", "Lock"),
    ("lcks", "Locks"),
    ("ldg", "Lodge"),
    ("lf", "Loaf"),
    ("lgt", "Light"),
    ("lgts", "Lights"),
    ("lk", "Lake"),
    ("lks", "Lakes"),
    ("ln", "Lane"),
    ("lndg", "Landing"),
    ("lp", "Loop"),
    ("mdw", "Meadow"),
    ("mdws", "Meadows"),
    ("ml", "Mill"),
    ("mls", "Mills"),
    ("mnr", "Manor"),
    ("mnrs", "Manors"),
    ("msn", "Mission"),
    ("mt", "Mount"),
    ("mtn", "Mountain"),
    ("mtns", "Mountains"),
    ("nck", "Neck"),
    ("orch", "Orchard"),
    ("ovlk", "Overlook"),
    ("pass", "Pass"),
    ("pkwy", "Parkway"),
    ("pkwys", "Parkways"),
    ("pky", "Parkway"),
    ("pl", "Place"),
    ("pln", "Plain"),
    ("plns", "Plains"),
    ("plz", "Plaza"),
    ("pne", "Pine"),
    ("pnes", "Pines"),
    ("pr", "Prairie"),
    ("prt", "Port"),
    ("prts", "Ports"),
    ("psge", "Passage"),
    ("pt", "Point"),
    ("pts", "Points"),
    ("radl", "Radial"),
    ("rd", "Road"),
    ("rdg", "Ridge"),
    ("rdgs", "Ridges"),
    ("rds", "Roads"),
    ("riv", "River"),
    ("rnch", "Ranch"),
    ("rpd", "Rapid"),
    ("rpds", "Rapids"),
    ("rst", "Rest"),
    ("rte", "Route"),
    ("shl", "Shoal"),
    ("shls", "Shoals"),
    ("shr", "Shore"),
    ("shrs", "Shores"),
    ("skwy", "Skyway"),
    ("smt", "Summit"),
    ("spg", "Spring"),
    ("spgs", "Springs"),
    ("sq", "Square"),
    ("sqs", "Squares"),
    ("st", "Street"),
    ("sta", "Station"),
    ("str", "Street"),
    ("stra", "Stravenue"),
    ("strm", "Stream"),
    ("sts", "Streets"),
    ("ter", "Terrace"),
    ("tpke", "Turnpike"),
    ("trak", "Track"),
    ("trce", "Trace"),
    ("trl", "Trail"),
    ("trlr", "Trailer"),
    ("trwy", "Throughway"),
    ("tunl", "Tunnel"),
    ("un", "Union"),
    ("uns", "Unions"),
    ("via", "Viaduct"),
    ("vis", "Vista"),
    ("vl", "Ville"),
    ("vlg", "Village"),
    ("vlgs", "Villages"),
    ("vly", "Valley"),
    ("vlys", "Valleys"),
    ("vw", "View"),
    ("vws", "Views"),
    ("way", "Way"),
    ("wl", "Well"),
    ("wls", "Wells"),
    ("wy", "Way"),
    ("xing", "Crossing"),
    ("xrd", "Crossroad"),
    ("xrds", "Crossroads"),
];

const DIRECTIONALS: &[(&str, &str)] = &[
    ("e", "East"),
    ("n", "North"),
    ("ne", "Northeast"),
    ("nw", "Northwest"),
    ("s", "South"),
    ("se", "Southeast"),
    ("sw", "Southwest"),
    ("w", "West"),
];

/// Secondary unit designators (USPS Publication 28, Appendix C2) that take
/// an identifier.
const OCCUPANCIES: &[(&str, &str)] = &[
    ("#", "Unit"),
    ("apt", "Apartment"),
    ("bldg", "Building"),
    ("dept", "Department"),
    ("fl", "Floor"),
    ("hngr", "Hangar"),
    ("lot", "Lot"),
    ("ph", "Penthouse"),
    ("rm", "Room"),
    ("spc", "Space"),
    ("ste", "Suite"),
    ("unit", "Unit"),
];

/// USPS state and territory codes with their full names.
const STATES: &[(&str, &str)] = &[
    ("ak", "alaska"),
    ("al", "alabama"),
    ("ar", "arkansas"),
    ("as", "american samoa"),
    ("az", "arizona"),
    ("ca", "california"),
    ("co", "colorado"),
    ("ct", "connecticut"),
    ("dc", "district of columbia"),
    ("de", "delaware"),
    ("fl", "florida"),
    ("ga", "georgia"),
    ("gu", "guam"),
    ("hi", "hawaii"),
    ("ia", "iowa"),
    ("id", "idaho"),
    ("il", "illinois"),
    ("in", "indiana"),
    ("ks", "kansas"),
    ("ky", "kentucky"),
    ("la", "louisiana"),
    ("ma", "massachusetts"),
    ("md", "maryland"),
    ("me", "maine"),
    ("mi", "michigan"),
    ("mn", "minnesota"),
    ("mo", "missouri"),
    ("mp", "northern mariana islands"),
    ("ms", "mississippi"),
    ("mt", "montana"),
    ("nc", "north carolina"),
    ("nd", "north dakota"),
    ("ne", "nebraska"),
    ("nh", "new hampshire"),
    ("nj", "new jersey"),
    ("nm", "new mexico"),
    ("nv", "nevada"),
    ("ny", "new york"),
    ("oh", "ohio"),
    ("ok", "oklahoma"),
    ("or", "oregon"),
    ("pa", "pennsylvania"),
    ("pr", "puerto rico"),
    ("ri", "rhode island"),
    ("sc", "south carolina"),
    ("sd", "south dakota"),
    ("tn", "tennessee"),
    ("tx", "texas"),
    ("ut", "utah"),
    ("va", "virginia"),
    ("vi", "virgin islands"),
    ("vt", "vermont"),
    ("wa", "washington"),
    ("wi", "wisconsin"),
    ("wv", "west virginia"),
    ("wy", "wyoming"),
];

static STATE_CODES: LazyLock<BTreeMap<&'static str, &'static str>> =
    LazyLock::new(|| STATES.iter().copied().collect());

static STATE_NAMES: LazyLock<BTreeMap<&'static str, &'static str>> =
    LazyLock::new(|| STATES.iter().map(|&(code, name)| (name, code)).collect());

static STANDARD: LazyLock<AbbreviationTables> = LazyLock::new(|| AbbreviationTables {
    suffix: AbbreviationTable::from_pairs(STREET_SUFFIXES),
    directional: AbbreviationTable::from_pairs(DIRECTIONALS),
    occupancy: AbbreviationTable::from_pairs(OCCUPANCIES),
});

/// Converts a raw token into the form used as a table key.
///
/// `"  St. "` becomes `"st"`.
#[must_use]
pub fn lookup_key(token: &str) -> String {
    token.trim().trim_end_matches('.').to_lowercase()
}

/// An immutable abbreviation to expansion mapping.
#[derive(Debug, Clone, Default)]
pub struct AbbreviationTable {
    entries: BTreeMap<String, String>,
}

impl AbbreviationTable {
    /// Builds a table from `(abbreviation, expansion)` pairs. Keys are
    /// normalized with [`lookup_key`].
    #[must_use]
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self {
            entries: pairs
                .iter()
                .map(|&(key, value)| (lookup_key(key), value.to_string()))
                .collect(),
        }
    }

    /// Returns the canonical expansion for `token`, if it is a known
    /// abbreviation.
    #[must_use]
    pub fn lookup(&self, token: &str) -> Option<&str> {
        self.entries.get(&lookup_key(token)).map(String::as_str)
    }

    /// Returns `true` if `token` is a known abbreviation or one of the
    /// canonical expansions.
    #[must_use]
    pub fn contains(&self, token: &str) -> bool {
        let key = lookup_key(token);
        if key.is_empty() {
            return false;
        }
        self.entries.contains_key(&key)
            || self.entries.values().any(|canonical| canonical.to_lowercase() == key)
    }

    /// Returns `true` if `token` is an abbreviation that expands to a
    /// different word (`st`, but not `way`).
    #[must_use]
    pub fn is_abbreviation(&self, token: &str) -> bool {
        let key = lookup_key(token);
        self.entries
            .get(&key)
            .is_some_and(|canonical| canonical.to_lowercase() != key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// The three tables consulted during parsing and expansion.
#[derive(Debug, Clone, Default)]
pub struct AbbreviationTables {
    /// Street suffixes (`st` → `Street`).
    pub suffix: AbbreviationTable,
    /// Directionals (`n` → `North`).
    pub directional: AbbreviationTable,
    /// Occupancy designators (`apt` → `Apartment`).
    pub occupancy: AbbreviationTable,
}

impl AbbreviationTables {
    /// The process-wide USPS tables.
    #[must_use]
    pub fn standard() -> &'static Self {
        &STANDARD
    }
}

/// Returns `true` if `token` is a two-letter USPS state code or a full
/// state name (`"ca"`, `"California"`, `"new york"`).
#[must_use]
pub fn is_state(token: &str) -> bool {
    let key = lookup_key(token);
    STATE_CODES.contains_key(key.as_str()) || STATE_NAMES.contains_key(key.as_str())
}
