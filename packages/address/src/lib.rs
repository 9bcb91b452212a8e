#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address normalization and cross-source matching.
//!
//! Free-text addresses from unrelated sources (review sites, municipal
//! violation feeds) rarely agree on spelling: `"200 Sage St"` and
//! `"200 sage street"` are the same property. This crate turns each raw
//! string into one deterministic canonical form and then joins record
//! collections on it.
//!
//! The pipeline per address:
//!
//! 1. [`parser`] labels tokens into a [`ComponentMap`]
//! 2. [`expand`] expands abbreviations using the [`synonyms`] tables
//! 3. [`assemble`] joins the components in fixed order
//!
//! [`normalize::AddressNormalizer`] runs the pipeline per record and falls
//! back to title case when the parse is ambiguous.
//! [`matcher::find_matches`] then reports addresses shared by two or more
//! collections.

pub mod assemble;
pub mod expand;
pub mod matcher;
pub mod normalize;
pub mod parser;
pub mod progress;
pub mod synonyms;

pub use lease_lens_address_models::{
    ComponentKey, ComponentMap, MatchGroup, MatchMember, MatchSet, NormalizedRecord, RawRecord,
};
pub use matcher::{find_matches, match_groups};
pub use normalize::{AddressNormalizer, Normalized, normalize_address};
pub use parser::{AddressParser, ParseError, RuleParser};
