//! Catalog data model
//!
//! Typed records for the remote group catalog.

mod codec;

pub use codec::{DecodeError, EncodeError, decode_catalog, encode_catalog};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The decoded remote payload: group key to group record.
///
/// Ordered so listings are stable across refreshes.
pub type CatalogDocument = BTreeMap<String, Group>;

/// A downloadable release artifact.
///
/// Consumed by the download manager, not by the catalog pipeline itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    pub owner: String,
    pub repo_name: String,
    pub version: String,
    pub file_name: String,
}

/// A versioned item within a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub version: String,
    pub date: String,
    pub changelog: String,
    pub overview: String,
    pub description: String,
    pub background: String,
    pub page_background: Option<String>,
    pub variants: Option<Vec<String>>,
    pub package: Option<Package>,
}

impl Project {
    /// Parse the release date, if it is well-formed.
    pub fn release_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }
}

/// The seven hex color strings a group ships for its render palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub primary: String,
    pub secondary: String,
    pub circle1: String,
    pub circle2: String,
    pub circle3: String,
    pub circle4: String,
    pub circle5: String,
}

/// The in-testing project slot of a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BetaProject {
    pub background: String,
}

/// A top-level product line in the catalog.
///
/// Records are encoded as positional arrays, so field order here is the wire
/// contract. An empty `logo` means the group has no logo to fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub projects: Vec<Project>,
    pub beta: BetaProject,
    pub logo: String,
    /// Obsolete wire slot. Retained so the later fields keep their
    /// positions; never read.
    pub update: Option<bool>,
    pub path: String,
    pub palette: Palette,
    pub hide: Option<bool>,
}

impl Group {
    /// Whether the group is flagged out of the normal listing.
    pub fn is_hidden(&self) -> bool {
        self.hide.unwrap_or(false)
    }
}
