//! Author and publication records held by a catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable person identifier (the dblp `pid`, e.g. `"123/4567"`).
///
/// Implements `Ord` so snapshots can be keyed in identifier order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorId(String);

impl AuthorId {
    /// Create a new AuthorId.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuthorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AuthorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Index of a publication in a catalog's publication table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PublicationId(u32);

impl PublicationId {
    /// Create from a raw table index.
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Table index as `usize`.
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PublicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single publication record.
///
/// `mdate` is kept exactly as found in the dataset; it is interpreted only
/// when a scan needs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Record key (e.g. `"journals/cacm/Knuth74"`).
    pub key: String,
    /// Last modification date, raw.
    pub mdate: String,
    /// Opaque serialized record, passed through untouched.
    pub payload: String,
}

impl Publication {
    /// Create a new publication record.
    pub fn new(key: impl Into<String>, mdate: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            mdate: mdate.into(),
            payload: payload.into(),
        }
    }
}

/// A person in the catalog with references to their publications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Stable identifier.
    pub id: AuthorId,
    /// Maximum publication mdate at build time, raw.
    pub aggregated_mdate: String,
    /// Publications in catalog order.
    pub publications: Vec<PublicationId>,
}

impl Author {
    /// Create a new author record.
    pub fn new(id: AuthorId, aggregated_mdate: impl Into<String>, publications: Vec<PublicationId>) -> Self {
        Self {
            id,
            aggregated_mdate: aggregated_mdate.into(),
            publications,
        }
    }
}
