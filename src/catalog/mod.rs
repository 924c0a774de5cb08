//! Read-only catalog backends.

pub mod memory;
pub mod json;

use crate::types::{Author, Publication, PublicationId, DateError};

/// Read-only view over a built catalog.
///
/// Implementations must return authors in a stable order for the lifetime
/// of the borrow; scans rely on it for deterministic output.
pub trait Catalog: Sync {
    /// All authors, in catalog order.
    fn authors(&self) -> &[Author];

    /// Look up a publication by table index.
    fn publication(&self, id: PublicationId) -> Option<&Publication>;

    /// Number of publications in the catalog.
    fn publication_count(&self) -> usize;

    /// Number of authors in the catalog.
    fn author_count(&self) -> usize {
        self.authors().len()
    }
}

/// Error type for catalog construction and loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Two publications share a key.
    #[error("duplicate publication key: {0}")]
    DuplicatePublication(String),
    /// Two authors share an identifier.
    #[error("duplicate author id: {0}")]
    DuplicateAuthor(String),
    /// Author references a publication id the table does not hold.
    #[error("author {author} references unknown publication {id}")]
    UnknownPublication {
        /// Referencing author.
        author: String,
        /// Missing id.
        id: PublicationId,
    },
    /// Author references a publication key that was never added.
    #[error("author {author} references unknown publication key {key}")]
    UnknownPublicationKey {
        /// Referencing author.
        author: String,
        /// Missing key.
        key: String,
    },
    /// Aggregate requested for an author without publications.
    #[error("cannot aggregate mdate for author {0} without publications")]
    EmptyAuthor(String),
    /// A record date could not be aggregated.
    #[error("record {record}: {source}")]
    Date {
        /// Offending record key.
        record: String,
        /// Underlying parse error.
        #[source]
        source: DateError,
    },
    /// The publication table is full.
    #[error("publication table exceeds {} entries", u32::MAX)]
    TableFull,
    /// The interchange document is not valid JSON for the catalog shape.
    #[error("catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// The catalog source could not be read.
    #[error("cannot read catalog {path}: {source}")]
    Io {
        /// Source path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

pub use memory::{InMemoryCatalog, CatalogBuilder};
pub use json::{load_catalog, load_catalog_from_path};
