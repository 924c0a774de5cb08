//! # dblp-delta
//!
//! Incremental "recently modified" extraction for bibliographic catalogs.
//!
//! The crate answers one question:
//!
//! > Given a cutoff date, which publications changed on or after it, grouped by author?
//!
//! ## Core Contract
//!
//! 1. Walk every author once; keep authors whose aggregated mdate is on or after the cutoff
//! 2. For each kept author, keep exactly the publications whose own mdate is on or after the cutoff
//! 3. Serialize the result as a JSON object `author id → [raw payload, ...]`
//!
//! ## Architecture
//!
//! ```text
//! Catalog → ModificationScanner → ScanResult → SnapshotWriter → bytes
//!                                                    ↓
//!                                             SnapshotManifest
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same catalog + same cutoff + same config → byte-identical snapshot
//! - Entry order is catalog order, or author-id order when configured
//! - Payloads are emitted byte-for-byte as stored in the catalog
//! - The parallel scan merges in catalog order, matching the sequential scan

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod catalog;
pub mod scanner;
pub mod snapshot;
pub mod canonical;
pub mod config;

// Re-exports
pub use types::{ModDate, DateError, AuthorId, PublicationId, Author, Publication};
pub use catalog::{Catalog, CatalogError, InMemoryCatalog, CatalogBuilder, load_catalog, load_catalog_from_path};
pub use scanner::{ModificationScanner, ScanConfig, ScanResult, AuthorDelta, ScanError};
pub use snapshot::{SnapshotWriter, WriterConfig, KeyOrder, SnapshotStats, WriteError, SnapshotManifest};
pub use canonical::{to_canonical_bytes, canonical_hash_hex, fingerprint_hex};
pub use config::{DeltaConfig, DEFAULT_OUTPUT_PATH};

/// Snapshot format version.
/// Increment on breaking changes to the snapshot or manifest layout.
pub const DELTA_SCHEMA_VERSION: &str = "1.0.0";
