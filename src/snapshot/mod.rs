//! Snapshot output: the serialized author → payloads mapping and its manifest.

pub mod writer;
pub mod manifest;

pub use writer::{SnapshotWriter, WriterConfig, KeyOrder, SnapshotStats, WriteError};
pub use manifest::SnapshotManifest;
