//! Snapshot manifest.
//!
//! A small companion document that lets a downstream consumer check which
//! cutoff a snapshot was taken at and whether the bytes it received are the
//! bytes that were written.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::canonical::fingerprint_hex;
use crate::scanner::ScanResult;
use crate::types::ModDate;
use crate::DELTA_SCHEMA_VERSION;
use super::writer::{persist_atomically, KeyOrder, SnapshotStats, WriteError};

/// Description of one written snapshot.
///
/// Contains no wall-clock field, so rerunning an unchanged scan yields an
/// identical manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotManifest {
    /// Snapshot format version.
    pub schema_version: String,
    /// Cutoff the scan ran with.
    pub cutoff: ModDate,
    /// Number of author keys.
    pub author_count: usize,
    /// Number of payloads.
    pub publication_count: usize,
    /// Authors recorded with an empty list.
    pub empty_author_count: usize,
    /// Key order of the snapshot object.
    pub key_order: KeyOrder,
    /// xxh64 of the snapshot bytes.
    pub fingerprint: String,
}

impl SnapshotManifest {
    /// Describe a snapshot produced from `result`.
    pub fn new(result: &ScanResult<'_>, stats: &SnapshotStats, key_order: KeyOrder) -> Self {
        Self {
            schema_version: DELTA_SCHEMA_VERSION.to_string(),
            cutoff: result.cutoff(),
            author_count: stats.author_count,
            publication_count: stats.publication_count,
            empty_author_count: result.empty_author_count(),
            key_order,
            fingerprint: stats.fingerprint.clone(),
        }
    }

    /// Check snapshot bytes against the recorded fingerprint.
    pub fn verify(&self, snapshot: &[u8]) -> bool {
        fingerprint_hex(snapshot) == self.fingerprint
    }

    /// Conventional manifest location for a snapshot path.
    pub fn path_for(snapshot: &Path) -> PathBuf {
        let mut name = snapshot.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".manifest.json");
        snapshot.with_file_name(name)
    }

    /// Write the manifest as pretty JSON, replacing any previous file.
    pub fn write_to_path(&self, path: impl AsRef<Path>) -> Result<(), WriteError> {
        let path = path.as_ref();
        let bytes = serde_json::to_vec_pretty(self)?;
        persist_atomically(path, |file| {
            file.write_all(&bytes).map_err(|source| WriteError::Io {
                sink: path.display().to_string(),
                source,
            })
        })
    }
}
