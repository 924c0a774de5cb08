//! Run configuration.
//!
//! Every knob of an extraction run lives here and is handed to the scanner
//! and writer explicitly.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::canonical::canonical_hash_hex;
use crate::scanner::ScanConfig;
use crate::snapshot::{KeyOrder, WriterConfig};

/// Default snapshot location, relative to the working directory.
pub const DEFAULT_OUTPUT_PATH: &str = "data/recentlyModified.json";

/// Configuration for one extraction run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaConfig {
    /// Where the snapshot is written.
    pub output_path: PathBuf,
    /// Key order of the snapshot object.
    pub key_order: KeyOrder,
    /// Indent the snapshot.
    pub pretty: bool,
    /// Scan authors on the rayon pool.
    pub parallel: bool,
    /// Author count at which the parallel path kicks in.
    pub parallel_threshold: usize,
    /// Also write `<output>.manifest.json`.
    pub write_manifest: bool,
}

impl Default for DeltaConfig {
    fn default() -> Self {
        let scan = ScanConfig::default();
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            key_order: KeyOrder::default(),
            pretty: false,
            parallel: scan.parallel,
            parallel_threshold: scan.parallel_threshold,
            write_manifest: false,
        }
    }
}

impl DeltaConfig {
    /// Scanner settings.
    pub fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            parallel: self.parallel,
            parallel_threshold: self.parallel_threshold,
        }
    }

    /// Writer settings.
    pub fn writer_config(&self) -> WriterConfig {
        WriterConfig {
            key_order: self.key_order,
            pretty: self.pretty,
        }
    }

    /// Stable hash of the settings, for log correlation.
    pub fn fingerprint(&self) -> Result<String, serde_json::Error> {
        canonical_hash_hex(self)
    }
}
