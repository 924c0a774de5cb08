//! Snapshot serialization.
//!
//! Output is a single JSON object mapping author id to the list of raw
//! payload strings selected for that author:
//!
//! ```text
//! {"123/456":["<article ...>...</article>"],"789/1":[]}
//! ```

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::canonical::fingerprint_hex;
use crate::scanner::{AuthorDelta, ScanResult};

/// Error type for snapshot output.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    /// The sink rejected the write.
    #[error("cannot write snapshot to {sink}: {source}")]
    Io {
        /// Description of the sink (path or stream name).
        sink: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The snapshot could not be encoded.
    #[error("cannot encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Key order of the written object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyOrder {
    /// Catalog iteration order.
    #[default]
    ScanOrder,
    /// Sorted by author identifier.
    AuthorId,
}

/// Writer configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WriterConfig {
    /// Key order of the output object.
    pub key_order: KeyOrder,
    /// Indent the output.
    pub pretty: bool,
}

/// Summary of a written snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotStats {
    /// Number of author keys.
    pub author_count: usize,
    /// Number of payloads across all authors.
    pub publication_count: usize,
    /// Encoded size.
    pub bytes_written: usize,
    /// xxh64 of the encoded bytes.
    pub fingerprint: String,
}

/// Ordered view over scan entries, serialized as a JSON object.
struct SnapshotView<'r, 'c> {
    entries: Vec<&'r AuthorDelta<'c>>,
}

impl Serialize for SnapshotView<'_, '_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.author.as_str(), &entry.payloads)?;
        }
        map.end()
    }
}

/// Serializes scan results into the snapshot format.
#[derive(Debug, Clone, Default)]
pub struct SnapshotWriter {
    config: WriterConfig,
}

impl SnapshotWriter {
    /// Create a writer.
    pub fn new(config: WriterConfig) -> Self {
        Self { config }
    }

    /// Writer configuration.
    pub fn config(&self) -> &WriterConfig {
        &self.config
    }

    /// Encode a scan result to the exact bytes that would be written.
    pub fn encode(&self, result: &ScanResult<'_>) -> Result<Vec<u8>, WriteError> {
        let mut entries: Vec<&AuthorDelta<'_>> = result.iter().collect();
        if self.config.key_order == KeyOrder::AuthorId {
            entries.sort_by(|a, b| a.author.cmp(b.author));
        }
        let view = SnapshotView { entries };

        let bytes = if self.config.pretty {
            serde_json::to_vec_pretty(&view)?
        } else {
            serde_json::to_vec(&view)?
        };
        Ok(bytes)
    }

    /// Write a scan result to `sink` with a single write call.
    ///
    /// The snapshot is fully encoded before the sink is touched, so encoding
    /// failures never leave partial output. `sink_name` labels I/O errors.
    pub fn write<W: Write>(
        &self,
        result: &ScanResult<'_>,
        sink: &mut W,
        sink_name: &str,
    ) -> Result<SnapshotStats, WriteError> {
        let bytes = self.encode(result)?;
        let io_err = |source: std::io::Error| WriteError::Io {
            sink: sink_name.to_string(),
            source,
        };
        sink.write_all(&bytes).map_err(io_err)?;
        sink.flush().map_err(io_err)?;

        let stats = SnapshotStats {
            author_count: result.len(),
            publication_count: result.payload_count(),
            bytes_written: bytes.len(),
            fingerprint: fingerprint_hex(&bytes),
        };
        tracing::info!(
            sink = sink_name,
            authors = stats.author_count,
            publications = stats.publication_count,
            bytes = stats.bytes_written,
            fingerprint = %stats.fingerprint,
            "snapshot written"
        );
        Ok(stats)
    }

    /// Write a scan result to a file.
    ///
    /// Bytes go to a uniquely named temp file in the destination directory,
    /// which is renamed over `path` once complete; on failure the temp file
    /// is removed and `path` is untouched.
    pub fn write_to_path(&self, result: &ScanResult<'_>, path: impl AsRef<Path>) -> Result<SnapshotStats, WriteError> {
        let path = path.as_ref();
        let sink = path.display().to_string();
        persist_atomically(path, |file| self.write(result, file, &sink))
    }
}

/// Run `fill` against a temp file next to `path`, then rename it into place.
///
/// The temp file is deleted when `fill`, the sync or the rename fails.
pub(crate) fn persist_atomically<T>(
    path: &Path,
    fill: impl FnOnce(&mut fs::File) -> Result<T, WriteError>,
) -> Result<T, WriteError> {
    let io_err = |source: std::io::Error| WriteError::Io {
        sink: path.display().to_string(),
        source,
    };

    let dir = match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => {
            fs::create_dir_all(parent).map_err(io_err)?;
            parent
        }
        None => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    let value = fill(tmp.as_file_mut())?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(value)
}
