//! Incremental modification scanner.
//!
//! Walks a catalog once and keeps, per author, exactly the publications
//! modified on or after a cutoff date.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::types::{Author, AuthorId, DateError, ModDate};

/// Error type for scan operations.
///
/// A scan either completes or fails as a whole; no partial result is
/// returned alongside an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// The cutoff is not a calendar date.
    #[error("invalid cutoff date: {0}")]
    InvalidDate(#[from] DateError),
    /// A catalog record carries an unparsable mdate.
    #[error("malformed mdate {value:?} on record {record}")]
    MalformedRecordDate {
        /// Author pid or publication key.
        record: String,
        /// The raw mdate value.
        value: String,
    },
    /// An author references a publication the catalog does not hold.
    #[error("author {author} references missing publication {index}")]
    DanglingPublication {
        /// Referencing author.
        author: String,
        /// Table index that did not resolve.
        index: usize,
    },
}

/// Scanner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Run the author loop on the rayon pool.
    pub parallel: bool,
    /// Minimum author count before the parallel path is taken.
    pub parallel_threshold: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            parallel: false,
            parallel_threshold: 10_000,
        }
    }
}

/// Modified publications of one author.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorDelta<'c> {
    /// Author identifier, borrowed from the catalog.
    pub author: &'c AuthorId,
    /// Raw payloads of the selected publications, in catalog order.
    /// Empty when the aggregated mdate is newer than every publication.
    pub payloads: Vec<&'c str>,
}

/// Result of a modification scan.
///
/// Entries are kept in catalog order; keys are unique because catalog
/// author ids are unique.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult<'c> {
    cutoff: ModDate,
    entries: Vec<AuthorDelta<'c>>,
}

impl<'c> ScanResult<'c> {
    /// Cutoff the scan was run with.
    pub fn cutoff(&self) -> ModDate {
        self.cutoff
    }

    /// Entries in scan order.
    pub fn entries(&self) -> &[AuthorDelta<'c>] {
        &self.entries
    }

    /// Iterate entries in scan order.
    pub fn iter(&self) -> std::slice::Iter<'_, AuthorDelta<'c>> {
        self.entries.iter()
    }

    /// Payloads recorded for an author, if the author passed the pre-filter.
    pub fn get(&self, author: &AuthorId) -> Option<&[&'c str]> {
        self.entries
            .iter()
            .find(|e| e.author == author)
            .map(|e| e.payloads.as_slice())
    }

    /// Number of authors in the result.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no author passed the pre-filter.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of selected publications.
    pub fn payload_count(&self) -> usize {
        self.entries.iter().map(|e| e.payloads.len()).sum()
    }

    /// Authors that passed the pre-filter with no fresh publication.
    pub fn empty_author_count(&self) -> usize {
        self.entries.iter().filter(|e| e.payloads.is_empty()).count()
    }
}

impl<'a, 'c> IntoIterator for &'a ScanResult<'c> {
    type Item = &'a AuthorDelta<'c>;
    type IntoIter = std::slice::Iter<'a, AuthorDelta<'c>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Two-level modification scanner.
///
/// ## Algorithm
///
/// 1. Visit every author in catalog order
/// 2. Keep the author if `aggregated_mdate >= cutoff`
/// 3. For a kept author, select each publication with `mdate >= cutoff`
/// 4. Record the selection under the author id, even when it is empty
#[derive(Debug, Clone, Default)]
pub struct ModificationScanner {
    config: ScanConfig,
}

impl ModificationScanner {
    /// Create a scanner.
    pub fn new(config: ScanConfig) -> Self {
        Self { config }
    }

    /// Scan with a cutoff given as `YYYY-MM-DD`.
    pub fn scan_str<'c, C: Catalog + ?Sized>(
        &self,
        catalog: &'c C,
        cutoff: &str,
    ) -> Result<ScanResult<'c>, ScanError> {
        let cutoff = ModDate::parse(cutoff)?;
        self.scan(catalog, cutoff)
    }

    /// Scan the catalog for records modified on or after `cutoff`.
    pub fn scan<'c, C: Catalog + ?Sized>(
        &self,
        catalog: &'c C,
        cutoff: ModDate,
    ) -> Result<ScanResult<'c>, ScanError> {
        let authors = catalog.authors();
        let parallel = self.config.parallel && authors.len() >= self.config.parallel_threshold;

        tracing::info!(
            cutoff = %cutoff,
            authors = authors.len(),
            publications = catalog.publication_count(),
            parallel,
            "starting modification scan"
        );

        // The ordered collect is the merge step: rayon preserves input order.
        let selected: Vec<Option<AuthorDelta<'c>>> = if parallel {
            authors
                .par_iter()
                .map(|author| scan_author(catalog, author, cutoff))
                .collect::<Result<_, _>>()?
        } else {
            authors
                .iter()
                .map(|author| scan_author(catalog, author, cutoff))
                .collect::<Result<_, _>>()?
        };

        let result = ScanResult {
            cutoff,
            entries: selected.into_iter().flatten().collect(),
        };

        tracing::info!(
            cutoff = %cutoff,
            authors = result.len(),
            publications = result.payload_count(),
            stale_authors = result.empty_author_count(),
            "modification scan complete"
        );

        Ok(result)
    }
}

fn scan_author<'c, C: Catalog + ?Sized>(
    catalog: &'c C,
    author: &'c Author,
    cutoff: ModDate,
) -> Result<Option<AuthorDelta<'c>>, ScanError> {
    let aggregated = parse_record_date(&author.aggregated_mdate, || author.id.to_string())?;
    let candidate = aggregated.is_on_or_after(cutoff);

    // Publication dates are checked for every author so a corrupt record
    // fails the scan even when its author is filtered out.
    let mut payloads = Vec::new();
    for id in &author.publications {
        let publication = catalog
            .publication(*id)
            .ok_or_else(|| ScanError::DanglingPublication {
                author: author.id.to_string(),
                index: id.index(),
            })?;
        let mdate = parse_record_date(&publication.mdate, || publication.key.clone())?;
        if candidate && mdate.is_on_or_after(cutoff) {
            payloads.push(publication.payload.as_str());
        }
    }

    if !candidate {
        return Ok(None);
    }

    if payloads.is_empty() {
        tracing::warn!(
            author = %author.id,
            aggregated_mdate = %aggregated,
            "aggregated mdate passes cutoff but no publication does"
        );
    } else {
        tracing::debug!(author = %author.id, selected = payloads.len(), "author modified");
    }

    Ok(Some(AuthorDelta {
        author: &author.id,
        payloads,
    }))
}

fn parse_record_date(value: &str, record: impl FnOnce() -> String) -> Result<ModDate, ScanError> {
    ModDate::parse(value).map_err(|_| ScanError::MalformedRecordDate {
        record: record(),
        value: value.to_string(),
    })
}
