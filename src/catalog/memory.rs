//! Arena-backed in-memory catalog.

use std::collections::HashMap;

use crate::types::{Author, AuthorId, ModDate, Publication, PublicationId};
use super::{Catalog, CatalogError};

/// In-memory catalog.
///
/// Publications live in one flat table; authors hold indices into it, so
/// co-authored records are stored once and there are no ownership cycles.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    /// Authors in insertion order.
    authors: Vec<Author>,
    /// Publication table.
    publications: Vec<Publication>,
    /// Publication key -> table index.
    by_key: HashMap<String, PublicationId>,
    /// Author id -> position in `authors`.
    by_author: HashMap<AuthorId, usize>,
}

impl InMemoryCatalog {
    /// Start building a catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::new()
    }

    /// Find a publication by its record key.
    pub fn publication_by_key(&self, key: &str) -> Option<&Publication> {
        self.by_key.get(key).map(|id| &self.publications[id.index()])
    }

    /// Find an author by identifier.
    pub fn author_by_id(&self, id: &AuthorId) -> Option<&Author> {
        self.by_author.get(id).map(|&pos| &self.authors[pos])
    }

    /// Publications of an author, in catalog order.
    pub fn publications_of<'a>(&'a self, author: &'a Author) -> impl Iterator<Item = &'a Publication> + 'a {
        author
            .publications
            .iter()
            .filter_map(move |id| self.publications.get(id.index()))
    }
}

impl Catalog for InMemoryCatalog {
    fn authors(&self) -> &[Author] {
        &self.authors
    }

    fn publication(&self, id: PublicationId) -> Option<&Publication> {
        self.publications.get(id.index())
    }

    fn publication_count(&self) -> usize {
        self.publications.len()
    }
}

/// Incremental builder for [`InMemoryCatalog`].
///
/// Enforces unique keys and resolvable references so a built catalog is
/// internally consistent. Dates are stored raw.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: InMemoryCatalog,
}

impl CatalogBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a publication and return its table index.
    pub fn add_publication(
        &mut self,
        key: impl Into<String>,
        mdate: impl Into<String>,
        payload: impl Into<String>,
    ) -> Result<PublicationId, CatalogError> {
        let publication = Publication::new(key, mdate, payload);
        if self.catalog.by_key.contains_key(&publication.key) {
            return Err(CatalogError::DuplicatePublication(publication.key));
        }
        let index = u32::try_from(self.catalog.publications.len()).map_err(|_| CatalogError::TableFull)?;
        let id = PublicationId::new(index);
        self.catalog.by_key.insert(publication.key.clone(), id);
        self.catalog.publications.push(publication);
        Ok(id)
    }

    /// Resolve a publication key added earlier.
    pub fn publication_id(&self, key: &str) -> Option<PublicationId> {
        self.catalog.by_key.get(key).copied()
    }

    /// Add an author with an explicit aggregated mdate.
    ///
    /// The aggregate is stored as given; keeping it consistent with the
    /// publications is the caller's job.
    pub fn add_author(
        &mut self,
        id: impl Into<String>,
        aggregated_mdate: impl Into<String>,
        publications: Vec<PublicationId>,
    ) -> Result<&Author, CatalogError> {
        let id = AuthorId::new(id);
        if self.catalog.by_author.contains_key(&id) {
            return Err(CatalogError::DuplicateAuthor(id.to_string()));
        }
        if let Some(missing) = publications
            .iter()
            .find(|p| p.index() >= self.catalog.publications.len())
        {
            return Err(CatalogError::UnknownPublication {
                author: id.to_string(),
                id: *missing,
            });
        }

        let pos = self.catalog.authors.len();
        self.catalog.by_author.insert(id.clone(), pos);
        self.catalog.authors.push(Author::new(id, aggregated_mdate, publications));
        Ok(&self.catalog.authors[pos])
    }

    /// Add an author whose aggregated mdate is the maximum of its
    /// publications' mdates.
    pub fn add_author_with_aggregate(
        &mut self,
        id: impl Into<String>,
        publications: Vec<PublicationId>,
    ) -> Result<&Author, CatalogError> {
        let id = id.into();
        let mut latest: Option<ModDate> = None;
        for pid in &publications {
            let publication = self
                .catalog
                .publications
                .get(pid.index())
                .ok_or_else(|| CatalogError::UnknownPublication {
                    author: id.clone(),
                    id: *pid,
                })?;
            let mdate = ModDate::parse(&publication.mdate).map_err(|source| CatalogError::Date {
                record: publication.key.clone(),
                source,
            })?;
            latest = latest.max(Some(mdate));
        }
        let aggregated = latest.ok_or_else(|| CatalogError::EmptyAuthor(id.clone()))?;
        self.add_author(id, aggregated.to_string(), publications)
    }

    /// Number of authors added so far.
    pub fn author_count(&self) -> usize {
        self.catalog.authors.len()
    }

    /// Finish building.
    pub fn build(self) -> InMemoryCatalog {
        self.catalog
    }
}
