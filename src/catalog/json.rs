//! JSON interchange loader.
//!
//! Builds an [`InMemoryCatalog`] from a pre-extracted catalog document:
//!
//! ```json
//! {
//!   "publications": [{"key": "journals/x/A20", "mdate": "2020-01-01", "xml": "<article/>"}],
//!   "persons": [{"pid": "123/456", "mdate": "2020-01-01", "publications": ["journals/x/A20"]}]
//! }
//! ```
//!
//! A person without `mdate` gets the maximum of its publications' mdates.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use super::{Catalog, CatalogError, InMemoryCatalog};

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    publications: Vec<PublicationEntry>,
    #[serde(default)]
    persons: Vec<PersonEntry>,
}

#[derive(Debug, Deserialize)]
struct PublicationEntry {
    key: String,
    mdate: String,
    xml: String,
}

#[derive(Debug, Deserialize)]
struct PersonEntry {
    pid: String,
    #[serde(default)]
    mdate: Option<String>,
    #[serde(default)]
    publications: Vec<String>,
}

/// Load a catalog document from a reader.
pub fn load_catalog<R: Read>(reader: R) -> Result<InMemoryCatalog, CatalogError> {
    let document: CatalogDocument = serde_json::from_reader(reader)?;
    build_from_document(document)
}

/// Load a catalog document from a file.
pub fn load_catalog_from_path(path: impl AsRef<Path>) -> Result<InMemoryCatalog, CatalogError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let catalog = load_catalog(BufReader::new(file))?;
    tracing::info!(
        path = %path.display(),
        publications = catalog.publication_count(),
        persons = catalog.author_count(),
        "catalog loaded"
    );
    Ok(catalog)
}

fn build_from_document(document: CatalogDocument) -> Result<InMemoryCatalog, CatalogError> {
    let mut builder = InMemoryCatalog::builder();

    for entry in document.publications {
        builder.add_publication(entry.key, entry.mdate, entry.xml)?;
    }

    for person in document.persons {
        let mut ids = Vec::with_capacity(person.publications.len());
        for key in &person.publications {
            let id = builder
                .publication_id(key)
                .ok_or_else(|| CatalogError::UnknownPublicationKey {
                    author: person.pid.clone(),
                    key: key.clone(),
                })?;
            ids.push(id);
        }
        match person.mdate {
            Some(mdate) => builder.add_author(person.pid, mdate, ids)?,
            None => builder.add_author_with_aggregate(person.pid, ids)?,
        };
    }

    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AuthorId;

    const DOC: &str = r#"{
        "publications": [
            {"key": "journals/x/A20", "mdate": "2020-01-01", "xml": "<article key=\"journals/x/A20\"/>"},
            {"key": "conf/y/B21", "mdate": "2021-06-01", "xml": "<inproceedings/>"}
        ],
        "persons": [
            {"pid": "1/1", "mdate": "2021-06-01", "publications": ["journals/x/A20", "conf/y/B21"]},
            {"pid": "2/2", "publications": ["journals/x/A20"]}
        ]
    }"#;

    #[test]
    fn test_load_document() {
        let catalog = load_catalog(DOC.as_bytes()).unwrap();
        assert_eq!(catalog.author_count(), 2);
        assert_eq!(catalog.publication_count(), 2);

        let explicit = catalog.author_by_id(&AuthorId::from("1/1")).unwrap();
        assert_eq!(explicit.aggregated_mdate, "2021-06-01");
        assert_eq!(explicit.publications.len(), 2);

        let aggregated = catalog.author_by_id(&AuthorId::from("2/2")).unwrap();
        assert_eq!(aggregated.aggregated_mdate, "2020-01-01");
    }

    #[test]
    fn test_unknown_key() {
        let doc = r#"{"publications": [], "persons": [{"pid": "p", "mdate": "2020-01-01", "publications": ["nope"]}]}"#;
        let err = load_catalog(doc.as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::UnknownPublicationKey { ref key, .. } if key == "nope"));
    }

    #[test]
    fn test_syntax_error() {
        let err = load_catalog("{\"persons\": [".as_bytes()).unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_empty_document() {
        let catalog = load_catalog("{}".as_bytes()).unwrap();
        assert_eq!(catalog.author_count(), 0);
    }

    #[test]
    fn test_missing_file() {
        let err = load_catalog_from_path("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
