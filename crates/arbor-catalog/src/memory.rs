use std::collections::BTreeMap;
use std::sync::RwLock;

use tracing::debug;

use arbor_types::ResourcePath;

use crate::document::CatalogDocument;
use crate::error::CatalogResult;
use crate::query::Query;
use crate::traits::Catalog;

/// In-memory, BTreeMap-based catalog.
///
/// Intended for tests and embedding. Search is a full scan with query
/// predicates; results come back in path order for free from the map.
pub struct InMemoryCatalog {
    docs: RwLock<BTreeMap<ResourcePath, CatalogDocument>>,
}

impl InMemoryCatalog {
    /// Create a new empty catalog.
    pub fn new() -> Self {
        Self {
            docs: RwLock::new(BTreeMap::new()),
        }
    }

    /// Number of documents currently indexed.
    pub fn len(&self) -> usize {
        self.docs.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.docs.read().expect("lock poisoned").is_empty()
    }
}

impl Default for InMemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl Catalog for InMemoryCatalog {
    fn index(&self, doc: &CatalogDocument) -> CatalogResult<()> {
        let mut docs = self.docs.write().expect("lock poisoned");
        debug!(path = %doc.abspath(), "indexed");
        docs.insert(doc.abspath().clone(), doc.clone());
        Ok(())
    }

    fn unindex(&self, path: &ResourcePath) -> CatalogResult<bool> {
        let mut docs = self.docs.write().expect("lock poisoned");
        let existed = docs.remove(path).is_some();
        debug!(path = %path, existed, "unindexed");
        Ok(existed)
    }

    fn search(&self, query: &Query) -> CatalogResult<Vec<CatalogDocument>> {
        let docs = self.docs.read().expect("lock poisoned");
        Ok(docs.values().filter(|doc| query.matches(doc)).cloned().collect())
    }

    fn get(&self, path: &ResourcePath) -> CatalogResult<Option<CatalogDocument>> {
        let docs = self.docs.read().expect("lock poisoned");
        Ok(docs.get(path).cloned())
    }
}

impl std::fmt::Debug for InMemoryCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryCatalog")
            .field("document_count", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::FieldValue;

    fn doc(path: &str, format: &str) -> CatalogDocument {
        CatalogDocument::new(ResourcePath::parse(path).unwrap())
            .with_field("abspath", FieldValue::Keyword(path.into()))
            .with_field("format", FieldValue::Keyword(format.into()))
    }

    // -----------------------------------------------------------------------
    // Index / unindex
    // -----------------------------------------------------------------------

    #[test]
    fn index_and_get() {
        let catalog = InMemoryCatalog::new();
        catalog.index(&doc("/a", "file")).unwrap();
        let found = catalog
            .get(&ResourcePath::parse("/a").unwrap())
            .unwrap()
            .expect("should be indexed");
        assert_eq!(found.field("format"), Some(&FieldValue::Keyword("file".into())));
    }

    #[test]
    fn index_replaces_previous_document() {
        let catalog = InMemoryCatalog::new();
        catalog.index(&doc("/a", "file")).unwrap();
        catalog.index(&doc("/a", "webpage")).unwrap();
        assert_eq!(catalog.len(), 1);
        let found = catalog.get(&ResourcePath::parse("/a").unwrap()).unwrap().unwrap();
        assert_eq!(found.field("format"), Some(&FieldValue::Keyword("webpage".into())));
    }

    #[test]
    fn unindex_is_idempotent() {
        let catalog = InMemoryCatalog::new();
        catalog.index(&doc("/a", "file")).unwrap();
        assert!(catalog.unindex(&ResourcePath::parse("/a").unwrap()).unwrap());
        assert!(!catalog.unindex(&ResourcePath::parse("/a").unwrap()).unwrap());
        assert!(catalog.is_empty());
    }

    // -----------------------------------------------------------------------
    // Search
    // -----------------------------------------------------------------------

    #[test]
    fn search_filters_by_query() {
        let catalog = InMemoryCatalog::new();
        catalog.index(&doc("/a", "file")).unwrap();
        catalog.index(&doc("/b", "webpage")).unwrap();
        catalog.index(&doc("/c", "file")).unwrap();

        let results = catalog.search(&Query::phrase("format", "file")).unwrap();
        assert_eq!(results.len(), 2);
        // Path order.
        assert_eq!(results[0].abspath().to_string(), "/a");
        assert_eq!(results[1].abspath().to_string(), "/c");
    }

    #[test]
    fn search_by_vhost_token() {
        let catalog = InMemoryCatalog::new();
        let site = doc("/site", "website").with_field(
            "vhosts",
            FieldValue::Keywords(vec!["example.com".into(), "www.example.com".into()]),
        );
        catalog.index(&site).unwrap();
        catalog.index(&doc("/other", "website")).unwrap();

        let results = catalog
            .search(&Query::phrase("vhosts", "www.example.com"))
            .unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].abspath().to_string(), "/site");
    }

    #[test]
    fn search_empty_catalog() {
        let catalog = InMemoryCatalog::new();
        assert!(catalog.search(&Query::subtree("/site")).unwrap().is_empty());
    }
}
