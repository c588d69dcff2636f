use arbor_types::ResourcePath;

use crate::document::CatalogDocument;
use crate::error::CatalogResult;
use crate::query::Query;

/// Search catalog backend.
///
/// All implementations must satisfy these invariants:
/// - `index` and `unindex` are idempotent when re-applied with the same key.
/// - Documents are keyed by path; indexing a path replaces its previous
///   document wholesale.
/// - The catalog holds derived fields only; losing it must be recoverable
///   by re-deriving every document from storage.
pub trait Catalog: Send + Sync {
    /// Insert or replace the document for its path.
    fn index(&self, doc: &CatalogDocument) -> CatalogResult<()>;

    /// Remove the document keyed by `path`.
    ///
    /// Returns `Ok(true)` if a document existed, `Ok(false)` otherwise.
    /// Unindexing a path that was never indexed is not an error.
    fn unindex(&self, path: &ResourcePath) -> CatalogResult<bool>;

    /// All documents matching `query`, in path order.
    fn search(&self, query: &Query) -> CatalogResult<Vec<CatalogDocument>>;

    /// The document for one path, if indexed.
    fn get(&self, path: &ResourcePath) -> CatalogResult<Option<CatalogDocument>>;
}
