//! Search catalog for the Arbor content repository.
//!
//! Resources are indexed as flat [`CatalogDocument`]s keyed by resource
//! path. The catalog answers structured queries (exact phrase, prefix,
//! boolean combinations) over document fields; it never stores resource
//! content itself, only the fields derived from it at commit time.
//!
//! # Key Types
//!
//! - [`CatalogDocument`] — One indexed document (path + field map)
//! - [`FieldValue`] — A single indexed field value
//! - [`Query`] — Structured search query
//! - [`Catalog`] — Backend trait; [`InMemoryCatalog`] is the reference
//!   implementation

pub mod document;
pub mod error;
pub mod memory;
pub mod query;
pub mod traits;

pub use document::{CatalogDocument, FieldValue};
pub use error::{CatalogError, CatalogResult};
pub use memory::InMemoryCatalog;
pub use query::Query;
pub use traits::Catalog;
