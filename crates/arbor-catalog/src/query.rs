use crate::document::CatalogDocument;

/// Structured search query over catalog documents.
///
/// Queries combine exact-phrase and prefix matches on named fields with
/// boolean `Or`/`And`. The query shape is the catalog's whole search
/// surface; there is no free-text query parser at this layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Query {
    /// Field contains an atom equal to `value`.
    Phrase { field: String, value: String },
    /// Field contains an atom starting with `prefix`.
    StartsWith { field: String, prefix: String },
    /// At least one sub-query matches.
    Or(Vec<Query>),
    /// Every sub-query matches.
    And(Vec<Query>),
}

impl Query {
    /// Exact-phrase query on one field.
    pub fn phrase(field: impl Into<String>, value: impl Into<String>) -> Self {
        Query::Phrase {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Prefix query on one field.
    pub fn starts_with(field: impl Into<String>, prefix: impl Into<String>) -> Self {
        Query::StartsWith {
            field: field.into(),
            prefix: prefix.into(),
        }
    }

    /// Returns `true` if `doc` satisfies this query.
    pub fn matches(&self, doc: &CatalogDocument) -> bool {
        match self {
            Query::Phrase { field, value } => doc
                .field(field)
                .is_some_and(|f| f.matches_phrase(value)),
            Query::StartsWith { field, prefix } => doc
                .field(field)
                .is_some_and(|f| f.matches_prefix(prefix)),
            Query::Or(queries) => queries.iter().any(|q| q.matches(doc)),
            Query::And(queries) => queries.iter().all(|q| q.matches(doc)),
        }
    }

    /// The query matching a site root and everything below it.
    ///
    /// Equivalent to `abspath == root OR abspath starts with "root/"`.
    pub fn subtree(root: &str) -> Self {
        let prefix = if root.ends_with('/') {
            root.to_string()
        } else {
            format!("{root}/")
        };
        Query::Or(vec![
            Query::phrase("abspath", root),
            Query::starts_with("abspath", prefix),
        ])
    }
}
