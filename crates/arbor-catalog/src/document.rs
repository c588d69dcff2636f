use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use arbor_types::ResourcePath;

/// A single indexed field value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    /// An atomic identifier matched exactly (name, format, parent path).
    Keyword(String),
    /// A multi-valued keyword field (virtual hosts, links).
    Keywords(Vec<String>),
    /// Free text matched by phrase (title, body text).
    Text(String),
    /// A numeric field (size).
    Integer(i64),
    /// A boolean field (is_container).
    Flag(bool),
}

impl FieldValue {
    /// Returns `true` if any atom of this field equals `value` exactly.
    pub fn matches_phrase(&self, value: &str) -> bool {
        match self {
            FieldValue::Keyword(s) | FieldValue::Text(s) => s == value,
            FieldValue::Keywords(items) => items.iter().any(|item| item == value),
            FieldValue::Integer(n) => value.parse::<i64>() == Ok(*n),
            FieldValue::Flag(b) => value.parse::<bool>() == Ok(*b),
        }
    }

    /// Returns `true` if any atom of this field starts with `prefix`.
    pub fn matches_prefix(&self, prefix: &str) -> bool {
        match self {
            FieldValue::Keyword(s) | FieldValue::Text(s) => s.starts_with(prefix),
            FieldValue::Keywords(items) => items.iter().any(|item| item.starts_with(prefix)),
            FieldValue::Integer(_) | FieldValue::Flag(_) => false,
        }
    }
}

/// One indexed document: a resource path plus derived fields.
///
/// Documents are keyed by path; re-indexing the same path replaces the
/// previous document wholesale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogDocument {
    abspath: ResourcePath,
    fields: BTreeMap<String, FieldValue>,
}

impl CatalogDocument {
    /// Create an empty document for `abspath`.
    pub fn new(abspath: ResourcePath) -> Self {
        Self {
            abspath,
            fields: BTreeMap::new(),
        }
    }

    /// The resource path this document is keyed by.
    pub fn abspath(&self) -> &ResourcePath {
        &self.abspath
    }

    /// Set a field, builder style.
    pub fn with_field(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Iterate over all fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}
