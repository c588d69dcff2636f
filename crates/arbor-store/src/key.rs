use std::fmt;

use serde::{Deserialize, Serialize};

/// Physical key under which a property set is stored.
///
/// A `StorageKey` is distinct from a logical resource path: the resolver
/// maps one to the other, folding an optional virtual host into the key.
/// Two key spaces therefore coexist in the same store — host-qualified
/// (`/{host}/a/b`) and host-agnostic (`/a/b`) — and never collide because a
/// host name occupies the first segment.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StorageKey(String);

impl StorageKey {
    /// The key for the store root.
    pub fn root() -> Self {
        Self("/".to_string())
    }

    /// Create a key from its canonical string form (`/a/b`).
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        if key.is_empty() {
            return Self::root();
        }
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Append one segment, producing the key of a direct child.
    pub fn join(&self, name: &str) -> Self {
        if self.0 == "/" {
            Self(format!("/{name}"))
        } else {
            Self(format!("{}/{name}", self.0))
        }
    }

    /// If `other` is a direct child of `self`, return its final segment.
    pub fn child_name_of<'a>(&self, other: &'a StorageKey) -> Option<&'a str> {
        let prefix = if self.0 == "/" {
            "/".to_string()
        } else {
            format!("{}/", self.0)
        };
        let rest = other.0.strip_prefix(&prefix)?;
        if rest.is_empty() || rest.contains('/') {
            return None;
        }
        Some(rest)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StorageKey({})", self.0)
    }
}
