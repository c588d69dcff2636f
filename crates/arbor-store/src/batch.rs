use serde::{Deserialize, Serialize};

use arbor_types::Actor;

use crate::key::StorageKey;
use crate::property::PropertySet;

/// A single coherent batch of storage mutations.
///
/// A request never writes records one at a time: it stages changes in its
/// session and submits them here as one batch, which the backend applies
/// all-or-nothing. Removals and upserts are disjoint by construction at the
/// session layer; a backend applies removals first, then upserts.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WriteBatch {
    pub author: Actor,
    pub message: String,
    pub upserts: Vec<(StorageKey, PropertySet)>,
    pub removals: Vec<StorageKey>,
}

impl WriteBatch {
    /// Create an empty batch attributed to `author`.
    pub fn new(author: Actor, message: impl Into<String>) -> Self {
        Self {
            author,
            message: message.into(),
            upserts: Vec::new(),
            removals: Vec::new(),
        }
    }

    /// Add an upsert to the batch.
    pub fn upsert(&mut self, key: StorageKey, properties: PropertySet) -> &mut Self {
        self.upserts.push((key, properties));
        self
    }

    /// Add a removal to the batch.
    pub fn remove(&mut self, key: StorageKey) -> &mut Self {
        self.removals.push(key);
        self
    }

    /// Returns `true` if the batch carries no mutations.
    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.removals.is_empty()
    }

    /// All keys touched by this batch: removals first, then upserts.
    pub fn touched_keys(&self) -> Vec<StorageKey> {
        let mut keys: Vec<StorageKey> = self.removals.clone();
        keys.extend(self.upserts.iter().map(|(key, _)| key.clone()));
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_types::TypeTag;

    #[test]
    fn empty_batch() {
        let batch = WriteBatch::new(Actor::anonymous(), "");
        assert!(batch.is_empty());
        assert!(batch.touched_keys().is_empty());
    }

    #[test]
    fn touched_keys_removals_first() {
        let mut batch = WriteBatch::new(Actor::anonymous(), "edit");
        batch.upsert(
            StorageKey::new("/a"),
            PropertySet::new(TypeTag::from("folder")),
        );
        batch.remove(StorageKey::new("/b"));
        let keys = batch.touched_keys();
        assert_eq!(keys[0].as_str(), "/b");
        assert_eq!(keys[1].as_str(), "/a");
        assert!(!batch.is_empty());
    }
}
