use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::RwLock;

use tracing::debug;

use crate::batch::WriteBatch;
use crate::error::StoreResult;
use crate::key::StorageKey;
use crate::property::PropertySet;
use crate::revision::Revision;
use crate::traits::PropertyStore;

/// In-memory, BTreeMap-based property store.
///
/// Intended for tests and embedding. Records and the revision log are held
/// behind a single `RwLock`, so a save is atomic with respect to readers.
/// Nothing is buffered between saves; `discard_pending` is a no-op.
pub struct InMemoryPropertyStore {
    inner: RwLock<StoreState>,
}

#[derive(Default)]
struct StoreState {
    records: BTreeMap<StorageKey, PropertySet>,
    revisions: Vec<Revision>,
}

impl InMemoryPropertyStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(StoreState::default()),
        }
    }

    /// Number of records currently stored.
    pub fn len(&self) -> usize {
        self.inner.read().expect("lock poisoned").records.len()
    }

    /// Returns `true` if the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.inner.read().expect("lock poisoned").records.is_empty()
    }

    /// Seed a record directly, bypassing the batch protocol.
    ///
    /// Test fixture helper: builds up "pre-existing" storage state without
    /// generating revisions.
    pub fn seed(&self, key: StorageKey, properties: PropertySet) {
        let mut state = self.inner.write().expect("lock poisoned");
        state.records.insert(key, properties);
    }

    /// Return all keys in order.
    pub fn all_keys(&self) -> Vec<StorageKey> {
        let state = self.inner.read().expect("lock poisoned");
        state.records.keys().cloned().collect()
    }
}

impl Default for InMemoryPropertyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyStore for InMemoryPropertyStore {
    fn load(&self, key: &StorageKey) -> StoreResult<Option<PropertySet>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.records.get(key).cloned())
    }

    fn children(&self, key: &StorageKey) -> StoreResult<Vec<String>> {
        let state = self.inner.read().expect("lock poisoned");
        let mut names = Vec::new();
        // Keys order lexicographically, so all descendants of `key` sit in
        // one contiguous range after it.
        let range = state
            .records
            .range((Bound::Excluded(key.clone()), Bound::Unbounded));
        for candidate in range.map(|(k, _)| k) {
            if !candidate.as_str().starts_with(key.as_str()) {
                break;
            }
            if let Some(name) = key.child_name_of(candidate) {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }

    fn save(&self, batch: &WriteBatch) -> StoreResult<Revision> {
        let mut state = self.inner.write().expect("lock poisoned");
        let revision = Revision::for_batch(state.revisions.last().map(|r| &r.id), batch)?;
        for key in &batch.removals {
            state.records.remove(key);
        }
        for (key, properties) in &batch.upserts {
            state.records.insert(key.clone(), properties.clone());
        }
        debug!(
            revision = %revision.id.short_hex(),
            upserts = batch.upserts.len(),
            removals = batch.removals.len(),
            "batch saved"
        );
        state.revisions.push(revision.clone());
        Ok(revision)
    }

    fn discard_pending(&self) -> StoreResult<()> {
        // Nothing is staged between saves in this backend.
        Ok(())
    }

    fn revisions(&self) -> StoreResult<Vec<Revision>> {
        let state = self.inner.read().expect("lock poisoned");
        Ok(state.revisions.clone())
    }
}

impl std::fmt::Debug for InMemoryPropertyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.read().expect("lock poisoned");
        f.debug_struct("InMemoryPropertyStore")
            .field("record_count", &state.records.len())
            .field("revision_count", &state.revisions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_types::{Actor, TypeTag};

    fn props(tag: &str) -> PropertySet {
        PropertySet::new(TypeTag::from(tag))
    }

    fn batch_with(upserts: &[&str], removals: &[&str]) -> WriteBatch {
        let mut batch = WriteBatch::new(Actor::anonymous(), "test");
        for key in upserts {
            batch.upsert(StorageKey::new(*key), props("file"));
        }
        for key in removals {
            batch.remove(StorageKey::new(*key));
        }
        batch
    }

    // -----------------------------------------------------------------------
    // Load / save
    // -----------------------------------------------------------------------

    #[test]
    fn save_then_load() {
        let store = InMemoryPropertyStore::new();
        store.save(&batch_with(&["/a"], &[])).unwrap();
        let loaded = store.load(&StorageKey::new("/a")).unwrap();
        assert!(loaded.is_some());
        assert_eq!(loaded.unwrap().format().as_str(), "file");
    }

    #[test]
    fn load_missing_returns_none() {
        let store = InMemoryPropertyStore::new();
        assert!(store.load(&StorageKey::new("/missing")).unwrap().is_none());
    }

    #[test]
    fn save_applies_removals_before_upserts() {
        let store = InMemoryPropertyStore::new();
        store.seed(StorageKey::new("/a"), props("folder"));
        // One batch that both removes and re-creates the same key.
        let batch = batch_with(&["/a"], &["/a"]);
        store.save(&batch).unwrap();
        let loaded = store.load(&StorageKey::new("/a")).unwrap().unwrap();
        assert_eq!(loaded.format().as_str(), "file");
    }

    #[test]
    fn removing_missing_key_is_not_an_error() {
        let store = InMemoryPropertyStore::new();
        store.save(&batch_with(&[], &["/never-existed"])).unwrap();
        assert!(store.is_empty());
    }

    // -----------------------------------------------------------------------
    // Children listing
    // -----------------------------------------------------------------------

    #[test]
    fn children_lists_direct_names_only() {
        let store = InMemoryPropertyStore::new();
        store.seed(StorageKey::new("/site"), props("folder"));
        store.seed(StorageKey::new("/site/a"), props("file"));
        store.seed(StorageKey::new("/site/b"), props("folder"));
        store.seed(StorageKey::new("/site/b/deep"), props("file"));
        store.seed(StorageKey::new("/site2"), props("file"));

        let names = store.children(&StorageKey::new("/site")).unwrap();
        assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn children_of_root() {
        let store = InMemoryPropertyStore::new();
        store.seed(StorageKey::new("/a"), props("file"));
        store.seed(StorageKey::new("/b/c"), props("file"));
        let names = store.children(&StorageKey::root()).unwrap();
        assert_eq!(names, vec!["a".to_string()]);
    }

    #[test]
    fn children_of_leaf_is_empty() {
        let store = InMemoryPropertyStore::new();
        store.seed(StorageKey::new("/a"), props("file"));
        assert!(store.children(&StorageKey::new("/a")).unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Revision log
    // -----------------------------------------------------------------------

    #[test]
    fn revisions_accumulate_in_order() {
        let store = InMemoryPropertyStore::new();
        store.save(&batch_with(&["/a"], &[])).unwrap();
        store.save(&batch_with(&["/b"], &[])).unwrap();
        let revisions = store.revisions().unwrap();
        assert_eq!(revisions.len(), 2);
        assert_ne!(revisions[0].id, revisions[1].id);
        assert_eq!(revisions[1].touched[0].as_str(), "/b");
    }

    #[test]
    fn seed_does_not_create_revisions() {
        let store = InMemoryPropertyStore::new();
        store.seed(StorageKey::new("/a"), props("file"));
        assert!(store.revisions().unwrap().is_empty());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn discard_pending_is_a_noop() {
        let store = InMemoryPropertyStore::new();
        store.seed(StorageKey::new("/a"), props("file"));
        store.discard_pending().unwrap();
        store.discard_pending().unwrap();
        assert_eq!(store.len(), 1);
    }
}
