use std::sync::Arc;

use tracing::{debug, info};

use arbor_catalog::{Catalog, CatalogDocument};
use arbor_store::{PropertyStore, Revision, WriteBatch};
use arbor_types::{Actor, ResourcePath};

use crate::cache::{ResourceCache, SessionState};
use crate::error::{SessionError, SessionResult};

/// The staging state of one request, drained and ready to apply.
///
/// Built at end of request from the cache's three staging sets:
///
/// - `unindex` is `removed ∪ modified` — paths only, so the catalog entry
///   is deleted by key and a concurrently replaced document cannot leak a
///   stale entry.
/// - `index_docs` covers `created ∪ modified`: modified resources are
///   reindexed alongside new ones, so their derived fields never outlive
///   the properties they were computed from.
/// - `write` is the single coherent storage batch: upserts for
///   `created ∪ modified`, removals for `removed`.
pub struct CommitBatch {
    pub write: WriteBatch,
    pub index_docs: Vec<CatalogDocument>,
    pub unindex: Vec<ResourcePath>,
}

impl CommitBatch {
    /// Derive the batch from a cache's staged state. Leaves the cache
    /// untouched; clearing happens only after the batch is applied.
    pub fn build(cache: &ResourceCache, actor: &Actor, message: &str) -> SessionResult<Self> {
        let unindex: Vec<ResourcePath> =
            cache.removed.union(&cache.modified).cloned().collect();

        let mut write = WriteBatch::new(actor.clone(), message);
        for path in &cache.removed {
            write.remove(cache.resolver.storage_key(path));
        }

        let mut index_docs = Vec::new();
        for path in cache.created.union(&cache.modified) {
            let handle = cache.by_path.get(path).ok_or_else(|| SessionError::Conflict {
                path: path.clone(),
                reason: "staged resource is not materialized".to_string(),
            })?;
            let guard = handle.read().expect("lock poisoned");
            index_docs.push(guard.catalog_values());
            write.upsert(cache.resolver.storage_key(path), guard.metadata().clone());
        }

        Ok(Self {
            write,
            index_docs,
            unindex,
        })
    }

    /// Returns `true` if the batch carries no work at all.
    pub fn is_empty(&self) -> bool {
        self.write.is_empty() && self.index_docs.is_empty() && self.unindex.is_empty()
    }
}

/// End-of-request commit/abort protocol.
///
/// The coordinator owns the shared storage and catalog handles and is the
/// only code that writes to either. It submits one coherent batch per
/// request; atomicity of the save is delegated to the storage backend.
pub struct CommitCoordinator {
    store: Arc<dyn PropertyStore>,
    catalog: Arc<dyn Catalog>,
}

impl CommitCoordinator {
    pub fn new(store: Arc<dyn PropertyStore>, catalog: Arc<dyn Catalog>) -> Self {
        Self { store, catalog }
    }

    /// Reconcile the cache's staged state into storage and the catalog.
    ///
    /// Exactly one storage save is issued; the catalog is then updated
    /// unindex-first, so a modified resource's old entry is gone before its
    /// fresh one lands. Returns `None` for an empty commit, which still
    /// closes the cache. Any failure propagates fatally with no internal
    /// retry — partial resubmission could double-apply index deletions —
    /// and the cache stays abortable.
    pub fn commit(
        &self,
        cache: &mut ResourceCache,
        actor: &Actor,
        message: &str,
    ) -> SessionResult<Option<Revision>> {
        cache.ensure_active()?;
        let batch = CommitBatch::build(cache, actor, message)?;

        if batch.is_empty() {
            cache.clear();
            cache.state = SessionState::Committed;
            debug!("empty commit");
            return Ok(None);
        }

        let revision = self.store.save(&batch.write)?;
        for path in &batch.unindex {
            self.catalog.unindex(path)?;
        }
        for doc in &batch.index_docs {
            self.catalog.index(doc)?;
        }

        cache.clear();
        cache.state = SessionState::Committed;
        info!(
            revision = %revision.id.short_hex(),
            indexed = batch.index_docs.len(),
            unindexed = batch.unindex.len(),
            "session committed"
        );
        Ok(Some(revision))
    }

    /// Roll the request back: discard uncommitted storage writes and drop
    /// the cache's in-memory state. Never touches the catalog.
    ///
    /// Idempotent: aborting an already-closed cache is a no-op, so this is
    /// safe to call unconditionally from error paths.
    pub fn abort(&self, cache: &mut ResourceCache) -> SessionResult<()> {
        if cache.state != SessionState::Active {
            return Ok(());
        }
        self.store.discard_pending()?;
        cache.clear();
        cache.state = SessionState::Aborted;
        debug!("session aborted");
        Ok(())
    }
}

impl std::fmt::Debug for CommitCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitCoordinator").finish()
    }
}
