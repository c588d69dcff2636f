use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use arbor_resource::ResourceRef;
use arbor_types::ResourcePath;

use crate::error::{SessionError, SessionResult};
use crate::resolver::PathResolver;

/// Lifecycle state of a session cache.
///
/// A cache moves through `Active → {Committed | Aborted}` exactly once and
/// is inert afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Active,
    Committed,
    Aborted,
}

/// Per-request identity cache with staging sets.
///
/// The cache is the authoritative in-request view of the repository:
/// repeated lookups of one path return the identical handle, reads observe
/// the request's own prior writes (including removals), and every mutation
/// is staged in one of three pairwise-disjoint sets until commit:
///
/// - `created` — paths created this request, not yet durable
/// - `modified` — pre-existing paths whose properties changed
/// - `removed` — tombstones; lookups never fall through to storage
///
/// One cache serves exactly one request and is never shared; isolation
/// between concurrent requests is total at this layer.
pub struct ResourceCache {
    pub(crate) resolver: PathResolver,
    pub(crate) by_path: BTreeMap<ResourcePath, ResourceRef>,
    pub(crate) created: BTreeSet<ResourcePath>,
    pub(crate) modified: BTreeSet<ResourcePath>,
    pub(crate) removed: BTreeSet<ResourcePath>,
    pub(crate) state: SessionState,
}

impl ResourceCache {
    /// Create an empty cache resolving through `resolver`.
    pub fn new(resolver: PathResolver) -> Self {
        Self {
            resolver,
            by_path: BTreeMap::new(),
            created: BTreeSet::new(),
            modified: BTreeSet::new(),
            removed: BTreeSet::new(),
            state: SessionState::Active,
        }
    }

    /// The cache's lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub(crate) fn ensure_active(&self) -> SessionResult<()> {
        if self.state != SessionState::Active {
            return Err(SessionError::SessionClosed);
        }
        Ok(())
    }

    /// Look up a resource, failing when it does not exist.
    pub fn get(&mut self, path: &ResourcePath) -> SessionResult<ResourceRef> {
        self.try_get(path)?
            .ok_or_else(|| SessionError::NotFound(path.clone()))
    }

    /// Soft lookup: `Ok(None)` instead of an error when nothing is found.
    ///
    /// A cache hit returns the identical handle as every previous lookup of
    /// the path this request. A tombstoned path is absent without touching
    /// storage, so a delete-then-read observes the deletion.
    pub fn try_get(&mut self, path: &ResourcePath) -> SessionResult<Option<ResourceRef>> {
        self.ensure_active()?;
        if let Some(hit) = self.by_path.get(path) {
            return Ok(Some(hit.clone()));
        }
        if self.removed.contains(path) {
            return Ok(None);
        }
        let Some(resource) = self.resolver.resolve(path)? else {
            return Ok(None);
        };
        let handle = resource.into_ref();
        self.by_path.insert(path.clone(), handle.clone());
        Ok(Some(handle))
    }

    /// Register a brand-new resource, and every descendant materialized
    /// under it, as created this request.
    ///
    /// Descendants are drained from the resource's `children` lists with an
    /// explicit worklist; after `add` the subtree lives flat in the cache,
    /// keyed by path. Re-adding a tombstoned path revives it as created
    /// (delete-then-recreate within one request), keeping the staging sets
    /// pairwise disjoint.
    pub fn add(&mut self, resource: ResourceRef) -> SessionResult<()> {
        self.ensure_active()?;
        let mut worklist = vec![resource];
        while let Some(handle) = worklist.pop() {
            let (path, children) = {
                let mut guard = handle.write().expect("lock poisoned");
                (guard.path().clone(), guard.take_children())
            };
            self.removed.remove(&path);
            self.modified.remove(&path);
            self.by_path.insert(path.clone(), handle.clone());
            self.created.insert(path);
            worklist.extend(children);
        }
        Ok(())
    }

    /// Tombstone the resource at `path` and, for containers, every
    /// descendant — cached or stored.
    ///
    /// The full affected set is computed before anything is touched, so the
    /// in-memory view never exposes a half-removed subtree. Each affected
    /// path is evicted from the cache, discarded from `created`/`modified`,
    /// and tombstoned.
    pub fn remove(&mut self, path: &ResourcePath) -> SessionResult<()> {
        self.ensure_active()?;
        if self.removed.contains(path) {
            return Err(SessionError::Conflict {
                path: path.clone(),
                reason: "already removed in this session".to_string(),
            });
        }
        let resource = self
            .try_get(path)?
            .ok_or_else(|| SessionError::NotFound(path.clone()))?;
        let is_container = resource.read().expect("lock poisoned").is_container();

        let mut affected: BTreeSet<ResourcePath> = BTreeSet::new();
        affected.insert(path.clone());
        if is_container {
            // Cached descendants: contiguous range after the path itself.
            for cached in self
                .by_path
                .range(path.clone()..)
                .map(|(p, _)| p)
                .take_while(|p| p.starts_with(path))
            {
                affected.insert(cached.clone());
            }
            // Stored descendants, walked through the resolver. Paths
            // tombstoned earlier this request stay tombstoned.
            let mut stack = vec![path.clone()];
            while let Some(current) = stack.pop() {
                for name in self.resolver.children(&current)? {
                    let child = current.child(&name)?;
                    if self.removed.contains(&child) {
                        continue;
                    }
                    affected.insert(child.clone());
                    stack.push(child);
                }
            }
        }

        for p in &affected {
            self.by_path.remove(p);
            self.created.remove(p);
            self.modified.remove(p);
            self.removed.insert(p.clone());
        }
        debug!(path = %path, affected = affected.len(), "removed");
        Ok(())
    }

    /// Record that the resource's properties changed this request.
    ///
    /// Marking a tombstoned path is a conflict. Marking a created path is a
    /// no-op: new resources are saved and indexed in full regardless, and
    /// tracking them as modified too would double-count them.
    pub fn mark_modified(&mut self, path: &ResourcePath) -> SessionResult<()> {
        self.ensure_active()?;
        if self.removed.contains(path) {
            return Err(SessionError::Conflict {
                path: path.clone(),
                reason: "cannot modify a resource staged for removal".to_string(),
            });
        }
        if self.created.contains(path) {
            return Ok(());
        }
        if !self.by_path.contains_key(path) {
            return Err(SessionError::NotFound(path.clone()));
        }
        self.modified.insert(path.clone());
        Ok(())
    }

    /// Soft lookup of the user named `name` under the shared `/users` space.
    pub fn user(&mut self, name: &str) -> SessionResult<Option<ResourceRef>> {
        let path = ResourcePath::root().child("users")?.child(name)?;
        self.try_get(&path)
    }

    /// Paths created this request.
    pub fn created(&self) -> &BTreeSet<ResourcePath> {
        &self.created
    }

    /// Paths modified this request.
    pub fn modified(&self) -> &BTreeSet<ResourcePath> {
        &self.modified
    }

    /// Paths tombstoned this request.
    pub fn removed(&self) -> &BTreeSet<ResourcePath> {
        &self.removed
    }

    /// Number of resources materialized in the cache.
    pub fn len(&self) -> usize {
        self.by_path.len()
    }

    /// Returns `true` if no resource is materialized.
    pub fn is_empty(&self) -> bool {
        self.by_path.is_empty()
    }

    /// Returns `true` if nothing has been staged.
    pub fn is_clean(&self) -> bool {
        self.created.is_empty() && self.modified.is_empty() && self.removed.is_empty()
    }

    /// Drop every entry and staging set, ending the request's view.
    pub(crate) fn clear(&mut self) {
        self.by_path.clear();
        self.created.clear();
        self.modified.clear();
        self.removed.clear();
    }
}

impl std::fmt::Debug for ResourceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceCache")
            .field("state", &self.state)
            .field("cached", &self.by_path.len())
            .field("created", &self.created.len())
            .field("modified", &self.modified.len())
            .field("removed", &self.removed.len())
            .finish()
    }
}
