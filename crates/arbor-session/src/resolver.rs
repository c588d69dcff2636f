use std::sync::Arc;

use tracing::debug;

use arbor_catalog::{Catalog, Query};
use arbor_resource::{Resource, TypeRegistry};
use arbor_store::{PropertyStore, StorageKey};
use arbor_types::ResourcePath;

use crate::error::SessionResult;

/// Maps logical paths to physical storage records and materializes them.
///
/// A resolver is scoped to one request: it carries the request's virtual
/// host, if any. Host-qualified and host-agnostic key spaces are distinct;
/// everything under `/users` is deliberately host-agnostic even when a
/// virtual host is active, because user identities are shared across hosts.
pub struct PathResolver {
    store: Arc<dyn PropertyStore>,
    registry: Arc<TypeRegistry>,
    host: Option<String>,
}

impl PathResolver {
    /// Create a host-agnostic resolver.
    pub fn new(store: Arc<dyn PropertyStore>, registry: Arc<TypeRegistry>) -> Self {
        Self {
            store,
            registry,
            host: None,
        }
    }

    /// Scope the resolver to a virtual host.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// The virtual host this resolver is scoped to.
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// The physical key backing a logical path.
    pub fn storage_key(&self, path: &ResourcePath) -> StorageKey {
        // /users/... is shared identity space, never host-qualified.
        if path.segments().first().map(String::as_str) == Some("users") {
            return StorageKey::new(path.to_string());
        }
        match &self.host {
            Some(host) if path.is_root() => StorageKey::new(format!("/{host}")),
            Some(host) => StorageKey::new(format!("/{host}{path}")),
            None => StorageKey::new(path.to_string()),
        }
    }

    /// Load and materialize the resource at `path`.
    ///
    /// Returns `Ok(None)` when no record exists at the mapped key. A record
    /// whose type tag has no registered constructor is an error, not an
    /// absence.
    pub fn resolve(&self, path: &ResourcePath) -> SessionResult<Option<Resource>> {
        let key = self.storage_key(path);
        let Some(properties) = self.store.load(&key)? else {
            return Ok(None);
        };
        debug!(path = %path, key = %key, format = %properties.format(), "resolved");
        let resource = self.registry.construct(path.clone(), properties)?;
        Ok(Some(resource))
    }

    /// Names of the children stored under `path`.
    pub fn children(&self, path: &ResourcePath) -> SessionResult<Vec<String>> {
        let key = self.storage_key(path);
        Ok(self.store.children(&key)?)
    }
}

impl std::fmt::Debug for PathResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathResolver")
            .field("host", &self.host)
            .finish()
    }
}

/// Find the site root serving `hostname`, by catalog search on the
/// `vhosts` field.
///
/// Returns the root's name, or `None` when no site claims the host.
pub fn host_for(catalog: &dyn Catalog, hostname: &str) -> SessionResult<Option<String>> {
    let results = catalog.search(&Query::phrase("vhosts", hostname))?;
    let Some(doc) = results.first() else {
        return Ok(None);
    };
    let name = doc
        .abspath()
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| doc.abspath().to_string());
    Ok(Some(name))
}
