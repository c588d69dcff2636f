use arbor_catalog::CatalogError;
use arbor_resource::ResourceError;
use arbor_store::StoreError;
use arbor_types::{ResourcePath, TypeError};
use thiserror::Error;

/// Errors from session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No resource exists at the path (the soft lookup form returns `None`
    /// instead of this error).
    #[error("resource not found: {0}")]
    NotFound(ResourcePath),

    /// A staging operation would produce an invalid state transition, e.g.
    /// marking a tombstoned path as modified.
    #[error("conflict at {path}: {reason}")]
    Conflict { path: ResourcePath, reason: String },

    /// The cache was already committed or aborted; a closed session accepts
    /// no further operations.
    #[error("session is closed")]
    SessionClosed,

    /// A persisted type tag could not be resolved.
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// A path failed validation.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Storage failure. Fatal for the request; the caller must abort.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Catalog failure. Fatal for the request; the caller must abort.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

/// Result alias for session operations.
pub type SessionResult<T> = Result<T, SessionError>;
