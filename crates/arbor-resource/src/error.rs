use arbor_types::TypeTag;
use thiserror::Error;

/// Errors from resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// No constructor is registered for the persisted type tag.
    #[error("unknown resource type: {0}")]
    UnknownType(TypeTag),

    /// A type tag is already registered.
    #[error("type already registered: {0}")]
    AlreadyRegistered(TypeTag),
}

/// Result alias for resource operations.
pub type ResourceResult<T> = Result<T, ResourceError>;
