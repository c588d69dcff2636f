//! Typed resources for the Arbor content repository.
//!
//! A [`Resource`] joins a canonical path, a persisted property set, and
//! optional content handlers. Storage is polymorphic by the property set's
//! type tag; the [`TypeRegistry`] maps each tag to the constructor that
//! materializes the right kind of resource when it is loaded back.
//!
//! # Key Types
//!
//! - [`Resource`] — A path-addressed, typed entity
//! - [`ResourceRef`] — The shared handle a session hands out
//! - [`ResourceKind`] — Container vs leaf
//! - [`ContentHandler`] — A named content attachment
//! - [`TypeRegistry`] — Tag → constructor map

pub mod error;
pub mod registry;
pub mod resource;

pub use error::{ResourceError, ResourceResult};
pub use registry::{Constructor, TypeRegistry};
pub use resource::{ContentHandler, Resource, ResourceKind, ResourceRef};
