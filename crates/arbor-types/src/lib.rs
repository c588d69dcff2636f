//! Foundation types for the Arbor content repository.
//!
//! This crate provides the path, identity, and value types used throughout
//! the Arbor system. Every other Arbor crate depends on `arbor-types`.
//!
//! # Key Types
//!
//! - [`ResourcePath`] — Canonical absolute path addressing a resource
//! - [`TypeTag`] — Persisted format tag resolving a resource's concrete type
//! - [`Actor`] — Commit author identity (name and e-mail)
//! - [`PropertyValue`] — A single persisted property value

pub mod actor;
pub mod error;
pub mod path;
pub mod tag;
pub mod value;

pub use actor::Actor;
pub use error::TypeError;
pub use path::ResourcePath;
pub use tag::TypeTag;
pub use value::PropertyValue;
