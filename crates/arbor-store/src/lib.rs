//! Property storage for the Arbor content repository.
//!
//! Every resource persists as a [`PropertySet`] under a [`StorageKey`].
//! Mutations never reach a backend one at a time: a request accumulates its
//! changes elsewhere and submits them here as a single [`WriteBatch`], which
//! the backend applies all-or-nothing and records as a [`Revision`].
//!
//! # Storage Backends
//!
//! All backends implement the [`PropertyStore`] trait:
//!
//! - [`InMemoryPropertyStore`] — `BTreeMap`-based store for tests and embedding
//!
//! # Design Rules
//!
//! 1. A batch is applied atomically or not at all; partial application is a
//!    backend bug.
//! 2. Re-saving identical content is allowed and harmless.
//! 3. The store never interprets property values — it is a keyed record store.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod batch;
pub mod error;
pub mod key;
pub mod memory;
pub mod property;
pub mod revision;
pub mod traits;

pub use batch::WriteBatch;
pub use error::{StoreError, StoreResult};
pub use key::StorageKey;
pub use memory::InMemoryPropertyStore;
pub use property::PropertySet;
pub use revision::{Revision, RevisionId};
pub use traits::PropertyStore;
