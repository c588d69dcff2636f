//! Request-scoped resource cache and commit protocol.
//!
//! One [`ResourceCache`] is created per request and fully consumed within
//! it. Handlers stage every mutation against the cache; nothing touches
//! storage or the catalog until the end of the request, when the
//! [`CommitCoordinator`] drains the staged state into one [`CommitBatch`]
//! and issues a single durable save plus the matching index updates. On any
//! request-handling error the cache is aborted instead, and no partial
//! state survives.
//!
//! # Key Types
//!
//! - [`ResourceCache`] — Per-request identity cache with staging sets
//! - [`PathResolver`] — Logical path + virtual host → physical record
//! - [`CommitCoordinator`] — End-of-request commit/abort protocol
//! - [`CommitBatch`] — The drained staging state, ready to apply
//! - [`SessionError`] — Error taxonomy for the whole session layer
//!
//! # Lifecycle
//!
//! A cache moves through `Active → {Committed | Aborted}` exactly once;
//! every staging operation on a closed cache fails with
//! [`SessionError::SessionClosed`]. Abort is idempotent and safe to call at
//! any point.

pub mod cache;
pub mod commit;
pub mod error;
pub mod resolver;

pub use cache::{ResourceCache, SessionState};
pub use commit::{CommitBatch, CommitCoordinator};
pub use error::{SessionError, SessionResult};
pub use resolver::{host_for, PathResolver};
