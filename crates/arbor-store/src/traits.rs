use crate::batch::WriteBatch;
use crate::error::StoreResult;
use crate::key::StorageKey;
use crate::property::PropertySet;
use crate::revision::Revision;

/// Keyed property storage.
///
/// All implementations must satisfy these invariants:
/// - `save` applies the whole batch or none of it; partial application must
///   never be observable, even after a crash.
/// - `save` is the only mutation entry point; there is no per-record write.
/// - Reads of committed state are always safe while a save is in flight.
/// - All I/O errors are propagated, never silently ignored.
pub trait PropertyStore: Send + Sync {
    /// Load the property set stored under `key`.
    ///
    /// Returns `Ok(None)` if no record exists at that key.
    /// Returns `Err` on I/O failure or data corruption.
    fn load(&self, key: &StorageKey) -> StoreResult<Option<PropertySet>>;

    /// Names of the records stored directly under `key`, in order.
    ///
    /// Used to walk stored subtrees (e.g. for recursive removal). A key
    /// with no record may still have children; the two are independent.
    fn children(&self, key: &StorageKey) -> StoreResult<Vec<String>>;

    /// Apply a batch durably and record it as a revision.
    ///
    /// Removals are applied before upserts. Removing a missing key is not
    /// an error (the batch may tombstone records created and dropped within
    /// the same request, which never reached storage).
    fn save(&self, batch: &WriteBatch) -> StoreResult<Revision>;

    /// Drop any writes buffered ahead of a save.
    ///
    /// Called on request abort. Backends that stage nothing between saves
    /// implement this as a no-op; it must be safe to call at any time and
    /// idempotent.
    fn discard_pending(&self) -> StoreResult<()>;

    /// The revision log, oldest first.
    fn revisions(&self) -> StoreResult<Vec<Revision>>;
}
