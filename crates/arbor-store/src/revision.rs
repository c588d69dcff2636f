use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::batch::WriteBatch;
use crate::error::{StoreError, StoreResult};
use crate::key::StorageKey;

/// Message recorded when a commit carries none.
const DEFAULT_MESSAGE: &str = "no comment";

/// Identifier of one durable save, derived from its content.
///
/// A `RevisionId` is the BLAKE3 hash of the batch content chained to the
/// previous revision, so the revision log forms a tamper-evident sequence.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RevisionId([u8; 32]);

impl RevisionId {
    /// Derive the id for a batch following `prev` in the log.
    pub fn derive(
        prev: Option<&RevisionId>,
        batch: &WriteBatch,
        timestamp: DateTime<Utc>,
    ) -> StoreResult<Self> {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"arbor-revision-v1:");
        match prev {
            Some(prev) => {
                hasher.update(b"prev:");
                hasher.update(&prev.0);
            }
            None => {
                hasher.update(b"genesis");
            }
        }
        hasher.update(b":at:");
        hasher.update(timestamp.to_rfc3339().as_bytes());
        hasher.update(b":batch:");
        let encoded = serde_json::to_vec(batch)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        hasher.update(&encoded);
        Ok(Self(*hasher.finalize().as_bytes()))
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Debug for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RevisionId({})", self.short_hex())
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Record of one durable save in the store's history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revision {
    pub id: RevisionId,
    /// Author signature in `name <email>` form.
    pub author: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// Keys touched by the save, removals first.
    pub touched: Vec<StorageKey>,
}

impl Revision {
    /// Build the revision record for a batch following `prev` in the log.
    pub fn for_batch(prev: Option<&RevisionId>, batch: &WriteBatch) -> StoreResult<Self> {
        let timestamp = Utc::now();
        let id = RevisionId::derive(prev, batch, timestamp)?;
        let message = if batch.message.trim().is_empty() {
            DEFAULT_MESSAGE.to_string()
        } else {
            batch.message.clone()
        };
        Ok(Self {
            id,
            author: batch.author.signature(),
            message,
            timestamp,
            touched: batch.touched_keys(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_types::{Actor, TypeTag};
    use crate::property::PropertySet;

    fn sample_batch(message: &str) -> WriteBatch {
        let mut batch = WriteBatch::new(Actor::new("ana", "ana@example.com"), message);
        batch.upsert(
            StorageKey::new("/page"),
            PropertySet::new(TypeTag::from("webpage")),
        );
        batch
    }

    #[test]
    fn empty_message_defaults() {
        let revision = Revision::for_batch(None, &sample_batch("  ")).unwrap();
        assert_eq!(revision.message, "no comment");
        assert_eq!(revision.author, "ana <ana@example.com>");
    }

    #[test]
    fn chained_ids_differ_from_genesis() {
        let batch = sample_batch("edit");
        let first = Revision::for_batch(None, &batch).unwrap();
        let second = Revision::for_batch(Some(&first.id), &batch).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn touched_keys_recorded() {
        let revision = Revision::for_batch(None, &sample_batch("edit")).unwrap();
        assert_eq!(revision.touched.len(), 1);
        assert_eq!(revision.touched[0].as_str(), "/page");
    }
}
