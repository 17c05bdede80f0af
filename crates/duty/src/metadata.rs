//! Per-validator checkpoint metadata store.

use crate::errors::{DutyError, DutyResult};
use crate::keys::metadata_key;
use crate::storage::{DutyStorage, WriteBatch};
use crate::types::{ConsensusIdentity, DutyMetadata};
use std::sync::Arc;

/// Keyed by raw consensus identity bytes; values are JSON records.
///
/// `put` performs no authorization. Callers check the operator first.
#[derive(Clone)]
pub struct MetadataStore {
    storage: Arc<dyn DutyStorage>,
}

impl MetadataStore {
    /// Create a metadata store over `storage`
    pub fn new(storage: Arc<dyn DutyStorage>) -> Self {
        Self { storage }
    }

    /// Metadata bound to `identity`, if any
    pub async fn get(&self, identity: &ConsensusIdentity) -> DutyResult<Option<DutyMetadata>> {
        let Some(raw) = self.storage.get(&metadata_key(identity)).await? else {
            return Ok(None);
        };
        let metadata = serde_json::from_slice(&raw).map_err(|e| {
            DutyError::serialization(format!("corrupt metadata for {identity}: {e}"))
        })?;
        Ok(Some(metadata))
    }

    /// Upsert metadata for `identity`
    pub async fn put(&self, identity: &ConsensusIdentity, metadata: &DutyMetadata) -> DutyResult<()> {
        let mut batch = WriteBatch::new();
        batch.put(metadata_key(identity), serde_json::to_vec(metadata)?);
        self.storage.commit(batch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;

    fn store() -> MetadataStore {
        MetadataStore::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_absent_identity_is_none() {
        let id = ConsensusIdentity::from_bytes([3u8; 20]);
        assert!(store().get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let metadata = store();
        let id = ConsensusIdentity::from_bytes([4u8; 20]);

        metadata.put(&id, &DutyMetadata::new("0xabc", "s3://b/p")).await.unwrap();
        metadata.put(&id, &DutyMetadata::new("0xdef", "")).await.unwrap();

        assert_eq!(
            metadata.get(&id).await.unwrap(),
            Some(DutyMetadata::new("0xdef", ""))
        );
    }

    #[tokio::test]
    async fn test_identities_are_isolated() {
        let metadata = store();
        let a = ConsensusIdentity::from_bytes([1u8; 20]);
        let b = ConsensusIdentity::from_bytes([2u8; 20]);

        metadata.put(&a, &DutyMetadata::new("ka", "ua")).await.unwrap();
        assert!(metadata.get(&b).await.unwrap().is_none());
    }

    proptest! {
        #[test]
        fn put_then_get_returns_record(
            bytes in any::<[u8; 20]>(),
            key in ".*",
            uri in ".*",
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let metadata = store();
            let id = ConsensusIdentity::from_bytes(bytes);
            let record = DutyMetadata::new(key, uri);

            rt.block_on(metadata.put(&id, &record)).unwrap();
            prop_assert_eq!(rt.block_on(metadata.get(&id)).unwrap(), Some(record));
        }
    }
}
