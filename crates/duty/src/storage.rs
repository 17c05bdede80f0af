//! Storage capability for the duty key space
//!
//! Both leaf stores sit on [`DutyStorage`]. A [`WriteBatch`] is the unit of
//! atomicity: a backend must apply every write in a batch or none of them.

use crate::errors::DutyResult;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Ordered set of writes committed together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBatch {
    writes: Vec<(Vec<u8>, Vec<u8>)>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a write; later writes to the same key win
    pub fn put(&mut self, key: Vec<u8>, value: Vec<u8>) -> &mut Self {
        self.writes.push((key, value));
        self
    }

    /// Number of staged writes
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Whether no writes are staged
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Consume the batch into its writes
    pub fn into_writes(self) -> Vec<(Vec<u8>, Vec<u8>)> {
        self.writes
    }
}

/// Key-value capability provided by the host state store.
#[async_trait]
pub trait DutyStorage: Send + Sync {
    /// Read a value
    async fn get(&self, key: &[u8]) -> DutyResult<Option<Vec<u8>>>;

    /// Atomically apply a batch of writes
    async fn commit(&self, batch: WriteBatch) -> DutyResult<()>;
}

#[async_trait]
impl<T: DutyStorage + ?Sized> DutyStorage for Arc<T> {
    async fn get(&self, key: &[u8]) -> DutyResult<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn commit(&self, batch: WriteBatch) -> DutyResult<()> {
        (**self).commit(batch).await
    }
}

/// In-memory storage handler
///
/// A batch is applied under a single write guard, so readers observe either
/// none or all of it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// Whether the store holds no keys
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    /// Copy of the full key space, for snapshot comparisons
    pub async fn snapshot(&self) -> BTreeMap<Vec<u8>, Vec<u8>> {
        self.data.read().await.clone()
    }
}

#[async_trait]
impl DutyStorage for MemoryStore {
    async fn get(&self, key: &[u8]) -> DutyResult<Option<Vec<u8>>> {
        let data = self.data.read().await;
        Ok(data.get(key).cloned())
    }

    async fn commit(&self, batch: WriteBatch) -> DutyResult<()> {
        let mut data = self.data.write().await;
        for (key, value) in batch.into_writes() {
            data.insert(key, value);
        }
        Ok(())
    }
}
