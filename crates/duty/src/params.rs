//! Quorum parameter store.
//!
//! Numerator and denominator are stored as two independently keyed JSON
//! scalars. A field that was never written reads back as its default.

use crate::errors::{DutyError, DutyResult};
use crate::keys::{params_key, KEY_QUORUM_DENOMINATOR, KEY_QUORUM_NUMERATOR};
use crate::storage::{DutyStorage, WriteBatch};
use crate::types::Params;
use std::sync::Arc;
use tracing::{debug, info};

/// Reads and writes [`Params`] through the shared storage capability.
#[derive(Clone)]
pub struct ParamsStore {
    storage: Arc<dyn DutyStorage>,
}

impl ParamsStore {
    /// Create a params store over `storage`
    pub fn new(storage: Arc<dyn DutyStorage>) -> Self {
        Self { storage }
    }

    /// Current params, with defaults for any unset field.
    ///
    /// Only an infrastructure failure of the backing store surfaces as an error.
    pub async fn get_params(&self) -> DutyResult<Params> {
        let defaults = Params::default();
        let quorum_numerator = self
            .read_field(KEY_QUORUM_NUMERATOR)
            .await?
            .unwrap_or(defaults.quorum_numerator);
        let quorum_denominator = self
            .read_field(KEY_QUORUM_DENOMINATOR)
            .await?
            .unwrap_or(defaults.quorum_denominator);
        Ok(Params::new(quorum_numerator, quorum_denominator))
    }

    /// Validate and persist params; both fields land in one batch.
    pub async fn set_params(&self, params: Params) -> DutyResult<()> {
        params.validate()?;

        let mut batch = WriteBatch::new();
        batch
            .put(
                params_key(KEY_QUORUM_NUMERATOR),
                serde_json::to_vec(&params.quorum_numerator)?,
            )
            .put(
                params_key(KEY_QUORUM_DENOMINATOR),
                serde_json::to_vec(&params.quorum_denominator)?,
            );
        self.storage.commit(batch).await?;

        info!(
            quorum_numerator = params.quorum_numerator,
            quorum_denominator = params.quorum_denominator,
            "Updated duty params"
        );
        Ok(())
    }

    async fn read_field(&self, field: &[u8]) -> DutyResult<Option<u32>> {
        let Some(raw) = self.storage.get(&params_key(field)).await? else {
            return Ok(None);
        };
        let value: u32 = serde_json::from_slice(&raw).map_err(|e| {
            DutyError::serialization(format!(
                "corrupt param {}: {e}",
                String::from_utf8_lossy(field)
            ))
        })?;
        debug!(field = %String::from_utf8_lossy(field), value, "Read duty param");
        Ok(Some(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use proptest::prelude::*;

    fn store() -> (ParamsStore, MemoryStore) {
        let backend = MemoryStore::new();
        (ParamsStore::new(Arc::new(backend.clone())), backend)
    }

    fn block_on<F: std::future::Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }

    #[tokio::test]
    async fn test_defaults_when_unset() {
        let (params, _) = store();
        assert_eq!(params.get_params().await.unwrap(), Params::new(2, 3));
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (params, _) = store();
        params.set_params(Params::new(3, 4)).await.unwrap();
        assert_eq!(params.get_params().await.unwrap(), Params::new(3, 4));
    }

    #[tokio::test]
    async fn test_rejected_params_write_nothing() {
        let (params, backend) = store();
        let err = params.set_params(Params::new(5, 4)).await.unwrap_err();
        assert_eq!(err, DutyError::invalid_params(5, 4));
        assert!(backend.is_empty().await);
    }

    #[tokio::test]
    async fn test_fields_stored_independently() {
        let (params, backend) = store();
        let mut batch = WriteBatch::new();
        batch.put(params_key(KEY_QUORUM_NUMERATOR), b"1".to_vec());
        backend.commit(batch).await.unwrap();

        assert_eq!(params.get_params().await.unwrap(), Params::new(1, 3));
    }

    #[tokio::test]
    async fn test_corrupt_field_is_infrastructure_error() {
        let (params, backend) = store();
        let mut batch = WriteBatch::new();
        batch.put(params_key(KEY_QUORUM_DENOMINATOR), b"\"three\"".to_vec());
        backend.commit(batch).await.unwrap();

        let err = params.get_params().await.unwrap_err();
        assert!(err.is_infrastructure());
    }

    proptest! {
        #[test]
        fn invalid_quorum_always_rejected(n in 0u32..1000, d in 0u32..1000) {
            prop_assume!(n == 0 || d == 0 || n > d);
            let (params, _) = store();
            let result = block_on(params.set_params(Params::new(n, d)));
            prop_assert_eq!(result, Err(DutyError::invalid_params(n, d)));
        }

        #[test]
        fn valid_quorum_roundtrips(d in 1u32..=u32::MAX, seed in any::<u32>()) {
            let n = seed % d + 1;
            let (params, _) = store();
            block_on(params.set_params(Params::new(n, d))).unwrap();
            prop_assert_eq!(block_on(params.get_params()).unwrap(), Params::new(n, d));
        }
    }
}
