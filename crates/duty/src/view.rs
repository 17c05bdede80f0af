//! Read-only duty set queries.

use crate::errors::DutyResult;
use crate::metadata::MetadataStore;
use crate::params::ParamsStore;
use crate::provider::ValidatorSetProvider;
use crate::types::{ConsensusIdentity, DutyMetadata, DutySet, DutyValidator, Params};
use std::sync::Arc;
use tracing::debug;

/// Composes the roster, metadata and params into the queried duty set.
#[derive(Clone)]
pub struct DutySetView {
    validators: Arc<dyn ValidatorSetProvider>,
    metadata: MetadataStore,
    params: ParamsStore,
}

impl DutySetView {
    /// Create a view over the given collaborators
    pub fn new(
        validators: Arc<dyn ValidatorSetProvider>,
        metadata: MetadataStore,
        params: ParamsStore,
    ) -> Self {
        Self {
            validators,
            metadata,
            params,
        }
    }

    /// Bonded validators in roster order with their metadata, plus params.
    ///
    /// An empty roster yields an empty list.
    pub async fn get_duty_set(&self) -> DutyResult<DutySet> {
        let roster = self.validators.bonded_validators_by_power().await?;
        let mut validators = Vec::with_capacity(roster.len());
        for validator in &roster {
            let consensus_identity = validator.consensus_identity();
            validators.push(DutyValidator {
                consensus_identity,
                voting_power: validator.voting_power(),
                metadata: self.metadata.get(&consensus_identity).await?,
            });
        }
        let params = self.params.get_params().await?;

        debug!(
            validators = validators.len(),
            bound = validators.iter().filter(|v| v.metadata.is_some()).count(),
            "Derived duty set"
        );
        Ok(DutySet { validators, params })
    }

    /// Metadata for an identity given in its hex representation.
    ///
    /// An unparseable identity is `InvalidIdentity`; an unbound one is `None`.
    pub async fn get_metadata(&self, identity: &str) -> DutyResult<Option<DutyMetadata>> {
        let identity: ConsensusIdentity = identity.parse()?;
        self.metadata.get(&identity).await
    }

    /// Current params
    pub async fn params(&self) -> DutyResult<Params> {
        self.params.get_params().await
    }
}
