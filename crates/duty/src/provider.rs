//! Validator set capability consumed from the host.

use crate::errors::DutyResult;
use crate::types::{BondedValidator, OperatorIdentity};
use async_trait::async_trait;
use std::sync::Arc;

/// Read access to the host's bonded validator roster.
///
/// The roster is owned and ordered by the host; this module never reorders or
/// filters it.
#[async_trait]
pub trait ValidatorSetProvider: Send + Sync {
    /// Bonded validators in descending voting-power order
    async fn bonded_validators_by_power(&self) -> DutyResult<Vec<BondedValidator>>;

    /// Validator controlled by `operator`, if it is a recognized validator
    async fn validator_by_operator(
        &self,
        operator: &OperatorIdentity,
    ) -> DutyResult<Option<BondedValidator>>;
}

#[async_trait]
impl<T: ValidatorSetProvider + ?Sized> ValidatorSetProvider for Arc<T> {
    async fn bonded_validators_by_power(&self) -> DutyResult<Vec<BondedValidator>> {
        (**self).bonded_validators_by_power().await
    }

    async fn validator_by_operator(
        &self,
        operator: &OperatorIdentity,
    ) -> DutyResult<Option<BondedValidator>> {
        (**self).validator_by_operator(operator).await
    }
}
