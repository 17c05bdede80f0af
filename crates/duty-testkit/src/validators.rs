//! In-memory validator set
//!
//! Stands in for the host staking state. The roster is returned exactly as
//! stored; `add` keeps it in descending token order with operator as the
//! tiebreak.

use async_trait::async_trait;
use duty::{BondedValidator, DutyError, DutyResult, OperatorIdentity, ValidatorSetProvider};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Validator whose consensus key is derived from its operator name
pub fn test_validator(operator: &str, tokens: u128) -> BondedValidator {
    let consensus_pubkey = Sha256::digest(format!("consensus:{operator}").as_bytes()).to_vec();
    BondedValidator::new(operator, consensus_pubkey, tokens)
}

/// Fake [`ValidatorSetProvider`]
#[derive(Debug, Default)]
pub struct FakeValidatorSet {
    roster: RwLock<Vec<BondedValidator>>,
    failing: AtomicBool,
}

impl FakeValidatorSet {
    /// Empty roster
    pub fn new() -> Self {
        Self::default()
    }

    /// Roster stored in the given order
    pub fn with_roster(roster: Vec<BondedValidator>) -> Self {
        Self {
            roster: RwLock::new(roster),
            failing: AtomicBool::new(false),
        }
    }

    /// Insert or replace a validator, keeping power order
    pub async fn add(&self, validator: BondedValidator) {
        let mut roster = self.roster.write().await;
        roster.retain(|v| v.operator != validator.operator);
        roster.push(validator);
        roster.sort_by(|a, b| b.tokens.cmp(&a.tokens).then_with(|| a.operator.cmp(&b.operator)));
    }

    /// Drop a validator from the roster
    pub async fn remove(&self, operator: &str) {
        self.roster
            .write()
            .await
            .retain(|v| v.operator.as_str() != operator);
    }

    /// Replace the roster verbatim, in the given order
    pub async fn replace_roster(&self, roster: Vec<BondedValidator>) {
        *self.roster.write().await = roster;
    }

    /// Make every lookup fail with a storage error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check_available(&self) -> DutyResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DutyError::storage("validator set unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl ValidatorSetProvider for FakeValidatorSet {
    async fn bonded_validators_by_power(&self) -> DutyResult<Vec<BondedValidator>> {
        self.check_available()?;
        Ok(self.roster.read().await.clone())
    }

    async fn validator_by_operator(
        &self,
        operator: &OperatorIdentity,
    ) -> DutyResult<Option<BondedValidator>> {
        self.check_available()?;
        Ok(self
            .roster
            .read()
            .await
            .iter()
            .find(|v| &v.operator == operator)
            .cloned())
    }
}
