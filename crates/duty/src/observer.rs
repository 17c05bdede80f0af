//! Validator lifecycle observer
//!
//! The host delivers bonding transitions as [`ValidatorLifecycleEvent`]s. The
//! observer annotates them from the validator set and records an informational
//! event. It never mutates duty state and never reports failure to the host: a
//! lookup miss or provider error produces a degraded event instead.

use crate::events::{DutyEvent, DutyEventKind, EventLog, LifecycleKind};
use crate::provider::ValidatorSetProvider;
use crate::types::{BondedValidator, ConsensusIdentity, ExecutionContext, OperatorIdentity};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Notification delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidatorLifecycleEvent {
    /// Validator joined the bonded set
    Bonded {
        /// Validator operator
        operator: OperatorIdentity,
    },
    /// Validator started unbonding
    Unbonding {
        /// Validator operator
        operator: OperatorIdentity,
    },
    /// Validator record removed; the host may already have forgotten it
    Removed {
        /// Validator operator
        operator: OperatorIdentity,
        /// Consensus identity, if the host still knew it
        consensus_identity: Option<ConsensusIdentity>,
    },
}

/// Turns host lifecycle notifications into informational events.
#[derive(Clone)]
pub struct LifecycleEventObserver {
    validators: Arc<dyn ValidatorSetProvider>,
    events: EventLog,
}

impl LifecycleEventObserver {
    /// Create an observer recording into `events`
    pub fn new(validators: Arc<dyn ValidatorSetProvider>, events: EventLog) -> Self {
        Self { validators, events }
    }

    /// Handle one notification; always records exactly one event
    pub async fn handle(&self, ctx: ExecutionContext, notification: ValidatorLifecycleEvent) -> DutyEvent {
        let (kind, operator, known_identity) = match notification {
            ValidatorLifecycleEvent::Bonded { operator } => (LifecycleKind::Bonded, operator, None),
            ValidatorLifecycleEvent::Unbonding { operator } => {
                (LifecycleKind::Unbonding, operator, None)
            }
            ValidatorLifecycleEvent::Removed {
                operator,
                consensus_identity,
            } => (LifecycleKind::Removed, operator, consensus_identity),
        };

        let kind = match self.lookup(&operator).await {
            Some(validator) => DutyEventKind::ValidatorLifecycle {
                kind,
                consensus_identity: Some(validator.consensus_identity()),
                voting_power: Some(validator.voting_power()),
                moniker: validator.moniker,
                operator,
            },
            None => DutyEventKind::ValidatorLifecycle {
                kind,
                operator,
                consensus_identity: known_identity,
                voting_power: None,
                moniker: None,
            },
        };
        self.events.append(ctx.height, kind)
    }

    async fn lookup(&self, operator: &OperatorIdentity) -> Option<BondedValidator> {
        match self.validators.validator_by_operator(operator).await {
            Ok(found) => {
                if found.is_none() {
                    debug!(operator = %operator, "Lifecycle lookup miss, emitting degraded event");
                }
                found
            }
            Err(e) => {
                debug!(operator = %operator, error = %e, "Lifecycle lookup failed, emitting degraded event");
                None
            }
        }
    }
}
