//! Domain events and the append-only event log
//!
//! Every successful mutation returns its [`DutyEvent`] and appends the same
//! value to the [`EventLog`]. The lifecycle observer appends informational
//! events to the same log.

use crate::keys::MODULE_NAME;
use crate::types::{ConsensusIdentity, OperatorIdentity};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Host validator lifecycle transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LifecycleKind {
    /// Validator entered the bonded set
    Bonded,
    /// Validator began unbonding
    Unbonding,
    /// Validator record was removed
    Removed,
}

impl LifecycleKind {
    /// Event type suffix for this transition
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleKind::Bonded => "validator_bonded",
            LifecycleKind::Unbonding => "validator_unbonding",
            LifecycleKind::Removed => "validator_removed",
        }
    }
}

/// What happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DutyEventKind {
    /// Metadata written wholesale by its operator
    MetadataSet {
        /// Identity whose metadata changed
        consensus_identity: ConsensusIdentity,
        /// Operator that signed the change
        operator: OperatorIdentity,
        /// New checkpoint key
        checkpoint_pub_key: String,
        /// New storage URI
        checkpoint_storage_uri: String,
    },

    /// Checkpoint key replaced, storage URI kept
    CheckpointKeyRotated {
        /// Identity whose key rotated
        consensus_identity: ConsensusIdentity,
        /// Operator that signed the rotation
        operator: OperatorIdentity,
        /// Key before rotation
        old_pub_key: String,
        /// Key after rotation
        new_pub_key: String,
    },

    /// Checkpoint key bound, storage URI cleared
    CheckpointKeyBound {
        /// Identity the key was bound to
        consensus_identity: ConsensusIdentity,
        /// Operator that signed the binding
        operator: OperatorIdentity,
        /// Bound checkpoint key
        checkpoint_pub_key: String,
    },

    /// Informational validator lifecycle notice
    ValidatorLifecycle {
        /// Which transition
        kind: LifecycleKind,
        /// Operator of the affected validator
        operator: OperatorIdentity,
        /// Consensus identity, when known
        consensus_identity: Option<ConsensusIdentity>,
        /// Voting power, when the validator could be looked up
        voting_power: Option<String>,
        /// Display name, when registered
        moniker: Option<String>,
    },
}

/// Recorded event with its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyEvent {
    /// Monotonic sequence number assigned by the log, starting at 0
    pub sequence: u64,
    /// Block height the event was emitted at
    pub height: u64,
    /// Event payload
    pub kind: DutyEventKind,
}

impl DutyEvent {
    /// Stable event type string, e.g. `duty.metadata_set`
    pub fn event_type(&self) -> String {
        let name = match &self.kind {
            DutyEventKind::MetadataSet { .. } => "metadata_set",
            DutyEventKind::CheckpointKeyRotated { .. } => "checkpoint_key_rotated",
            DutyEventKind::CheckpointKeyBound { .. } => "checkpoint_key_bound",
            DutyEventKind::ValidatorLifecycle { kind, .. } => kind.as_str(),
        };
        format!("{MODULE_NAME}.{name}")
    }

    /// Flat key/value attributes for hosts that forward events
    pub fn attributes(&self) -> Vec<(&'static str, String)> {
        let mut attrs = vec![("height", self.height.to_string())];
        match &self.kind {
            DutyEventKind::MetadataSet {
                consensus_identity,
                operator,
                checkpoint_pub_key,
                checkpoint_storage_uri,
            } => {
                attrs.push(("consensus_identity", consensus_identity.to_hex()));
                attrs.push(("operator", operator.to_string()));
                attrs.push(("checkpoint_pub_key", checkpoint_pub_key.clone()));
                attrs.push(("checkpoint_storage_uri", checkpoint_storage_uri.clone()));
            }
            DutyEventKind::CheckpointKeyRotated {
                consensus_identity,
                operator,
                old_pub_key,
                new_pub_key,
            } => {
                attrs.push(("consensus_identity", consensus_identity.to_hex()));
                attrs.push(("operator", operator.to_string()));
                attrs.push(("old_pub_key", old_pub_key.clone()));
                attrs.push(("new_pub_key", new_pub_key.clone()));
            }
            DutyEventKind::CheckpointKeyBound {
                consensus_identity,
                operator,
                checkpoint_pub_key,
            } => {
                attrs.push(("consensus_identity", consensus_identity.to_hex()));
                attrs.push(("operator", operator.to_string()));
                attrs.push(("checkpoint_pub_key", checkpoint_pub_key.clone()));
            }
            DutyEventKind::ValidatorLifecycle {
                operator,
                consensus_identity,
                voting_power,
                moniker,
                ..
            } => {
                attrs.push(("operator", operator.to_string()));
                if let Some(id) = consensus_identity {
                    attrs.push(("consensus_identity", id.to_hex()));
                }
                if let Some(power) = voting_power {
                    attrs.push(("voting_power", power.clone()));
                }
                if let Some(name) = moniker {
                    attrs.push(("moniker", name.clone()));
                }
            }
        }
        attrs
    }
}

/// Append-only, shareable event log.
///
/// Sequence numbers keep counting across [`EventLog::drain`], so a host that
/// consumes events once per block still sees a gap-free sequence.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    inner: Arc<Mutex<LogInner>>,
}

#[derive(Debug, Default)]
struct LogInner {
    events: Vec<DutyEvent>,
    next_sequence: u64,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, assigning the next sequence number
    pub fn append(&self, height: u64, kind: DutyEventKind) -> DutyEvent {
        let mut inner = self.inner.lock();
        let event = DutyEvent {
            sequence: inner.next_sequence,
            height,
            kind,
        };
        inner.next_sequence += 1;
        inner.events.push(event.clone());
        event
    }

    /// Copy of every retained event in order
    pub fn events(&self) -> Vec<DutyEvent> {
        self.inner.lock().events.clone()
    }

    /// Retained events with sequence >= `sequence`
    pub fn since(&self, sequence: u64) -> Vec<DutyEvent> {
        self.inner
            .lock()
            .events
            .iter()
            .filter(|e| e.sequence >= sequence)
            .cloned()
            .collect()
    }

    /// Remove and return every retained event
    pub fn drain(&self) -> Vec<DutyEvent> {
        std::mem::take(&mut self.inner.lock().events)
    }

    /// Sequence number the next appended event will receive
    pub fn next_sequence(&self) -> u64 {
        self.inner.lock().next_sequence
    }

    /// Number of retained events
    pub fn len(&self) -> usize {
        self.inner.lock().events.len()
    }

    /// Whether no events are retained
    pub fn is_empty(&self) -> bool {
        self.inner.lock().events.is_empty()
    }
}
