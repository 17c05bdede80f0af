//! Strongly typed identities, records and views for the duty module.

use crate::errors::{DutyError, DutyResult};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

/// Length in bytes of a consensus identity.
pub const CONSENSUS_IDENTITY_LEN: usize = 20;

/// Default quorum numerator.
pub const DEFAULT_QUORUM_NUMERATOR: u32 = 2;

/// Default quorum denominator.
pub const DEFAULT_QUORUM_DENOMINATOR: u32 = 3;

/// Identifier derived from a validator's consensus (block-signing) public key.
///
/// Displayed, parsed and serialized as 40 lowercase hex characters. Parsing
/// also accepts a leading `0x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct ConsensusIdentity([u8; CONSENSUS_IDENTITY_LEN]);

impl ConsensusIdentity {
    /// Wrap raw identity bytes.
    pub const fn from_bytes(bytes: [u8; CONSENSUS_IDENTITY_LEN]) -> Self {
        Self(bytes)
    }

    /// Derive the identity from a consensus public key: the first 20 bytes of
    /// its SHA-256 digest.
    pub fn from_consensus_pubkey(pubkey: &[u8]) -> Self {
        let digest = Sha256::digest(pubkey);
        let mut bytes = [0u8; CONSENSUS_IDENTITY_LEN];
        bytes.copy_from_slice(&digest[..CONSENSUS_IDENTITY_LEN]);
        Self(bytes)
    }

    /// Borrow the raw bytes.
    pub fn as_bytes(&self) -> &[u8; CONSENSUS_IDENTITY_LEN] {
        &self.0
    }

    /// Lowercase hex representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for ConsensusIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl FromStr for ConsensusIdentity {
    type Err = DutyError;

    fn from_str(s: &str) -> DutyResult<Self> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(DutyError::invalid_identity("empty consensus identity"));
        }
        let raw = hex::decode(digits)?;
        let bytes: [u8; CONSENSUS_IDENTITY_LEN] = raw.as_slice().try_into().map_err(|_| {
            DutyError::invalid_identity(format!(
                "expected {CONSENSUS_IDENTITY_LEN} bytes, got {}",
                raw.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

impl From<ConsensusIdentity> for String {
    fn from(id: ConsensusIdentity) -> Self {
        id.to_hex()
    }
}

impl TryFrom<String> for ConsensusIdentity {
    type Error = DutyError;

    fn try_from(value: String) -> DutyResult<Self> {
        value.parse()
    }
}

/// Account that administratively controls a validator.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperatorIdentity(String);

impl OperatorIdentity {
    /// Create a new operator identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the underlying string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identity is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for OperatorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OperatorIdentity {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for OperatorIdentity {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Checkpoint-signing metadata bound to one consensus identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyMetadata {
    /// Off-chain checkpoint signing key
    pub checkpoint_pub_key: String,
    /// Where the validator publishes signed checkpoints; empty right after a bind
    pub checkpoint_storage_uri: String,
}

impl DutyMetadata {
    /// Create metadata from a key and storage URI.
    pub fn new(checkpoint_pub_key: impl Into<String>, checkpoint_storage_uri: impl Into<String>) -> Self {
        Self {
            checkpoint_pub_key: checkpoint_pub_key.into(),
            checkpoint_storage_uri: checkpoint_storage_uri.into(),
        }
    }
}

/// Quorum fraction consumed by checkpoint verifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Params {
    /// Quorum numerator
    pub quorum_numerator: u32,
    /// Quorum denominator
    pub quorum_denominator: u32,
}

impl Params {
    /// Create params without validating them.
    pub const fn new(quorum_numerator: u32, quorum_denominator: u32) -> Self {
        Self {
            quorum_numerator,
            quorum_denominator,
        }
    }

    /// Check `0 < numerator <= denominator`.
    pub fn validate(&self) -> DutyResult<()> {
        let (n, d) = (self.quorum_numerator, self.quorum_denominator);
        if n == 0 || d == 0 || n > d {
            return Err(DutyError::invalid_params(n, d));
        }
        Ok(())
    }
}

impl Default for Params {
    fn default() -> Self {
        Self::new(DEFAULT_QUORUM_NUMERATOR, DEFAULT_QUORUM_DENOMINATOR)
    }
}

/// Bonded validator as reported by the host's validator set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondedValidator {
    /// Operator account controlling the validator
    pub operator: OperatorIdentity,
    /// Raw consensus public key bytes
    pub consensus_pubkey: Vec<u8>,
    /// Bonded tokens (voting power)
    pub tokens: u128,
    /// Human-readable display name, if registered
    pub moniker: Option<String>,
}

impl BondedValidator {
    /// Create a validator record without a moniker.
    pub fn new(operator: impl Into<OperatorIdentity>, consensus_pubkey: impl Into<Vec<u8>>, tokens: u128) -> Self {
        Self {
            operator: operator.into(),
            consensus_pubkey: consensus_pubkey.into(),
            tokens,
            moniker: None,
        }
    }

    /// Attach a display name.
    pub fn with_moniker(mut self, moniker: impl Into<String>) -> Self {
        self.moniker = Some(moniker.into());
        self
    }

    /// Consensus identity derived from the consensus public key.
    pub fn consensus_identity(&self) -> ConsensusIdentity {
        ConsensusIdentity::from_consensus_pubkey(&self.consensus_pubkey)
    }

    /// Voting power rendered as a decimal string.
    pub fn voting_power(&self) -> String {
        self.tokens.to_string()
    }
}

/// One entry of the duty set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutyValidator {
    /// Validator's consensus identity
    pub consensus_identity: ConsensusIdentity,
    /// Voting power as a decimal string
    pub voting_power: String,
    /// Bound checkpoint metadata; `None` while unbound
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DutyMetadata>,
}

/// Duty set snapshot: ordered validators plus the quorum fraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DutySet {
    /// Validators in descending voting-power order
    pub validators: Vec<DutyValidator>,
    /// Quorum fraction in effect
    pub params: Params,
}

/// Host execution position at which a mutation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExecutionContext {
    /// Block height
    pub height: u64,
}

impl ExecutionContext {
    /// Context for the given block height.
    pub const fn at_height(height: u64) -> Self {
        Self { height }
    }
}
