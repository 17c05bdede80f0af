//! Key-lifecycle messages and their stateless checks.
//!
//! `validate_basic` only inspects the message itself; authorization against the
//! validator set happens in the authority.

use crate::errors::{DutyError, DutyResult};
use crate::types::{ConsensusIdentity, OperatorIdentity};
use serde::{Deserialize, Serialize};

/// Set checkpoint key and storage URI wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgSetMetadata {
    /// Signing operator
    pub operator: OperatorIdentity,
    /// Checkpoint signing key
    pub checkpoint_pub_key: String,
    /// Checkpoint storage location
    pub checkpoint_storage_uri: String,
}

impl MsgSetMetadata {
    /// Build the message
    pub fn new(
        operator: impl Into<OperatorIdentity>,
        checkpoint_pub_key: impl Into<String>,
        checkpoint_storage_uri: impl Into<String>,
    ) -> Self {
        Self {
            operator: operator.into(),
            checkpoint_pub_key: checkpoint_pub_key.into(),
            checkpoint_storage_uri: checkpoint_storage_uri.into(),
        }
    }

    /// Stateless checks
    pub fn validate_basic(&self) -> DutyResult<()> {
        require_operator(&self.operator)?;
        require_field("checkpoint_pub_key", &self.checkpoint_pub_key)?;
        require_field("checkpoint_storage_uri", &self.checkpoint_storage_uri)
    }
}

/// Replace the checkpoint key, keeping the storage URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgRotateCheckpointKey {
    /// Signing operator
    pub operator: OperatorIdentity,
    /// Replacement checkpoint key
    pub new_pub_key: String,
    /// Signature by the new key over its rotation attestation
    pub attestation_signature: Vec<u8>,
}

impl MsgRotateCheckpointKey {
    /// Build the message
    pub fn new(
        operator: impl Into<OperatorIdentity>,
        new_pub_key: impl Into<String>,
        attestation_signature: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            operator: operator.into(),
            new_pub_key: new_pub_key.into(),
            attestation_signature: attestation_signature.into(),
        }
    }

    /// Stateless checks
    pub fn validate_basic(&self) -> DutyResult<()> {
        require_operator(&self.operator)?;
        require_field("new_pub_key", &self.new_pub_key)?;
        require_signature("attestation_signature", &self.attestation_signature)
    }
}

/// Bind a checkpoint key to the operator's own consensus identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MsgBindCheckpointKey {
    /// Signing operator
    pub operator: OperatorIdentity,
    /// Checkpoint key to bind
    pub checkpoint_pub_key: String,
    /// Proof of possession of the checkpoint key
    pub binding_signature: Vec<u8>,
    /// Identity the caller claims to bind to
    pub target: ConsensusIdentity,
}

impl MsgBindCheckpointKey {
    /// Build the message
    pub fn new(
        operator: impl Into<OperatorIdentity>,
        checkpoint_pub_key: impl Into<String>,
        binding_signature: impl Into<Vec<u8>>,
        target: ConsensusIdentity,
    ) -> Self {
        Self {
            operator: operator.into(),
            checkpoint_pub_key: checkpoint_pub_key.into(),
            binding_signature: binding_signature.into(),
            target,
        }
    }

    /// Stateless checks
    pub fn validate_basic(&self) -> DutyResult<()> {
        require_operator(&self.operator)?;
        require_field("checkpoint_pub_key", &self.checkpoint_pub_key)?;
        require_signature("binding_signature", &self.binding_signature)
    }
}

fn require_operator(operator: &OperatorIdentity) -> DutyResult<()> {
    if operator.is_empty() {
        return Err(DutyError::unauthorized("<empty>"));
    }
    Ok(())
}

fn require_field(name: &str, value: &str) -> DutyResult<()> {
    if value.trim().is_empty() {
        return Err(DutyError::invalid_metadata(format!("{name} cannot be empty")));
    }
    Ok(())
}

fn require_signature(name: &str, signature: &[u8]) -> DutyResult<()> {
    if signature.is_empty() {
        return Err(DutyError::signature_rejected(format!("{name} is empty")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_metadata_requires_both_fields() {
        assert!(MsgSetMetadata::new("val1", "0xabc", "s3://b/p").validate_basic().is_ok());
        assert!(matches!(
            MsgSetMetadata::new("val1", "", "s3://b/p").validate_basic(),
            Err(DutyError::InvalidMetadata { .. })
        ));
        assert!(matches!(
            MsgSetMetadata::new("val1", "0xabc", "  ").validate_basic(),
            Err(DutyError::InvalidMetadata { .. })
        ));
    }

    #[test]
    fn test_empty_operator_is_unauthorized() {
        assert!(matches!(
            MsgSetMetadata::new("", "0xabc", "s3://b/p").validate_basic(),
            Err(DutyError::UnauthorizedOperator { .. })
        ));
    }

    #[test]
    fn test_empty_signatures_rejected() {
        assert!(matches!(
            MsgRotateCheckpointKey::new("val1", "0xdef", Vec::new()).validate_basic(),
            Err(DutyError::SignatureRejected { .. })
        ));
        let target = ConsensusIdentity::from_bytes([1u8; 20]);
        assert!(matches!(
            MsgBindCheckpointKey::new("val1", "0xdef", Vec::new(), target).validate_basic(),
            Err(DutyError::SignatureRejected { .. })
        ));
    }
}
