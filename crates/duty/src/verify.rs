//! Checkpoint key attestation verification
//!
//! Rotation and binding both require proof that the submitted checkpoint key
//! is controlled by the submitter. The scheme is pluggable through
//! [`KeyAttestationVerifier`]. The default, [`RejectingVerifier`], refuses every
//! proof so that an unconfigured deployment never accepts unverified keys.

use crate::errors::{DutyError, DutyResult};
use crate::types::ConsensusIdentity;
use ed25519_dalek::{Signature, VerifyingKey};
use serde::{Deserialize, Serialize};

/// Domain tag for rotation attestations.
pub const ROTATE_DOMAIN: &[u8] = b"duty/rotate-checkpoint-key/v1";

/// Domain tag for binding proofs.
pub const BIND_DOMAIN: &[u8] = b"duty/bind-checkpoint-key/v1";

/// Which proof is being checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttestationPurpose {
    /// New key attests to its own rotation
    Rotate,
    /// Key proves ownership for a first binding
    Bind,
}

impl AttestationPurpose {
    /// Domain separation tag
    pub fn domain(&self) -> &'static [u8] {
        match self {
            AttestationPurpose::Rotate => ROTATE_DOMAIN,
            AttestationPurpose::Bind => BIND_DOMAIN,
        }
    }
}

/// Verification capability for checkpoint key proofs.
pub trait KeyAttestationVerifier: Send + Sync {
    /// Check that `signature` proves control of `checkpoint_pub_key` for
    /// `purpose` on behalf of `identity`
    fn verify(
        &self,
        purpose: AttestationPurpose,
        identity: &ConsensusIdentity,
        checkpoint_pub_key: &str,
        signature: &[u8],
    ) -> DutyResult<()>;
}

/// Refuses every proof.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectingVerifier;

impl KeyAttestationVerifier for RejectingVerifier {
    fn verify(
        &self,
        purpose: AttestationPurpose,
        _identity: &ConsensusIdentity,
        _checkpoint_pub_key: &str,
        _signature: &[u8],
    ) -> DutyResult<()> {
        Err(DutyError::signature_rejected(format!(
            "no verification scheme configured for {purpose:?}"
        )))
    }
}

/// Ed25519 proof of possession.
///
/// The checkpoint key is 32 bytes of hex and signs
/// `domain || identity bytes || key bytes`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519AttestationVerifier;

impl Ed25519AttestationVerifier {
    /// Parse a hex checkpoint key, with or without `0x`
    pub fn parse_key(checkpoint_pub_key: &str) -> DutyResult<VerifyingKey> {
        let digits = checkpoint_pub_key
            .strip_prefix("0x")
            .unwrap_or(checkpoint_pub_key);
        let raw = hex::decode(digits)
            .map_err(|e| DutyError::invalid_metadata(format!("checkpoint key is not hex: {e}")))?;
        let bytes: [u8; 32] = raw.as_slice().try_into().map_err(|_| {
            DutyError::invalid_metadata(format!(
                "checkpoint key must be 32 bytes, got {}",
                raw.len()
            ))
        })?;
        VerifyingKey::from_bytes(&bytes)
            .map_err(|e| DutyError::invalid_metadata(format!("invalid ed25519 key: {e}")))
    }
}

impl KeyAttestationVerifier for Ed25519AttestationVerifier {
    fn verify(
        &self,
        purpose: AttestationPurpose,
        identity: &ConsensusIdentity,
        checkpoint_pub_key: &str,
        signature: &[u8],
    ) -> DutyResult<()> {
        let key = Self::parse_key(checkpoint_pub_key)?;
        let signature = Signature::from_slice(signature)
            .map_err(|e| DutyError::signature_rejected(format!("malformed signature: {e}")))?;
        let message = attestation_message(purpose, identity, key.as_bytes());
        key.verify_strict(&message, &signature)
            .map_err(|e| DutyError::signature_rejected(format!("{purpose:?} proof invalid: {e}")))
    }
}

/// Bytes a checkpoint key signs to prove possession.
pub fn attestation_message(
    purpose: AttestationPurpose,
    identity: &ConsensusIdentity,
    key_bytes: &[u8],
) -> Vec<u8> {
    let domain = purpose.domain();
    let mut message = Vec::with_capacity(domain.len() + identity.as_bytes().len() + key_bytes.len());
    message.extend_from_slice(domain);
    message.extend_from_slice(identity.as_bytes());
    message.extend_from_slice(key_bytes);
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn identity() -> ConsensusIdentity {
        ConsensusIdentity::from_bytes([5u8; 20])
    }

    fn signed(purpose: AttestationPurpose, seed: u8) -> (String, Vec<u8>) {
        let signing = SigningKey::from_bytes(&[seed; 32]);
        let public = signing.verifying_key();
        let message = attestation_message(purpose, &identity(), public.as_bytes());
        let sig = signing.sign(&message);
        (format!("0x{}", hex::encode(public.as_bytes())), sig.to_bytes().to_vec())
    }

    #[test]
    fn test_rejecting_verifier_refuses_everything() {
        let (key, sig) = signed(AttestationPurpose::Rotate, 1);
        let err = RejectingVerifier
            .verify(AttestationPurpose::Rotate, &identity(), &key, &sig)
            .unwrap_err();
        assert!(matches!(err, DutyError::SignatureRejected { .. }));
    }

    #[test]
    fn test_ed25519_accepts_valid_proof() {
        let (key, sig) = signed(AttestationPurpose::Bind, 2);
        Ed25519AttestationVerifier
            .verify(AttestationPurpose::Bind, &identity(), &key, &sig)
            .unwrap();
    }

    #[test]
    fn test_ed25519_rejects_cross_purpose_replay() {
        let (key, sig) = signed(AttestationPurpose::Bind, 3);
        let err = Ed25519AttestationVerifier
            .verify(AttestationPurpose::Rotate, &identity(), &key, &sig)
            .unwrap_err();
        assert!(matches!(err, DutyError::SignatureRejected { .. }));
    }

    #[test]
    fn test_ed25519_rejects_other_identity() {
        let (key, sig) = signed(AttestationPurpose::Rotate, 4);
        let other = ConsensusIdentity::from_bytes([6u8; 20]);
        assert!(Ed25519AttestationVerifier
            .verify(AttestationPurpose::Rotate, &other, &key, &sig)
            .is_err());
    }

    #[test]
    fn test_ed25519_rejects_malformed_inputs() {
        let (key, _) = signed(AttestationPurpose::Rotate, 5);
        assert!(matches!(
            Ed25519AttestationVerifier.verify(AttestationPurpose::Rotate, &identity(), &key, &[0u8; 3]),
            Err(DutyError::SignatureRejected { .. })
        ));
        assert!(matches!(
            Ed25519AttestationVerifier.verify(AttestationPurpose::Rotate, &identity(), "0xabc", &[0u8; 64]),
            Err(DutyError::InvalidMetadata { .. })
        ));
    }
}
