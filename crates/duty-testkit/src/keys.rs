//! Deterministic checkpoint keys
//!
//! Ed25519 keys derived from fixed seeds, with helpers producing the proofs
//! `Ed25519AttestationVerifier` expects.

use duty::{attestation_message, AttestationPurpose, ConsensusIdentity};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use sha2::{Digest, Sha256};

/// Checkpoint key fixture for consistent test key generation
#[derive(Debug, Clone)]
pub struct CheckpointKeyFixture {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl CheckpointKeyFixture {
    /// Create a key fixture from a 32-byte seed
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let verifying_key = signing_key.verifying_key();
        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Create a key fixture from a seed string
    pub fn from_seed_string(seed: &str) -> Self {
        let digest = Sha256::digest(seed.as_bytes());
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Self::from_seed(&bytes)
    }

    /// Public key as `0x`-prefixed hex, the form stored in metadata
    pub fn pub_key_hex(&self) -> String {
        format!("0x{}", hex::encode(self.verifying_key.as_bytes()))
    }

    /// Get the verifying key
    pub fn verifying_key(&self) -> &VerifyingKey {
        &self.verifying_key
    }

    /// Proof of possession for `purpose` on behalf of `identity`
    pub fn attest(&self, purpose: AttestationPurpose, identity: &ConsensusIdentity) -> Vec<u8> {
        let message = attestation_message(purpose, identity, self.verifying_key.as_bytes());
        self.signing_key.sign(&message).to_bytes().to_vec()
    }

    /// Rotation attestation for `identity`
    pub fn rotation_attestation(&self, identity: &ConsensusIdentity) -> Vec<u8> {
        self.attest(AttestationPurpose::Rotate, identity)
    }

    /// Binding proof for `identity`
    pub fn binding_proof(&self, identity: &ConsensusIdentity) -> Vec<u8> {
        self.attest(AttestationPurpose::Bind, identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_key() {
        let a = CheckpointKeyFixture::from_seed_string("ckpt-1");
        let b = CheckpointKeyFixture::from_seed_string("ckpt-1");
        let c = CheckpointKeyFixture::from_seed_string("ckpt-2");
        assert_eq!(a.pub_key_hex(), b.pub_key_hex());
        assert_ne!(a.pub_key_hex(), c.pub_key_hex());
        assert_eq!(a.pub_key_hex().len(), 2 + 64);
    }
}
