//! Permissive verifier for tests that exercise lifecycle rules rather than
//! signature checks.

use duty::{AttestationPurpose, ConsensusIdentity, DutyResult, KeyAttestationVerifier};
use tracing::debug;

/// Accepts every proof. Test use only.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptingVerifier;

impl KeyAttestationVerifier for AcceptingVerifier {
    fn verify(
        &self,
        purpose: AttestationPurpose,
        identity: &ConsensusIdentity,
        _checkpoint_pub_key: &str,
        _signature: &[u8],
    ) -> DutyResult<()> {
        debug!(?purpose, identity = %identity, "AcceptingVerifier skipped proof check");
        Ok(())
    }
}
