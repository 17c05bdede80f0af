//! Wired duty module over in-memory collaborators.

use crate::validators::FakeValidatorSet;
use crate::verifier::AcceptingVerifier;
use duty::{
    DutyModule, Ed25519AttestationVerifier, KeyAttestationVerifier, MemoryStore, RejectingVerifier,
};
use std::sync::Arc;

/// Module plus handles to its fake collaborators
pub struct DutyHarness {
    /// Module under test
    pub module: DutyModule,
    /// Validator set the module reads
    pub validators: Arc<FakeValidatorSet>,
    /// Backing store, for snapshot assertions
    pub store: MemoryStore,
}

impl DutyHarness {
    /// Harness with the given verifier and an empty roster
    pub fn with_verifier(verifier: Arc<dyn KeyAttestationVerifier>) -> Self {
        crate::logging::init_test_tracing();
        let store = MemoryStore::new();
        let validators = Arc::new(FakeValidatorSet::new());
        let module = DutyModule::new(Arc::new(store.clone()), validators.clone(), verifier);
        Self {
            module,
            validators,
            store,
        }
    }

    /// Harness that accepts every key proof
    pub fn accepting() -> Self {
        Self::with_verifier(Arc::new(AcceptingVerifier))
    }

    /// Harness verifying Ed25519 proofs
    pub fn ed25519() -> Self {
        Self::with_verifier(Arc::new(Ed25519AttestationVerifier))
    }

    /// Harness with the default rejecting verifier
    pub fn rejecting() -> Self {
        Self::with_verifier(Arc::new(RejectingVerifier))
    }
}
