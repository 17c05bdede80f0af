//! # Duty - Checkpoint Key Bindings and Duty Sets
//!
//! Maintains off-chain checkpoint-signing key bindings for a rotating
//! validator set and derives the duty set (bonded validators, voting power,
//! bound metadata, quorum fraction) consumed by checkpoint verifiers.
//!
//! ## Components
//!
//! - **ParamsStore**: quorum fraction with `0 < numerator <= denominator`
//! - **MetadataStore**: `ConsensusIdentity -> DutyMetadata`
//! - **KeyLifecycleAuthority**: set / rotate / bind, authorized against the
//!   host validator set
//! - **DutySetView**: read-only duty set and metadata queries
//! - **LifecycleEventObserver**: informational events for bonding transitions
//!
//! ## What's NOT in this crate
//!
//! - Consensus, block production or validator selection
//! - CLI, wire marshaling and genesis file plumbing
//! - A built-in choice of checkpoint signature scheme; see [`verify`]

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Key lifecycle state machine
pub mod authority;

/// Configuration loading
pub mod config;

/// Unified error type
pub mod errors;

/// Domain events and event log
pub mod events;

/// Genesis state
pub mod genesis;

/// Persisted key layout
pub mod keys;

/// Lifecycle messages
pub mod messages;

/// Metadata store
pub mod metadata;

/// Composition root
pub mod module;

/// Validator lifecycle observer
pub mod observer;

/// Params store
pub mod params;

/// Validator set capability
pub mod provider;

/// Storage capability and in-memory handler
pub mod storage;

/// Identities, records and views
pub mod types;

/// Checkpoint key proof verification
pub mod verify;

/// Duty set queries
pub mod view;

pub use authority::KeyLifecycleAuthority;
pub use config::{DutyConfig, VerificationMode};
pub use errors::{DutyError, DutyResult};
pub use events::{DutyEvent, DutyEventKind, EventLog, LifecycleKind};
pub use genesis::GenesisState;
pub use messages::{MsgBindCheckpointKey, MsgRotateCheckpointKey, MsgSetMetadata};
pub use metadata::MetadataStore;
pub use module::DutyModule;
pub use observer::{LifecycleEventObserver, ValidatorLifecycleEvent};
pub use params::ParamsStore;
pub use provider::ValidatorSetProvider;
pub use storage::{DutyStorage, MemoryStore, WriteBatch};
pub use types::{
    BondedValidator, ConsensusIdentity, DutyMetadata, DutySet, DutyValidator, ExecutionContext,
    OperatorIdentity, Params,
};
pub use verify::{
    attestation_message, AttestationPurpose, Ed25519AttestationVerifier, KeyAttestationVerifier,
    RejectingVerifier,
};
pub use view::DutySetView;
