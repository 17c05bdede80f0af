//! Key lifecycle authority
//!
//! State machine over `ConsensusIdentity -> DutyMetadata`:
//!
//! - `set_metadata`: `Unbound | Bound -> Bound`, replaces key and URI
//! - `rotate_checkpoint_key`: `Bound -> Bound`, replaces key, keeps URI
//! - `bind_checkpoint_key`: `Unbound | Bound -> Bound`, sets key, clears URI
//!
//! Every precondition is checked before the single metadata write, and the
//! event is appended only after that write succeeds. Mutations are serialized
//! through one writer lock.

use crate::errors::{DutyError, DutyResult};
use crate::events::{DutyEvent, DutyEventKind, EventLog};
use crate::messages::{MsgBindCheckpointKey, MsgRotateCheckpointKey, MsgSetMetadata};
use crate::metadata::MetadataStore;
use crate::provider::ValidatorSetProvider;
use crate::types::{BondedValidator, DutyMetadata, ExecutionContext, OperatorIdentity};
use crate::verify::{AttestationPurpose, KeyAttestationVerifier};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

/// Authorizes and applies key-lifecycle messages.
pub struct KeyLifecycleAuthority {
    validators: Arc<dyn ValidatorSetProvider>,
    metadata: MetadataStore,
    verifier: Arc<dyn KeyAttestationVerifier>,
    events: EventLog,
    write_lock: Mutex<()>,
}

impl KeyLifecycleAuthority {
    /// Create an authority over the given collaborators
    pub fn new(
        validators: Arc<dyn ValidatorSetProvider>,
        metadata: MetadataStore,
        verifier: Arc<dyn KeyAttestationVerifier>,
        events: EventLog,
    ) -> Self {
        Self {
            validators,
            metadata,
            verifier,
            events,
            write_lock: Mutex::new(()),
        }
    }

    /// Event log this authority appends to
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Write checkpoint key and storage URI for the operator's validator.
    ///
    /// Safe to retry: a repeated call overwrites with the same record.
    #[tracing::instrument(skip_all, fields(operator = %msg.operator, height = ctx.height))]
    pub async fn set_metadata(
        &self,
        ctx: ExecutionContext,
        msg: MsgSetMetadata,
    ) -> DutyResult<DutyEvent> {
        let _guard = self.write_lock.lock().await;

        let validator = self.resolve_operator(&msg.operator).await?;
        let identity = validator.consensus_identity();
        msg.validate_basic()?;

        let record = DutyMetadata::new(&msg.checkpoint_pub_key, &msg.checkpoint_storage_uri);
        self.metadata.put(&identity, &record).await?;

        info!(identity = %identity, "Set duty metadata");
        Ok(self.events.append(
            ctx.height,
            DutyEventKind::MetadataSet {
                consensus_identity: identity,
                operator: msg.operator,
                checkpoint_pub_key: record.checkpoint_pub_key,
                checkpoint_storage_uri: record.checkpoint_storage_uri,
            },
        ))
    }

    /// Replace the checkpoint key of an already bound validator.
    ///
    /// The new key must attest to the rotation. Not safe to blindly retry.
    #[tracing::instrument(skip_all, fields(operator = %msg.operator, height = ctx.height))]
    pub async fn rotate_checkpoint_key(
        &self,
        ctx: ExecutionContext,
        msg: MsgRotateCheckpointKey,
    ) -> DutyResult<DutyEvent> {
        let _guard = self.write_lock.lock().await;

        let validator = self.resolve_operator(&msg.operator).await?;
        let identity = validator.consensus_identity();
        let Some(mut record) = self.metadata.get(&identity).await? else {
            warn!(identity = %identity, "Rotation rejected: no existing binding");
            return Err(DutyError::no_existing_binding(identity.to_hex()));
        };
        msg.validate_basic()?;
        self.verifier
            .verify(
                AttestationPurpose::Rotate,
                &identity,
                &msg.new_pub_key,
                &msg.attestation_signature,
            )
            .map_err(|e| {
                warn!(identity = %identity, error = %e, "Rotation attestation rejected");
                e
            })?;

        let old_pub_key = std::mem::replace(&mut record.checkpoint_pub_key, msg.new_pub_key.clone());
        self.metadata.put(&identity, &record).await?;

        info!(identity = %identity, "Rotated checkpoint key");
        Ok(self.events.append(
            ctx.height,
            DutyEventKind::CheckpointKeyRotated {
                consensus_identity: identity,
                operator: msg.operator,
                old_pub_key,
                new_pub_key: msg.new_pub_key,
            },
        ))
    }

    /// Bind a checkpoint key to the operator's own consensus identity.
    ///
    /// Clears the storage URI; a later `set_metadata` supplies it.
    #[tracing::instrument(skip_all, fields(operator = %msg.operator, target = %msg.target, height = ctx.height))]
    pub async fn bind_checkpoint_key(
        &self,
        ctx: ExecutionContext,
        msg: MsgBindCheckpointKey,
    ) -> DutyResult<DutyEvent> {
        let _guard = self.write_lock.lock().await;

        let validator = self.resolve_operator(&msg.operator).await?;
        let identity = validator.consensus_identity();
        if identity != msg.target {
            warn!(identity = %identity, "Bind rejected: target is not the operator's identity");
            return Err(DutyError::identity_mismatch(msg.target.to_hex(), identity.to_hex()));
        }
        msg.validate_basic()?;
        self.verifier
            .verify(
                AttestationPurpose::Bind,
                &identity,
                &msg.checkpoint_pub_key,
                &msg.binding_signature,
            )
            .map_err(|e| {
                warn!(identity = %identity, error = %e, "Binding proof rejected");
                e
            })?;

        let record = DutyMetadata::new(&msg.checkpoint_pub_key, String::new());
        self.metadata.put(&identity, &record).await?;

        info!(identity = %identity, "Bound checkpoint key");
        Ok(self.events.append(
            ctx.height,
            DutyEventKind::CheckpointKeyBound {
                consensus_identity: identity,
                operator: msg.operator,
                checkpoint_pub_key: record.checkpoint_pub_key,
            },
        ))
    }

    async fn resolve_operator(&self, operator: &OperatorIdentity) -> DutyResult<BondedValidator> {
        match self.validators.validator_by_operator(operator).await? {
            Some(validator) => Ok(validator),
            None => {
                warn!(operator = %operator, "Operator is not a recognized validator");
                Err(DutyError::unauthorized(operator.as_str()))
            }
        }
    }
}
