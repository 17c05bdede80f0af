//! Composition root wiring the stores, authority, view and observer over one
//! storage capability and one event log.

use crate::authority::KeyLifecycleAuthority;
use crate::config::DutyConfig;
use crate::errors::DutyResult;
use crate::events::EventLog;
use crate::genesis::GenesisState;
use crate::metadata::MetadataStore;
use crate::observer::LifecycleEventObserver;
use crate::params::ParamsStore;
use crate::provider::ValidatorSetProvider;
use crate::storage::DutyStorage;
use crate::types::Params;
use crate::verify::KeyAttestationVerifier;
use crate::view::DutySetView;
use std::sync::Arc;
use tracing::info;

/// Fully wired duty module.
pub struct DutyModule {
    params: ParamsStore,
    metadata: MetadataStore,
    authority: KeyLifecycleAuthority,
    view: DutySetView,
    observer: LifecycleEventObserver,
    events: EventLog,
}

impl std::fmt::Debug for DutyModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DutyModule").finish_non_exhaustive()
    }
}

impl DutyModule {
    /// Wire the module with an explicit verifier
    pub fn new(
        storage: Arc<dyn DutyStorage>,
        validators: Arc<dyn ValidatorSetProvider>,
        verifier: Arc<dyn KeyAttestationVerifier>,
    ) -> Self {
        let events = EventLog::new();
        let params = ParamsStore::new(storage.clone());
        let metadata = MetadataStore::new(storage);
        let authority = KeyLifecycleAuthority::new(
            validators.clone(),
            metadata.clone(),
            verifier,
            events.clone(),
        );
        let view = DutySetView::new(validators.clone(), metadata.clone(), params.clone());
        let observer = LifecycleEventObserver::new(validators, events.clone());

        Self {
            params,
            metadata,
            authority,
            view,
            observer,
            events,
        }
    }

    /// Wire the module from configuration, choosing the configured verifier.
    ///
    /// Genesis is not applied here; call [`DutyModule::init_genesis`].
    pub fn from_config(
        config: &DutyConfig,
        storage: Arc<dyn DutyStorage>,
        validators: Arc<dyn ValidatorSetProvider>,
    ) -> DutyResult<Self> {
        config.validate()?;
        info!(verification = ?config.verification, "Initializing duty module");
        Ok(Self::new(storage, validators, config.verification.verifier()))
    }

    /// Persist genesis params; invalid params are rejected, not skipped
    pub async fn init_genesis(&self, genesis: &GenesisState) -> DutyResult<()> {
        genesis.validate()?;
        self.params.set_params(genesis.params).await
    }

    /// Current state as genesis
    pub async fn export_genesis(&self) -> DutyResult<GenesisState> {
        Ok(GenesisState::new(self.params.get_params().await?))
    }

    /// Governance path for changing the quorum fraction
    pub async fn set_params(&self, params: Params) -> DutyResult<()> {
        self.params.set_params(params).await
    }

    /// Key lifecycle entry points
    pub fn authority(&self) -> &KeyLifecycleAuthority {
        &self.authority
    }

    /// Duty set queries
    pub fn view(&self) -> &DutySetView {
        &self.view
    }

    /// Host lifecycle hook
    pub fn observer(&self) -> &LifecycleEventObserver {
        &self.observer
    }

    /// Params store
    pub fn params_store(&self) -> &ParamsStore {
        &self.params
    }

    /// Metadata store
    pub fn metadata_store(&self) -> &MetadataStore {
        &self.metadata
    }

    /// Shared event log
    pub fn events(&self) -> &EventLog {
        &self.events
    }
}
