//! Genesis state: params only, no metadata is seeded.

use crate::errors::DutyResult;
use crate::types::Params;
use serde::{Deserialize, Serialize};

/// Initial module state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GenesisState {
    /// Initial quorum fraction
    pub params: Params,
}

impl GenesisState {
    /// Genesis with the given params
    pub const fn new(params: Params) -> Self {
        Self { params }
    }

    /// Check the params invariant
    pub fn validate(&self) -> DutyResult<()> {
        self.params.validate()
    }
}
