//! Duty module configuration.
//!
//! Loaded from TOML, optionally overridden by `DUTY_*` environment variables:
//!
//! ```toml
//! verification = "ed25519"
//!
//! [genesis.params]
//! quorum_numerator = 2
//! quorum_denominator = 3
//! ```

use crate::errors::{DutyError, DutyResult};
use crate::genesis::GenesisState;
use crate::verify::{Ed25519AttestationVerifier, KeyAttestationVerifier, RejectingVerifier};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

/// Environment override for the genesis quorum numerator.
pub const ENV_QUORUM_NUMERATOR: &str = "DUTY_QUORUM_NUMERATOR";

/// Environment override for the genesis quorum denominator.
pub const ENV_QUORUM_DENOMINATOR: &str = "DUTY_QUORUM_DENOMINATOR";

/// Environment override for the verification mode.
pub const ENV_VERIFICATION: &str = "DUTY_VERIFICATION";

/// How checkpoint key proofs are verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationMode {
    /// Reject every rotation and binding proof
    #[default]
    Reject,
    /// Ed25519 proof of possession
    Ed25519,
}

impl VerificationMode {
    /// Verifier implementing this mode
    pub fn verifier(&self) -> Arc<dyn KeyAttestationVerifier> {
        match self {
            VerificationMode::Reject => Arc::new(RejectingVerifier),
            VerificationMode::Ed25519 => Arc::new(Ed25519AttestationVerifier),
        }
    }
}

impl FromStr for VerificationMode {
    type Err = DutyError;

    fn from_str(s: &str) -> DutyResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(VerificationMode::Reject),
            "ed25519" => Ok(VerificationMode::Ed25519),
            other => Err(DutyError::config(format!("unknown verification mode '{other}'"))),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DutyConfig {
    /// Genesis state applied on first start
    pub genesis: GenesisState,
    /// Checkpoint key proof verification
    pub verification: VerificationMode,
}

impl DutyConfig {
    /// Parse from a TOML document
    pub fn from_toml_str(content: &str) -> DutyResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file
    pub fn load_from_file(path: &Path) -> DutyResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            DutyError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Apply `DUTY_*` overrides from the process environment
    pub fn merge_with_env(&mut self) -> DutyResult<()> {
        self.merge_with_vars(std::env::vars())
    }

    /// Apply `DUTY_*` overrides from the given variables
    pub fn merge_with_vars<I, K, V>(&mut self, vars: I) -> DutyResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in vars {
            let value = value.as_ref();
            match key.as_ref() {
                ENV_QUORUM_NUMERATOR => {
                    self.genesis.params.quorum_numerator = parse_u32(ENV_QUORUM_NUMERATOR, value)?;
                }
                ENV_QUORUM_DENOMINATOR => {
                    self.genesis.params.quorum_denominator =
                        parse_u32(ENV_QUORUM_DENOMINATOR, value)?;
                }
                ENV_VERIFICATION => self.verification = value.parse()?,
                _ => {}
            }
        }
        Ok(())
    }

    /// Check the genesis params invariant
    pub fn validate(&self) -> DutyResult<()> {
        self.genesis.validate()
    }
}

fn parse_u32(name: &str, value: &str) -> DutyResult<u32> {
    value
        .trim()
        .parse()
        .map_err(|e| DutyError::config(format!("{name}={value}: {e}")))
}
