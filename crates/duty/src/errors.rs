//! Unified error type for the duty module
//!
//! Domain rejections (authorization, lifecycle preconditions, malformed input)
//! and infrastructure failures share one enum. Infrastructure variants
//! (`Storage`, `Serialization`) sit outside the domain taxonomy and are never
//! produced by a precondition check.

use serde::{Deserialize, Serialize};

/// Error type for all duty operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum DutyError {
    /// Quorum fraction violates `0 < numerator <= denominator`
    #[error("Invalid params: quorum {numerator}/{denominator}")]
    InvalidParams {
        /// Rejected numerator
        numerator: u32,
        /// Rejected denominator
        denominator: u32,
    },

    /// Signer does not control a recognized validator
    #[error("Unauthorized operator: {operator}")]
    UnauthorizedOperator {
        /// Operator identity that failed resolution
        operator: String,
    },

    /// Rotation attempted on an identity with no prior metadata
    #[error("No existing binding for consensus identity {identity}")]
    NoExistingBinding {
        /// Consensus identity (hex)
        identity: String,
    },

    /// Bind target is not the operator's own consensus identity
    #[error("Identity mismatch: operator controls {actual}, target was {expected}")]
    IdentityMismatch {
        /// Target identity named in the request
        expected: String,
        /// Identity derived from the operator's validator
        actual: String,
    },

    /// Required metadata field missing or empty
    #[error("Invalid metadata: {message}")]
    InvalidMetadata {
        /// Which field was rejected and why
        message: String,
    },

    /// External identity representation could not be parsed
    #[error("Invalid identity: {message}")]
    InvalidIdentity {
        /// Parse failure description
        message: String,
    },

    /// Key attestation or binding signature was not accepted
    #[error("Signature rejected: {message}")]
    SignatureRejected {
        /// Verifier's reason
        message: String,
    },

    /// Configuration could not be loaded or is invalid
    #[error("Config error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },

    /// Storage backend failure
    #[error("Storage error: {message}")]
    Storage {
        /// Backend failure description
        message: String,
    },

    /// Persisted value could not be encoded or decoded
    #[error("Serialization error: {message}")]
    Serialization {
        /// Codec failure description
        message: String,
    },
}

impl DutyError {
    /// Create an invalid params error
    pub fn invalid_params(numerator: u32, denominator: u32) -> Self {
        Self::InvalidParams {
            numerator,
            denominator,
        }
    }

    /// Create an unauthorized operator error
    pub fn unauthorized(operator: impl Into<String>) -> Self {
        Self::UnauthorizedOperator {
            operator: operator.into(),
        }
    }

    /// Create a no existing binding error
    pub fn no_existing_binding(identity: impl Into<String>) -> Self {
        Self::NoExistingBinding {
            identity: identity.into(),
        }
    }

    /// Create an identity mismatch error
    pub fn identity_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self::IdentityMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an invalid metadata error
    pub fn invalid_metadata(message: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            message: message.into(),
        }
    }

    /// Create an invalid identity error
    pub fn invalid_identity(message: impl Into<String>) -> Self {
        Self::InvalidIdentity {
            message: message.into(),
        }
    }

    /// Create a signature rejected error
    pub fn signature_rejected(message: impl Into<String>) -> Self {
        Self::SignatureRejected {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            DutyError::InvalidParams { .. } => "duty_invalid_params",
            DutyError::UnauthorizedOperator { .. } => "duty_unauthorized_operator",
            DutyError::NoExistingBinding { .. } => "duty_no_existing_binding",
            DutyError::IdentityMismatch { .. } => "duty_identity_mismatch",
            DutyError::InvalidMetadata { .. } => "duty_invalid_metadata",
            DutyError::InvalidIdentity { .. } => "duty_invalid_identity",
            DutyError::SignatureRejected { .. } => "duty_signature_rejected",
            DutyError::Config { .. } => "duty_config",
            DutyError::Storage { .. } => "duty_storage",
            DutyError::Serialization { .. } => "duty_serialization",
        }
    }

    /// Whether this error belongs to infrastructure rather than the domain
    pub fn is_infrastructure(&self) -> bool {
        matches!(
            self,
            DutyError::Storage { .. } | DutyError::Serialization { .. }
        )
    }
}

/// Standard Result type for duty operations
pub type DutyResult<T> = std::result::Result<T, DutyError>;

impl From<serde_json::Error> for DutyError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DutyError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(err.to_string())
    }
}

impl From<hex::FromHexError> for DutyError {
    fn from(err: hex::FromHexError) -> Self {
        Self::invalid_identity(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DutyError::invalid_params(4, 3);
        assert_eq!(err.to_string(), "Invalid params: quorum 4/3");

        let err = DutyError::unauthorized("val9");
        assert_eq!(err.to_string(), "Unauthorized operator: val9");
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors = [
            DutyError::invalid_params(0, 0),
            DutyError::unauthorized(""),
            DutyError::no_existing_binding(""),
            DutyError::identity_mismatch("", ""),
            DutyError::invalid_metadata(""),
            DutyError::invalid_identity(""),
            DutyError::signature_rejected(""),
            DutyError::config(""),
            DutyError::storage(""),
            DutyError::serialization(""),
        ];
        let codes: std::collections::BTreeSet<_> = errors.iter().map(DutyError::code).collect();
        assert_eq!(codes.len(), errors.len());
    }

    #[test]
    fn test_infrastructure_classification() {
        assert!(DutyError::storage("down").is_infrastructure());
        assert!(!DutyError::no_existing_binding("ab").is_infrastructure());
    }

    #[test]
    fn test_hex_error_maps_to_invalid_identity() {
        let err: DutyError = hex::decode("zz").unwrap_err().into();
        assert!(matches!(err, DutyError::InvalidIdentity { .. }));
    }
}
