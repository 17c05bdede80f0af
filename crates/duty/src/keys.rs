//! Persisted key layout.
//!
//! One namespaced key space; the first byte selects the record family.

use crate::types::ConsensusIdentity;

/// Module name, used as the storage namespace and event prefix.
pub const MODULE_NAME: &str = "duty";

/// Prefix for metadata records keyed by raw consensus identity bytes.
pub const METADATA_PREFIX: u8 = 0x01;

/// Prefix for parameter scalars.
pub const PARAMS_PREFIX: u8 = 0x02;

/// Parameter field name of the quorum numerator.
pub const KEY_QUORUM_NUMERATOR: &[u8] = b"QuorumNumerator";

/// Parameter field name of the quorum denominator.
pub const KEY_QUORUM_DENOMINATOR: &[u8] = b"QuorumDenominator";

/// Storage key of the metadata record for `identity`.
pub fn metadata_key(identity: &ConsensusIdentity) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + identity.as_bytes().len());
    key.push(METADATA_PREFIX);
    key.extend_from_slice(identity.as_bytes());
    key
}

/// Storage key of a parameter field.
pub fn params_key(field: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(1 + field.len());
    key.push(PARAMS_PREFIX);
    key.extend_from_slice(field);
    key
}
