use alloy_primitives::Address;
use delegation_types::{CaveatKind, StateReadError};

/// Errors while decoding fixed-layout terms back into their configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("terms truncated")]
    Truncated,
    #[error("unexpected trailing bytes in terms")]
    TrailingBytes,
    #[error("value does not fit the configured field")]
    ValueOutOfRange,
    #[error("invalid balance change type {0}")]
    InvalidChangeType(u8),
}

/// Every failure the core can report.
///
/// All variants are raised before any output is produced; no operation returns partially
/// encoded terms or a partially built caveat list.
#[derive(Debug, thiserror::Error)]
pub enum DelegationError {
    #[error("invalid {field}: must be a valid address")]
    InvalidAddress { field: &'static str },

    #[error("invalid {field}: {reason}")]
    InvalidHex { field: &'static str, reason: &'static str },

    #[error("invalid {field}: {reason}")]
    InvalidNumericRange { field: &'static str, reason: &'static str },

    #[error("invalid {field}: must provide at least one entry")]
    EmptyCollection { field: &'static str },

    #[error("invalid selector: must be a 4 byte hex string, abi function signature or abi function item")]
    InvalidSelector,

    #[error("{} not found in registry for {kind}", .kind.enforcer_name())]
    MissingEnforcerAddress { kind: CaveatKind },

    #[error("no deployment registered for version {version} on chain {chain_id}")]
    MissingDeployment { version: String, chain_id: u64 },

    #[error("{0}")]
    ConflictingConfiguration(&'static str),

    #[error("unknown {category} type: {name}")]
    UnknownKind { category: &'static str, name: String },

    #[error("no caveats found; allow unrestricted delegations explicitly to build or sign a delegation without caveats")]
    UnrestrictedDelegationGuard,

    #[error("broken delegation chain at index {index}: authority does not match the parent's hash")]
    BrokenChain { index: usize },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("abi decoding failed: {0}")]
    AbiDecode(#[from] alloy_sol_types::Error),

    #[error("signing failed: {0}")]
    Signing(String),

    #[error("signer {signer} appears more than once")]
    DuplicateSigner { signer: Address },

    #[error(transparent)]
    StateRead(#[from] StateReadError),

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = DelegationError> = core::result::Result<T, E>;
