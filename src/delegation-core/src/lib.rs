//! Off-chain core of the delegation framework.
//!
//! - `codec` turns typed caveat configurations into the exact `terms` bytes each enforcer
//!   contract parses, and `decoder` reads a subset of them back.
//! - `hashing` computes EIP-712 struct hashes and signing digests matching the
//!   DelegationManager, and `signer` asks an external signer for a signature.
//! - `builder` and `scope` compose ordered caveat lists from high-level scopes, which
//!   `delegation` wraps into unsigned delegations.
//! - `abi` packs delegation chains and executions for `redeemDelegations`.
//! - `availability` estimates what streaming and periodic allowances still permit.

pub mod abi;
pub mod availability;
pub mod builder;
pub mod codec;
pub mod decoder;
pub mod delegation;
pub mod errors;
pub mod hashing;
pub mod registry;
pub mod scope;
pub mod signer;


pub use delegation_types::{
    Caveat, CaveatKind, Delegation, EnforcerStateReader, Execution, ExecutionMode, ANY_BENEFICIARY,
    ROOT_AUTHORITY,
};

pub use builder::CaveatBuilder;
pub use codec::{encode, CaveatConfiguration, CaveatTerms, EncodedTerms, OutputFormat};
pub use delegation::{create_delegation, create_open_delegation, DelegationChain, DelegationParams};
pub use errors::{DecodeError, DelegationError, Result};
pub use hashing::{delegation_hash, delegation_signing_digest, DelegationDomain, Parent};
pub use registry::{EnforcerRegistry, RegistryBook};
pub use scope::{resolve_caveats, ExtraCaveats, ScopeConfig};
pub use signer::{sign_delegation, DelegationSigner, LocalSigner};
