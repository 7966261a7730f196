use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use serde::{Deserialize, Serialize};

use crate::caveat::{Caveat, ROOT_AUTHORITY};

/// A grant of capability from `delegator` to `delegate`, constrained by `caveats`.
///
/// `caveats` order is significant: enforcers run in array order. `authority` is either
/// [`ROOT_AUTHORITY`] or the struct hash of the exact parent delegation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Delegation {
    pub delegate: Address,
    pub delegator: Address,
    pub authority: FixedBytes<32>,
    pub caveats: Vec<Caveat>,
    /// Caller-chosen; uniqueness is the caller's responsibility.
    pub salt: U256,
    /// Empty until signed.
    pub signature: Bytes,
}

impl Delegation {
    /// Unsigned delegation with root authority and zero salt.
    pub fn new(delegate: Address, delegator: Address, caveats: Vec<Caveat>) -> Self {
        Self {
            delegate,
            delegator,
            authority: ROOT_AUTHORITY,
            caveats,
            salt: U256::ZERO,
            signature: Bytes::new(),
        }
    }

    pub fn with_authority(mut self, authority: FixedBytes<32>) -> Self {
        self.authority = authority;
        self
    }

    pub fn with_salt(mut self, salt: U256) -> Self {
        self.salt = salt;
        self
    }

    pub fn with_signature(mut self, signature: impl Into<Bytes>) -> Self {
        self.signature = signature.into();
        self
    }

    pub fn is_root(&self) -> bool {
        self.authority == ROOT_AUTHORITY
    }

    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }
}
