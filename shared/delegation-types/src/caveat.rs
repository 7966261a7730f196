use alloy_primitives::{address, Address, Bytes, FixedBytes};
use serde::{Deserialize, Serialize};

/// Authority of a delegation granted directly by its delegator (no parent).
pub const ROOT_AUTHORITY: FixedBytes<32> = FixedBytes::ZERO;

/// Delegate of an "open" delegation that any account may redeem.
pub const ANY_BENEFICIARY: Address = address!("0000000000000000000000000000000000000a11");

/// Args placed in a caveat when the redeemer supplies nothing.
pub const DEFAULT_CAVEAT_ARGS: [u8; 1] = [0x00];

/// One restriction bound to the enforcer contract that interprets its `terms`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Caveat {
    /// Enforcer contract address.
    pub enforcer: Address,
    /// Creator-authored terms, decoded by the enforcer.
    pub terms: Bytes,
    /// Redeemer-supplied context. Not covered by the delegation hash.
    pub args: Bytes,
}

impl Caveat {
    /// Caveat with the default single zero byte of args.
    pub fn new(enforcer: Address, terms: impl Into<Bytes>) -> Self {
        Self {
            enforcer,
            terms: terms.into(),
            args: Bytes::from_static(&DEFAULT_CAVEAT_ARGS),
        }
    }

    pub fn with_args(mut self, args: impl Into<Bytes>) -> Self {
        self.args = args.into();
        self
    }
}
