//! EIP-712 struct hashes and signing digests for delegations.
//!
//! Matches the deployed DelegationManager: a caveat hashes `(enforcer, keccak256(terms))`
//! only, so redeemer `args` never affect a delegation's identity or signature.

use alloy_primitives::{keccak256, Address, FixedBytes, U256};
use delegation_types::{Caveat, Delegation, ROOT_AUTHORITY};
use serde::{Deserialize, Serialize};

pub const EIP712_DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
/// No `args`: the deployed DelegationManager hashes only enforcer and terms.
pub const CAVEAT_TYPE: &[u8] = b"Caveat(address enforcer,bytes terms)";
pub const DELEGATION_TYPE: &[u8] = b"Delegation(address delegate,address delegator,bytes32 authority,Caveat[] caveats,uint256 salt)Caveat(address enforcer,bytes terms)";

pub const DOMAIN_NAME: &str = "DelegationManager";
pub const DOMAIN_VERSION: &str = "1";

pub fn caveat_typehash() -> FixedBytes<32> {
    keccak256(CAVEAT_TYPE)
}

pub fn delegation_typehash() -> FixedBytes<32> {
    keccak256(DELEGATION_TYPE)
}

fn push_address_word(buf: &mut Vec<u8>, address: &Address) {
    let mut padded = [0u8; 32];
    padded[12..32].copy_from_slice(address.as_slice());
    buf.extend_from_slice(&padded);
}

pub fn caveat_hash(caveat: &Caveat) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(32 * 3);
    buf.extend_from_slice(caveat_typehash().as_slice());
    push_address_word(&mut buf, &caveat.enforcer);
    buf.extend_from_slice(keccak256(&caveat.terms).as_slice());
    keccak256(buf)
}

/// Hash of the ordered caveat array: keccak256 over the concatenated caveat hashes.
pub fn caveats_hash(caveats: &[Caveat]) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(32 * caveats.len());
    for caveat in caveats {
        buf.extend_from_slice(caveat_hash(caveat).as_slice());
    }
    keccak256(buf)
}

/// The delegation's identity. Children reference a parent through this value.
///
/// The signature is not part of the hash; signing never changes it.
pub fn delegation_hash(delegation: &Delegation) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(32 * 6);
    buf.extend_from_slice(delegation_typehash().as_slice());
    push_address_word(&mut buf, &delegation.delegate);
    push_address_word(&mut buf, &delegation.delegator);
    buf.extend_from_slice(delegation.authority.as_slice());
    buf.extend_from_slice(caveats_hash(&delegation.caveats).as_slice());
    buf.extend_from_slice(&delegation.salt.to_be_bytes::<32>());
    keccak256(buf)
}

/// Where a new delegation gets its authority from.
#[derive(Clone, Copy, Debug)]
pub enum Parent<'a> {
    Hash(FixedBytes<32>),
    Delegation(&'a Delegation),
}

/// Root authority when there is no parent, otherwise the parent's struct hash.
pub fn resolve_authority(parent: Option<Parent<'_>>) -> FixedBytes<32> {
    match parent {
        None => ROOT_AUTHORITY,
        Some(Parent::Hash(hash)) => hash,
        Some(Parent::Delegation(delegation)) => delegation_hash(delegation),
    }
}

/// Signing domain of one DelegationManager deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationDomain {
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl DelegationDomain {
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self { chain_id, verifying_contract }
    }

    pub fn separator(&self) -> FixedBytes<32> {
        let mut buf = Vec::with_capacity(32 * 5);
        buf.extend_from_slice(keccak256(EIP712_DOMAIN_TYPE).as_slice());
        buf.extend_from_slice(keccak256(DOMAIN_NAME.as_bytes()).as_slice());
        buf.extend_from_slice(keccak256(DOMAIN_VERSION.as_bytes()).as_slice());
        buf.extend_from_slice(&U256::from(self.chain_id).to_be_bytes::<32>());
        push_address_word(&mut buf, &self.verifying_contract);
        keccak256(buf)
    }
}

/// `keccak256("\x19\x01" || domainSeparator || structHash)`.
pub fn delegation_signing_digest(delegation: &Delegation, domain: &DelegationDomain) -> FixedBytes<32> {
    let mut buf = Vec::with_capacity(2 + 32 + 32);
    buf.extend_from_slice(b"\x19\x01");
    buf.extend_from_slice(domain.separator().as_slice());
    buf.extend_from_slice(delegation_hash(delegation).as_slice());
    keccak256(buf)
}
