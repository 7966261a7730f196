//! Building unsigned delegations from scopes, and validating delegation chains.

use alloy_primitives::{Address, FixedBytes, U256};
use delegation_types::{Delegation, ANY_BENEFICIARY};

use crate::errors::{DelegationError, Result};
use crate::hashing::{delegation_hash, resolve_authority, Parent};
use crate::registry::EnforcerRegistry;
use crate::scope::{resolve_caveats, ExtraCaveats, ScopeConfig};

/// Everything except the delegate needed to create a delegation.
#[derive(Clone, Debug)]
pub struct DelegationParams<'a> {
    pub scope: ScopeConfig,
    pub from: Address,
    pub caveats: ExtraCaveats<'a>,
    pub parent: Option<Parent<'a>>,
    /// Uniqueness is up to the caller; equal salts on equal grants give equal hashes.
    pub salt: U256,
}

impl<'a> DelegationParams<'a> {
    pub fn new(scope: ScopeConfig, from: Address) -> Self {
        Self {
            scope,
            from,
            caveats: ExtraCaveats::None,
            parent: None,
            salt: U256::ZERO,
        }
    }

    pub fn with_caveats(mut self, caveats: impl Into<ExtraCaveats<'a>>) -> Self {
        self.caveats = caveats.into();
        self
    }

    pub fn with_parent(mut self, parent: Parent<'a>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn with_salt(mut self, salt: U256) -> Self {
        self.salt = salt;
        self
    }
}

/// Unsigned delegation from `params.from` to `to`.
pub fn create_delegation<'a>(
    registry: &'a EnforcerRegistry,
    to: Address,
    params: DelegationParams<'a>,
) -> Result<Delegation> {
    let caveats = resolve_caveats(registry, &params.scope, params.caveats)?;
    let delegation = Delegation::new(to, params.from, caveats)
        .with_authority(resolve_authority(params.parent))
        .with_salt(params.salt);
    tracing::debug!(
        delegate = %delegation.delegate,
        delegator = %delegation.delegator,
        scope = params.scope.name(),
        caveats = delegation.caveats.len(),
        "delegation created"
    );
    Ok(delegation)
}

/// Unsigned delegation any account may redeem.
pub fn create_open_delegation<'a>(registry: &'a EnforcerRegistry, params: DelegationParams<'a>) -> Result<Delegation> {
    create_delegation(registry, ANY_BENEFICIARY, params)
}

/// A non-empty chain ordered leaf first, root last, in which every link's authority is
/// the struct hash of the next delegation and the last one is a root delegation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelegationChain(Vec<Delegation>);

impl DelegationChain {
    pub fn new(delegations: Vec<Delegation>) -> Result<Self> {
        if delegations.is_empty() {
            return Err(DelegationError::EmptyCollection { field: "delegations" });
        }
        for (index, pair) in delegations.windows(2).enumerate() {
            if pair[0].authority != delegation_hash(&pair[1]) {
                return Err(DelegationError::BrokenChain { index });
            }
        }
        let last = delegations.len() - 1;
        if !delegations[last].is_root() {
            return Err(DelegationError::BrokenChain { index: last });
        }
        Ok(Self(delegations))
    }

    pub fn leaf(&self) -> &Delegation {
        &self.0[0]
    }

    pub fn root(&self) -> &Delegation {
        &self.0[self.0.len() - 1]
    }

    pub fn leaf_hash(&self) -> FixedBytes<32> {
        delegation_hash(self.leaf())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[Delegation] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<Delegation> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use delegation_types::{CaveatKind, ROOT_AUTHORITY};

    use super::*;
    use crate::codec::OwnershipTransferTerms;

    fn registry() -> EnforcerRegistry {
        EnforcerRegistry::new(1, "1.3.0", Address::repeat_byte(0xff))
            .with_enforcer(CaveatKind::OwnershipTransfer, Address::repeat_byte(0xa1))
    }

    fn scope() -> ScopeConfig {
        ScopeConfig::OwnershipTransfer(OwnershipTransferTerms { contract_address: Address::repeat_byte(0x0c) })
    }

    #[test]
    fn test_root_and_child() {
        let registry = registry();
        let alice = Address::repeat_byte(0x0a);
        let bob = Address::repeat_byte(0x0b);
        let carol = Address::repeat_byte(0xcc);

        let root = create_delegation(&registry, bob, DelegationParams::new(scope(), alice)).unwrap();
        assert_eq!(root.authority, ROOT_AUTHORITY);
        assert!(root.signature.is_empty());

        let child =
            create_delegation(&registry, carol, DelegationParams::new(scope(), bob).with_parent(Parent::Delegation(&root)))
                .unwrap();
        assert_eq!(child.authority, delegation_hash(&root));

        let chain = DelegationChain::new(vec![child.clone(), root.clone()]).unwrap();
        assert_eq!(chain.leaf(), &child);
        assert_eq!(chain.root(), &root);

        assert!(matches!(
            DelegationChain::new(vec![root.clone(), child]),
            Err(DelegationError::BrokenChain { index: 0 })
        ));
        assert!(DelegationChain::new(vec![]).is_err());
    }

    #[test]
    fn test_open_delegation() {
        let registry = registry();
        let open = create_open_delegation(
            &registry,
            DelegationParams::new(scope(), Address::repeat_byte(0x0a)).with_salt(U256::from(7u64)),
        )
        .unwrap();
        assert_eq!(open.delegate, ANY_BENEFICIARY);
        assert_eq!(open.salt, U256::from(7u64));
    }
}
