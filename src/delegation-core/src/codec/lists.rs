//! Concatenated lists: targets, selectors, redeemers.

use alloy_primitives::{Address, Bytes};
use delegation_types::CaveatKind;
use serde::Deserialize;

use super::json;
use super::primitives::{ensure_non_empty, push_address};
use super::selector::MethodSelector;
use super::CaveatTerms;
use crate::errors::Result;

/// Contracts the delegate may call.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AllowedTargetsTerms {
    #[serde(deserialize_with = "json::targets::addresses")]
    pub targets: Vec<Address>,
}

impl CaveatTerms for AllowedTargetsTerms {
    const KIND: CaveatKind = CaveatKind::AllowedTargets;

    fn encode_terms(&self) -> Result<Bytes> {
        concat_addresses("targets", &self.targets)
    }
}

/// Methods the delegate may call, in any accepted selector form.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct AllowedMethodsTerms {
    pub selectors: Vec<MethodSelector>,
}

impl CaveatTerms for AllowedMethodsTerms {
    const KIND: CaveatKind = CaveatKind::AllowedMethods;

    fn encode_terms(&self) -> Result<Bytes> {
        ensure_non_empty("selectors", &self.selectors)?;
        let mut buf = Vec::with_capacity(4 * self.selectors.len());
        for selector in &self.selectors {
            buf.extend_from_slice(selector.resolve()?.as_slice());
        }
        Ok(buf.into())
    }
}

/// Accounts allowed to redeem the delegation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RedeemerTerms {
    #[serde(deserialize_with = "json::redeemers::addresses")]
    pub redeemers: Vec<Address>,
}

impl CaveatTerms for RedeemerTerms {
    const KIND: CaveatKind = CaveatKind::Redeemer;

    fn encode_terms(&self) -> Result<Bytes> {
        concat_addresses("redeemers", &self.redeemers)
    }
}

fn concat_addresses(field: &'static str, addresses: &[Address]) -> Result<Bytes> {
    ensure_non_empty(field, addresses)?;
    let mut buf = Vec::with_capacity(20 * addresses.len());
    for address in addresses {
        push_address(&mut buf, address);
    }
    Ok(buf.into())
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, hex};

    use super::*;
    use crate::errors::DelegationError;

    #[test]
    fn test_allowed_targets_concatenates() {
        let terms = AllowedTargetsTerms {
            targets: vec![
                address!("0000000000000000000000000000000000000001"),
                address!("0000000000000000000000000000000000000002"),
            ],
        };
        let encoded = terms.encode_terms().unwrap();
        assert_eq!(
            encoded.as_ref(),
            hex!("00000000000000000000000000000000000000010000000000000000000000000000000000000002")
        );
    }

    #[test]
    fn test_allowed_methods_mixed_forms() {
        let terms = AllowedMethodsTerms {
            selectors: vec!["0xa9059cbb".into(), "balanceOf(address)".into()],
        };
        assert_eq!(terms.encode_terms().unwrap().as_ref(), hex!("a9059cbb70a08231"));
    }

    #[test]
    fn test_empty_lists_are_rejected() {
        let err = RedeemerTerms { redeemers: vec![] }.encode_terms().unwrap_err();
        assert!(matches!(err, DelegationError::EmptyCollection { field: "redeemers" }));
        let err = AllowedMethodsTerms { selectors: vec![] }.encode_terms().unwrap_err();
        assert!(matches!(err, DelegationError::EmptyCollection { field: "selectors" }));
    }
}
