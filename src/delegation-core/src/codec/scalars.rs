//! Single 32-byte word terms.

use alloy_primitives::{Bytes, U256};
use delegation_types::CaveatKind;
use serde::Deserialize;

use super::json;
use super::primitives::{push_u256, push_u64_word};
use super::CaveatTerms;
use crate::errors::{DelegationError, Result};

/// One-shot identifier; the enforcer rejects any second use of the same id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct IdTerms {
    #[serde(deserialize_with = "json::id::uint")]
    pub id: U256,
}

impl CaveatTerms for IdTerms {
    const KIND: CaveatKind = CaveatKind::Id;

    fn encode_terms(&self) -> Result<Bytes> {
        Ok(word(self.id))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct LimitedCallsTerms {
    #[serde(deserialize_with = "json::limit::uint64")]
    pub limit: u64,
}

impl CaveatTerms for LimitedCallsTerms {
    const KIND: CaveatKind = CaveatKind::LimitedCalls;

    fn encode_terms(&self) -> Result<Bytes> {
        if self.limit == 0 {
            return Err(DelegationError::InvalidNumericRange {
                field: "limit",
                reason: "must be a positive integer",
            });
        }
        let mut buf = Vec::with_capacity(32);
        push_u64_word(&mut buf, self.limit);
        Ok(buf.into())
    }
}

/// Cap on the total native value moved by the delegation. Zero is a valid cap.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTokenTransferAmountTerms {
    #[serde(deserialize_with = "json::max_amount::uint")]
    pub max_amount: U256,
}

impl CaveatTerms for NativeTokenTransferAmountTerms {
    const KIND: CaveatKind = CaveatKind::NativeTokenTransferAmount;

    fn encode_terms(&self) -> Result<Bytes> {
        Ok(word(self.max_amount))
    }
}

/// Cap on the native value of each individual call.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueLteTerms {
    #[serde(deserialize_with = "json::max_value::uint")]
    pub max_value: U256,
}

impl CaveatTerms for ValueLteTerms {
    const KIND: CaveatKind = CaveatKind::ValueLte;

    fn encode_terms(&self) -> Result<Bytes> {
        Ok(word(self.max_value))
    }
}

/// Delegator nonce the delegation is bound to; bumping it revokes the delegation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NonceTerms {
    #[serde(deserialize_with = "json::nonce::uint")]
    pub nonce: U256,
}

impl CaveatTerms for NonceTerms {
    const KIND: CaveatKind = CaveatKind::Nonce;

    fn encode_terms(&self) -> Result<Bytes> {
        Ok(word(self.nonce))
    }
}

fn word(value: U256) -> Bytes {
    let mut buf = Vec::with_capacity(32);
    push_u256(&mut buf, value);
    buf.into()
}
