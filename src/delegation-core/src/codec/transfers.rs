//! Address-prefixed fixed records: token caps, payments and NFT transfers.

use alloy_primitives::{Address, Bytes, U256};
use delegation_types::CaveatKind;
use serde::Deserialize;

use super::json;
use super::primitives::{ensure_positive, push_address, push_u256};
use super::CaveatTerms;
use crate::errors::Result;

/// `token (20) ++ maxAmount (32)`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20TransferAmountTerms {
    #[serde(deserialize_with = "json::token_address::address")]
    pub token_address: Address,
    #[serde(deserialize_with = "json::max_amount::uint")]
    pub max_amount: U256,
}

impl CaveatTerms for Erc20TransferAmountTerms {
    const KIND: CaveatKind = CaveatKind::Erc20TransferAmount;

    fn encode_terms(&self) -> Result<Bytes> {
        ensure_positive("maxAmount", self.max_amount)?;
        Ok(address_and_word(&self.token_address, self.max_amount))
    }
}

/// `recipient (20) ++ amount (32)`: the redeemer must pay `amount` to `recipient`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct NativeTokenPaymentTerms {
    #[serde(deserialize_with = "json::recipient::address")]
    pub recipient: Address,
    #[serde(deserialize_with = "json::amount::uint")]
    pub amount: U256,
}

impl CaveatTerms for NativeTokenPaymentTerms {
    const KIND: CaveatKind = CaveatKind::NativeTokenPayment;

    fn encode_terms(&self) -> Result<Bytes> {
        ensure_positive("amount", self.amount)?;
        Ok(address_and_word(&self.recipient, self.amount))
    }
}

/// `token (20) ++ tokenId (32)`. Token id zero is a valid id.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc721TransferTerms {
    #[serde(deserialize_with = "json::token_address::address")]
    pub token_address: Address,
    #[serde(deserialize_with = "json::token_id::uint")]
    pub token_id: U256,
}

impl CaveatTerms for Erc721TransferTerms {
    const KIND: CaveatKind = CaveatKind::Erc721Transfer;

    fn encode_terms(&self) -> Result<Bytes> {
        Ok(address_and_word(&self.token_address, self.token_id))
    }
}

fn address_and_word(address: &Address, value: U256) -> Bytes {
    let mut buf = Vec::with_capacity(52);
    push_address(&mut buf, address);
    push_u256(&mut buf, value);
    buf.into()
}
