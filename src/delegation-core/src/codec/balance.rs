//! Balance-change assertions: `changeType (1) ++ [token (20)] ++ recipient (20) ++ [tokenId] ++ amount`.

use alloy_primitives::{Address, Bytes, U256};
use delegation_types::CaveatKind;
use serde::Deserialize;

use super::json;
use super::primitives::{ensure_positive, push_address, push_u256};
use super::CaveatTerms;
use crate::errors::{DelegationError, Result};

/// Direction of the asserted balance change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "u8")]
#[repr(u8)]
pub enum BalanceChangeType {
    Increase = 0,
    Decrease = 1,
}

impl TryFrom<u8> for BalanceChangeType {
    type Error = DelegationError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(BalanceChangeType::Increase),
            1 => Ok(BalanceChangeType::Decrease),
            _ => Err(DelegationError::InvalidNumericRange {
                field: "changeType",
                reason: "must be either Increase or Decrease",
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeBalanceChangeTerms {
    #[serde(deserialize_with = "json::recipient::address")]
    pub recipient: Address,
    #[serde(deserialize_with = "json::balance::uint")]
    pub balance: U256,
    #[serde(deserialize_with = "json::change_type")]
    pub change_type: BalanceChangeType,
}

impl CaveatTerms for NativeBalanceChangeTerms {
    const KIND: CaveatKind = CaveatKind::NativeBalanceChange;

    fn encode_terms(&self) -> Result<Bytes> {
        ensure_positive("balance", self.balance)?;
        let mut buf = Vec::with_capacity(53);
        buf.push(self.change_type as u8);
        push_address(&mut buf, &self.recipient);
        push_u256(&mut buf, self.balance);
        Ok(buf.into())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20BalanceChangeTerms {
    #[serde(deserialize_with = "json::token_address::address")]
    pub token_address: Address,
    #[serde(deserialize_with = "json::recipient::address")]
    pub recipient: Address,
    #[serde(deserialize_with = "json::balance::uint")]
    pub balance: U256,
    #[serde(deserialize_with = "json::change_type")]
    pub change_type: BalanceChangeType,
}

impl CaveatTerms for Erc20BalanceChangeTerms {
    const KIND: CaveatKind = CaveatKind::Erc20BalanceChange;

    fn encode_terms(&self) -> Result<Bytes> {
        ensure_positive("balance", self.balance)?;
        Ok(token_change(self.change_type, &self.token_address, &self.recipient, None, self.balance))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc721BalanceChangeTerms {
    #[serde(deserialize_with = "json::token_address::address")]
    pub token_address: Address,
    #[serde(deserialize_with = "json::recipient::address")]
    pub recipient: Address,
    #[serde(deserialize_with = "json::amount::uint")]
    pub amount: U256,
    #[serde(deserialize_with = "json::change_type")]
    pub change_type: BalanceChangeType,
}

impl CaveatTerms for Erc721BalanceChangeTerms {
    const KIND: CaveatKind = CaveatKind::Erc721BalanceChange;

    fn encode_terms(&self) -> Result<Bytes> {
        ensure_positive("amount", self.amount)?;
        Ok(token_change(self.change_type, &self.token_address, &self.recipient, None, self.amount))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc1155BalanceChangeTerms {
    #[serde(deserialize_with = "json::token_address::address")]
    pub token_address: Address,
    #[serde(deserialize_with = "json::recipient::address")]
    pub recipient: Address,
    #[serde(deserialize_with = "json::token_id::uint")]
    pub token_id: U256,
    #[serde(deserialize_with = "json::balance::uint")]
    pub balance: U256,
    #[serde(deserialize_with = "json::change_type")]
    pub change_type: BalanceChangeType,
}

impl CaveatTerms for Erc1155BalanceChangeTerms {
    const KIND: CaveatKind = CaveatKind::Erc1155BalanceChange;

    fn encode_terms(&self) -> Result<Bytes> {
        ensure_positive("balance", self.balance)?;
        Ok(token_change(
            self.change_type,
            &self.token_address,
            &self.recipient,
            Some(self.token_id),
            self.balance,
        ))
    }
}

fn token_change(
    change_type: BalanceChangeType,
    token: &Address,
    recipient: &Address,
    token_id: Option<U256>,
    amount: U256,
) -> Bytes {
    let mut buf = Vec::with_capacity(1 + 20 + 20 + 32 + 32);
    buf.push(change_type as u8);
    push_address(&mut buf, token);
    push_address(&mut buf, recipient);
    if let Some(id) = token_id {
        push_u256(&mut buf, id);
    }
    push_u256(&mut buf, amount);
    buf.into()
}
