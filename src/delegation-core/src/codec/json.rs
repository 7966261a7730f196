//! Serde adapters for JSON configurations.
//!
//! Each field is read as a raw [`Value`] and checked with the textual parsers in
//! [`super::primitives`], so malformed input fails as the matching [`DelegationError`]
//! variant instead of a generic JSON error. Serde only carries strings out of a
//! deserializer; the typed error is parked in a thread-local slot and picked up again by
//! [`from_value`].

use std::cell::RefCell;

use alloy_primitives::{Address, Bytes, U256};
use delegation_types::Execution;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::balance::BalanceChangeType;
use super::primitives::{parse_address, parse_hex, parse_uint};
use crate::errors::{DelegationError, Result};

thread_local! {
    // First field error raised while `from_value` runs on this thread.
    static FIELD_ERROR: RefCell<Option<DelegationError>> = const { RefCell::new(None) };
}

/// Deserialize `value`, surfacing the first field error as its own variant.
pub(crate) fn from_value<T: DeserializeOwned>(value: Value) -> Result<T> {
    FIELD_ERROR.with(|slot| slot.borrow_mut().take());
    let parsed = serde_json::from_value(value);
    let captured = FIELD_ERROR.with(|slot| slot.borrow_mut().take());
    match (parsed, captured) {
        (Ok(parsed), _) => Ok(parsed),
        (Err(_), Some(err)) => Err(err),
        (Err(err), None) => Err(DelegationError::Json(err)),
    }
}

pub(crate) fn reject<E: serde::de::Error>(err: DelegationError) -> E {
    let message = err.to_string();
    FIELD_ERROR.with(|slot| {
        let mut slot = slot.borrow_mut();
        if slot.is_none() {
            *slot = Some(err);
        }
    });
    E::custom(message)
}

fn address_of(field: &'static str, value: &Value) -> Result<Address> {
    match value {
        Value::String(text) => parse_address(field, text),
        _ => Err(DelegationError::InvalidAddress { field }),
    }
}

fn uint_of(field: &'static str, value: &Value) -> Result<U256> {
    let out_of_range = |reason| DelegationError::InvalidNumericRange { field, reason };
    match value {
        Value::String(text) => parse_uint(field, text),
        Value::Number(number) => match (number.as_u64(), number.as_i64(), number.as_f64()) {
            (Some(value), _, _) => Ok(U256::from(value)),
            (None, Some(_), _) => Err(out_of_range("must be zero or positive")),
            (None, None, Some(value)) if value < 0.0 => Err(out_of_range("must be zero or positive")),
            _ => Err(out_of_range("must be an integer")),
        },
        _ => Err(out_of_range("must be an integer")),
    }
}

fn narrow<T: TryFrom<U256>>(field: &'static str, value: U256, reason: &'static str) -> Result<T> {
    T::try_from(value).map_err(|_| DelegationError::InvalidNumericRange { field, reason })
}

fn hex_of(field: &'static str, value: &Value) -> Result<Bytes> {
    match value {
        Value::String(text) => parse_hex(field, text),
        _ => Err(DelegationError::InvalidHex {
            field,
            reason: "must be a valid hex string",
        }),
    }
}

pub(crate) fn address<'de, D: Deserializer<'de>>(field: &'static str, deserializer: D) -> Result<Address, D::Error> {
    let value = Value::deserialize(deserializer)?;
    address_of(field, &value).map_err(reject)
}

pub(crate) fn addresses<'de, D: Deserializer<'de>>(
    field: &'static str,
    deserializer: D,
) -> Result<Vec<Address>, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::Array(items) => items.iter().map(|item| address_of(field, item).map_err(reject)).collect(),
        _ => Err(reject(DelegationError::InvalidAddress { field })),
    }
}

pub(crate) fn uint<'de, D: Deserializer<'de>>(field: &'static str, deserializer: D) -> Result<U256, D::Error> {
    let value = Value::deserialize(deserializer)?;
    uint_of(field, &value).map_err(reject)
}

pub(crate) fn uint64<'de, D: Deserializer<'de>>(field: &'static str, deserializer: D) -> Result<u64, D::Error> {
    let value = Value::deserialize(deserializer)?;
    uint_of(field, &value)
        .and_then(|value| narrow(field, value, "must be less than 2^64"))
        .map_err(reject)
}

pub(crate) fn uint128<'de, D: Deserializer<'de>>(field: &'static str, deserializer: D) -> Result<u128, D::Error> {
    let value = Value::deserialize(deserializer)?;
    uint_of(field, &value)
        .and_then(|value| narrow(field, value, "must be less than 2^128"))
        .map_err(reject)
}

pub(crate) fn hex<'de, D: Deserializer<'de>>(field: &'static str, deserializer: D) -> Result<Bytes, D::Error> {
    let value = Value::deserialize(deserializer)?;
    hex_of(field, &value).map_err(reject)
}

pub(crate) fn change_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BalanceChangeType, D::Error> {
    let value = Value::deserialize(deserializer)?;
    uint_of("changeType", &value)
        .and_then(|value| narrow::<u8>("changeType", value, "must be either Increase or Decrease"))
        .and_then(BalanceChangeType::try_from)
        .map_err(reject)
}

/// `{ "target", "value", "callData" }` with the same checks as top-level fields.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecutionJson {
    #[serde(deserialize_with = "target::address")]
    target: Address,
    #[serde(deserialize_with = "value::uint")]
    value: U256,
    #[serde(deserialize_with = "call_data::hex")]
    call_data: Bytes,
}

impl From<ExecutionJson> for Execution {
    fn from(json: ExecutionJson) -> Self {
        Execution {
            target: json.target,
            value: json.value,
            call_data: json.call_data,
        }
    }
}

pub(crate) fn execution<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Execution, D::Error> {
    ExecutionJson::deserialize(deserializer).map(Execution::from)
}

pub(crate) fn executions<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Execution>, D::Error> {
    let executions = Vec::<ExecutionJson>::deserialize(deserializer)?;
    Ok(executions.into_iter().map(Execution::from).collect())
}

/// One adapter module per JSON field name, so errors name the field the caller wrote.
macro_rules! fields {
    ($($module:ident => $field:literal),* $(,)?) => {
        $(
            #[allow(dead_code)]
            pub(crate) mod $module {
                use alloy_primitives::{Address, Bytes, U256};
                use serde::Deserializer;

                pub(crate) fn address<'de, D: Deserializer<'de>>(d: D) -> Result<Address, D::Error> {
                    super::address($field, d)
                }

                pub(crate) fn addresses<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<Address>, D::Error> {
                    super::addresses($field, d)
                }

                pub(crate) fn uint<'de, D: Deserializer<'de>>(d: D) -> Result<U256, D::Error> {
                    super::uint($field, d)
                }

                pub(crate) fn uint64<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
                    super::uint64($field, d)
                }

                pub(crate) fn uint128<'de, D: Deserializer<'de>>(d: D) -> Result<u128, D::Error> {
                    super::uint128($field, d)
                }

                pub(crate) fn hex<'de, D: Deserializer<'de>>(d: D) -> Result<Bytes, D::Error> {
                    super::hex($field, d)
                }
            }
        )*
    };
}

fields!(
    after_threshold => "afterThreshold",
    amount => "amount",
    amount_per_second => "amountPerSecond",
    args => "args",
    balance => "balance",
    before_threshold => "beforeThreshold",
    bytecode => "bytecode",
    call_data => "callData",
    calldata => "calldata",
    contract_address => "contractAddress",
    id => "id",
    initial_amount => "initialAmount",
    limit => "limit",
    max_amount => "maxAmount",
    max_value => "maxValue",
    nonce => "nonce",
    period_amount => "periodAmount",
    period_duration => "periodDuration",
    recipient => "recipient",
    redeemers => "redeemers",
    salt => "salt",
    start_date => "startDate",
    start_index => "startIndex",
    start_time => "startTime",
    target => "target",
    targets => "targets",
    token => "token",
    token_address => "tokenAddress",
    token_id => "tokenId",
    value => "value",
);
