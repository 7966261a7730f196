//! Caveat terms codec.
//!
//! Every caveat kind has a typed configuration that validates its inputs and encodes them
//! into the exact byte layout the matching on-chain enforcer parses. Encoding is pure and
//! fails closed: an invalid configuration never produces bytes.

pub mod allowance;
pub mod balance;
pub mod calldata;
pub mod execution;
pub(crate) mod json;
pub mod lists;
pub mod primitives;
pub mod scalars;
pub mod selector;
pub mod thresholds;
pub mod transfers;

use core::str::FromStr;

use alloy_primitives::Bytes;
use delegation_types::CaveatKind;
use serde::Deserialize;

pub use allowance::{
    Erc20PeriodTransferTerms, Erc20StreamingTerms, MultiTokenPeriodTerms, NativeTokenPeriodTransferTerms,
    NativeTokenStreamingTerms, TokenPeriodConfig, TIMESTAMP_UPPER_BOUND_SECONDS,
};
pub use balance::{
    BalanceChangeType, Erc1155BalanceChangeTerms, Erc20BalanceChangeTerms, Erc721BalanceChangeTerms,
    NativeBalanceChangeTerms,
};
pub use calldata::{
    AllowedCalldataTerms, ArgsEqualityCheckTerms, DeployedTerms, ExactCalldataTerms, OwnershipTransferTerms,
};
pub use execution::{
    ExactCalldataBatchTerms, ExactExecutionBatchTerms, ExactExecutionTerms, SpecificActionErc20TransferBatchTerms,
};
pub use lists::{AllowedMethodsTerms, AllowedTargetsTerms, RedeemerTerms};
pub use primitives::{parse_address, parse_hex, parse_uint, to_hex};
pub use scalars::{IdTerms, LimitedCallsTerms, NativeTokenTransferAmountTerms, NonceTerms, ValueLteTerms};
pub use selector::MethodSelector;
pub use thresholds::{BlockNumberTerms, TimestampTerms};
pub use transfers::{Erc20TransferAmountTerms, Erc721TransferTerms, NativeTokenPaymentTerms};

use crate::errors::{DelegationError, Result};

/// A typed configuration that knows its caveat kind and its terms layout.
pub trait CaveatTerms {
    const KIND: CaveatKind;

    /// Validate and encode. Deterministic: equal configurations give equal bytes.
    fn encode_terms(&self) -> Result<Bytes>;
}

/// Requested shape of encoded terms.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Hex,
    Bytes,
}

/// Encoded terms in the requested format. Both carry the same bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EncodedTerms {
    Hex(String),
    Bytes(Bytes),
}

impl EncodedTerms {
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            EncodedTerms::Bytes(bytes) => Ok(bytes),
            EncodedTerms::Hex(text) => parse_hex("terms", &text),
        }
    }
}

/// Any caveat configuration, tagged by its kind name (`{"type": "erc20TransferAmount", ...}`).
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum CaveatConfiguration {
    AllowedCalldata(AllowedCalldataTerms),
    AllowedMethods(AllowedMethodsTerms),
    AllowedTargets(AllowedTargetsTerms),
    ArgsEqualityCheck(ArgsEqualityCheckTerms),
    BlockNumber(BlockNumberTerms),
    Deployed(DeployedTerms),
    Erc1155BalanceChange(Erc1155BalanceChangeTerms),
    Erc20BalanceChange(Erc20BalanceChangeTerms),
    Erc20PeriodTransfer(Erc20PeriodTransferTerms),
    Erc20Streaming(Erc20StreamingTerms),
    Erc20TransferAmount(Erc20TransferAmountTerms),
    Erc721BalanceChange(Erc721BalanceChangeTerms),
    Erc721Transfer(Erc721TransferTerms),
    ExactCalldata(ExactCalldataTerms),
    ExactCalldataBatch(ExactCalldataBatchTerms),
    ExactExecution(ExactExecutionTerms),
    ExactExecutionBatch(ExactExecutionBatchTerms),
    Id(IdTerms),
    LimitedCalls(LimitedCallsTerms),
    MultiTokenPeriod(MultiTokenPeriodTerms),
    NativeBalanceChange(NativeBalanceChangeTerms),
    NativeTokenPayment(NativeTokenPaymentTerms),
    NativeTokenPeriodTransfer(NativeTokenPeriodTransferTerms),
    NativeTokenStreaming(NativeTokenStreamingTerms),
    NativeTokenTransferAmount(NativeTokenTransferAmountTerms),
    Nonce(NonceTerms),
    OwnershipTransfer(OwnershipTransferTerms),
    Redeemer(RedeemerTerms),
    #[serde(rename = "specificActionERC20TransferBatch")]
    SpecificActionErc20TransferBatch(SpecificActionErc20TransferBatchTerms),
    Timestamp(TimestampTerms),
    ValueLte(ValueLteTerms),
}

macro_rules! dispatch {
    ($config:expr, $terms:ident => $body:expr) => {
        match $config {
            CaveatConfiguration::AllowedCalldata($terms) => $body,
            CaveatConfiguration::AllowedMethods($terms) => $body,
            CaveatConfiguration::AllowedTargets($terms) => $body,
            CaveatConfiguration::ArgsEqualityCheck($terms) => $body,
            CaveatConfiguration::BlockNumber($terms) => $body,
            CaveatConfiguration::Deployed($terms) => $body,
            CaveatConfiguration::Erc1155BalanceChange($terms) => $body,
            CaveatConfiguration::Erc20BalanceChange($terms) => $body,
            CaveatConfiguration::Erc20PeriodTransfer($terms) => $body,
            CaveatConfiguration::Erc20Streaming($terms) => $body,
            CaveatConfiguration::Erc20TransferAmount($terms) => $body,
            CaveatConfiguration::Erc721BalanceChange($terms) => $body,
            CaveatConfiguration::Erc721Transfer($terms) => $body,
            CaveatConfiguration::ExactCalldata($terms) => $body,
            CaveatConfiguration::ExactCalldataBatch($terms) => $body,
            CaveatConfiguration::ExactExecution($terms) => $body,
            CaveatConfiguration::ExactExecutionBatch($terms) => $body,
            CaveatConfiguration::Id($terms) => $body,
            CaveatConfiguration::LimitedCalls($terms) => $body,
            CaveatConfiguration::MultiTokenPeriod($terms) => $body,
            CaveatConfiguration::NativeBalanceChange($terms) => $body,
            CaveatConfiguration::NativeTokenPayment($terms) => $body,
            CaveatConfiguration::NativeTokenPeriodTransfer($terms) => $body,
            CaveatConfiguration::NativeTokenStreaming($terms) => $body,
            CaveatConfiguration::NativeTokenTransferAmount($terms) => $body,
            CaveatConfiguration::Nonce($terms) => $body,
            CaveatConfiguration::OwnershipTransfer($terms) => $body,
            CaveatConfiguration::Redeemer($terms) => $body,
            CaveatConfiguration::SpecificActionErc20TransferBatch($terms) => $body,
            CaveatConfiguration::Timestamp($terms) => $body,
            CaveatConfiguration::ValueLte($terms) => $body,
        }
    };
}

macro_rules! impl_from_terms {
    ($($variant:ident($terms:ty)),* $(,)?) => {
        $(
            impl From<$terms> for CaveatConfiguration {
                fn from(terms: $terms) -> Self {
                    CaveatConfiguration::$variant(terms)
                }
            }
        )*
    };
}

impl_from_terms!(
    AllowedCalldata(AllowedCalldataTerms),
    AllowedMethods(AllowedMethodsTerms),
    AllowedTargets(AllowedTargetsTerms),
    ArgsEqualityCheck(ArgsEqualityCheckTerms),
    BlockNumber(BlockNumberTerms),
    Deployed(DeployedTerms),
    Erc1155BalanceChange(Erc1155BalanceChangeTerms),
    Erc20BalanceChange(Erc20BalanceChangeTerms),
    Erc20PeriodTransfer(Erc20PeriodTransferTerms),
    Erc20Streaming(Erc20StreamingTerms),
    Erc20TransferAmount(Erc20TransferAmountTerms),
    Erc721BalanceChange(Erc721BalanceChangeTerms),
    Erc721Transfer(Erc721TransferTerms),
    ExactCalldata(ExactCalldataTerms),
    ExactCalldataBatch(ExactCalldataBatchTerms),
    ExactExecution(ExactExecutionTerms),
    ExactExecutionBatch(ExactExecutionBatchTerms),
    Id(IdTerms),
    LimitedCalls(LimitedCallsTerms),
    MultiTokenPeriod(MultiTokenPeriodTerms),
    NativeBalanceChange(NativeBalanceChangeTerms),
    NativeTokenPayment(NativeTokenPaymentTerms),
    NativeTokenPeriodTransfer(NativeTokenPeriodTransferTerms),
    NativeTokenStreaming(NativeTokenStreamingTerms),
    NativeTokenTransferAmount(NativeTokenTransferAmountTerms),
    Nonce(NonceTerms),
    OwnershipTransfer(OwnershipTransferTerms),
    Redeemer(RedeemerTerms),
    SpecificActionErc20TransferBatch(SpecificActionErc20TransferBatchTerms),
    Timestamp(TimestampTerms),
    ValueLte(ValueLteTerms),
);

fn kind_of<T: CaveatTerms>(_: &T) -> CaveatKind {
    T::KIND
}

impl CaveatConfiguration {
    pub fn kind(&self) -> CaveatKind {
        dispatch!(self, terms => kind_of(terms))
    }

    pub fn encode_terms(&self) -> Result<Bytes> {
        dispatch!(self, terms => terms.encode_terms())
    }

    /// Parse a tagged configuration, reporting an unrecognized `type` as [`DelegationError::UnknownKind`].
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let tag = value.get("type").and_then(serde_json::Value::as_str).unwrap_or_default();
        CaveatKind::from_str(tag).map_err(|_| DelegationError::UnknownKind {
            category: "caveat",
            name: tag.to_owned(),
        })?;
        json::from_value(value)
    }
}

/// Encode any configuration into the requested output format.
pub fn encode(config: &CaveatConfiguration, format: OutputFormat) -> Result<EncodedTerms> {
    let bytes = config.encode_terms()?;
    Ok(match format {
        OutputFormat::Bytes => EncodedTerms::Bytes(bytes),
        OutputFormat::Hex => EncodedTerms::Hex(to_hex(&bytes)),
    })
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{address, U256};
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tags_match_kind_names() {
        let config = CaveatConfiguration::from_json(json!({
            "type": "specificActionERC20TransferBatch",
            "tokenAddress": "0x1111111111111111111111111111111111111111",
            "recipient": "0x2222222222222222222222222222222222222222",
            "amount": "0x64",
            "target": "0x3333333333333333333333333333333333333333",
            "calldata": "0x"
        }))
        .unwrap();
        assert_eq!(config.kind(), CaveatKind::SpecificActionErc20TransferBatch);
        assert_eq!(config.kind().as_str(), "specificActionERC20TransferBatch");

        let config = CaveatConfiguration::from_json(json!({
            "type": "erc20TransferAmount",
            "tokenAddress": "0x1111111111111111111111111111111111111111",
            "maxAmount": "1000"
        }))
        .unwrap();
        assert_eq!(config.kind(), CaveatKind::Erc20TransferAmount);
    }

    #[test]
    fn test_unknown_type() {
        let err = CaveatConfiguration::from_json(json!({ "type": "doesNotExist" })).unwrap_err();
        assert!(matches!(err, DelegationError::UnknownKind { category: "caveat", ref name } if name == "doesNotExist"));
    }

    #[test]
    fn test_output_formats_carry_same_bytes() {
        let config: CaveatConfiguration = Erc20TransferAmountTerms {
            token_address: address!("1111111111111111111111111111111111111111"),
            max_amount: U256::from(1000u64),
        }
        .into();
        let hex_terms = encode(&config, OutputFormat::Hex).unwrap();
        let byte_terms = encode(&config, OutputFormat::Bytes).unwrap();
        match &hex_terms {
            EncodedTerms::Hex(text) => {
                assert!(text.starts_with("0x1111111111111111111111111111111111111111"));
                assert!(text.ends_with("03e8"));
                assert_eq!(text, &text.to_lowercase());
            }
            EncodedTerms::Bytes(_) => panic!("expected hex output"),
        }
        assert_eq!(hex_terms.into_bytes().unwrap(), byte_terms.into_bytes().unwrap());
    }
}
