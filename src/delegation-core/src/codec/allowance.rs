//! Rate-limited allowances: linear streams and fixed-length periods.

use alloy_primitives::{Address, Bytes, U256};
use delegation_types::CaveatKind;
use serde::Deserialize;

use super::json;
use super::primitives::{ensure_non_empty, ensure_positive, push_address, push_u256, push_u64_word};
use super::CaveatTerms;
use crate::errors::{DelegationError, Result};

/// Latest timestamp the time-based enforcers accept (9999-12-31T23:59:59Z).
pub const TIMESTAMP_UPPER_BOUND_SECONDS: u64 = 253_402_300_799;

/// `initialAmount ++ maxAmount ++ amountPerSecond ++ startTime`, one word each.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTokenStreamingTerms {
    #[serde(deserialize_with = "json::initial_amount::uint")]
    pub initial_amount: U256,
    #[serde(deserialize_with = "json::max_amount::uint")]
    pub max_amount: U256,
    #[serde(deserialize_with = "json::amount_per_second::uint")]
    pub amount_per_second: U256,
    #[serde(deserialize_with = "json::start_time::uint64")]
    pub start_time: u64,
}

impl NativeTokenStreamingTerms {
    fn validate(&self) -> Result<()> {
        ensure_positive("maxAmount", self.max_amount)?;
        if self.max_amount < self.initial_amount {
            return Err(DelegationError::InvalidNumericRange {
                field: "maxAmount",
                reason: "must be greater than or equal to initialAmount",
            });
        }
        ensure_positive("amountPerSecond", self.amount_per_second)?;
        ensure_timestamp("startTime", self.start_time)
    }

    fn push(&self, buf: &mut Vec<u8>) {
        push_u256(buf, self.initial_amount);
        push_u256(buf, self.max_amount);
        push_u256(buf, self.amount_per_second);
        push_u64_word(buf, self.start_time);
    }
}

impl CaveatTerms for NativeTokenStreamingTerms {
    const KIND: CaveatKind = CaveatKind::NativeTokenStreaming;

    fn encode_terms(&self) -> Result<Bytes> {
        self.validate()?;
        let mut buf = Vec::with_capacity(128);
        self.push(&mut buf);
        Ok(buf.into())
    }
}

/// Token-prefixed variant of [`NativeTokenStreamingTerms`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20StreamingTerms {
    #[serde(deserialize_with = "json::token_address::address")]
    pub token_address: Address,
    #[serde(deserialize_with = "json::initial_amount::uint")]
    pub initial_amount: U256,
    #[serde(deserialize_with = "json::max_amount::uint")]
    pub max_amount: U256,
    #[serde(deserialize_with = "json::amount_per_second::uint")]
    pub amount_per_second: U256,
    #[serde(deserialize_with = "json::start_time::uint64")]
    pub start_time: u64,
}

impl Erc20StreamingTerms {
    pub fn stream(&self) -> NativeTokenStreamingTerms {
        NativeTokenStreamingTerms {
            initial_amount: self.initial_amount,
            max_amount: self.max_amount,
            amount_per_second: self.amount_per_second,
            start_time: self.start_time,
        }
    }
}

impl CaveatTerms for Erc20StreamingTerms {
    const KIND: CaveatKind = CaveatKind::Erc20Streaming;

    fn encode_terms(&self) -> Result<Bytes> {
        let stream = self.stream();
        stream.validate()?;
        let mut buf = Vec::with_capacity(148);
        push_address(&mut buf, &self.token_address);
        stream.push(&mut buf);
        Ok(buf.into())
    }
}

/// `periodAmount ++ periodDuration ++ startDate`, one word each.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTokenPeriodTransferTerms {
    #[serde(deserialize_with = "json::period_amount::uint")]
    pub period_amount: U256,
    #[serde(deserialize_with = "json::period_duration::uint64")]
    pub period_duration: u64,
    #[serde(deserialize_with = "json::start_date::uint64")]
    pub start_date: u64,
}

impl NativeTokenPeriodTransferTerms {
    fn validate(&self) -> Result<()> {
        ensure_positive("periodAmount", self.period_amount)?;
        ensure_positive("periodDuration", U256::from(self.period_duration))?;
        ensure_positive("startDate", U256::from(self.start_date))
    }

    fn push(&self, buf: &mut Vec<u8>) {
        push_u256(buf, self.period_amount);
        push_u64_word(buf, self.period_duration);
        push_u64_word(buf, self.start_date);
    }
}

impl CaveatTerms for NativeTokenPeriodTransferTerms {
    const KIND: CaveatKind = CaveatKind::NativeTokenPeriodTransfer;

    fn encode_terms(&self) -> Result<Bytes> {
        self.validate()?;
        let mut buf = Vec::with_capacity(96);
        self.push(&mut buf);
        Ok(buf.into())
    }
}

/// Token-prefixed variant of [`NativeTokenPeriodTransferTerms`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Erc20PeriodTransferTerms {
    #[serde(deserialize_with = "json::token_address::address")]
    pub token_address: Address,
    #[serde(deserialize_with = "json::period_amount::uint")]
    pub period_amount: U256,
    #[serde(deserialize_with = "json::period_duration::uint64")]
    pub period_duration: u64,
    #[serde(deserialize_with = "json::start_date::uint64")]
    pub start_date: u64,
}

impl Erc20PeriodTransferTerms {
    pub fn period(&self) -> NativeTokenPeriodTransferTerms {
        NativeTokenPeriodTransferTerms {
            period_amount: self.period_amount,
            period_duration: self.period_duration,
            start_date: self.start_date,
        }
    }
}

impl CaveatTerms for Erc20PeriodTransferTerms {
    const KIND: CaveatKind = CaveatKind::Erc20PeriodTransfer;

    fn encode_terms(&self) -> Result<Bytes> {
        let period = self.period();
        period.validate()?;
        let mut buf = Vec::with_capacity(116);
        push_address(&mut buf, &self.token_address);
        period.push(&mut buf);
        Ok(buf.into())
    }
}

/// One token's period budget inside [`MultiTokenPeriodTerms`].
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPeriodConfig {
    /// The zero address stands for the native token.
    #[serde(deserialize_with = "json::token::address")]
    pub token: Address,
    #[serde(deserialize_with = "json::period_amount::uint")]
    pub period_amount: U256,
    #[serde(deserialize_with = "json::period_duration::uint64")]
    pub period_duration: u64,
    #[serde(deserialize_with = "json::start_date::uint64")]
    pub start_date: u64,
}

/// Concatenated 116-byte records, one per token.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiTokenPeriodTerms {
    pub token_configs: Vec<TokenPeriodConfig>,
}

/// Byte length of one multi-token record.
pub const TOKEN_PERIOD_RECORD_LEN: usize = 20 + 32 * 3;

impl CaveatTerms for MultiTokenPeriodTerms {
    const KIND: CaveatKind = CaveatKind::MultiTokenPeriod;

    fn encode_terms(&self) -> Result<Bytes> {
        ensure_non_empty("tokenConfigs", &self.token_configs)?;
        let mut buf = Vec::with_capacity(TOKEN_PERIOD_RECORD_LEN * self.token_configs.len());
        for config in &self.token_configs {
            let period = NativeTokenPeriodTransferTerms {
                period_amount: config.period_amount,
                period_duration: config.period_duration,
                start_date: config.start_date,
            };
            period.validate()?;
            push_address(&mut buf, &config.token);
            period.push(&mut buf);
        }
        Ok(buf.into())
    }
}

pub(crate) fn ensure_timestamp(field: &'static str, value: u64) -> Result<()> {
    if value == 0 {
        return Err(DelegationError::InvalidNumericRange { field, reason: "must be a positive number" });
    }
    if value > TIMESTAMP_UPPER_BOUND_SECONDS {
        return Err(DelegationError::InvalidNumericRange {
            field,
            reason: "exceeds the upper bound for timestamps",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::*;

    fn stream() -> NativeTokenStreamingTerms {
        NativeTokenStreamingTerms {
            initial_amount: U256::from(10u64),
            max_amount: U256::from(100u64),
            amount_per_second: U256::from(1u64),
            start_time: 1_700_000_000,
        }
    }

    #[test]
    fn test_streaming_layout() {
        let encoded = stream().encode_terms().unwrap();
        assert_eq!(encoded.len(), 128);
        assert_eq!(U256::from_be_slice(&encoded[32..64]), U256::from(100u64));
        assert_eq!(U256::from_be_slice(&encoded[96..]), U256::from(1_700_000_000u64));

        let token = address!("2222222222222222222222222222222222222222");
        let erc20 = Erc20StreamingTerms {
            token_address: token,
            initial_amount: U256::from(10u64),
            max_amount: U256::from(100u64),
            amount_per_second: U256::from(1u64),
            start_time: 1_700_000_000,
        };
        let prefixed = erc20.encode_terms().unwrap();
        assert_eq!(&prefixed[..20], token.as_slice());
        assert_eq!(&prefixed[20..], encoded.as_ref());
    }

    #[test]
    fn test_streaming_validation() {
        let mut bad = stream();
        bad.initial_amount = U256::from(101u64);
        assert!(matches!(
            bad.encode_terms(),
            Err(DelegationError::InvalidNumericRange { field: "maxAmount", .. })
        ));

        let mut bad = stream();
        bad.amount_per_second = U256::ZERO;
        assert!(bad.encode_terms().is_err());

        let mut bad = stream();
        bad.start_time = TIMESTAMP_UPPER_BOUND_SECONDS + 1;
        assert!(matches!(
            bad.encode_terms(),
            Err(DelegationError::InvalidNumericRange { field: "startTime", .. })
        ));
    }

    #[test]
    fn test_multi_token_period_records() {
        let configs = (1u8..=2)
            .map(|i| TokenPeriodConfig {
                token: Address::repeat_byte(i),
                period_amount: U256::from(1000u64),
                period_duration: 86_400,
                start_date: 1_700_000_000,
            })
            .collect();
        let encoded = MultiTokenPeriodTerms { token_configs: configs }.encode_terms().unwrap();
        assert_eq!(encoded.len(), 2 * TOKEN_PERIOD_RECORD_LEN);
        assert_eq!(&encoded[TOKEN_PERIOD_RECORD_LEN..TOKEN_PERIOD_RECORD_LEN + 20], Address::repeat_byte(2).as_slice());

        let err = MultiTokenPeriodTerms { token_configs: vec![] }.encode_terms().unwrap_err();
        assert!(matches!(err, DelegationError::EmptyCollection { field: "tokenConfigs" }));
    }

    #[test]
    fn test_period_rejects_zero_duration() {
        let terms = NativeTokenPeriodTransferTerms { period_amount: U256::from(1u64), period_duration: 0, start_date: 1 };
        assert!(matches!(
            terms.encode_terms(),
            Err(DelegationError::InvalidNumericRange { field: "periodDuration", .. })
        ));
    }
}
