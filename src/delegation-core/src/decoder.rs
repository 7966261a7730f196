//! Decoding of fixed-layout terms back into typed configurations.
//!
//! Used when reading enforcer configuration out of an existing delegation, e.g. to estimate
//! what a streaming or periodic caveat still allows.

use alloy_primitives::{Address, U256};

use crate::codec::{
    BalanceChangeType, BlockNumberTerms, Erc20PeriodTransferTerms, Erc20StreamingTerms, Erc20TransferAmountTerms,
    LimitedCallsTerms, NativeBalanceChangeTerms, NativeTokenPeriodTransferTerms, NativeTokenStreamingTerms,
    TokenPeriodConfig,
};
use crate::errors::DecodeError;

pub fn decode_native_streaming_terms(bytes: &[u8]) -> Result<NativeTokenStreamingTerms, DecodeError> {
    let mut i = 0usize;
    let terms = read_stream(bytes, &mut i)?;
    finish(bytes, i)?;
    Ok(terms)
}

pub fn decode_erc20_streaming_terms(bytes: &[u8]) -> Result<Erc20StreamingTerms, DecodeError> {
    let mut i = 0usize;
    let token_address = read_address(bytes, &mut i)?;
    let stream = read_stream(bytes, &mut i)?;
    finish(bytes, i)?;
    Ok(Erc20StreamingTerms {
        token_address,
        initial_amount: stream.initial_amount,
        max_amount: stream.max_amount,
        amount_per_second: stream.amount_per_second,
        start_time: stream.start_time,
    })
}

pub fn decode_native_period_terms(bytes: &[u8]) -> Result<NativeTokenPeriodTransferTerms, DecodeError> {
    let mut i = 0usize;
    let terms = read_period(bytes, &mut i)?;
    finish(bytes, i)?;
    Ok(terms)
}

pub fn decode_erc20_period_terms(bytes: &[u8]) -> Result<Erc20PeriodTransferTerms, DecodeError> {
    let mut i = 0usize;
    let token_address = read_address(bytes, &mut i)?;
    let period = read_period(bytes, &mut i)?;
    finish(bytes, i)?;
    Ok(Erc20PeriodTransferTerms {
        token_address,
        period_amount: period.period_amount,
        period_duration: period.period_duration,
        start_date: period.start_date,
    })
}

pub fn decode_erc20_transfer_amount_terms(bytes: &[u8]) -> Result<Erc20TransferAmountTerms, DecodeError> {
    let mut i = 0usize;
    let token_address = read_address(bytes, &mut i)?;
    let max_amount = read_u256(bytes, &mut i)?;
    finish(bytes, i)?;
    Ok(Erc20TransferAmountTerms { token_address, max_amount })
}

pub fn decode_limited_calls_terms(bytes: &[u8]) -> Result<LimitedCallsTerms, DecodeError> {
    let mut i = 0usize;
    let limit = read_word_u64(bytes, &mut i)?;
    finish(bytes, i)?;
    Ok(LimitedCallsTerms { limit })
}

pub fn decode_block_number_terms(bytes: &[u8]) -> Result<BlockNumberTerms, DecodeError> {
    let mut i = 0usize;
    let after_threshold = read_u128(bytes, &mut i)?;
    let before_threshold = read_u128(bytes, &mut i)?;
    finish(bytes, i)?;
    Ok(BlockNumberTerms { after_threshold, before_threshold })
}

pub fn decode_native_balance_change_terms(bytes: &[u8]) -> Result<NativeBalanceChangeTerms, DecodeError> {
    let mut i = 0usize;
    let raw = read_u8(bytes, &mut i)?;
    let change_type = BalanceChangeType::try_from(raw).map_err(|_| DecodeError::InvalidChangeType(raw))?;
    let recipient = read_address(bytes, &mut i)?;
    let balance = read_u256(bytes, &mut i)?;
    finish(bytes, i)?;
    Ok(NativeBalanceChangeTerms { recipient, balance, change_type })
}

/// Split multi-token period terms into their per-token records.
pub fn decode_multi_token_period_terms(bytes: &[u8]) -> Result<Vec<TokenPeriodConfig>, DecodeError> {
    let mut configs = Vec::new();
    let mut i = 0usize;
    if bytes.is_empty() {
        return Err(DecodeError::Truncated);
    }
    while i < bytes.len() {
        let token = read_address(bytes, &mut i)?;
        let period = read_period(bytes, &mut i)?;
        configs.push(TokenPeriodConfig {
            token,
            period_amount: period.period_amount,
            period_duration: period.period_duration,
            start_date: period.start_date,
        });
    }
    Ok(configs)
}

fn read_stream(bytes: &[u8], i: &mut usize) -> Result<NativeTokenStreamingTerms, DecodeError> {
    Ok(NativeTokenStreamingTerms {
        initial_amount: read_u256(bytes, i)?,
        max_amount: read_u256(bytes, i)?,
        amount_per_second: read_u256(bytes, i)?,
        start_time: read_word_u64(bytes, i)?,
    })
}

fn read_period(bytes: &[u8], i: &mut usize) -> Result<NativeTokenPeriodTransferTerms, DecodeError> {
    Ok(NativeTokenPeriodTransferTerms {
        period_amount: read_u256(bytes, i)?,
        period_duration: read_word_u64(bytes, i)?,
        start_date: read_word_u64(bytes, i)?,
    })
}

fn finish(bytes: &[u8], i: usize) -> Result<(), DecodeError> {
    if i != bytes.len() {
        return Err(DecodeError::TrailingBytes);
    }
    Ok(())
}

fn read_u8(bytes: &[u8], i: &mut usize) -> Result<u8, DecodeError> {
    let byte = *bytes.get(*i).ok_or(DecodeError::Truncated)?;
    *i += 1;
    Ok(byte)
}

fn read_u128(bytes: &[u8], i: &mut usize) -> Result<u128, DecodeError> {
    if bytes.len() < *i + 16 {
        return Err(DecodeError::Truncated);
    }
    let mut buf = [0u8; 16];
    buf.copy_from_slice(&bytes[*i..*i + 16]);
    *i += 16;
    Ok(u128::from_be_bytes(buf))
}

fn read_u256(bytes: &[u8], i: &mut usize) -> Result<U256, DecodeError> {
    if bytes.len() < *i + 32 {
        return Err(DecodeError::Truncated);
    }
    let word = &bytes[*i..*i + 32];
    *i += 32;
    Ok(U256::from_be_slice(word))
}

fn read_word_u64(bytes: &[u8], i: &mut usize) -> Result<u64, DecodeError> {
    u64::try_from(read_u256(bytes, i)?).map_err(|_| DecodeError::ValueOutOfRange)
}

fn read_address(bytes: &[u8], i: &mut usize) -> Result<Address, DecodeError> {
    if bytes.len() < *i + 20 {
        return Err(DecodeError::Truncated);
    }
    let out = Address::from_slice(&bytes[*i..*i + 20]);
    *i += 20;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{CaveatTerms, MultiTokenPeriodTerms};

    #[test]
    fn test_streaming_terms_decode() {
        let terms = Erc20StreamingTerms {
            token_address: Address::repeat_byte(0x11),
            initial_amount: U256::from(1u64),
            max_amount: U256::from(10u64),
            amount_per_second: U256::from(2u64),
            start_time: 1_700_000_000,
        };
        let encoded = terms.encode_terms().unwrap();
        assert_eq!(decode_erc20_streaming_terms(&encoded).unwrap(), terms);
        assert_eq!(decode_native_streaming_terms(&encoded[20..]).unwrap(), terms.stream());
    }

    #[test]
    fn test_truncated_and_trailing() {
        assert_eq!(decode_limited_calls_terms(&[0u8; 31]), Err(DecodeError::Truncated));
        assert_eq!(decode_limited_calls_terms(&[0u8; 33]), Err(DecodeError::TrailingBytes));

        let mut huge = [0u8; 32];
        huge[0] = 1;
        assert_eq!(decode_limited_calls_terms(&huge), Err(DecodeError::ValueOutOfRange));
    }

    #[test]
    fn test_multi_token_records() {
        let configs: Vec<TokenPeriodConfig> = (1u8..=3)
            .map(|i| TokenPeriodConfig {
                token: Address::repeat_byte(i),
                period_amount: U256::from(u64::from(i) * 100),
                period_duration: 3600,
                start_date: 1_700_000_000,
            })
            .collect();
        let encoded = MultiTokenPeriodTerms { token_configs: configs.clone() }.encode_terms().unwrap();
        assert_eq!(decode_multi_token_period_terms(&encoded).unwrap(), configs);
        assert_eq!(
            decode_multi_token_period_terms(&encoded[..encoded.len() - 1]),
            Err(DecodeError::Truncated)
        );
    }

    #[test]
    fn test_invalid_change_type() {
        let mut bytes = vec![7u8];
        bytes.extend_from_slice(&[0u8; 52]);
        assert_eq!(decode_native_balance_change_terms(&bytes), Err(DecodeError::InvalidChangeType(7)));
    }
}
