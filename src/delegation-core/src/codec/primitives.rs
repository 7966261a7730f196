//! Big-endian writers and textual input parsing shared by every terms encoder.

use alloy_primitives::{Address, Bytes, U256};

use crate::errors::{DelegationError, Result};

pub(crate) fn push_address(buf: &mut Vec<u8>, address: &Address) {
    buf.extend_from_slice(address.as_slice());
}

pub(crate) fn push_u256(buf: &mut Vec<u8>, value: U256) {
    buf.extend_from_slice(&value.to_be_bytes::<32>());
}

pub(crate) fn push_u64_word(buf: &mut Vec<u8>, value: u64) {
    push_u256(buf, U256::from(value));
}

pub(crate) fn push_u128(buf: &mut Vec<u8>, value: u128) {
    buf.extend_from_slice(&value.to_be_bytes());
}

pub(crate) fn ensure_non_empty<T>(field: &'static str, items: &[T]) -> Result<()> {
    if items.is_empty() {
        return Err(DelegationError::EmptyCollection { field });
    }
    Ok(())
}

pub(crate) fn ensure_positive(field: &'static str, value: U256) -> Result<()> {
    if value.is_zero() {
        return Err(DelegationError::InvalidNumericRange {
            field,
            reason: "must be a positive number",
        });
    }
    Ok(())
}

/// `0x`-prefixed lowercase hex of `bytes`.
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Parse a `0x`-prefixed, 20-byte address in any letter casing.
pub fn parse_address(field: &'static str, text: &str) -> Result<Address> {
    let digits = strip_hex_prefix(text).ok_or(DelegationError::InvalidAddress { field })?;
    if digits.len() != 40 {
        return Err(DelegationError::InvalidAddress { field });
    }
    let raw = hex::decode(digits).map_err(|_| DelegationError::InvalidAddress { field })?;
    Ok(Address::from_slice(&raw))
}

/// Parse a `0x`-prefixed hex string into bytes. `0x` alone is the empty byte string.
pub fn parse_hex(field: &'static str, text: &str) -> Result<Bytes> {
    let digits = strip_hex_prefix(text).ok_or(DelegationError::InvalidHex {
        field,
        reason: "must be a valid hex string",
    })?;
    if digits.len() % 2 != 0 {
        return Err(DelegationError::InvalidHex {
            field,
            reason: "must contain whole bytes",
        });
    }
    let raw = hex::decode(digits).map_err(|_| DelegationError::InvalidHex {
        field,
        reason: "must be a valid hex string",
    })?;
    Ok(Bytes::from(raw))
}

/// Parse a non-negative integer given in decimal or `0x` hex.
///
/// Signs, fractions and anything above 2^256 - 1 are rejected.
pub fn parse_uint(field: &'static str, text: &str) -> Result<U256> {
    let text = text.trim();
    if text.starts_with('-') {
        return Err(DelegationError::InvalidNumericRange {
            field,
            reason: "must be zero or positive",
        });
    }
    let (digits, radix) = match strip_hex_prefix(text) {
        Some(hex_digits) => (hex_digits, 16u64),
        None => (text, 10u64),
    };
    let well_formed = !digits.is_empty()
        && digits.chars().all(|c| match radix {
            16 => c.is_ascii_hexdigit(),
            _ => c.is_ascii_digit(),
        });
    if !well_formed {
        return Err(DelegationError::InvalidNumericRange {
            field,
            reason: "must be an integer",
        });
    }
    U256::from_str_radix(digits, radix).map_err(|_| DelegationError::InvalidNumericRange {
        field,
        reason: "must be less than 2^256",
    })
}

fn strip_hex_prefix(text: &str) -> Option<&str> {
    text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address_accepts_any_casing() {
        let lower = parse_address("target", "0x00000000000000000000000000000000000000ab").unwrap();
        let upper = parse_address("target", "0x00000000000000000000000000000000000000AB").unwrap();
        assert_eq!(lower, upper);
        assert!(matches!(
            parse_address("target", "00000000000000000000000000000000000000ab"),
            Err(DelegationError::InvalidAddress { field: "target" })
        ));
        assert!(parse_address("target", "0x1234").is_err());
    }

    #[test]
    fn test_parse_hex() {
        assert!(parse_hex("args", "0x").unwrap().is_empty());
        assert_eq!(parse_hex("args", "0xDEADbeef").unwrap().as_ref(), &[0xde, 0xad, 0xbe, 0xef]);
        assert!(matches!(parse_hex("args", "deadbeef"), Err(DelegationError::InvalidHex { .. })));
        assert!(parse_hex("args", "0xabc").is_err());
        assert!(parse_hex("args", "0xzz").is_err());
    }

    #[test]
    fn test_parse_uint() {
        assert_eq!(parse_uint("amount", "1000").unwrap(), U256::from(1000u64));
        assert_eq!(parse_uint("amount", "0x10").unwrap(), U256::from(16u64));
        for bad in ["-1", "1.5", "", "0x", "ten"] {
            assert!(
                matches!(parse_uint("amount", bad), Err(DelegationError::InvalidNumericRange { .. })),
                "{bad} should be rejected"
            );
        }
        let too_big = format!("0x1{}", "0".repeat(64));
        assert!(parse_uint("amount", &too_big).is_err());
    }
}
