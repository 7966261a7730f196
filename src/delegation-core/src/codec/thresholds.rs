//! Validity windows: `after (16) ++ before (16)`, where zero means "no bound".

use alloy_primitives::Bytes;
use delegation_types::CaveatKind;
use serde::Deserialize;

use super::allowance::TIMESTAMP_UPPER_BOUND_SECONDS;
use super::json;
use super::primitives::push_u128;
use super::CaveatTerms;
use crate::errors::{DelegationError, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockNumberTerms {
    #[serde(default)]
    #[serde(deserialize_with = "json::after_threshold::uint128")]
    pub after_threshold: u128,
    #[serde(default)]
    #[serde(deserialize_with = "json::before_threshold::uint128")]
    pub before_threshold: u128,
}

impl CaveatTerms for BlockNumberTerms {
    const KIND: CaveatKind = CaveatKind::BlockNumber;

    fn encode_terms(&self) -> Result<Bytes> {
        window(self.after_threshold, self.before_threshold)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimestampTerms {
    #[serde(default)]
    #[serde(deserialize_with = "json::after_threshold::uint64")]
    pub after_threshold: u64,
    #[serde(default)]
    #[serde(deserialize_with = "json::before_threshold::uint64")]
    pub before_threshold: u64,
}

impl CaveatTerms for TimestampTerms {
    const KIND: CaveatKind = CaveatKind::Timestamp;

    fn encode_terms(&self) -> Result<Bytes> {
        for (field, value) in [("afterThreshold", self.after_threshold), ("beforeThreshold", self.before_threshold)] {
            if value > TIMESTAMP_UPPER_BOUND_SECONDS {
                return Err(DelegationError::InvalidNumericRange {
                    field,
                    reason: "exceeds the upper bound for timestamps",
                });
            }
        }
        window(u128::from(self.after_threshold), u128::from(self.before_threshold))
    }
}

fn window(after: u128, before: u128) -> Result<Bytes> {
    if after == 0 && before == 0 {
        return Err(DelegationError::InvalidNumericRange {
            field: "thresholds",
            reason: "at least one of afterThreshold or beforeThreshold must be specified",
        });
    }
    if before != 0 && after >= before {
        return Err(DelegationError::InvalidNumericRange {
            field: "thresholds",
            reason: "afterThreshold must be less than beforeThreshold if both are specified",
        });
    }
    let mut buf = Vec::with_capacity(32);
    push_u128(&mut buf, after);
    push_u128(&mut buf, before);
    Ok(buf.into())
}

#[cfg(test)]
mod tests {
    use alloy_primitives::hex;

    use super::*;

    #[test]
    fn test_block_number_window() {
        let encoded = BlockNumberTerms { after_threshold: 100, before_threshold: 200 }.encode_terms().unwrap();
        assert_eq!(
            encoded.as_ref(),
            hex!("00000000000000000000000000000064000000000000000000000000000000c8")
        );

        // open-ended on either side
        assert!(BlockNumberTerms { after_threshold: 100, before_threshold: 0 }.encode_terms().is_ok());
        assert!(BlockNumberTerms { after_threshold: 0, before_threshold: 5 }.encode_terms().is_ok());
    }

    #[test]
    fn test_invalid_windows() {
        for (after, before) in [(0u128, 0u128), (200, 100), (100, 100)] {
            let err = BlockNumberTerms { after_threshold: after, before_threshold: before }
                .encode_terms()
                .unwrap_err();
            assert!(matches!(err, DelegationError::InvalidNumericRange { field: "thresholds", .. }));
        }
        let err = TimestampTerms { after_threshold: 0, before_threshold: TIMESTAMP_UPPER_BOUND_SECONDS + 1 }
            .encode_terms()
            .unwrap_err();
        assert!(matches!(err, DelegationError::InvalidNumericRange { field: "beforeThreshold", .. }));
    }
}
