//! Raw and positional calldata constraints plus contract-bound terms.

use alloy_primitives::{Address, Bytes};
use delegation_types::CaveatKind;
use serde::Deserialize;

use super::json;
use super::primitives::{push_address, push_u64_word};
use super::CaveatTerms;
use crate::errors::{DelegationError, Result};

/// Redeemer args must equal these bytes exactly. `0x` is allowed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ArgsEqualityCheckTerms {
    #[serde(deserialize_with = "json::args::hex")]
    pub args: Bytes,
}

impl CaveatTerms for ArgsEqualityCheckTerms {
    const KIND: CaveatKind = CaveatKind::ArgsEqualityCheck;

    fn encode_terms(&self) -> Result<Bytes> {
        Ok(self.args.clone())
    }
}

/// Calldata of the execution must equal these bytes exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ExactCalldataTerms {
    #[serde(deserialize_with = "json::calldata::hex")]
    pub calldata: Bytes,
}

impl CaveatTerms for ExactCalldataTerms {
    const KIND: CaveatKind = CaveatKind::ExactCalldata;

    fn encode_terms(&self) -> Result<Bytes> {
        Ok(self.calldata.clone())
    }
}

/// `startIndex (32) ++ value`: calldata at `startIndex` must begin with `value`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AllowedCalldataTerms {
    #[serde(deserialize_with = "json::start_index::uint64")]
    pub start_index: u64,
    #[serde(deserialize_with = "json::value::hex")]
    pub value: Bytes,
}

impl AllowedCalldataTerms {
    pub fn new(start_index: u64, value: impl Into<Bytes>) -> Self {
        Self { start_index, value: value.into() }
    }
}

impl CaveatTerms for AllowedCalldataTerms {
    const KIND: CaveatKind = CaveatKind::AllowedCalldata;

    fn encode_terms(&self) -> Result<Bytes> {
        let mut buf = Vec::with_capacity(32 + self.value.len());
        push_u64_word(&mut buf, self.start_index);
        buf.extend_from_slice(&self.value);
        Ok(buf.into())
    }
}

/// `contractAddress (20) ++ salt (32, left-padded) ++ bytecode`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedTerms {
    #[serde(deserialize_with = "json::contract_address::address")]
    pub contract_address: Address,
    #[serde(deserialize_with = "json::salt::hex")]
    pub salt: Bytes,
    #[serde(deserialize_with = "json::bytecode::hex")]
    pub bytecode: Bytes,
}

impl CaveatTerms for DeployedTerms {
    const KIND: CaveatKind = CaveatKind::Deployed;

    fn encode_terms(&self) -> Result<Bytes> {
        if self.salt.len() > 32 {
            return Err(DelegationError::InvalidHex {
                field: "salt",
                reason: "must be at most 32 bytes",
            });
        }
        let mut buf = Vec::with_capacity(20 + 32 + self.bytecode.len());
        push_address(&mut buf, &self.contract_address);
        buf.resize(buf.len() + 32 - self.salt.len(), 0);
        buf.extend_from_slice(&self.salt);
        buf.extend_from_slice(&self.bytecode);
        Ok(buf.into())
    }
}

/// The contract whose ownership may be transferred.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnershipTransferTerms {
    #[serde(deserialize_with = "json::contract_address::address")]
    pub contract_address: Address,
}

impl CaveatTerms for OwnershipTransferTerms {
    const KIND: CaveatKind = CaveatKind::OwnershipTransfer;

    fn encode_terms(&self) -> Result<Bytes> {
        Ok(Bytes::copy_from_slice(self.contract_address.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{bytes, hex, U256};

    use super::*;

    #[test]
    fn test_allowed_calldata_prefixes_index() {
        let encoded = AllowedCalldataTerms::new(4, bytes!("deadbeef")).encode_terms().unwrap();
        assert_eq!(encoded.len(), 36);
        assert_eq!(U256::from_be_slice(&encoded[..32]), U256::from(4u64));
        assert_eq!(&encoded[32..], hex!("deadbeef"));
    }

    #[test]
    fn test_deployed_pads_salt() {
        let terms = DeployedTerms {
            contract_address: Address::repeat_byte(0xaa),
            salt: bytes!("01"),
            bytecode: bytes!("6080"),
        };
        let encoded = terms.encode_terms().unwrap();
        assert_eq!(encoded.len(), 20 + 32 + 2);
        assert!(encoded[20..51].iter().all(|b| *b == 0));
        assert_eq!(encoded[51], 0x01);
        assert_eq!(&encoded[52..], hex!("6080"));

        let oversized = DeployedTerms { salt: Bytes::from(vec![1u8; 33]), ..terms };
        assert!(matches!(oversized.encode_terms(), Err(DelegationError::InvalidHex { field: "salt", .. })));
    }

    #[test]
    fn test_hex_fields_require_prefix() {
        let ok: ArgsEqualityCheckTerms = json::from_value(serde_json::json!({ "args": "0x" })).unwrap();
        assert!(ok.encode_terms().unwrap().is_empty());
        for bad in ["deadbeef", "0xzz", "0xabc"] {
            let err = json::from_value::<ArgsEqualityCheckTerms>(serde_json::json!({ "args": bad })).unwrap_err();
            assert!(matches!(err, DelegationError::InvalidHex { field: "args", .. }), "{bad}");
        }
        let err = json::from_value::<DeployedTerms>(serde_json::json!({
            "contractAddress": "0x1111111111111111111111111111111111111111",
            "salt": "0x01",
            "bytecode": 6080
        }))
        .unwrap_err();
        assert!(matches!(err, DelegationError::InvalidHex { field: "bytecode", .. }));
    }
}
