//! Terms that pin whole executions.

use alloy_primitives::{Address, Bytes, U256};
use delegation_types::{CaveatKind, Execution};
use serde::Deserialize;

use super::json;
use super::primitives::{ensure_non_empty, ensure_positive, push_address, push_u256};
use super::CaveatTerms;
use crate::abi::encode_executions;
use crate::errors::Result;

/// `target (20) ++ value (32) ++ callData`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ExactExecutionTerms {
    #[serde(deserialize_with = "json::execution")]
    pub execution: Execution,
}

impl CaveatTerms for ExactExecutionTerms {
    const KIND: CaveatKind = CaveatKind::ExactExecution;

    fn encode_terms(&self) -> Result<Bytes> {
        Ok(pack_execution(&self.execution))
    }
}

/// `abi.encode((address,uint256,bytes)[])` of the batch.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ExactCalldataBatchTerms {
    #[serde(deserialize_with = "json::executions")]
    pub executions: Vec<Execution>,
}

impl CaveatTerms for ExactCalldataBatchTerms {
    const KIND: CaveatKind = CaveatKind::ExactCalldataBatch;

    fn encode_terms(&self) -> Result<Bytes> {
        ensure_non_empty("executions", &self.executions)?;
        Ok(encode_executions(&self.executions))
    }
}

/// Same layout as [`ExactCalldataBatchTerms`]; the enforcer also checks targets and values.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ExactExecutionBatchTerms {
    #[serde(deserialize_with = "json::executions")]
    pub executions: Vec<Execution>,
}

impl CaveatTerms for ExactExecutionBatchTerms {
    const KIND: CaveatKind = CaveatKind::ExactExecutionBatch;

    fn encode_terms(&self) -> Result<Bytes> {
        ensure_non_empty("executions", &self.executions)?;
        Ok(encode_executions(&self.executions))
    }
}

/// `token (20) ++ recipient (20) ++ amount (32) ++ target (20) ++ calldata`.
///
/// A batch whose first call is the exact action and whose second is the token transfer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecificActionErc20TransferBatchTerms {
    #[serde(deserialize_with = "json::token_address::address")]
    pub token_address: Address,
    #[serde(deserialize_with = "json::recipient::address")]
    pub recipient: Address,
    #[serde(deserialize_with = "json::amount::uint")]
    pub amount: U256,
    #[serde(deserialize_with = "json::target::address")]
    pub target: Address,
    #[serde(deserialize_with = "json::calldata::hex")]
    pub calldata: Bytes,
}

impl CaveatTerms for SpecificActionErc20TransferBatchTerms {
    const KIND: CaveatKind = CaveatKind::SpecificActionErc20TransferBatch;

    fn encode_terms(&self) -> Result<Bytes> {
        ensure_positive("amount", self.amount)?;
        let mut buf = Vec::with_capacity(92 + self.calldata.len());
        push_address(&mut buf, &self.token_address);
        push_address(&mut buf, &self.recipient);
        push_u256(&mut buf, self.amount);
        push_address(&mut buf, &self.target);
        buf.extend_from_slice(&self.calldata);
        Ok(buf.into())
    }
}

pub(crate) fn pack_execution(execution: &Execution) -> Bytes {
    let mut buf = Vec::with_capacity(52 + execution.call_data.len());
    push_address(&mut buf, &execution.target);
    push_u256(&mut buf, execution.value);
    buf.extend_from_slice(&execution.call_data);
    buf.into()
}

#[cfg(test)]
mod tests {
    use alloy_primitives::bytes;

    use super::*;
    use crate::errors::DelegationError;

    #[test]
    fn test_exact_execution_packed() {
        let execution = Execution::new(Address::repeat_byte(0x33), U256::from(9u64), bytes!("a9059cbb"));
        let encoded = ExactExecutionTerms { execution }.encode_terms().unwrap();
        assert_eq!(encoded.len(), 56);
        assert_eq!(&encoded[..20], Address::repeat_byte(0x33).as_slice());
        assert_eq!(encoded[51], 9);
        assert_eq!(&encoded[52..], [0xa9, 0x05, 0x9c, 0xbb]);
    }

    #[test]
    fn test_batch_is_abi_encoded() {
        let target = Address::repeat_byte(0x44);
        let terms = ExactCalldataBatchTerms {
            executions: vec![Execution::new(target, U256::from(1u64), Bytes::new())],
        };
        let encoded = terms.encode_terms().unwrap();
        let words: Vec<U256> = encoded.chunks(32).map(U256::from_be_slice).collect();
        assert_eq!(words.len(), 7);
        assert_eq!(words[0], U256::from(0x20u64));
        assert_eq!(words[1], U256::from(1u64));
        assert_eq!(words[2], U256::from(0x20u64));
        assert_eq!(&encoded[3 * 32 + 12..4 * 32], target.as_slice());
        assert_eq!(words[4], U256::from(1u64));
        assert_eq!(words[5], U256::from(0x60u64));
        assert_eq!(words[6], U256::ZERO);

        let same = ExactExecutionBatchTerms { executions: terms.executions.clone() }.encode_terms().unwrap();
        assert_eq!(same, encoded);
    }

    #[test]
    fn test_empty_batch_rejected() {
        let err = ExactExecutionBatchTerms { executions: vec![] }.encode_terms().unwrap_err();
        assert!(matches!(err, DelegationError::EmptyCollection { field: "executions" }));
    }
}
