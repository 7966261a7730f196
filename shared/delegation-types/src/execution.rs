use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use serde::{Deserialize, Serialize};

/// A single call a redeemer asks a delegator account to make.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    pub target: Address,
    pub value: U256,
    pub call_data: Bytes,
}

impl Execution {
    pub fn new(target: Address, value: U256, call_data: impl Into<Bytes>) -> Self {
        Self {
            target,
            value,
            call_data: call_data.into(),
        }
    }
}

/// How a redeemer's executions are packaged (ERC-7579 call type x exec type).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExecutionMode {
    #[default]
    SingleDefault,
    SingleTry,
    BatchDefault,
    BatchTry,
}

const CALLTYPE_SINGLE: u8 = 0x00;
const CALLTYPE_BATCH: u8 = 0x01;
const EXECTYPE_DEFAULT: u8 = 0x00;
const EXECTYPE_TRY: u8 = 0x01;

impl ExecutionMode {
    pub const fn is_batch(self) -> bool {
        matches!(self, ExecutionMode::BatchDefault | ExecutionMode::BatchTry)
    }

    /// ERC-7579 `ModeCode`: callType byte ++ execType byte ++ 30 zero bytes.
    pub fn mode_code(self) -> FixedBytes<32> {
        let (call_type, exec_type) = match self {
            ExecutionMode::SingleDefault => (CALLTYPE_SINGLE, EXECTYPE_DEFAULT),
            ExecutionMode::SingleTry => (CALLTYPE_SINGLE, EXECTYPE_TRY),
            ExecutionMode::BatchDefault => (CALLTYPE_BATCH, EXECTYPE_DEFAULT),
            ExecutionMode::BatchTry => (CALLTYPE_BATCH, EXECTYPE_TRY),
        };
        let mut code = [0u8; 32];
        code[0] = call_type;
        code[1] = exec_type;
        FixedBytes(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_codes_follow_erc7579() {
        assert_eq!(ExecutionMode::SingleDefault.mode_code(), FixedBytes::<32>::ZERO);
        assert_eq!(ExecutionMode::SingleTry.mode_code()[..2], [0x00, 0x01]);
        assert_eq!(ExecutionMode::BatchDefault.mode_code()[..2], [0x01, 0x00]);
        assert_eq!(ExecutionMode::BatchTry.mode_code()[..2], [0x01, 0x01]);
        assert!(ExecutionMode::BatchTry.mode_code()[2..].iter().all(|b| *b == 0));
    }
}
