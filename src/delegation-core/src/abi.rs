//! ABI wire forms of delegations, permission contexts and execution calldata.
//!
//! A permission context is `abi.encode(Delegation[])`, leaf first and root last; a batch of
//! redemptions carries one context per execution. The `encode_*_call` helpers build full
//! calldata for the DelegationManager and NonceEnforcer entry points.

use alloy_primitives::{Address, Bytes};
use alloy_sol_types::{SolCall, SolValue};
use delegation_types::{Caveat, Delegation, Execution, ExecutionMode};

use crate::codec::execution::pack_execution;
use crate::errors::{DelegationError, Result};

mod wire {
    use alloy_sol_types::sol;

    sol! {
        struct Caveat {
            address enforcer;
            bytes terms;
            bytes args;
        }

        struct Delegation {
            address delegate;
            address delegator;
            bytes32 authority;
            Caveat[] caveats;
            uint256 salt;
            bytes signature;
        }

        struct Execution {
            address target;
            uint256 value;
            bytes callData;
        }

        interface IDelegationManager {
            function redeemDelegations(
                bytes[] calldata permissionContexts,
                bytes32[] calldata modes,
                bytes[] calldata executionCallDatas
            ) external;
            function disableDelegation(Delegation calldata delegation) external;
            function enableDelegation(Delegation calldata delegation) external;
        }

        interface INonceEnforcer {
            function incrementNonce(address delegationManager) external;
        }
    }
}

impl From<&Caveat> for wire::Caveat {
    fn from(caveat: &Caveat) -> Self {
        wire::Caveat {
            enforcer: caveat.enforcer,
            terms: caveat.terms.clone(),
            args: caveat.args.clone(),
        }
    }
}

impl From<wire::Caveat> for Caveat {
    fn from(caveat: wire::Caveat) -> Self {
        Caveat {
            enforcer: caveat.enforcer,
            terms: caveat.terms,
            args: caveat.args,
        }
    }
}

impl From<&Delegation> for wire::Delegation {
    fn from(delegation: &Delegation) -> Self {
        wire::Delegation {
            delegate: delegation.delegate,
            delegator: delegation.delegator,
            authority: delegation.authority,
            caveats: delegation.caveats.iter().map(Into::into).collect(),
            salt: delegation.salt,
            signature: delegation.signature.clone(),
        }
    }
}

impl From<wire::Delegation> for Delegation {
    fn from(delegation: wire::Delegation) -> Self {
        Delegation {
            delegate: delegation.delegate,
            delegator: delegation.delegator,
            authority: delegation.authority,
            caveats: delegation.caveats.into_iter().map(Into::into).collect(),
            salt: delegation.salt,
            signature: delegation.signature,
        }
    }
}

impl From<&Execution> for wire::Execution {
    fn from(execution: &Execution) -> Self {
        wire::Execution {
            target: execution.target,
            value: execution.value,
            callData: execution.call_data.clone(),
        }
    }
}

impl From<wire::Execution> for Execution {
    fn from(execution: wire::Execution) -> Self {
        Execution {
            target: execution.target,
            value: execution.value,
            call_data: execution.callData,
        }
    }
}

/// `abi.encode(Delegation[])`.
pub fn encode_delegations(delegations: &[Delegation]) -> Bytes {
    let wire: Vec<wire::Delegation> = delegations.iter().map(Into::into).collect();
    wire.abi_encode().into()
}

pub fn decode_delegations(data: &[u8]) -> Result<Vec<Delegation>> {
    let wire = <Vec<wire::Delegation>>::abi_decode(data, true)?;
    Ok(wire.into_iter().map(Into::into).collect())
}

/// `abi.encode(Delegation[][])`, one permission context per execution.
pub fn encode_permission_contexts(contexts: &[Vec<Delegation>]) -> Bytes {
    let wire: Vec<Vec<wire::Delegation>> = contexts
        .iter()
        .map(|chain| chain.iter().map(Into::into).collect())
        .collect();
    wire.abi_encode().into()
}

pub fn decode_permission_contexts(data: &[u8]) -> Result<Vec<Vec<Delegation>>> {
    let wire = <Vec<Vec<wire::Delegation>>>::abi_decode(data, true)?;
    Ok(wire
        .into_iter()
        .map(|chain| chain.into_iter().map(Into::into).collect())
        .collect())
}

/// `abi.encode(Execution[])`.
pub fn encode_executions(executions: &[Execution]) -> Bytes {
    let wire: Vec<wire::Execution> = executions.iter().map(Into::into).collect();
    wire.abi_encode().into()
}

pub fn decode_executions(data: &[u8]) -> Result<Vec<Execution>> {
    let wire = <Vec<wire::Execution>>::abi_decode(data, true)?;
    Ok(wire.into_iter().map(Into::into).collect())
}

/// ERC-7579 execution calldata for `mode`.
///
/// Single modes take exactly one execution, packed as `target ++ value ++ callData`;
/// batch modes take the ABI-encoded array.
pub fn encode_execution_calldata(mode: ExecutionMode, executions: &[Execution]) -> Result<Bytes> {
    if mode.is_batch() {
        if executions.is_empty() {
            return Err(DelegationError::EmptyCollection { field: "executions" });
        }
        return Ok(encode_executions(executions));
    }
    match executions {
        [execution] => Ok(pack_execution(execution)),
        _ => Err(DelegationError::InvalidNumericRange {
            field: "executions",
            reason: "single execution modes take exactly one execution",
        }),
    }
}

/// One entry of a `redeemDelegations` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Redemption {
    /// Leaf first, root last.
    pub permission_context: Vec<Delegation>,
    pub mode: ExecutionMode,
    pub executions: Vec<Execution>,
}

/// `DelegationManager.redeemDelegations(bytes[],bytes32[],bytes[])` calldata.
pub fn encode_redeem_delegations_call(redemptions: &[Redemption]) -> Result<Bytes> {
    if redemptions.is_empty() {
        return Err(DelegationError::EmptyCollection { field: "redemptions" });
    }
    let mut permission_contexts = Vec::with_capacity(redemptions.len());
    let mut modes = Vec::with_capacity(redemptions.len());
    let mut execution_call_datas = Vec::with_capacity(redemptions.len());
    for redemption in redemptions {
        permission_contexts.push(encode_delegations(&redemption.permission_context));
        modes.push(redemption.mode.mode_code());
        execution_call_datas.push(encode_execution_calldata(redemption.mode, &redemption.executions)?);
    }
    let call = wire::IDelegationManager::redeemDelegationsCall {
        permissionContexts: permission_contexts,
        modes,
        executionCallDatas: execution_call_datas,
    };
    Ok(call.abi_encode().into())
}

/// `DelegationManager.disableDelegation(Delegation)` calldata.
pub fn encode_disable_delegation_call(delegation: &Delegation) -> Bytes {
    let call = wire::IDelegationManager::disableDelegationCall { delegation: delegation.into() };
    call.abi_encode().into()
}

/// `DelegationManager.enableDelegation(Delegation)` calldata.
pub fn encode_enable_delegation_call(delegation: &Delegation) -> Bytes {
    let call = wire::IDelegationManager::enableDelegationCall { delegation: delegation.into() };
    call.abi_encode().into()
}

/// `NonceEnforcer.incrementNonce(address)` calldata; revokes every delegation carrying the
/// caller's current nonce.
pub fn encode_increment_nonce_call(delegation_manager: Address) -> Bytes {
    wire::INonceEnforcer::incrementNonceCall { delegationManager: delegation_manager }
        .abi_encode()
        .into()
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{bytes, keccak256, FixedBytes, U256};

    use super::*;

    fn sample_delegation() -> Delegation {
        Delegation::new(
            Address::repeat_byte(0xde),
            Address::repeat_byte(0xad),
            vec![Caveat::new(Address::repeat_byte(0xee), bytes!("0102"))],
        )
        .with_salt(U256::from(3u64))
        .with_signature(bytes!("aabbcc"))
    }

    #[test]
    fn test_delegations_survive_wire() {
        let leaf = sample_delegation().with_authority(FixedBytes::repeat_byte(0x01));
        let root = sample_delegation();
        let chain = vec![leaf, root];
        let encoded = encode_delegations(&chain);
        assert_eq!(decode_delegations(&encoded).unwrap(), chain);

        let contexts = vec![chain.clone(), vec![], vec![Delegation::new(Address::ZERO, Address::ZERO, vec![])]];
        let encoded = encode_permission_contexts(&contexts);
        assert_eq!(decode_permission_contexts(&encoded).unwrap(), contexts);
    }

    #[test]
    fn test_empty_context_encoding() {
        let encoded = encode_delegations(&[]);
        // offset word then zero length
        assert_eq!(encoded.len(), 64);
        assert_eq!(encoded[31], 0x20);
        assert!(encoded[32..].iter().all(|b| *b == 0));
        assert!(decode_delegations(&encoded).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_context_is_rejected() {
        assert!(matches!(decode_delegations(&[0u8; 7]), Err(DelegationError::AbiDecode(_))));
    }

    #[test]
    fn test_execution_calldata_modes() {
        let execution = Execution::new(Address::repeat_byte(0x01), U256::from(2u64), bytes!("ff"));
        let single = encode_execution_calldata(ExecutionMode::SingleDefault, &[execution.clone()]).unwrap();
        assert_eq!(single.len(), 53);
        assert_eq!(single[52], 0xff);

        assert!(encode_execution_calldata(ExecutionMode::SingleTry, &[execution.clone(), execution.clone()]).is_err());
        assert!(encode_execution_calldata(ExecutionMode::BatchDefault, &[]).is_err());

        let batch = encode_execution_calldata(ExecutionMode::BatchTry, &[execution.clone()]).unwrap();
        assert_eq!(decode_executions(&batch).unwrap(), vec![execution]);
    }

    fn selector_of(signature: &str) -> [u8; 4] {
        let mut selector = [0u8; 4];
        selector.copy_from_slice(&keccak256(signature)[..4]);
        selector
    }

    #[test]
    fn test_redeem_delegations_call() {
        let chain = vec![sample_delegation()];
        let execution = Execution::new(Address::repeat_byte(0x01), U256::ZERO, bytes!("a9059cbb"));
        let redemptions = [
            Redemption {
                permission_context: chain.clone(),
                mode: ExecutionMode::SingleDefault,
                executions: vec![execution.clone()],
            },
            Redemption {
                permission_context: chain.clone(),
                mode: ExecutionMode::BatchTry,
                executions: vec![execution.clone(), execution.clone()],
            },
        ];
        let calldata = encode_redeem_delegations_call(&redemptions).unwrap();
        assert_eq!(calldata[..4], selector_of("redeemDelegations(bytes[],bytes32[],bytes[])"));
        assert_eq!(calldata[..4], wire::IDelegationManager::redeemDelegationsCall::SELECTOR);

        let decoded = wire::IDelegationManager::redeemDelegationsCall::abi_decode(&calldata, true).unwrap();
        assert_eq!(decoded.modes, vec![ExecutionMode::SingleDefault.mode_code(), ExecutionMode::BatchTry.mode_code()]);
        assert_eq!(decode_delegations(&decoded.permissionContexts[1]).unwrap(), chain);
        assert_eq!(decoded.executionCallDatas[0].len(), 20 + 32 + 4);
        assert_eq!(decode_executions(&decoded.executionCallDatas[1]).unwrap(), vec![execution.clone(), execution]);

        assert!(matches!(
            encode_redeem_delegations_call(&[]),
            Err(DelegationError::EmptyCollection { field: "redemptions" })
        ));
        let bad = Redemption {
            permission_context: chain,
            mode: ExecutionMode::SingleTry,
            executions: vec![],
        };
        assert!(encode_redeem_delegations_call(&[bad]).is_err());
    }

    #[test]
    fn test_delegation_toggle_calls() {
        let delegation = sample_delegation().with_authority(FixedBytes::repeat_byte(0x07));
        let tuple = "(address,address,bytes32,(address,bytes,bytes)[],uint256,bytes)";

        let disable = encode_disable_delegation_call(&delegation);
        assert_eq!(disable[..4], selector_of(&format!("disableDelegation({tuple})")));
        let decoded = wire::IDelegationManager::disableDelegationCall::abi_decode(&disable, true).unwrap();
        assert_eq!(Delegation::from(decoded.delegation), delegation);

        let enable = encode_enable_delegation_call(&delegation);
        assert_eq!(enable[..4], selector_of(&format!("enableDelegation({tuple})")));
        assert_eq!(enable[4..], disable[4..]);
        let decoded = wire::IDelegationManager::enableDelegationCall::abi_decode(&enable, true).unwrap();
        assert_eq!(Delegation::from(decoded.delegation), delegation);
    }

    #[test]
    fn test_increment_nonce_call() {
        let manager = Address::repeat_byte(0x42);
        let calldata = encode_increment_nonce_call(manager);
        assert_eq!(calldata.len(), 4 + 32);
        assert_eq!(calldata[..4], selector_of("incrementNonce(address)"));
        assert_eq!(calldata[16..], manager[..]);
        let decoded = wire::INonceEnforcer::incrementNonceCall::abi_decode(&calldata, true).unwrap();
        assert_eq!(decoded.delegationManager, manager);
    }
}
