use core::fmt;

use alloy_primitives::{Address, FixedBytes, U256};

/// Errors while reading enforcer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateReadError {
    /// Used by off-chain mocks or partially implemented readers.
    NotImplemented,
    /// The underlying call failed.
    CallFailed,
    /// Return data was malformed or could not be decoded.
    MalformedReturn,
}

impl fmt::Display for StateReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateReadError::NotImplemented => f.write_str("state read not implemented"),
            StateReadError::CallFailed => f.write_str("state read call failed"),
            StateReadError::MalformedReturn => f.write_str("state read returned malformed data"),
        }
    }
}

impl std::error::Error for StateReadError {}

/// Accumulator a streaming enforcer keeps per delegation.
///
/// `start_time == 0` means the enforcer has not seen the delegation yet.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StreamingAllowance {
    pub initial_amount: U256,
    pub max_amount: U256,
    pub amount_per_second: U256,
    pub start_time: u64,
    pub spent: U256,
}

impl StreamingAllowance {
    pub fn is_initialized(&self) -> bool {
        self.start_time != 0
    }
}

/// Accumulator a periodic-transfer enforcer keeps per delegation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeriodAllowance {
    pub period_amount: U256,
    pub period_duration: u64,
    pub start_date: u64,
    /// 1-based index of the last period a transfer happened in (0 = never).
    pub last_transfer_period: u64,
    pub transferred_in_current_period: U256,
}

/// Result of a periodic availability estimate.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PeriodAvailability {
    pub available_amount: U256,
    pub is_new_period: bool,
    pub current_period: u64,
}

/// Reader for on-chain enforcer accumulators, implemented outside the core.
///
/// The core only consumes the shapes returned here; how they are fetched (RPC, indexer,
/// fixtures) is up to the implementor.
pub trait EnforcerStateReader {
    fn block_timestamp(&self) -> u64;

    fn streaming_allowance(
        &self,
        _enforcer: Address,
        _delegation_manager: Address,
        _delegation_hash: FixedBytes<32>,
    ) -> Result<StreamingAllowance, StateReadError> {
        Err(StateReadError::NotImplemented)
    }

    fn period_allowance(
        &self,
        _enforcer: Address,
        _delegation_manager: Address,
        _delegation_hash: FixedBytes<32>,
    ) -> Result<PeriodAllowance, StateReadError> {
        Err(StateReadError::NotImplemented)
    }

    /// Amount already spent under a transfer-amount enforcer.
    fn spent_amount(
        &self,
        _enforcer: Address,
        _delegation_manager: Address,
        _delegation_hash: FixedBytes<32>,
    ) -> Result<U256, StateReadError> {
        Err(StateReadError::NotImplemented)
    }

    fn call_count(
        &self,
        _enforcer: Address,
        _delegation_manager: Address,
        _delegation_hash: FixedBytes<32>,
    ) -> Result<U256, StateReadError> {
        Err(StateReadError::NotImplemented)
    }

    fn current_nonce(
        &self,
        _enforcer: Address,
        _delegation_manager: Address,
        _delegator: Address,
    ) -> Result<U256, StateReadError> {
        Err(StateReadError::NotImplemented)
    }

    fn is_id_used(
        &self,
        _enforcer: Address,
        _delegation_manager: Address,
        _delegator: Address,
        _id: U256,
    ) -> Result<bool, StateReadError> {
        Err(StateReadError::NotImplemented)
    }

    fn is_delegation_disabled(
        &self,
        _delegation_manager: Address,
        _delegation_hash: FixedBytes<32>,
    ) -> Result<bool, StateReadError> {
        Err(StateReadError::NotImplemented)
    }
}
