//! Shared types for delegations, caveats, executions and enforcer state.

pub mod caveat;
pub mod delegation;
pub mod execution;
pub mod kinds;
pub mod state;

pub use caveat::{Caveat, ANY_BENEFICIARY, DEFAULT_CAVEAT_ARGS, ROOT_AUTHORITY};
pub use delegation::Delegation;
pub use execution::{Execution, ExecutionMode};
pub use kinds::{CaveatKind, UnknownCaveatKind};
pub use state::{
    EnforcerStateReader, PeriodAllowance, PeriodAvailability, StateReadError, StreamingAllowance,
};
