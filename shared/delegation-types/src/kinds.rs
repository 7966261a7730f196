use core::{fmt, str::FromStr};

/// Every caveat kind understood by the framework.
///
/// Each kind is interpreted by exactly one enforcer contract; [`CaveatKind::enforcer_name`]
/// is the key under which that contract's address is published in a deployment registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CaveatKind {
    AllowedCalldata,
    AllowedMethods,
    AllowedTargets,
    ArgsEqualityCheck,
    BlockNumber,
    Deployed,
    Erc1155BalanceChange,
    Erc20BalanceChange,
    Erc20PeriodTransfer,
    Erc20Streaming,
    Erc20TransferAmount,
    Erc721BalanceChange,
    Erc721Transfer,
    ExactCalldata,
    ExactCalldataBatch,
    ExactExecution,
    ExactExecutionBatch,
    Id,
    LimitedCalls,
    MultiTokenPeriod,
    NativeBalanceChange,
    NativeTokenPayment,
    NativeTokenPeriodTransfer,
    NativeTokenStreaming,
    NativeTokenTransferAmount,
    Nonce,
    OwnershipTransfer,
    Redeemer,
    SpecificActionErc20TransferBatch,
    Timestamp,
    ValueLte,
}

impl CaveatKind {
    pub const ALL: [CaveatKind; 31] = [
        CaveatKind::AllowedCalldata,
        CaveatKind::AllowedMethods,
        CaveatKind::AllowedTargets,
        CaveatKind::ArgsEqualityCheck,
        CaveatKind::BlockNumber,
        CaveatKind::Deployed,
        CaveatKind::Erc1155BalanceChange,
        CaveatKind::Erc20BalanceChange,
        CaveatKind::Erc20PeriodTransfer,
        CaveatKind::Erc20Streaming,
        CaveatKind::Erc20TransferAmount,
        CaveatKind::Erc721BalanceChange,
        CaveatKind::Erc721Transfer,
        CaveatKind::ExactCalldata,
        CaveatKind::ExactCalldataBatch,
        CaveatKind::ExactExecution,
        CaveatKind::ExactExecutionBatch,
        CaveatKind::Id,
        CaveatKind::LimitedCalls,
        CaveatKind::MultiTokenPeriod,
        CaveatKind::NativeBalanceChange,
        CaveatKind::NativeTokenPayment,
        CaveatKind::NativeTokenPeriodTransfer,
        CaveatKind::NativeTokenStreaming,
        CaveatKind::NativeTokenTransferAmount,
        CaveatKind::Nonce,
        CaveatKind::OwnershipTransfer,
        CaveatKind::Redeemer,
        CaveatKind::SpecificActionErc20TransferBatch,
        CaveatKind::Timestamp,
        CaveatKind::ValueLte,
    ];

    /// Configuration tag used in serialized caveat configurations (eg `"allowedTargets"`).
    pub const fn as_str(self) -> &'static str {
        use CaveatKind::*;
        match self {
            AllowedCalldata => "allowedCalldata",
            AllowedMethods => "allowedMethods",
            AllowedTargets => "allowedTargets",
            ArgsEqualityCheck => "argsEqualityCheck",
            BlockNumber => "blockNumber",
            Deployed => "deployed",
            Erc1155BalanceChange => "erc1155BalanceChange",
            Erc20BalanceChange => "erc20BalanceChange",
            Erc20PeriodTransfer => "erc20PeriodTransfer",
            Erc20Streaming => "erc20Streaming",
            Erc20TransferAmount => "erc20TransferAmount",
            Erc721BalanceChange => "erc721BalanceChange",
            Erc721Transfer => "erc721Transfer",
            ExactCalldata => "exactCalldata",
            ExactCalldataBatch => "exactCalldataBatch",
            ExactExecution => "exactExecution",
            ExactExecutionBatch => "exactExecutionBatch",
            Id => "id",
            LimitedCalls => "limitedCalls",
            MultiTokenPeriod => "multiTokenPeriod",
            NativeBalanceChange => "nativeBalanceChange",
            NativeTokenPayment => "nativeTokenPayment",
            NativeTokenPeriodTransfer => "nativeTokenPeriodTransfer",
            NativeTokenStreaming => "nativeTokenStreaming",
            NativeTokenTransferAmount => "nativeTokenTransferAmount",
            Nonce => "nonce",
            OwnershipTransfer => "ownershipTransfer",
            Redeemer => "redeemer",
            SpecificActionErc20TransferBatch => "specificActionERC20TransferBatch",
            Timestamp => "timestamp",
            ValueLte => "valueLte",
        }
    }

    /// Registry key of the enforcer contract for this kind (eg `"AllowedTargetsEnforcer"`).
    pub const fn enforcer_name(self) -> &'static str {
        use CaveatKind::*;
        match self {
            AllowedCalldata => "AllowedCalldataEnforcer",
            AllowedMethods => "AllowedMethodsEnforcer",
            AllowedTargets => "AllowedTargetsEnforcer",
            ArgsEqualityCheck => "ArgsEqualityCheckEnforcer",
            BlockNumber => "BlockNumberEnforcer",
            Deployed => "DeployedEnforcer",
            Erc1155BalanceChange => "ERC1155BalanceChangeEnforcer",
            Erc20BalanceChange => "ERC20BalanceChangeEnforcer",
            Erc20PeriodTransfer => "ERC20PeriodTransferEnforcer",
            Erc20Streaming => "ERC20StreamingEnforcer",
            Erc20TransferAmount => "ERC20TransferAmountEnforcer",
            Erc721BalanceChange => "ERC721BalanceChangeEnforcer",
            Erc721Transfer => "ERC721TransferEnforcer",
            ExactCalldata => "ExactCalldataEnforcer",
            ExactCalldataBatch => "ExactCalldataBatchEnforcer",
            ExactExecution => "ExactExecutionEnforcer",
            ExactExecutionBatch => "ExactExecutionBatchEnforcer",
            Id => "IdEnforcer",
            LimitedCalls => "LimitedCallsEnforcer",
            MultiTokenPeriod => "MultiTokenPeriodEnforcer",
            NativeBalanceChange => "NativeBalanceChangeEnforcer",
            NativeTokenPayment => "NativeTokenPaymentEnforcer",
            NativeTokenPeriodTransfer => "NativeTokenPeriodTransferEnforcer",
            NativeTokenStreaming => "NativeTokenStreamingEnforcer",
            NativeTokenTransferAmount => "NativeTokenTransferAmountEnforcer",
            Nonce => "NonceEnforcer",
            OwnershipTransfer => "OwnershipTransferEnforcer",
            Redeemer => "RedeemerEnforcer",
            SpecificActionErc20TransferBatch => "SpecificActionERC20TransferBatchEnforcer",
            Timestamp => "TimestampEnforcer",
            ValueLte => "ValueLteEnforcer",
        }
    }
}

impl fmt::Display for CaveatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A caveat kind name that matches no known kind.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownCaveatKind(pub String);

impl fmt::Display for UnknownCaveatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown caveat type: {}", self.0)
    }
}

impl FromStr for CaveatKind {
    type Err = UnknownCaveatKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        CaveatKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == value)
            .ok_or_else(|| UnknownCaveatKind(value.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for kind in CaveatKind::ALL {
            assert_eq!(kind.as_str().parse::<CaveatKind>(), Ok(kind));
            assert!(kind.enforcer_name().ends_with("Enforcer"));
        }
    }

    #[test]
    fn unknown_name_is_reported() {
        assert_eq!(
            "timeTravel".parse::<CaveatKind>(),
            Err(UnknownCaveatKind("timeTravel".to_string()))
        );
    }
}
