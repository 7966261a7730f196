//! Scopes: named permission archetypes that expand to a fixed, ordered caveat sequence.

use alloy_primitives::{Address, U256};
use delegation_types::Caveat;
use serde::Deserialize;

use crate::builder::CaveatBuilder;
use crate::codec::{
    AllowedCalldataTerms, AllowedMethodsTerms, AllowedTargetsTerms, CaveatConfiguration, Erc20PeriodTransferTerms,
    Erc20StreamingTerms, Erc20TransferAmountTerms, Erc721TransferTerms, ExactCalldataTerms, MethodSelector,
    NativeTokenPeriodTransferTerms, NativeTokenStreamingTerms, NativeTokenTransferAmountTerms, OwnershipTransferTerms,
    ValueLteTerms,
};
use crate::codec::json;
use crate::errors::{DelegationError, Result};
use crate::registry::EnforcerRegistry;

const SCOPE_KINDS: [&str; 9] = [
    "erc20TransferAmount",
    "erc20Streaming",
    "erc20PeriodTransfer",
    "nativeTokenTransferAmount",
    "nativeTokenStreaming",
    "nativeTokenPeriodTransfer",
    "erc721Transfer",
    "ownershipTransfer",
    "functionCall",
];

/// Optional calldata restriction accepted by native-token scopes.
///
/// At most one of the two may be set. With neither, the scope requires empty calldata.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalldataRestriction {
    #[serde(default)]
    pub allowed_calldata: Vec<AllowedCalldataTerms>,
    #[serde(default)]
    pub exact_calldata: Option<ExactCalldataTerms>,
}

impl CalldataRestriction {
    fn ensure_exclusive(&self) -> Result<()> {
        if !self.allowed_calldata.is_empty() && self.exact_calldata.is_some() {
            return Err(DelegationError::ConflictingConfiguration(
                "cannot specify both allowedCalldata and exactCalldata",
            ));
        }
        Ok(())
    }

    /// Caller's allowed-calldata list, else their exact calldata, else exact empty calldata.
    fn configurations(&self) -> Vec<CaveatConfiguration> {
        if !self.allowed_calldata.is_empty() {
            return self.allowed_calldata.iter().cloned().map(Into::into).collect();
        }
        vec![self.exact_calldata.clone().unwrap_or_default().into()]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTokenTransferScope {
    #[serde(deserialize_with = "json::max_amount::uint")]
    pub max_amount: U256,
    #[serde(flatten)]
    pub calldata: CalldataRestriction,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTokenStreamingScope {
    #[serde(deserialize_with = "json::initial_amount::uint")]
    pub initial_amount: U256,
    #[serde(deserialize_with = "json::max_amount::uint")]
    pub max_amount: U256,
    #[serde(deserialize_with = "json::amount_per_second::uint")]
    pub amount_per_second: U256,
    #[serde(deserialize_with = "json::start_time::uint64")]
    pub start_time: u64,
    #[serde(flatten)]
    pub calldata: CalldataRestriction,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeTokenPeriodTransferScope {
    #[serde(deserialize_with = "json::period_amount::uint")]
    pub period_amount: U256,
    #[serde(deserialize_with = "json::period_duration::uint64")]
    pub period_duration: u64,
    #[serde(deserialize_with = "json::start_date::uint64")]
    pub start_date: u64,
    #[serde(flatten)]
    pub calldata: CalldataRestriction,
}

/// Arbitrary contract calls restricted by target, method and optionally calldata.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallScope {
    #[serde(deserialize_with = "json::targets::addresses")]
    pub targets: Vec<Address>,
    pub selectors: Vec<MethodSelector>,
    #[serde(default)]
    pub value_lte: ValueLteTerms,
    #[serde(flatten)]
    pub calldata: CalldataRestriction,
}

impl FunctionCallScope {
    pub fn new(targets: Vec<Address>, selectors: Vec<MethodSelector>) -> Self {
        Self {
            targets,
            selectors,
            value_lte: ValueLteTerms::default(),
            calldata: CalldataRestriction::default(),
        }
    }

    pub fn with_value_lte(mut self, max_value: U256) -> Self {
        self.value_lte = ValueLteTerms { max_value };
        self
    }

    pub fn with_allowed_calldata(mut self, allowed: AllowedCalldataTerms) -> Self {
        self.calldata.allowed_calldata.push(allowed);
        self
    }

    pub fn with_exact_calldata(mut self, exact: ExactCalldataTerms) -> Self {
        self.calldata.exact_calldata = Some(exact);
        self
    }
}

/// Every supported scope, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ScopeConfig {
    Erc20TransferAmount(Erc20TransferAmountTerms),
    Erc20Streaming(Erc20StreamingTerms),
    Erc20PeriodTransfer(Erc20PeriodTransferTerms),
    NativeTokenTransferAmount(NativeTokenTransferScope),
    NativeTokenStreaming(NativeTokenStreamingScope),
    NativeTokenPeriodTransfer(NativeTokenPeriodTransferScope),
    Erc721Transfer(Erc721TransferTerms),
    OwnershipTransfer(OwnershipTransferTerms),
    FunctionCall(FunctionCallScope),
}

impl ScopeConfig {
    pub fn name(&self) -> &'static str {
        match self {
            ScopeConfig::Erc20TransferAmount(_) => SCOPE_KINDS[0],
            ScopeConfig::Erc20Streaming(_) => SCOPE_KINDS[1],
            ScopeConfig::Erc20PeriodTransfer(_) => SCOPE_KINDS[2],
            ScopeConfig::NativeTokenTransferAmount(_) => SCOPE_KINDS[3],
            ScopeConfig::NativeTokenStreaming(_) => SCOPE_KINDS[4],
            ScopeConfig::NativeTokenPeriodTransfer(_) => SCOPE_KINDS[5],
            ScopeConfig::Erc721Transfer(_) => SCOPE_KINDS[6],
            ScopeConfig::OwnershipTransfer(_) => SCOPE_KINDS[7],
            ScopeConfig::FunctionCall(_) => SCOPE_KINDS[8],
        }
    }

    /// Parse a tagged scope, reporting an unrecognized `type` as [`DelegationError::UnknownKind`].
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let tag = value.get("type").and_then(serde_json::Value::as_str).unwrap_or_default();
        if !SCOPE_KINDS.contains(&tag) {
            return Err(DelegationError::UnknownKind { category: "scope", name: tag.to_owned() });
        }
        json::from_value(value)
    }

    /// The scope's caveat configurations in their fixed order.
    ///
    /// Conflicting options are rejected here, before anything is encoded.
    pub fn configurations(&self) -> Result<Vec<CaveatConfiguration>> {
        let no_native_value = || CaveatConfiguration::from(ValueLteTerms::default());
        let configs = match self {
            ScopeConfig::Erc20TransferAmount(terms) => vec![no_native_value(), terms.clone().into()],
            ScopeConfig::Erc20Streaming(terms) => vec![no_native_value(), terms.clone().into()],
            ScopeConfig::Erc20PeriodTransfer(terms) => vec![no_native_value(), terms.clone().into()],
            ScopeConfig::NativeTokenTransferAmount(scope) => {
                scope.calldata.ensure_exclusive()?;
                let mut configs = scope.calldata.configurations();
                configs.push(NativeTokenTransferAmountTerms { max_amount: scope.max_amount }.into());
                configs
            }
            ScopeConfig::NativeTokenStreaming(scope) => {
                scope.calldata.ensure_exclusive()?;
                let mut configs = scope.calldata.configurations();
                configs.push(
                    NativeTokenStreamingTerms {
                        initial_amount: scope.initial_amount,
                        max_amount: scope.max_amount,
                        amount_per_second: scope.amount_per_second,
                        start_time: scope.start_time,
                    }
                    .into(),
                );
                configs
            }
            ScopeConfig::NativeTokenPeriodTransfer(scope) => {
                scope.calldata.ensure_exclusive()?;
                let mut configs = scope.calldata.configurations();
                configs.push(
                    NativeTokenPeriodTransferTerms {
                        period_amount: scope.period_amount,
                        period_duration: scope.period_duration,
                        start_date: scope.start_date,
                    }
                    .into(),
                );
                configs
            }
            ScopeConfig::Erc721Transfer(terms) => vec![terms.clone().into()],
            ScopeConfig::OwnershipTransfer(terms) => vec![terms.clone().into()],
            ScopeConfig::FunctionCall(scope) => {
                scope.calldata.ensure_exclusive()?;
                let mut configs = vec![
                    AllowedTargetsTerms { targets: scope.targets.clone() }.into(),
                    AllowedMethodsTerms { selectors: scope.selectors.clone() }.into(),
                    scope.value_lte.clone().into(),
                ];
                if !scope.calldata.allowed_calldata.is_empty() {
                    configs.extend(scope.calldata.allowed_calldata.iter().cloned().map(CaveatConfiguration::from));
                } else if let Some(exact) = &scope.calldata.exact_calldata {
                    configs.push(exact.clone().into());
                }
                configs
            }
        };
        Ok(configs)
    }
}

/// Expand a scope into its caveats, in order.
pub fn expand_scope(registry: &EnforcerRegistry, scope: &ScopeConfig) -> Result<Vec<Caveat>> {
    let mut builder = CaveatBuilder::new(registry);
    for config in scope.configurations()? {
        builder = builder.add_caveat(config)?;
    }
    let caveats = builder.build()?;
    tracing::debug!(scope = scope.name(), count = caveats.len(), "scope expanded");
    Ok(caveats)
}

/// One caller-supplied extra caveat: either ready-made or still to be encoded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaveatEntry {
    Caveat(Caveat),
    Configuration(CaveatConfiguration),
}

/// Caveats appended after a scope's own.
#[derive(Clone, Debug, Default)]
pub enum ExtraCaveats<'r> {
    #[default]
    None,
    Builder(CaveatBuilder<'r>),
    Entries(Vec<CaveatEntry>),
}

impl<'r> From<CaveatBuilder<'r>> for ExtraCaveats<'r> {
    fn from(builder: CaveatBuilder<'r>) -> Self {
        ExtraCaveats::Builder(builder)
    }
}

impl From<Vec<Caveat>> for ExtraCaveats<'_> {
    fn from(caveats: Vec<Caveat>) -> Self {
        ExtraCaveats::Entries(caveats.into_iter().map(CaveatEntry::Caveat).collect())
    }
}

impl From<Vec<CaveatConfiguration>> for ExtraCaveats<'_> {
    fn from(configs: Vec<CaveatConfiguration>) -> Self {
        ExtraCaveats::Entries(configs.into_iter().map(CaveatEntry::Configuration).collect())
    }
}

impl From<Vec<CaveatEntry>> for ExtraCaveats<'_> {
    fn from(entries: Vec<CaveatEntry>) -> Self {
        ExtraCaveats::Entries(entries)
    }
}

/// Scope caveats followed by `extra`, never interleaved.
pub fn resolve_caveats<'r>(
    registry: &'r EnforcerRegistry,
    scope: &ScopeConfig,
    extra: impl Into<ExtraCaveats<'r>>,
) -> Result<Vec<Caveat>> {
    let mut caveats = expand_scope(registry, scope)?;
    match extra.into() {
        ExtraCaveats::None => {}
        ExtraCaveats::Builder(builder) => caveats.extend(builder.build()?),
        ExtraCaveats::Entries(entries) => {
            let mut builder = CaveatBuilder::new(registry).allow_unrestricted();
            for entry in entries {
                builder = match entry {
                    CaveatEntry::Caveat(caveat) => builder.add_raw(caveat),
                    CaveatEntry::Configuration(config) => builder.add_caveat(config)?,
                };
            }
            caveats.extend(builder.build()?);
        }
    }
    Ok(caveats)
}
