//! Ordered caveat accumulator.

use delegation_types::Caveat;

use crate::codec::CaveatConfiguration;
use crate::errors::{DelegationError, Result};
use crate::registry::EnforcerRegistry;

/// Append-only list of caveats bound to one registry.
///
/// Each `add_*` call consumes the builder and hands it back, so a builder has exactly one
/// owner at a time and ends with [`CaveatBuilder::build`].
#[derive(Clone, Debug)]
pub struct CaveatBuilder<'r> {
    registry: &'r EnforcerRegistry,
    caveats: Vec<Caveat>,
    allow_unrestricted: bool,
}

impl<'r> CaveatBuilder<'r> {
    pub fn new(registry: &'r EnforcerRegistry) -> Self {
        Self {
            registry,
            caveats: Vec::new(),
            allow_unrestricted: false,
        }
    }

    /// Let [`CaveatBuilder::build`] return an empty list instead of failing.
    pub fn allow_unrestricted(mut self) -> Self {
        self.allow_unrestricted = true;
        self
    }

    pub fn registry(&self) -> &'r EnforcerRegistry {
        self.registry
    }

    /// Encode `config` and append it with the registry's enforcer for its kind.
    pub fn add_caveat(mut self, config: impl Into<CaveatConfiguration>) -> Result<Self> {
        let config = config.into();
        let kind = config.kind();
        let terms = config.encode_terms()?;
        let enforcer = self.registry.enforcer(kind)?;
        tracing::debug!(%kind, %enforcer, terms_len = terms.len(), "caveat appended");
        self.caveats.push(Caveat::new(enforcer, terms));
        Ok(self)
    }

    /// Parse a `{"type": ..}` configuration and append it.
    pub fn add_named(self, config: serde_json::Value) -> Result<Self> {
        self.add_caveat(CaveatConfiguration::from_json(config)?)
    }

    /// Append a caveat as given, for enforcers the registry does not know.
    pub fn add_raw(mut self, caveat: Caveat) -> Self {
        tracing::debug!(enforcer = %caveat.enforcer, "raw caveat appended");
        self.caveats.push(caveat);
        self
    }

    pub fn len(&self) -> usize {
        self.caveats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caveats.is_empty()
    }

    pub fn build(self) -> Result<Vec<Caveat>> {
        if self.caveats.is_empty() {
            if !self.allow_unrestricted {
                return Err(DelegationError::UnrestrictedDelegationGuard);
            }
            tracing::warn!("building unrestricted caveat list");
        }
        Ok(self.caveats)
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, U256};
    use delegation_types::CaveatKind;
    use serde_json::json;

    use super::*;
    use crate::codec::{AllowedTargetsTerms, LimitedCallsTerms, ValueLteTerms};

    fn registry() -> EnforcerRegistry {
        EnforcerRegistry::new(1, "1.3.0", Address::repeat_byte(0xff))
            .with_enforcer(CaveatKind::AllowedTargets, Address::repeat_byte(0xa1))
            .with_enforcer(CaveatKind::ValueLte, Address::repeat_byte(0xa2))
    }

    #[test]
    fn test_builder_keeps_order() {
        let registry = registry();
        let raw = Caveat::new(Address::repeat_byte(0xcc), vec![1u8]);
        let caveats = CaveatBuilder::new(&registry)
            .add_caveat(ValueLteTerms { max_value: U256::from(1u64) })
            .unwrap()
            .add_raw(raw.clone())
            .add_caveat(AllowedTargetsTerms { targets: vec![Address::repeat_byte(1)] })
            .unwrap()
            .build()
            .unwrap();
        let enforcers: Vec<Address> = caveats.iter().map(|c| c.enforcer).collect();
        assert_eq!(enforcers, vec![Address::repeat_byte(0xa2), Address::repeat_byte(0xcc), Address::repeat_byte(0xa1)]);
        assert_eq!(caveats[1], raw);
        assert_eq!(caveats[0].args.as_ref(), [0u8]);
    }

    #[test]
    fn test_missing_enforcer_names_kind() {
        let registry = registry();
        let err = CaveatBuilder::new(&registry).add_caveat(LimitedCallsTerms { limit: 1 }).unwrap_err();
        assert!(matches!(err, DelegationError::MissingEnforcerAddress { kind: CaveatKind::LimitedCalls }));
        assert!(err.to_string().contains("LimitedCallsEnforcer"));
    }

    #[test]
    fn test_unrestricted_guard() {
        let registry = registry();
        assert!(matches!(
            CaveatBuilder::new(&registry).build(),
            Err(DelegationError::UnrestrictedDelegationGuard)
        ));
        assert!(CaveatBuilder::new(&registry).allow_unrestricted().build().unwrap().is_empty());
    }

    #[test]
    fn test_add_named() {
        let registry = registry();
        let caveats = CaveatBuilder::new(&registry)
            .add_named(json!({ "type": "valueLte", "maxValue": "0x0" }))
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(caveats[0].terms.as_ref(), [0u8; 32]);

        let err = CaveatBuilder::new(&registry).add_named(json!({ "type": "teleport" })).unwrap_err();
        assert!(matches!(err, DelegationError::UnknownKind { .. }));
    }
}
