//! Deployed enforcer addresses for one DelegationManager deployment.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use delegation_types::CaveatKind;
use serde::{Deserialize, Serialize};

use crate::errors::{DelegationError, Result};
use crate::hashing::DelegationDomain;

/// Read-only map from enforcer contract name to address, for one chain and version.
///
/// The core never mutates a registry; callers build one and pass it by reference.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnforcerRegistry {
    pub chain_id: u64,
    pub version: String,
    pub delegation_manager: Address,
    #[serde(default)]
    pub caveat_enforcers: BTreeMap<String, Address>,
}

impl EnforcerRegistry {
    pub fn new(chain_id: u64, version: impl Into<String>, delegation_manager: Address) -> Self {
        Self {
            chain_id,
            version: version.into(),
            delegation_manager,
            caveat_enforcers: BTreeMap::new(),
        }
    }

    pub fn with_enforcer(mut self, kind: CaveatKind, enforcer: Address) -> Self {
        self.caveat_enforcers.insert(kind.enforcer_name().to_owned(), enforcer);
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Enforcer for `kind`, or [`DelegationError::MissingEnforcerAddress`].
    pub fn enforcer(&self, kind: CaveatKind) -> Result<Address> {
        self.caveat_enforcers
            .get(kind.enforcer_name())
            .copied()
            .ok_or(DelegationError::MissingEnforcerAddress { kind })
    }

    /// Kinds this deployment cannot serve.
    pub fn missing_kinds(&self) -> Vec<CaveatKind> {
        CaveatKind::ALL
            .iter()
            .copied()
            .filter(|kind| !self.caveat_enforcers.contains_key(kind.enforcer_name()))
            .collect()
    }

    pub fn domain(&self) -> DelegationDomain {
        DelegationDomain::new(self.chain_id, self.delegation_manager)
    }
}

/// Several deployments keyed by `(version, chain_id)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegistryBook {
    entries: BTreeMap<(String, u64), EnforcerRegistry>,
}

impl RegistryBook {
    pub fn new<I>(registries: I) -> Self
    where
        I: IntoIterator<Item = EnforcerRegistry>,
    {
        let entries = registries
            .into_iter()
            .map(|registry| ((registry.version.clone(), registry.chain_id), registry))
            .collect();
        Self { entries }
    }

    /// Parse a JSON array of registries.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let registries: Vec<EnforcerRegistry> = serde_json::from_str(json)?;
        Ok(Self::new(registries))
    }

    pub fn get(&self, version: &str, chain_id: u64) -> Result<&EnforcerRegistry> {
        self.entries
            .get(&(version.to_owned(), chain_id))
            .ok_or_else(|| DelegationError::MissingDeployment { version: version.to_owned(), chain_id })
    }

    pub fn chain_ids(&self, version: &str) -> Vec<u64> {
        self.entries
            .keys()
            .filter(|(entry_version, _)| entry_version == version)
            .map(|(_, chain_id)| *chain_id)
            .collect()
    }
}
