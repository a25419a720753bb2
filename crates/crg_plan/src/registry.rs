//! The read-only registry of realized clock domains.

use crate::domain::{sdram_reference_domain, ClockDomain, SYSTEM};
use crate::pll::PllInstance;
use crg_common::{CrgResult, InternalError};
use crg_config::SdramRate;
use serde::Serialize;
use std::collections::BTreeMap;

/// A lookup of a domain name that was never derived.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// The name is not in the registry under the active flags.
    #[error("clock domain '{name}' was not derived (available: {available})")]
    NotFound {
        /// The requested name.
        name: String,
        /// Comma-separated names that do exist.
        available: String,
    },
}

/// Mapping from domain name to [`ClockDomain`], keys unique.
///
/// Populated once by the planner and immutable afterwards: there is no public
/// way to insert or mutate entries, so a finished registry can be shared
/// freely between readers.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DomainRegistry {
    domains: BTreeMap<String, ClockDomain>,
}

impl DomainRegistry {
    /// Returns the domain with the given name.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::NotFound`] if the active flags never derive it,
    /// e.g. `system-double-rate` with SDRAM rate `1:1`.
    pub fn lookup(&self, name: &str) -> Result<&ClockDomain, LookupError> {
        self.domains.get(name).ok_or_else(|| LookupError::NotFound {
            name: name.to_string(),
            available: self.names().collect::<Vec<_>>().join(", "),
        })
    }

    /// Returns every realized domain, ordered by name.
    pub fn enumerate(&self) -> impl Iterator<Item = &ClockDomain> {
        self.domains.values()
    }

    /// Returns every domain name, in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.domains.keys().map(String::as_str)
    }

    /// Returns `true` if the named domain exists.
    pub fn contains(&self, name: &str) -> bool {
        self.domains.contains_key(name)
    }

    /// Returns the number of domains.
    pub fn len(&self) -> usize {
        self.domains.len()
    }

    /// Returns `true` if no domains were derived.
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }
}

/// The planner's exclusive, write-side view of a registry under construction.
#[derive(Debug, Default)]
pub(crate) struct RegistryBuilder {
    domains: BTreeMap<String, ClockDomain>,
}

impl RegistryBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a domain; a duplicate name is a planning bug.
    pub(crate) fn insert(&mut self, domain: ClockDomain) -> CrgResult<()> {
        if self.domains.contains_key(&domain.name) {
            return Err(InternalError::new(format!(
                "clock domain '{}' derived twice",
                domain.name
            )));
        }
        self.domains.insert(domain.name.clone(), domain);
        Ok(())
    }

    /// Checks completeness against the PLL set and freezes the registry.
    ///
    /// Requires the system domain and the SDRAM reference for `rate`, a
    /// single primary PLL, and every domain to appear among its PLL's outputs.
    pub(crate) fn finalize(self, rate: SdramRate, plls: &[PllInstance]) -> CrgResult<DomainRegistry> {
        for required in [SYSTEM, sdram_reference_domain(rate)] {
            if !self.domains.contains_key(required) {
                return Err(InternalError::new(format!(
                    "required clock domain '{required}' missing after planning"
                )));
            }
        }

        let primaries = plls.iter().filter(|p| p.is_primary()).count();
        if primaries != 1 {
            return Err(InternalError::new(format!(
                "expected exactly one primary PLL, found {primaries}"
            )));
        }

        for domain in self.domains.values() {
            let owned = plls
                .iter()
                .find(|p| p.id == domain.pll)
                .is_some_and(|p| p.outputs.iter().any(|o| *o == domain.name));
            if !owned {
                return Err(InternalError::new(format!(
                    "clock domain '{}' is not an output of {}",
                    domain.name, domain.pll
                )));
            }
        }

        Ok(DomainRegistry {
            domains: self.domains,
        })
    }
}
