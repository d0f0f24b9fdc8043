//! [`Registry`]: the configured cabinets, keyed by tag.

use std::collections::BTreeMap;
use std::sync::Arc;

use common::{CabinetError, ConfigError};
use tracing::info;

use crate::cabinet::{Cabinet, CabinetKind};
use crate::config::CabinetConfig;

/// One or two cabinets, at most one per [`CabinetKind`].
///
/// Never empty. With exactly one cabinet the registry is in *direct mode* and
/// callers may omit the cabinet type.
#[derive(Debug, Clone)]
pub struct Registry {
    cabinets: BTreeMap<CabinetKind, Arc<Cabinet>>,
}

impl Registry {
    /// Build every section present in `config`.
    ///
    /// All key material is validated before any cabinet is created, and any
    /// failure aborts the whole build.
    ///
    /// # Errors
    ///
    /// Returns [`CabinetError::Configuration`] when no section is present or a
    /// section is invalid.
    pub fn build(config: &CabinetConfig) -> Result<Self, CabinetError> {
        if config.is_empty() {
            return Err(ConfigError::Missing.into());
        }

        let mut materials = Vec::with_capacity(2);
        if let Some(sym) = &config.symmetric {
            materials.push(sym.to_key_material()?);
        }
        if let Some(asy) = &config.asymmetric {
            materials.push(asy.to_key_material()?);
        }

        Self::from_cabinets(materials.iter().map(Cabinet::new))
    }

    /// Assemble a registry from prebuilt cabinets. A later cabinet of the same
    /// kind replaces an earlier one.
    pub fn from_cabinets(cabinets: impl IntoIterator<Item = Cabinet>) -> Result<Self, CabinetError> {
        let cabinets: BTreeMap<_, _> = cabinets
            .into_iter()
            .map(|c| (c.kind(), Arc::new(c)))
            .collect();
        if cabinets.is_empty() {
            return Err(ConfigError::Missing.into());
        }

        let registry = Self { cabinets };
        info!(
            cabinets = ?registry.kinds().collect::<Vec<_>>(),
            direct = registry.is_direct(),
            "cabinet registry built"
        );
        Ok(registry)
    }

    pub fn get(&self, kind: CabinetKind) -> Option<&Arc<Cabinet>> {
        self.cabinets.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.cabinets.len()
    }

    /// Always `false`; kept alongside [`Registry::len`].
    pub fn is_empty(&self) -> bool {
        self.cabinets.is_empty()
    }

    pub fn is_direct(&self) -> bool {
        self.cabinets.len() == 1
    }

    /// The only cabinet, when in direct mode.
    pub fn sole(&self) -> Option<&Arc<Cabinet>> {
        if self.is_direct() {
            self.cabinets.values().next()
        } else {
            None
        }
    }

    /// Configured tags in a stable order.
    pub fn kinds(&self) -> impl Iterator<Item = CabinetKind> + '_ {
        self.cabinets.keys().copied()
    }
}
