// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The public lookup surface of the function catalog.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::catalog::composition::compose;
use crate::catalog::registration::{FunctionRegistration, RegistrationStore};
use crate::config::consts::ROUTER_FUNCTION_NAME;
use crate::config::CatalogSettings;
use crate::errors::{CatalogError, CompositionError};
use crate::invocation::{ConversionServices, FunctionInvocationWrapper};
use crate::observability::messages::catalog::{
    FunctionLocated, FunctionLookupFailed, FunctionRegistered,
};
use crate::traits::FunctionTarget;

/// Runtime function catalog: registrations in, invocation wrappers out.
///
/// Resolved wrappers are memoized per definition string. Memoization is
/// best-effort: racing lookups of the same uncached definition may each
/// compose it, and the last insert wins, so two callers can briefly hold
/// distinct (but equivalent) wrappers for one definition. The expected
/// output content types never share that fate; they live on the handle
/// each lookup returns, not in the cache.
pub struct FunctionCatalog {
    store: RwLock<RegistrationStore>,
    wrappers: RwLock<HashMap<String, FunctionInvocationWrapper>>,
    services: Arc<ConversionServices>,
    settings: CatalogSettings,
}

impl FunctionCatalog {
    pub fn new() -> Self {
        Self::with_settings(CatalogSettings::default())
    }

    pub fn with_settings(settings: CatalogSettings) -> Self {
        Self::with_services(settings, ConversionServices::standard())
    }

    pub fn with_services(settings: CatalogSettings, services: Arc<ConversionServices>) -> Self {
        Self {
            store: RwLock::new(RegistrationStore::new()),
            wrappers: RwLock::new(HashMap::new()),
            services,
            settings,
        }
    }

    /// Register a function. Re-registering an equal triple is a no-op.
    pub fn register(&self, registration: FunctionRegistration) {
        let names = registration.names().to_vec();
        if self.store.write().register(registration) {
            tracing::debug!("{}", FunctionRegistered { names: &names });
        }
    }

    /// The union of every registration's alias set.
    pub fn names(&self) -> BTreeSet<String> {
        self.store.read().names()
    }

    /// Number of registrations (not names) in the catalog.
    pub fn size(&self) -> usize {
        self.store.read().len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.read().contains(name)
    }

    /// Resolve a definition to an invocation wrapper.
    ///
    /// `Ok(None)` means some pipeline segment is unregistered; that is a
    /// normal negative result, logged and never raised. An unsupported
    /// composition is an error and terminal for this lookup.
    pub fn lookup(
        &self,
        definition: &str,
        expected_output_content_types: &[&str],
    ) -> Result<Option<FunctionInvocationWrapper>, CompositionError> {
        let definition = self.normalize_definition(definition);

        if let Some(wrapper) = self.wrappers.read().get(&definition) {
            let handle = wrapper
                .clone()
                .with_expected_content_types(expected_output_content_types.iter().copied());
            self.log_located(&handle);
            return Ok(Some(handle));
        }

        // Compose outside the write lock; under a race the last insert
        // wins and both callers get working wrappers.
        let produced = {
            let store = self.store.read();
            compose(&store, &self.services, &definition)?
        };
        let Some(produced) = produced else {
            tracing::info!(
                "{}",
                FunctionLookupFailed {
                    definition: &definition
                }
            );
            return Ok(None);
        };

        let mut resolved = None;
        let mut wrappers = self.wrappers.write();
        for (prefix, wrapper) in produced {
            wrappers.insert(prefix, wrapper.clone_base());
            resolved = Some(wrapper);
        }
        drop(wrappers);

        let Some(wrapper) = resolved else {
            return Ok(None);
        };
        let handle =
            wrapper.with_expected_content_types(expected_output_content_types.iter().copied());
        self.log_located(&handle);
        Ok(Some(handle))
    }

    /// Normalize a definition: `,` becomes `|`, a blank definition falls
    /// back to the configured default, and when exactly one eligible
    /// function exists it is substituted for any unmatched, non-pipeline
    /// definition. The router never participates in that shortcut.
    fn normalize_definition(&self, definition: &str) -> String {
        let mut definition = if definition.trim().is_empty() {
            self.settings.default_definition().unwrap_or_default()
        } else {
            definition.trim().replace(',', "|")
        };

        let names = self.names();
        if !names.contains(&definition) {
            let eligible: Vec<&String> = names
                .iter()
                .filter(|name| name.as_str() != ROUTER_FUNCTION_NAME)
                .collect();
            if eligible.len() == 1
                && *eligible[0] != definition
                && !definition.contains('|')
            {
                definition = eligible[0].clone();
            }
        }
        definition
    }

    /// Retired: registrations are not exposed once registered; the
    /// looked-up wrapper answers everything a registration could.
    pub fn registration_by_instance(
        &self,
        _target: &FunctionTarget,
    ) -> Result<FunctionRegistration, CatalogError> {
        Err(CatalogError::RegistrationByInstance)
    }

    fn log_located(&self, wrapper: &FunctionInvocationWrapper) {
        let kind = wrapper.kind().to_string();
        tracing::info!(
            "{}",
            FunctionLocated {
                definition: wrapper.definition(),
                kind: &kind,
                composed: wrapper.composed(),
            }
        );
    }
}

impl Default for FunctionCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FunctionCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionCatalog")
            .field("registrations", &self.store.read().len())
            .field("cached_definitions", &self.wrappers.read().len())
            .finish()
    }
}
