// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Function registrations and the store that owns them.

use std::collections::BTreeSet;

use crate::traits::FunctionTarget;
use crate::types::FunctionShape;

/// One registered function: an alias set, a target callable, and the
/// declared shape. Immutable once registered.
#[derive(Debug, Clone)]
pub struct FunctionRegistration {
    names: Vec<String>,
    target: FunctionTarget,
    shape: FunctionShape,
}

impl FunctionRegistration {
    pub fn new(name: impl Into<String>, target: FunctionTarget, shape: FunctionShape) -> Self {
        Self {
            names: vec![name.into()],
            target,
            shape,
        }
    }

    /// Register an additional name resolving to the same function.
    pub fn with_alias(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !self.names.contains(&name) {
            self.names.push(name);
        }
        self
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn target(&self) -> &FunctionTarget {
        &self.target
    }

    pub fn shape(&self) -> &FunctionShape {
        &self.shape
    }

    fn alias_set(&self) -> BTreeSet<&str> {
        self.names.iter().map(String::as_str).collect()
    }
}

/// Two registrations are equal when they register the same target
/// instance under the same names with the same shape.
impl PartialEq for FunctionRegistration {
    fn eq(&self, other: &Self) -> bool {
        self.alias_set() == other.alias_set()
            && self.shape == other.shape
            && self.target.instance_id() == other.target.instance_id()
    }
}

impl Eq for FunctionRegistration {}

/// The set of registered functions. Value-deduplicated; insertion order
/// is preserved so segment resolution picks the first matching
/// registration deterministically.
#[derive(Debug, Default)]
pub struct RegistrationStore {
    registrations: Vec<FunctionRegistration>,
}

impl RegistrationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a registration. Re-registering an equal triple is a no-op;
    /// returns whether the store changed.
    pub fn register(&mut self, registration: FunctionRegistration) -> bool {
        if self.registrations.contains(&registration) {
            return false;
        }
        self.registrations.push(registration);
        true
    }

    /// The union of every registration's alias set.
    pub fn names(&self) -> BTreeSet<String> {
        self.registrations
            .iter()
            .flat_map(|registration| registration.names().iter().cloned())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.registrations
            .iter()
            .any(|registration| registration.names().iter().any(|alias| alias == name))
    }

    /// The first registration whose alias set contains `name`.
    pub fn find(&self, name: &str) -> Option<&FunctionRegistration> {
        self.registrations
            .iter()
            .find(|registration| registration.names().iter().any(|alias| alias == name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Value;
    use crate::traits::FnTransformer;
    use crate::types::{RawType, TypeShape};
    use std::sync::Arc;

    fn echo_registration(name: &str) -> FunctionRegistration {
        FunctionRegistration::new(
            name,
            FunctionTarget::Transformer(Arc::new(FnTransformer::new(|value: Value| value))),
            FunctionShape::transformer(
                TypeShape::Value(RawType::Text),
                TypeShape::Value(RawType::Text),
            ),
        )
    }

    #[test]
    fn register_deduplicates_equal_triples() {
        let mut store = RegistrationStore::new();
        let registration = echo_registration("echo");

        assert!(store.register(registration.clone()));
        assert!(!store.register(registration));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn same_name_different_target_both_register() {
        let mut store = RegistrationStore::new();
        assert!(store.register(echo_registration("echo")));
        assert!(store.register(echo_registration("echo")));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn names_unions_alias_sets() {
        let mut store = RegistrationStore::new();
        store.register(echo_registration("echo").with_alias("repeat"));
        store.register(echo_registration("other"));

        let names = store.names();
        assert_eq!(names.len(), 3);
        assert!(names.contains("echo"));
        assert!(names.contains("repeat"));
        assert!(names.contains("other"));
    }

    #[test]
    fn find_resolves_aliases_in_insertion_order() {
        let mut store = RegistrationStore::new();
        let first = echo_registration("echo").with_alias("shared");
        let second = echo_registration("late").with_alias("shared");
        store.register(first.clone());
        store.register(second);

        assert!(store.contains("shared"));
        assert_eq!(store.find("shared"), Some(&first));
        assert!(store.find("missing").is_none());
    }
}
