// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory property host.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::{BoundValues, PropertyHost};
use crate::plan::PlanEntry;
use crate::types::PropertyValue;

/// A bound property held by [`MemoryHost`].
#[derive(Debug, Clone, PartialEq)]
pub struct HostedProperty {
    /// The last plan entry applied.
    pub entry: PlanEntry,
    /// Current value.
    pub value: Option<PropertyValue>,
    /// Number of planning passes that touched this property.
    pub revisions: u32,
}

/// Thread-safe in-memory [`PropertyHost`].
///
/// # Examples
///
/// ```
/// use capmap_lib::host::{BoundValues, MemoryHost, PropertyHost};
/// use capmap_lib::types::PropertyValue;
///
/// let host = MemoryHost::new();
/// host.set_value("UNBOUND", PropertyValue::Integer(1));
/// assert!(host.bound_value("UNBOUND").is_none());
/// ```
#[derive(Debug, Default)]
pub struct MemoryHost {
    properties: RwLock<BTreeMap<String, HostedProperty>>,
}

impl MemoryHost {
    /// Creates an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of one property.
    #[must_use]
    pub fn get(&self, ident: &str) -> Option<HostedProperty> {
        self.properties.read().get(ident).cloned()
    }

    /// Bound identifiers in sorted order.
    #[must_use]
    pub fn idents(&self) -> Vec<String> {
        self.properties.read().keys().cloned().collect()
    }

    /// Number of bound properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.read().len()
    }

    /// Returns `true` if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.read().is_empty()
    }
}

impl PropertyHost for MemoryHost {
    type Handle = String;

    fn contains(&self, ident: &str) -> bool {
        self.properties.read().contains_key(ident)
    }

    fn maintain(&self, entry: &PlanEntry) -> String {
        let mut properties = self.properties.write();
        properties
            .entry(entry.ident.clone())
            .and_modify(|hosted| {
                hosted.entry = entry.clone();
                hosted.revisions += 1;
            })
            .or_insert_with(|| HostedProperty {
                entry: entry.clone(),
                value: None,
                revisions: 1,
            });
        entry.ident.clone()
    }

    fn set_value(&self, ident: &str, value: PropertyValue) {
        match self.properties.write().get_mut(ident) {
            Some(hosted) => hosted.value = Some(value),
            None => tracing::debug!(ident, "Ignoring value for unbound property"),
        }
    }

    fn value(&self, ident: &str) -> Option<PropertyValue> {
        self.properties.read().get(ident)?.value.clone()
    }
}

impl BoundValues for MemoryHost {
    fn bound_value(&self, ident: &str) -> Option<PropertyValue> {
        self.value(ident)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::apply_plan;
    use crate::types::{Presentation, PropertyType};

    fn entry(ident: &str, should_create: bool, initial: Option<i64>) -> PlanEntry {
        PlanEntry {
            ident: ident.to_string(),
            property_type: PropertyType::Integer,
            name: ident.to_string(),
            location: None,
            hidden: false,
            should_create,
            presentation: Some(Presentation::value()),
            enable_action: false,
            initial_value: initial.map(PropertyValue::Integer),
            reassert_on: std::collections::BTreeSet::new(),
        }
    }

    #[test]
    fn apply_plan_creates_updates_and_never_deletes() {
        let host = MemoryHost::new();
        let report = apply_plan(&host, &[entry("A", true, Some(1)), entry("B", false, Some(2))]);
        assert_eq!(report.created, vec!["A"]);
        assert_eq!(report.skipped, vec!["B"]);
        assert_eq!(host.value("A"), Some(PropertyValue::Integer(1)));
        assert!(!host.contains("B"));

        let report = apply_plan(&host, &[entry("A", false, None)]);
        assert_eq!(report.updated, vec!["A"]);
        let hosted = host.get("A").unwrap();
        assert_eq!(hosted.revisions, 2);
        assert_eq!(hosted.value, Some(PropertyValue::Integer(1)));
        assert!(!hosted.entry.should_create);
    }

    #[test]
    fn shared_across_threads() {
        let host = std::sync::Arc::new(MemoryHost::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let host = std::sync::Arc::clone(&host);
                std::thread::spawn(move || {
                    apply_plan(host.as_ref(), &[entry(&format!("P{i}"), true, Some(i))]);
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(host.len(), 4);
        assert_eq!(host.bound_value("P3"), Some(PropertyValue::Integer(3)));
    }
}
