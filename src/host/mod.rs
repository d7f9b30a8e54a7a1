// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capabilities the engine needs from its host.
//!
//! The engine never creates host properties itself; it describes intent as a
//! [`PropertyPlan`](crate::plan::PropertyPlan). These narrow traits are the
//! only seams to the host platform:
//!
//! - [`Translate`] - localizes display text (closures implement it)
//! - [`BoundValues`] - current values of bound properties, used to pair
//!   timer halves when building payloads
//! - [`PropertyHost`] - the property store reconciled by [`apply_plan`]
//!
//! [`MemoryHost`] implements all of them for tests and simple hosts.

mod memory;

use std::collections::{BTreeMap, HashMap};

use crate::plan::PlanEntry;
use crate::types::PropertyValue;

pub use memory::{HostedProperty, MemoryHost};

/// Localizes display text. A missing translation returns the input.
pub trait Translate {
    /// Translates `text`.
    fn translate(&self, text: &str) -> String;
}

impl<F> Translate for F
where
    F: Fn(&str) -> String,
{
    fn translate(&self, text: &str) -> String {
        self(text)
    }
}

/// Translator returning its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translate for IdentityTranslator {
    fn translate(&self, text: &str) -> String {
        text.to_string()
    }
}

/// Read access to the values of bound properties.
pub trait BoundValues {
    /// Current value of `ident`, if bound.
    fn bound_value(&self, ident: &str) -> Option<PropertyValue>;
}

impl BoundValues for HashMap<String, PropertyValue> {
    fn bound_value(&self, ident: &str) -> Option<PropertyValue> {
        self.get(ident).cloned()
    }
}

impl BoundValues for BTreeMap<String, PropertyValue> {
    fn bound_value(&self, ident: &str) -> Option<PropertyValue> {
        self.get(ident).cloned()
    }
}

/// No bound values at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBoundValues;

impl BoundValues for NoBoundValues {
    fn bound_value(&self, _ident: &str) -> Option<PropertyValue> {
        None
    }
}

/// The host's bound-property store.
///
/// Implementations serialize their own create/update operations per device
/// instance.
pub trait PropertyHost {
    /// Handle returned for a maintained property.
    type Handle;

    /// Returns `true` if `ident` is already bound.
    fn contains(&self, ident: &str) -> bool;

    /// Creates the property or updates its type, name, presentation and
    /// action state.
    fn maintain(&self, entry: &PlanEntry) -> Self::Handle;

    /// Sets the value of a bound property.
    fn set_value(&self, ident: &str, value: PropertyValue);

    /// Returns the value of a bound property.
    fn value(&self, ident: &str) -> Option<PropertyValue>;
}

/// Outcome of [`apply_plan`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Identifiers created in this pass.
    pub created: Vec<String>,
    /// Existing identifiers updated in this pass.
    pub updated: Vec<String>,
    /// Identifiers neither bound nor due for creation.
    pub skipped: Vec<String>,
}

/// Reconciles a host against a plan.
///
/// Entries with `shouldCreate` are created when missing; existing properties
/// are always updated, even when `shouldCreate` turned false, and never
/// deleted. Initial values are written only when present.
pub fn apply_plan<H: PropertyHost + ?Sized>(host: &H, plan: &[PlanEntry]) -> ApplyReport {
    let mut report = ApplyReport::default();
    for entry in plan {
        let exists = host.contains(&entry.ident);
        if !exists && !entry.should_create {
            report.skipped.push(entry.ident.clone());
            continue;
        }
        host.maintain(entry);
        if let Some(value) = &entry.initial_value {
            host.set_value(&entry.ident, value.clone());
        }
        if exists {
            report.updated.push(entry.ident.clone());
        } else {
            report.created.push(entry.ident.clone());
        }
    }
    tracing::debug!(
        created = report.created.len(),
        updated = report.updated.len(),
        skipped = report.skipped.len(),
        "Applied property plan"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_translate() {
        let german = |text: &str| match text {
            "Power" => "Leistung".to_string(),
            other => other.to_string(),
        };
        assert_eq!(german.translate("Power"), "Leistung");
        assert_eq!(german.translate("Mode"), "Mode");
        assert_eq!(IdentityTranslator.translate("Mode"), "Mode");
    }

    #[test]
    fn maps_provide_bound_values() {
        let mut values = HashMap::new();
        values.insert("MIN".to_string(), PropertyValue::Integer(15));
        assert_eq!(values.bound_value("MIN"), Some(PropertyValue::Integer(15)));
        assert_eq!(values.bound_value("HOUR"), None);
        assert_eq!(NoBoundValues.bound_value("MIN"), None);
    }
}
