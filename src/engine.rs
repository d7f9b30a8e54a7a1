// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Engine facade composing catalog, descriptors, tables and configuration.
//!
//! [`CapabilityEngine`] owns its collaborators explicitly: the catalog is
//! loaded by the caller (once per process if desired) and shared through an
//! `Arc`. Every operation is a pure function of its inputs, so one engine can
//! serve any number of device instances concurrently.
//!
//! # Examples
//!
//! ```
//! use capmap_lib::CapabilityEngine;
//! use capmap_lib::catalog::Catalog;
//! use capmap_lib::descriptor::DescriptorLibrary;
//! use capmap_lib::host::{MemoryHost, apply_plan};
//! use capmap_lib::types::PropertyValue;
//! use serde_json::json;
//!
//! let catalog = Catalog::from_json_str(
//!     r#"{"rules": [{"match": {"any": ["washer"]}, "files": ["washer.json"]}]}"#,
//! ).unwrap();
//! let mut library = DescriptorLibrary::new();
//! library.add_json("washer", r#"[{
//!     "ident": "RUN_STATE", "name": "State",
//!     "create": {"when": "statusHasAny", "keys": ["runState.currentState"]},
//!     "read": {"sources": ["runState.currentState"]}
//! }]"#).unwrap();
//!
//! let engine = CapabilityEngine::builder()
//!     .with_catalog(catalog)
//!     .with_library(library)
//!     .build();
//!
//! let profile = json!({});
//! let status = json!({"runState": {"currentState": "RUNNING"}});
//! let descriptors = engine.descriptors("DEVICE_WASHER", &profile);
//! let plan = engine.plan(&descriptors, &profile, &status);
//!
//! let host = MemoryHost::new();
//! let report = apply_plan(&host, &plan);
//! assert_eq!(report.created, vec!["RUN_STATE"]);
//! assert_eq!(host.get("RUN_STATE").unwrap().value, Some(PropertyValue::from("RUNNING")));
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::catalog::{Catalog, Resolution};
use crate::config::EngineConfig;
use crate::descriptor::{DescriptorLibrary, DescriptorSet, synthetic_descriptors};
use crate::discovery::{AutoDiscoverer, AutoPlanEntry};
use crate::events::EventTracker;
use crate::host::{BoundValues, IdentityTranslator, Translate};
use crate::path::flatten;
use crate::plan::{PlanBuilder, PropertyPlan};
use crate::read::ValueReader;
use crate::translate::{EnumCaptions, NameTable};
use crate::types::PropertyValue;
use crate::write::PayloadBuilder;

/// Capability mapping engine.
///
/// Cheap to clone: the catalog and translator are shared.
#[derive(Clone)]
pub struct CapabilityEngine {
    catalog: Arc<Catalog>,
    library: DescriptorLibrary,
    names: NameTable,
    captions: EnumCaptions,
    translator: Arc<dyn Translate + Send + Sync>,
    config: EngineConfig,
}

impl fmt::Debug for CapabilityEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityEngine")
            .field("rules", &self.catalog.len())
            .field("descriptor_files", &self.library.len())
            .field("names", &self.names.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Default for CapabilityEngine {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CapabilityEngine {
    /// Creates a builder with an empty catalog and library.
    #[must_use]
    pub fn builder() -> CapabilityEngineBuilder {
        CapabilityEngineBuilder::default()
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the shared catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Returns the descriptor library.
    #[must_use]
    pub fn library(&self) -> &DescriptorLibrary {
        &self.library
    }

    /// Resolves the descriptor files for a device.
    #[must_use]
    pub fn resolve(&self, device_type: &str, profile: &Value) -> Resolution {
        self.catalog.resolve(device_type, profile, &self.config)
    }

    /// Runs profile auto-discovery.
    #[must_use]
    pub fn discover(&self, profile: &Value) -> Vec<AutoPlanEntry> {
        AutoDiscoverer::new(&self.config, &self.names, &self.captions).discover(profile)
    }

    /// Builds the descriptor set of one device instance.
    ///
    /// Curated descriptors from the resolved files win over auto-discovered
    /// ones, which win over synthetic trackers.
    #[must_use]
    pub fn descriptors(&self, device_type: &str, profile: &Value) -> DescriptorSet {
        let resolution = self.resolve(device_type, profile);
        let manual = self.library.select(&resolution.files);
        let auto = self
            .discover(profile)
            .into_iter()
            .map(AutoPlanEntry::into_descriptor)
            .collect();
        let synthetic = synthetic_descriptors(&flatten(profile), &self.config.wrapper_prefixes);

        let set = DescriptorSet::merge(manual, auto, synthetic);
        tracing::debug!(
            device_type,
            pass = ?resolution.pass,
            files = resolution.files.len(),
            descriptors = set.len(),
            "Built descriptor set"
        );
        set
    }

    /// Plans the bound properties for a descriptor set.
    #[must_use]
    pub fn plan(&self, descriptors: &DescriptorSet, profile: &Value, status: &Value) -> PropertyPlan {
        PlanBuilder::new(&self.config, self.translator.as_ref()).build(descriptors, profile, status)
    }

    /// Reads the current value of every descriptor that resolves in `status`.
    #[must_use]
    pub fn read_values(&self, descriptors: &DescriptorSet, status: &Value) -> BTreeMap<String, PropertyValue> {
        let flat = flatten(status);
        ValueReader::new(&flat, &self.config).read_all(descriptors)
    }

    /// Builds the control payload setting `ident` to `value`.
    ///
    /// Returns `None` when the identifier is not handled by the descriptor
    /// set.
    #[must_use]
    pub fn build_payload(
        &self,
        descriptors: &DescriptorSet,
        profile: &Value,
        status: &Value,
        bound: &dyn BoundValues,
        ident: &str,
        value: PropertyValue,
    ) -> Option<Value> {
        let profile = flatten(profile);
        let status = flatten(status);
        PayloadBuilder::new(&self.config, descriptors, &profile, &status, bound).build(ident, value)
    }

    /// Returns an event tracker for error and push-message codes.
    #[must_use]
    pub fn events(&self) -> EventTracker<'_> {
        EventTracker::new(&self.config, &self.captions)
    }
}

/// Builder for [`CapabilityEngine`].
pub struct CapabilityEngineBuilder {
    catalog: Arc<Catalog>,
    library: DescriptorLibrary,
    names: NameTable,
    captions: EnumCaptions,
    translator: Arc<dyn Translate + Send + Sync>,
    config: EngineConfig,
}

impl Default for CapabilityEngineBuilder {
    fn default() -> Self {
        Self {
            catalog: Arc::new(Catalog::empty()),
            library: DescriptorLibrary::new(),
            names: NameTable::new(),
            captions: EnumCaptions::builtin(),
            translator: Arc::new(IdentityTranslator),
            config: EngineConfig::default(),
        }
    }
}

impl fmt::Debug for CapabilityEngineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapabilityEngineBuilder")
            .field("rules", &self.catalog.len())
            .field("descriptor_files", &self.library.len())
            .finish_non_exhaustive()
    }
}

impl CapabilityEngineBuilder {
    /// Sets the catalog.
    #[must_use]
    pub fn with_catalog(mut self, catalog: impl Into<Arc<Catalog>>) -> Self {
        self.catalog = catalog.into();
        self
    }

    /// Sets the descriptor library.
    #[must_use]
    pub fn with_library(mut self, library: DescriptorLibrary) -> Self {
        self.library = library;
        self
    }

    /// Sets the property name table used by auto-discovery.
    #[must_use]
    pub fn with_names(mut self, names: NameTable) -> Self {
        self.names = names;
        self
    }

    /// Adds enum captions on top of the built-in ones.
    #[must_use]
    pub fn with_captions(mut self, captions: EnumCaptions) -> Self {
        self.captions.merge(captions);
        self
    }

    /// Sets the translator applied to plan names and option captions.
    #[must_use]
    pub fn with_translator<T>(mut self, translator: T) -> Self
    where
        T: Translate + Send + Sync + 'static,
    {
        self.translator = Arc::new(translator);
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the engine.
    #[must_use]
    pub fn build(self) -> CapabilityEngine {
        CapabilityEngine {
            catalog: self.catalog,
            library: self.library,
            names: self.names,
            captions: self.captions,
            translator: self.translator,
            config: self.config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{DescriptorOrigin, LAST_ERROR};
    use crate::host::NoBoundValues;
    use serde_json::json;

    fn engine() -> CapabilityEngine {
        let catalog = Catalog::from_json_str(
            r#"{"rules": [{"match": {"any": ["air_conditioner"]}, "files": ["ac.json"]}],
                "fallback": ["generic.json"]}"#,
        )
        .unwrap();
        let mut library = DescriptorLibrary::new();
        library
            .add_json(
                "ac",
                r#"[{"ident": "POWER", "name": "Power", "type": "boolean",
                     "read": {"sources": ["operation.airConOperationMode"],
                              "boolTokens": {"true": ["POWER_ON"], "false": ["POWER_OFF"]}},
                     "write": {"kind": "attribute", "resource": "operation",
                               "property": "airConOperationMode", "valueTemplate": "@power_on_off"},
                     "presentation": {"kind": "switch"}}]"#,
            )
            .unwrap();
        library
            .add_json("generic", r#"[{"ident": "GENERIC", "name": "Generic"}]"#)
            .unwrap();

        CapabilityEngine::builder()
            .with_catalog(catalog)
            .with_library(library)
            .with_translator(|text: &str| text.to_uppercase())
            .build()
    }

    fn profile() -> Value {
        json!({
            "property": {
                "operation": {"airConOperationMode": {"type": "enum", "mode": ["r", "w"],
                              "value": {"r": ["POWER_ON", "POWER_OFF"], "w": ["POWER_ON", "POWER_OFF"]}}},
                "airFlow": {"windStrength": {"type": "enum", "mode": ["r", "w"],
                            "value": {"r": ["LOW", "HIGH"], "w": ["LOW", "HIGH"]}}}
            },
            "error": ["FILTER_ERROR"]
        })
    }

    #[test]
    fn descriptor_set_merges_all_origins() {
        let set = engine().descriptors("DEVICE_AIR_CONDITIONER", &profile());
        assert_eq!(set.get("POWER").unwrap().origin, DescriptorOrigin::Manual);
        assert_eq!(set.get(LAST_ERROR).unwrap().origin, DescriptorOrigin::Synthetic);
        assert!(!set.contains("GENERIC"));
        assert!(set.iter().any(|d| d.origin == DescriptorOrigin::Auto));
    }

    #[test]
    fn plan_translates_names() {
        let engine = engine();
        let profile = profile();
        let status = json!({"operation": {"airConOperationMode": "POWER_ON"}});
        let set = engine.descriptors("DEVICE_AIR_CONDITIONER", &profile);
        let plan = engine.plan(&set, &profile, &status);

        let power = plan.iter().find(|e| e.ident == "POWER").unwrap();
        assert_eq!(power.name, "POWER");
        assert_eq!(power.initial_value, Some(PropertyValue::Bool(true)));
    }

    #[test]
    fn reads_and_writes_through_the_set() {
        let engine = engine();
        let profile = profile();
        let status = json!({"operation": {"airConOperationMode": "POWER_OFF"}});
        let set = engine.descriptors("DEVICE_AIR_CONDITIONER", &profile);

        assert_eq!(engine.read_values(&set, &status).get("POWER"), Some(&PropertyValue::Bool(false)));
        assert_eq!(
            engine.build_payload(&set, &profile, &status, &NoBoundValues, "POWER", PropertyValue::Bool(true)),
            Some(json!({"operation": {"airConOperationMode": "POWER_ON"}}))
        );
    }

    #[test]
    fn unknown_device_type_uses_fallback_files() {
        let set = engine().descriptors("DEVICE_TOASTER", &Value::Null);
        assert!(set.contains("GENERIC"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn default_engine_has_no_curated_descriptors() {
        let engine = CapabilityEngine::default();
        assert!(engine.catalog().is_empty());
        assert!(engine.events().record_error("OE").is_some());
    }
}
