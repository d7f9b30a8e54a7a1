// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Profile auto-discovery.
//!
//! Derives one candidate property per typed schema leaf of a profile, so a
//! device gets a usable property set even when no curated descriptor file
//! covers it.
//!
//! # Rules
//!
//! - The profile is unwrapped from its envelope (see [`resource_map`]).
//! - A resource that is an array of location-tagged objects yields one set
//!   of entries per location; default locations (`MAIN`) do not prefix the
//!   identifier, others do (`SUB_OPERATION_ENABLED`).
//! - Hour/minute timer fields (`relativeHourToStart`, ...) are writable
//!   whatever their declared mode: arming a timer is only possible through
//!   them.
//! - Start/stop timer flags (`relativeStartTimer`, ...) are read-only
//!   booleans reading `SET`/`UNSET`.
//!
//! # Examples
//!
//! ```
//! use capmap_lib::EngineConfig;
//! use capmap_lib::discovery::AutoDiscoverer;
//! use capmap_lib::translate::{EnumCaptions, NameTable};
//! use serde_json::json;
//!
//! let profile = json!({"property": {
//!     "operation": [
//!         {"locationName": "MAIN", "enabled": {"type": "boolean", "mode": ["r", "w"]}},
//!         {"locationName": "SUB", "enabled": {"type": "boolean", "mode": ["r", "w"]}}
//!     ]
//! }});
//!
//! let config = EngineConfig::default();
//! let (names, captions) = (NameTable::new(), EnumCaptions::builtin());
//! let entries = AutoDiscoverer::new(&config, &names, &captions).discover(&profile);
//!
//! let idents: Vec<&str> = entries.iter().map(|e| e.ident.as_str()).collect();
//! assert_eq!(idents, vec!["OPERATION_ENABLED", "SUB_OPERATION_ENABLED"]);
//! ```

mod naming;
mod normalize;
mod presentation;

use std::collections::HashSet;

use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::descriptor::{
    ActionSpec, ArraySelector, AttributeWrite, BoolTokens, CreateRule, Descriptor,
    DescriptorOrigin, ReadSpec, WriteSpec, WriteStrategy,
};
use crate::schema::{SchemaRange, is_timer_field, is_timer_flag};
use crate::translate::{EnumCaptions, NameTable};
use crate::types::{Presentation, PropertyType};

pub use naming::{auto_ident, auto_name, unit_suffix};
pub use normalize::{ResourceSet, is_property_leaf, property_leaves, resource_map, resource_sets};
pub use presentation::{LeafSchema, SchemaKind, infer_presentation};

/// One discovered property.
#[derive(Debug, Clone, PartialEq)]
pub struct AutoPlanEntry {
    /// Stable identifier.
    pub ident: String,
    /// Display name before translation.
    pub name: String,
    /// Property type.
    pub property_type: PropertyType,
    /// Canonical profile path, array index included.
    pub path: String,
    /// Resource name.
    pub resource: String,
    /// Property path within the resource.
    pub property: String,
    /// Location tag.
    pub location: Option<String>,
    /// Index within a location array.
    pub index: Option<usize>,
    /// Readable per schema.
    pub readable: bool,
    /// Writable, after overrides.
    pub writable: bool,
    /// Rendering hint.
    pub presentation: Presentation,
    /// Declared numeric range.
    pub range: Option<SchemaRange>,
    /// Declared enum tokens.
    pub options: Vec<String>,
    /// The schema leaf as found in the profile.
    pub meta: Value,
}

impl AutoPlanEntry {
    /// `resource.property` key, without the location index.
    #[must_use]
    pub fn key(&self) -> String {
        crate::path::join(&self.resource, &self.property)
    }

    /// Turns the entry into a descriptor.
    ///
    /// Located array entries read through an array selector on
    /// `locationName` with the indexed path as fallback; writable entries
    /// get an attribute write clamped against the live profile range, and
    /// their action is gated on the writability of their own indexed path.
    #[must_use]
    pub fn into_descriptor(self) -> Descriptor {
        let mut read = ReadSpec::sources([self.path.clone()]);
        if let (Some(_), Some(location)) = (self.index, &self.location) {
            let mut predicate = Map::new();
            predicate.insert("locationName".to_string(), Value::String(location.clone()));
            read = read.with_array(ArraySelector {
                container: self.resource.clone(),
                predicate,
                path: self.property.clone(),
                ..ArraySelector::default()
            });
        }
        if is_timer_flag(&self.property) {
            read = read.with_bool_tokens(BoolTokens::pair("SET", "UNSET"));
        }

        let mut descriptor = Descriptor::new(&self.ident, &self.name, self.property_type)
            .with_create(CreateRule::Always)
            .with_read(read)
            .with_presentation(self.presentation.clone())
            .with_origin(DescriptorOrigin::Auto);
        if let Some(location) = &self.location {
            descriptor = descriptor.with_location(location.clone());
        }

        if self.writable {
            let mut attribute = AttributeWrite::new(&self.resource, &self.property);
            attribute.clamp_from_profile = self.range.is_some();
            if let Some(location) = &self.location {
                attribute = attribute.at_location(location.clone());
            }
            let action = if is_timer_field(&self.property) {
                ActionSpec::always()
            } else {
                ActionSpec::writable_any([self.path.clone()])
            };
            descriptor = descriptor
                .with_write(WriteSpec::new(WriteStrategy::Attribute(attribute)))
                .with_action(action);
        }
        descriptor
    }
}

/// Derives [`AutoPlanEntry`] values from a profile.
#[derive(Debug, Clone, Copy)]
pub struct AutoDiscoverer<'a> {
    config: &'a EngineConfig,
    names: &'a NameTable,
    captions: &'a EnumCaptions,
}

impl<'a> AutoDiscoverer<'a> {
    /// Creates a discoverer over the given tables.
    #[must_use]
    pub fn new(config: &'a EngineConfig, names: &'a NameTable, captions: &'a EnumCaptions) -> Self {
        Self {
            config,
            names,
            captions,
        }
    }

    /// Discovers every typed leaf of `profile`.
    ///
    /// Never fails: malformed sections are skipped, an empty or `null`
    /// profile yields nothing. Identifiers are unique; the first occurrence
    /// wins.
    #[must_use]
    pub fn discover(&self, profile: &Value) -> Vec<AutoPlanEntry> {
        let resources = resource_map(profile);
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for set in resource_sets(&resources) {
            for (property, leaf) in property_leaves(set.body) {
                let entry = self.entry(&set, &property, leaf);
                if seen.insert(entry.ident.clone()) {
                    tracing::trace!(ident = %entry.ident, path = %entry.path, "Discovered property");
                    entries.push(entry);
                }
            }
        }
        tracing::debug!(count = entries.len(), "Auto-discovery finished");
        entries
    }

    fn entry(&self, set: &ResourceSet<'_>, property: &str, leaf: &Map<String, Value>) -> AutoPlanEntry {
        let schema = LeafSchema::parse(leaf);
        let timer_flag = is_timer_flag(property);
        let writable = if timer_flag {
            false
        } else {
            schema.writable || is_timer_field(property)
        };

        let (property_type, presentation) = if timer_flag {
            (PropertyType::Boolean, Presentation::value())
        } else {
            infer_presentation(
                property,
                &schema,
                writable,
                self.captions,
                &self.config.language,
            )
        };

        AutoPlanEntry {
            ident: auto_ident(set.resource, property, set.location, self.config),
            name: auto_name(self.names, set.resource, property, set.location, self.config),
            property_type,
            path: crate::path::join(&set.base_path(), property),
            resource: set.resource.to_string(),
            property: property.to_string(),
            location: set.location.map(str::to_string),
            index: set.index,
            readable: schema.readable,
            writable,
            presentation,
            range: schema.range,
            options: schema.tokens,
            meta: Value::Object(leaf.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PresentationKind;
    use serde_json::json;

    fn discover(profile: &Value) -> Vec<AutoPlanEntry> {
        let config = EngineConfig::default();
        let names = NameTable::new();
        let captions = EnumCaptions::builtin();
        AutoDiscoverer::new(&config, &names, &captions).discover(profile)
    }

    fn washer_profile() -> Value {
        json!({
            "property": [{
                "runState": {"currentState": {"type": "enum", "mode": ["r"],
                             "value": {"r": ["POWER_OFF", "RUNNING"]}}},
                "timer": {
                    "relativeHourToStart": {"type": "range", "mode": ["r"],
                                            "value": {"r": {"min": 0, "max": 19, "step": 1}}},
                    "relativeMinuteToStart": {"type": "range", "mode": ["r"]},
                    "relativeStartTimer": {"type": "enum", "mode": ["r", "w"],
                                           "value": {"r": ["SET", "UNSET"]}},
                    "remainHour": {"type": "number", "mode": ["r"]}
                },
                "notAResource": 5
            }]
        })
    }

    #[test]
    fn timer_overrides() {
        let entries = discover(&washer_profile());
        let by_ident = |ident: &str| entries.iter().find(|e| e.ident == ident).unwrap();

        let hour = by_ident("TIMER_RELATIVE_HOUR_TO_START");
        assert!(hour.writable);
        assert_eq!(hour.presentation.kind, PresentationKind::Slider);
        assert_eq!(hour.presentation.max, Some(19.0));

        let flag = by_ident("TIMER_RELATIVE_START_TIMER");
        assert!(!flag.writable);
        assert_eq!(flag.property_type, PropertyType::Boolean);

        assert!(!by_ident("TIMER_REMAIN_HOUR").writable);
    }

    #[test]
    fn descriptors_from_entries() {
        let entries = discover(&washer_profile());
        let descriptors: Vec<Descriptor> =
            entries.into_iter().map(AutoPlanEntry::into_descriptor).collect();

        let hour = descriptors
            .iter()
            .find(|d| d.ident == "TIMER_RELATIVE_HOUR_TO_START")
            .unwrap();
        assert_eq!(hour.action, ActionSpec::always());
        let Some(WriteSpec {
            strategy: WriteStrategy::Attribute(attribute),
            ..
        }) = &hour.write
        else {
            panic!("expected an attribute write");
        };
        assert!(attribute.clamp_from_profile);
        assert_eq!(attribute.path(), "timer.relativeHourToStart");

        let flag = descriptors
            .iter()
            .find(|d| d.ident == "TIMER_RELATIVE_START_TIMER")
            .unwrap();
        assert!(flag.write.is_none());
        assert_eq!(flag.read.bool_tokens, Some(BoolTokens::pair("SET", "UNSET")));

        let state = descriptors
            .iter()
            .find(|d| d.ident == "RUN_STATE_CURRENT_STATE")
            .unwrap();
        assert_eq!(state.read.sources, vec!["runState.currentState"]);
        assert_eq!(state.origin, DescriptorOrigin::Auto);
    }

    #[test]
    fn located_entries_select_by_location() {
        let profile = json!({
            "temperature": [
                {"locationName": "FRIDGE", "targetTemperature": {"type": "range", "mode": ["r", "w"],
                 "value": {"w": {"min": 1, "max": 7, "step": 1}}}},
                {"locationName": "FREEZER", "targetTemperature": {"type": "range", "mode": ["r", "w"],
                 "value": {"w": {"min": -24, "max": -14, "step": 1}}}}
            ]
        });
        let entries = discover(&profile);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].path, "temperature.1.targetTemperature");
        assert_eq!(entries[1].name, "Target Temperature (Freezer)");

        let descriptor = entries[1].clone().into_descriptor();
        let array = descriptor.read.array.as_ref().unwrap();
        assert_eq!(array.container, "temperature");
        assert_eq!(array.predicate.get("locationName"), Some(&json!("FREEZER")));
        assert_eq!(descriptor.location.as_deref(), Some("FREEZER"));
        assert_eq!(descriptor.action, ActionSpec::writable_any(["temperature.1.targetTemperature"]));
        assert_eq!(entries[1].key(), "temperature.targetTemperature");
    }

    #[test]
    fn empty_and_null_profiles_discover_nothing() {
        assert!(discover(&Value::Null).is_empty());
        assert!(discover(&json!({})).is_empty());
        assert!(discover(&json!([null, 3])).is_empty());
    }
}
