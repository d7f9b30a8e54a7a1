// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Control payload synthesis.
//!
//! [`PayloadBuilder::build`] turns `(ident, value)` into the nested JSON body
//! the vendor control API expects. After the optional static clamp, the
//! descriptor's single write strategy runs:
//!
//! - **composite**: total minutes split into hour and minute paths
//! - **enumMap**: the value's canonical token (`true` → `"true"`) selects a
//!   fixed payload
//! - **arrayTemplate**: fields of the status array element matching a
//!   predicate, sent as a one-element array. The element sits at index 0
//!   whatever its position in the status array; its predicate fields
//!   identify it to the device.
//! - **template**: placeholders (`@bool`, `@onoff`, ...) substituted
//! - **attribute**: one resource property, optionally clamped against the
//!   live profile range (of its own location element when located)
//! - **multiAttribute**: several attributes merged into one payload
//! - **firstOf**: the first option whose writability gate holds
//!
//! Whatever the strategy, a payload containing one half of an hour/minute
//! timer pair always receives the other half too.
//!
//! `None` means the request is not handled by this layer, for example an
//! unknown identifier or a read-only descriptor. `Some(json!({}))` is a
//! valid, empty payload.
//!
//! # Examples
//!
//! ```
//! use capmap_lib::EngineConfig;
//! use capmap_lib::descriptor::{Descriptor, DescriptorSet};
//! use capmap_lib::host::NoBoundValues;
//! use capmap_lib::path::FlatMap;
//! use capmap_lib::types::PropertyValue;
//! use capmap_lib::write::PayloadBuilder;
//! use serde_json::json;
//!
//! let descriptor: Descriptor = serde_json::from_value(json!({
//!     "ident": "CHILD_LOCK", "name": "Child lock", "type": "boolean",
//!     "write": {"kind": "enumMap", "map": {
//!         "true": {"operation": {"childLock": "LOCK"}},
//!         "false": {"operation": {"childLock": "UNLOCK"}}
//!     }}
//! })).unwrap();
//! let descriptors = DescriptorSet::merge(vec![descriptor], Vec::new(), Vec::new());
//!
//! let (config, empty) = (EngineConfig::default(), FlatMap::new());
//! let builder = PayloadBuilder::new(&config, &descriptors, &empty, &empty, &NoBoundValues);
//!
//! assert_eq!(
//!     builder.build("CHILD_LOCK", PropertyValue::Bool(false)),
//!     Some(json!({"operation": {"childLock": "UNLOCK"}}))
//! );
//! assert_eq!(builder.build("UNKNOWN", PropertyValue::Bool(false)), None);
//! ```

mod convert;
mod timer;

use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::descriptor::{
    ArrayTemplateWrite, AttributeWrite, Clamp, Combinator, CompositeSpec, Descriptor,
    DescriptorSet, EnumMapWrite, FirstOfWrite, WriteSpec, WriteStrategy,
};
use crate::host::BoundValues;
use crate::path::{FlatMap, deep_merge, densify, set_path};
use crate::read::find_element;
use crate::schema::SchemaProbe;
use crate::types::{PropertyType, PropertyValue};

pub use convert::{Placeholder, substitute};

/// Builds control payloads for one device instance.
///
/// Stateless across calls: the profile, status and bound values are read
/// fresh on every [`build`](Self::build).
#[derive(Clone, Copy)]
pub struct PayloadBuilder<'a> {
    config: &'a EngineConfig,
    descriptors: &'a DescriptorSet,
    status: &'a FlatMap,
    probe: SchemaProbe<'a>,
    bound: &'a dyn BoundValues,
}

impl std::fmt::Debug for PayloadBuilder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayloadBuilder")
            .field("descriptors", &self.descriptors.len())
            .field("status", &self.status.len())
            .finish_non_exhaustive()
    }
}

impl<'a> PayloadBuilder<'a> {
    /// Creates a builder over a flattened profile and status.
    #[must_use]
    pub fn new(
        config: &'a EngineConfig,
        descriptors: &'a DescriptorSet,
        profile: &'a FlatMap,
        status: &'a FlatMap,
        bound: &'a dyn BoundValues,
    ) -> Self {
        Self {
            config,
            descriptors,
            status,
            probe: SchemaProbe::with_prefixes(profile, &config.wrapper_prefixes),
            bound,
        }
    }

    /// Builds the payload setting `ident` to `value`.
    #[must_use]
    pub fn build(&self, ident: &str, value: PropertyValue) -> Option<Value> {
        let Some(descriptor) = self.descriptors.get(ident) else {
            tracing::debug!(ident, "No descriptor, payload not handled");
            return None;
        };
        let Some(spec) = &descriptor.write else {
            tracing::debug!(ident, "Descriptor is read-only");
            return None;
        };

        let mut payload = self.apply(descriptor, spec, value)?;
        timer::complete_timer_pairs(&mut payload, self.descriptors, self.bound);
        tracing::debug!(ident, strategy = spec.strategy.kind(), "Built control payload");
        Some(payload)
    }

    fn apply(&self, descriptor: &Descriptor, spec: &WriteSpec, value: PropertyValue) -> Option<Value> {
        let value = match &spec.clamp {
            Some(clamp) => clamp_value(value, descriptor.property_type, |v| clamp.apply(v)),
            None => value,
        };

        match &spec.strategy {
            WriteStrategy::Composite(composite) => Self::composite(composite, &value),
            WriteStrategy::EnumMap(enum_map) => self.enum_map(descriptor, enum_map, &value),
            WriteStrategy::ArrayTemplate(array) => self.array_template(array, &value),
            WriteStrategy::Template(template) => substitute(&template.template, &value)
                .map_err(|e| tracing::warn!(ident = %descriptor.ident, error = %e, "Template rejected value"))
                .ok(),
            WriteStrategy::Attribute(attribute) => {
                self.attribute(descriptor.property_type, attribute, value)
            }
            WriteStrategy::MultiAttribute(multi) => {
                let mut payload = Value::Object(Map::new());
                for item in &multi.items {
                    let item_payload = match &item.value {
                        Some(constant) => {
                            let constant = PropertyValue::from_json(constant)?;
                            let ty = constant.property_type();
                            self.attribute(ty, item, constant)?
                        }
                        None => self.attribute(descriptor.property_type, item, value.clone())?,
                    };
                    deep_merge(&mut payload, &item_payload);
                }
                Some(payload)
            }
            WriteStrategy::FirstOf(first_of) => {
                let option = self.choose(first_of)?;
                self.apply(descriptor, option, value)
            }
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn composite(composite: &CompositeSpec, value: &PropertyValue) -> Option<Value> {
        match composite.combine {
            Combinator::HmToMinutes => {
                let total = value.as_f64()?.round().max(0.0) as i64;
                let mut payload = Value::Object(Map::new());
                set_path(&mut payload, composite.part("hours")?, Value::from(total / 60));
                set_path(&mut payload, composite.part("minutes")?, Value::from(total % 60));
                Some(payload)
            }
        }
    }

    fn enum_map(&self, descriptor: &Descriptor, enum_map: &EnumMapWrite, value: &PropertyValue) -> Option<Value> {
        let token = value.canonical_token();
        let case_insensitive = enum_map
            .case_insensitive
            .or(descriptor.read.case_insensitive)
            .unwrap_or(self.config.case_insensitive_enums);

        let found = enum_map.map.get(&token).or_else(|| {
            case_insensitive
                .then(|| {
                    enum_map
                        .map
                        .iter()
                        .find(|(key, _)| key.eq_ignore_ascii_case(&token))
                        .map(|(_, payload)| payload)
                })
                .flatten()
        });
        if found.is_none() {
            tracing::debug!(ident = %descriptor.ident, token = %token, "No enum map entry");
        }
        found.cloned()
    }

    fn array_template(&self, array: &ArrayTemplateWrite, value: &PropertyValue) -> Option<Value> {
        let Some(index) = find_element(self.status, &array.container, &array.predicate) else {
            tracing::debug!(container = %array.container, "No array element matches");
            return None;
        };

        let mut element = Value::Object(array.predicate.clone());
        for (field, template) in &array.set {
            let rendered = substitute(template, value)
                .map_err(|e| tracing::warn!(field = %field, error = %e, "Template rejected value"))
                .ok()?;
            set_path(&mut element, field, rendered);
        }

        let mut indexed = Map::new();
        indexed.insert(index.to_string(), element);
        let mut payload = Value::Object(Map::new());
        set_path(&mut payload, &array.container, densify(Value::Object(indexed)));
        Some(payload)
    }

    fn attribute(&self, ty: PropertyType, attribute: &AttributeWrite, value: PropertyValue) -> Option<Value> {
        let mut value = value;
        if let Some(clamp) = &attribute.clamp {
            value = clamp_value(value, ty, |v| clamp.apply(v));
        }
        if attribute.clamp_from_profile {
            let range = attribute
                .location
                .as_deref()
                .and_then(|location| {
                    self.probe
                        .located_range(&attribute.resource, &attribute.property, location)
                })
                .or_else(|| self.probe.range(&attribute.path()));
            if let Some(range) = range {
                value = clamp_value(value, ty, |v| range.clamp(v));
            }
        }

        let rendered = match &attribute.value_template {
            Some(template) => substitute(&Value::String(template.clone()), &value),
            None => value.convert(ty).map(|v| v.to_json()),
        }
        .map_err(|e| tracing::warn!(path = %attribute.path(), error = %e, "Attribute rejected value"))
        .ok()?;

        let mut body = Value::Object(attribute.extra.clone());
        set_path(&mut body, &attribute.property, rendered);
        if let (Some(location), Value::Object(map)) = (&attribute.location, &mut body) {
            map.insert("locationName".to_string(), Value::String(location.clone()));
        }
        let mut payload = Value::Object(Map::new());
        set_path(&mut payload, &attribute.resource, body);
        Some(payload)
    }

    /// First gate-less or gate-passing option, then the first option whose
    /// own target paths are writable.
    fn choose<'s>(&self, first_of: &'s FirstOfWrite) -> Option<&'s WriteSpec> {
        first_of
            .options
            .iter()
            .find(|option| {
                option.when_writable.is_empty()
                    || option.when_writable.iter().any(|key| self.probe.is_writable(key))
            })
            .or_else(|| {
                first_of.options.iter().find(|option| {
                    option
                        .write
                        .target_paths()
                        .iter()
                        .any(|path| self.probe.is_writable(path))
                })
            })
            .map(|option| &option.write)
    }
}

/// Clamps numeric values, keeping integers integral.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn clamp_value(value: PropertyValue, ty: PropertyType, clamp: impl Fn(f64) -> f64) -> PropertyValue {
    if matches!(value, PropertyValue::Bool(_)) || matches!(ty, PropertyType::Boolean | PropertyType::String) {
        return value;
    }
    let Some(number) = value.as_f64() else {
        return value;
    };
    let clamped = clamp(number);
    match (&value, ty) {
        (PropertyValue::Integer(_), _) | (_, PropertyType::Integer) => {
            PropertyValue::Integer(clamped.round() as i64)
        }
        _ => PropertyValue::Float(clamped),
    }
}

/// Applies a static clamp the way [`PayloadBuilder::build`] does, for hosts
/// validating input up front.
#[must_use]
pub fn clamp_static(value: PropertyValue, ty: PropertyType, clamp: &Clamp) -> PropertyValue {
    clamp_value(value, ty, |v| clamp.apply(v))
}
