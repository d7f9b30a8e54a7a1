// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value resolution from a flattened status snapshot.
//!
//! [`ValueReader::read`] tries, in order:
//!
//! 1. `sources` + `valueMap`: the first populated source translated through
//!    the map (raw value when no entry matches)
//! 2. `array`: the element of a status array selected by a `where`
//!    predicate, then a path inside it
//! 3. `composite`: named parts combined (`hm_to_minutes`)
//! 4. `sources`: the first populated source, optionally through
//!    `boolTokens`
//!
//! A strategy that finds nothing hands over to the next one. `None` means no
//! source is populated; the host should then keep the displayed value.
//!
//! # Examples
//!
//! ```
//! use capmap_lib::EngineConfig;
//! use capmap_lib::descriptor::Descriptor;
//! use capmap_lib::path::flatten;
//! use capmap_lib::read::ValueReader;
//! use capmap_lib::types::PropertyValue;
//! use serde_json::json;
//!
//! let descriptor: Descriptor = serde_json::from_value(json!({
//!     "ident": "DOOR_OPEN", "name": "Door", "type": "boolean",
//!     "read": {"sources": ["doorStatus.doorState"], "valueMap": {"open": true, "close": false}}
//! })).unwrap();
//!
//! let status = flatten(&json!({"doorStatus": {"doorState": "OPEN"}}));
//! let reader = ValueReader::new(&status, &EngineConfig::default());
//! assert_eq!(reader.read(&descriptor), Some(PropertyValue::Bool(true)));
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use crate::config::EngineConfig;
use crate::descriptor::{ArraySelector, BoolTokens, Combinator, CompositeSpec, Descriptor};
use crate::path::{FlatMap, FlatMapExt, is_index_segment};
use crate::types::{PropertyType, PropertyValue};

/// Reads descriptor values out of one flattened status.
#[derive(Debug, Clone, Copy)]
pub struct ValueReader<'a> {
    status: &'a FlatMap,
    case_insensitive: bool,
}

impl<'a> ValueReader<'a> {
    /// Creates a reader over `status`.
    #[must_use]
    pub fn new(status: &'a FlatMap, config: &EngineConfig) -> Self {
        Self {
            status,
            case_insensitive: config.case_insensitive_enums,
        }
    }

    /// Resolves the current value of `descriptor`.
    #[must_use]
    pub fn read(&self, descriptor: &Descriptor) -> Option<PropertyValue> {
        let spec = &descriptor.read;
        let case_insensitive = spec.case_insensitive.unwrap_or(self.case_insensitive);

        let raw = spec
            .value_map
            .as_ref()
            .filter(|_| !spec.sources.is_empty())
            .and_then(|map| {
                let value = self.first_populated(&spec.sources)?;
                Some(translate(value, Some(map), None, case_insensitive))
            })
            .or_else(|| {
                spec.array
                    .as_ref()
                    .and_then(|selector| self.read_array(selector, case_insensitive))
            })
            .or_else(|| spec.composite.as_ref().and_then(|c| self.read_composite(c)))
            .or_else(|| {
                let value = self.first_populated(&spec.sources)?;
                Some(translate(value, None, spec.bool_tokens.as_ref(), case_insensitive))
            })?;

        tracing::trace!(ident = %descriptor.ident, value = %raw, "Resolved value");
        Some(typed(raw, descriptor.property_type))
    }

    /// Reads every descriptor that resolves, keyed by identifier.
    #[must_use]
    pub fn read_all<'d>(
        &self,
        descriptors: impl IntoIterator<Item = &'d Descriptor>,
    ) -> BTreeMap<String, PropertyValue> {
        descriptors
            .into_iter()
            .filter_map(|d| self.read(d).map(|v| (d.ident.clone(), v)))
            .collect()
    }

    fn first_populated(&self, sources: &[String]) -> Option<&'a Value> {
        sources.iter().find_map(|path| self.status.populated(path))
    }

    fn read_array(&self, selector: &ArraySelector, case_insensitive: bool) -> Option<PropertyValue> {
        let index = find_element(self.status, &selector.container, &selector.predicate)?;
        let path = crate::path::join(&format!("{}.{index}", selector.container), &selector.path);
        let value = self.status.populated(&path)?;
        Some(translate(
            value,
            selector.value_map.as_ref(),
            selector.bool_tokens.as_ref(),
            case_insensitive,
        ))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn read_composite(&self, composite: &CompositeSpec) -> Option<PropertyValue> {
        match composite.combine {
            Combinator::HmToMinutes => {
                let part = |name: &str| {
                    composite
                        .part(name)
                        .and_then(|path| self.status.populated(path))
                        .and_then(|v| PropertyValue::from_json(v)?.as_f64())
                };
                let (hours, minutes) = (part("hours"), part("minutes"));
                if hours.is_none() && minutes.is_none() {
                    return None;
                }
                let total = hours.unwrap_or(0.0) * 60.0 + minutes.unwrap_or(0.0);
                Some(PropertyValue::Integer(total.round() as i64))
            }
        }
    }
}

/// Finds the index of the first element under `container` whose fields equal
/// every `predicate` entry.
///
/// Text compares case-insensitively; other scalars compare by their
/// canonical token.
#[must_use]
pub fn find_element(status: &FlatMap, container: &str, predicate: &Map<String, Value>) -> Option<usize> {
    let indices: BTreeSet<usize> = status
        .descendants(container)
        .filter_map(|(path, _)| {
            let segment = path[container.len() + 1..].split('.').next()?;
            if is_index_segment(segment) {
                segment.parse().ok()
            } else {
                None
            }
        })
        .collect();

    indices.into_iter().find(|index| {
        predicate.iter().all(|(field, expected)| {
            status
                .get(&format!("{container}.{index}.{field}"))
                .is_some_and(|actual| scalar_eq(actual, expected))
        })
    })
}

fn scalar_eq(actual: &Value, expected: &Value) -> bool {
    match (PropertyValue::from_json(actual), PropertyValue::from_json(expected)) {
        (Some(a), Some(e)) => a.canonical_token().eq_ignore_ascii_case(&e.canonical_token()),
        _ => actual == expected,
    }
}

fn translate(
    value: &Value,
    map: Option<&BTreeMap<String, Value>>,
    bool_tokens: Option<&BoolTokens>,
    case_insensitive: bool,
) -> PropertyValue {
    let Some(raw) = PropertyValue::from_json(value) else {
        return PropertyValue::String(value.to_string());
    };
    let token = raw.canonical_token();

    if let Some(map) = map {
        let mapped = map.get(&token).or_else(|| {
            case_insensitive
                .then(|| {
                    map.iter()
                        .find(|(key, _)| key.eq_ignore_ascii_case(&token))
                        .map(|(_, v)| v)
                })
                .flatten()
        });
        if let Some(mapped) = mapped.and_then(PropertyValue::from_json) {
            return mapped;
        }
    }
    if let Some(flag) = bool_tokens.and_then(|tokens| tokens.resolve(&token)) {
        return PropertyValue::Bool(flag);
    }
    raw
}

fn typed(value: PropertyValue, ty: PropertyType) -> PropertyValue {
    value.clone().convert(ty).unwrap_or_else(|e| {
        tracing::trace!(error = %e, "Keeping value in its natural type");
        value
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ReadSpec;
    use crate::path::flatten;
    use serde_json::json;

    fn descriptor(ty: &str, read: Value) -> Descriptor {
        serde_json::from_value(json!({"ident": "X", "name": "X", "type": ty, "read": read})).unwrap()
    }

    fn status() -> FlatMap {
        flatten(&json!({
            "runState": {"currentState": "RUNNING"},
            "timer": {"remainHour": 1, "remainMinute": 35, "relativeStartTimer": "UNSET"},
            "zones": [{"name": "A", "power": false}, {"name": "B", "power": true}],
            "temperature": [
                {"locationName": "FRIDGE", "currentTemperature": 4},
                {"locationName": "FREEZER", "currentTemperature": -18}
            ],
            "empty": {"value": null}
        }))
    }

    fn read(d: &Descriptor) -> Option<PropertyValue> {
        let status = status();
        ValueReader::new(&status, &EngineConfig::default()).read(d)
    }

    #[test]
    fn first_populated_source_wins() {
        let d = descriptor("string", json!({"sources": ["empty.value", "missing", "runState.currentState"]}));
        assert_eq!(read(&d), Some(PropertyValue::from("RUNNING")));
    }

    #[test]
    fn absent_when_nothing_populated() {
        let d = descriptor("string", json!({"sources": ["empty.value", "missing"]}));
        assert_eq!(read(&d), None);
        assert_eq!(read(&Descriptor::new("Y", "Y", PropertyType::String)), None);
    }

    #[test]
    fn value_map_is_case_insensitive_by_default() {
        let d = descriptor(
            "integer",
            json!({"sources": ["runState.currentState"], "valueMap": {"running": 1, "initial": 0}}),
        );
        assert_eq!(read(&d), Some(PropertyValue::Integer(1)));

        let strict = descriptor(
            "string",
            json!({"sources": ["runState.currentState"], "valueMap": {"running": 1},
                   "caseInsensitive": false}),
        );
        assert_eq!(read(&strict), Some(PropertyValue::from("RUNNING")));
    }

    #[test]
    fn array_selector_by_predicate() {
        let d = descriptor(
            "integer",
            json!({"array": {"container": "temperature", "where": {"locationName": "freezer"},
                             "path": "currentTemperature"}}),
        );
        assert_eq!(read(&d), Some(PropertyValue::Integer(-18)));

        let zone = descriptor(
            "boolean",
            json!({"array": {"container": "zones", "where": {"name": "B"}, "path": "power"}}),
        );
        assert_eq!(read(&zone), Some(PropertyValue::Bool(true)));
    }

    #[test]
    fn array_miss_falls_back_to_sources() {
        let d = descriptor(
            "integer",
            json!({"sources": ["temperature.0.currentTemperature"],
                   "array": {"container": "temperature", "where": {"locationName": "NOPE"},
                             "path": "currentTemperature"}}),
        );
        assert_eq!(read(&d), Some(PropertyValue::Integer(4)));
    }

    #[test]
    fn composite_hours_minutes() {
        let d = descriptor(
            "integer",
            json!({"composite": {"combine": "hm_to_minutes",
                                 "parts": {"hours": "timer.remainHour", "minutes": "timer.remainMinute"}}}),
        );
        assert_eq!(read(&d), Some(PropertyValue::Integer(95)));
    }

    #[test]
    fn bool_tokens_on_plain_sources() {
        let d = Descriptor::new("FLAG", "Flag", PropertyType::Boolean).with_read(
            ReadSpec::sources(["timer.relativeStartTimer"])
                .with_bool_tokens(BoolTokens::pair("SET", "UNSET")),
        );
        assert_eq!(read(&d), Some(PropertyValue::Bool(false)));
    }

    #[test]
    fn read_all_skips_absent() {
        let status = status();
        let reader = ValueReader::new(&status, &EngineConfig::default());
        let present = descriptor("string", json!({"sources": ["runState.currentState"]}));
        let absent = Descriptor::new("Y", "Y", PropertyType::String);
        let values = reader.read_all([&present, &absent]);
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("X"), Some(&PropertyValue::from("RUNNING")));
    }

    #[test]
    fn find_element_ignores_non_index_children() {
        let status = flatten(&json!({"zones": {"meta": "x"}}));
        assert_eq!(find_element(&status, "zones", &Map::new()), None);
    }
}
