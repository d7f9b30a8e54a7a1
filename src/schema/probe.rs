// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wrapper-tolerant key probing.

use serde_json::{Map, Value};

use super::SchemaRange;
use crate::path::{FlatMap, FlatMapExt, is_index_segment};
use crate::read::find_element;

/// Envelope prefixes tried, in order, in front of every probed key.
pub const WRAPPER_PREFIXES: &[&str] = &["", "property.", "value.", "profile."];

/// Highest array index tried after each wrapper prefix.
pub const MAX_WRAPPER_INDEX: usize = 4;

/// Read-only prober over a flattened profile.
#[derive(Debug, Clone, Copy)]
pub struct SchemaProbe<'a> {
    flat: &'a FlatMap,
    prefixes: Option<&'a [String]>,
}

impl<'a> SchemaProbe<'a> {
    /// Creates a prober using the default [`WRAPPER_PREFIXES`].
    #[must_use]
    pub fn new(flat: &'a FlatMap) -> Self {
        Self {
            flat,
            prefixes: None,
        }
    }

    /// Creates a prober with a custom ordered prefix list.
    #[must_use]
    pub fn with_prefixes(flat: &'a FlatMap, prefixes: &'a [String]) -> Self {
        Self {
            flat,
            prefixes: Some(prefixes),
        }
    }

    /// Returns the flattened profile being probed.
    #[must_use]
    pub fn flat(&self) -> &'a FlatMap {
        self.flat
    }

    /// All paths at which `key` may live, in probing order.
    ///
    /// Each wrapper prefix is tried bare and followed by an index `0..=4`.
    /// Keys of the form `resource.property` are additionally tried with an
    /// index after the resource, which covers location-replicated resources.
    #[must_use]
    pub fn candidate_paths(&self, key: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let mut push = |path: String| {
            if !out.contains(&path) {
                out.push(path);
            }
        };

        let located: Vec<String> = match key.split_once('.') {
            Some((head, tail)) if !is_index_segment(tail.split('.').next().unwrap_or("")) => {
                (0..=MAX_WRAPPER_INDEX)
                    .map(|i| format!("{head}.{i}.{tail}"))
                    .collect()
            }
            _ => Vec::new(),
        };

        for prefix in self.prefix_list() {
            push(format!("{prefix}{key}"));
            for i in 0..=MAX_WRAPPER_INDEX {
                push(format!("{prefix}{i}.{key}"));
            }
            for variant in &located {
                push(format!("{prefix}{variant}"));
            }
        }
        out
    }

    fn prefix_list(&self) -> Vec<&str> {
        match self.prefixes {
            Some(custom) => custom.iter().map(String::as_str).collect(),
            None => WRAPPER_PREFIXES.to_vec(),
        }
    }

    /// Returns `true` if `key` exists at any candidate path.
    #[must_use]
    pub fn has_key(&self, key: &str) -> bool {
        self.candidate_paths(key)
            .iter()
            .any(|path| self.flat.has_node(path))
    }

    /// Returns the first candidate path at which `key` exists.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<String> {
        self.candidate_paths(key)
            .into_iter()
            .find(|path| self.flat.has_node(path))
    }

    /// Returns `true` if the schema for `key` declares write access.
    ///
    /// Checks, per candidate path: a direct `mode` flag containing `w`, then
    /// any nested leaf under the key with a writable `mode`. Only when no
    /// candidate has a mode flag does a `value.w` definition count as write
    /// access.
    #[must_use]
    pub fn is_writable(&self, key: &str) -> bool {
        let candidates = self.candidate_paths(key);

        for path in &candidates {
            if self.direct_mode_writable(path) || self.nested_mode_writable(path) {
                tracing::trace!(key, path = %path, "Writable mode flag found");
                return true;
            }
        }

        let fallback = candidates
            .iter()
            .find(|path| self.flat.has_node(&format!("{path}.value.w")));
        if let Some(path) = fallback {
            tracing::trace!(key, path = %path, "Writable range definition found");
            return true;
        }
        false
    }

    fn direct_mode_writable(&self, path: &str) -> bool {
        let mode = format!("{path}.mode");
        self.flat.get(&mode).is_some_and(mode_is_writable)
            || self.flat.descendants(&mode).any(|(leaf, value)| {
                is_index_segment(&leaf[mode.len() + 1..]) && mode_is_writable(value)
            })
    }

    fn nested_mode_writable(&self, path: &str) -> bool {
        self.flat.descendants(path).any(|(leaf, value)| {
            let tail = &leaf[path.len() + 1..];
            let mut segments = tail.rsplit('.');
            let last = segments.next().unwrap_or("");
            let is_mode = last == "mode"
                || (is_index_segment(last) && segments.next() == Some("mode"));
            is_mode && mode_is_writable(value)
        })
    }

    /// Returns the declared range of `key`, preferring the write range.
    #[must_use]
    pub fn range(&self, key: &str) -> Option<SchemaRange> {
        self.candidate_paths(key)
            .iter()
            .find_map(|path| self.range_at(path))
    }

    /// Returns the declared range of `property` in the element of the
    /// `resource` array whose `locationName` is `location`.
    ///
    /// ```
    /// use capmap_lib::path::flatten;
    /// use capmap_lib::schema::SchemaProbe;
    /// use serde_json::json;
    ///
    /// let flat = flatten(&json!({"property": {"temperature": [
    ///     {"locationName": "FRIDGE", "targetTemperature": {"value": {"w": {"min": 1, "max": 7}}}},
    ///     {"locationName": "FREEZER", "targetTemperature": {"value": {"w": {"min": -24, "max": -14}}}}
    /// ]}}));
    /// let range = SchemaProbe::new(&flat)
    ///     .located_range("temperature", "targetTemperature", "FREEZER")
    ///     .unwrap();
    /// assert_eq!(range.min, Some(-24.0));
    /// ```
    #[must_use]
    pub fn located_range(&self, resource: &str, property: &str, location: &str) -> Option<SchemaRange> {
        let mut predicate = Map::new();
        predicate.insert("locationName".to_string(), Value::String(location.to_string()));
        self.candidate_paths(resource).iter().find_map(|container| {
            let index = find_element(self.flat, container, &predicate)?;
            tracing::trace!(container = %container, index, location, "Located profile element");
            self.range_at(&format!("{container}.{index}.{property}"))
        })
    }

    fn range_at(&self, path: &str) -> Option<SchemaRange> {
        ["value.w", "value.r", "value"]
            .iter()
            .find_map(|section| SchemaRange::from_flat(self.flat, &format!("{path}.{section}")))
    }

    /// Returns the declared `type` of `key`, if any.
    #[must_use]
    pub fn schema_type(&self, key: &str) -> Option<&'a str> {
        self.candidate_paths(key)
            .iter()
            .find_map(|path| self.flat.get(&format!("{path}.type")))
            .and_then(Value::as_str)
    }
}

/// Mode flags are short access strings such as `"w"`, `"rw"` or `"r/w"`.
fn mode_is_writable(value: &Value) -> bool {
    value.as_str().is_some_and(|mode| {
        let lower = mode.to_ascii_lowercase();
        lower.contains('w') && lower.chars().all(|c| matches!(c, 'r' | 'w' | '/' | ',' | ' '))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::flatten;
    use serde_json::json;

    fn leaf(mode: &[&str]) -> Value {
        json!({"type": "range", "mode": mode, "value": {"w": {"min": 0, "max": 23}}})
    }

    #[test]
    fn writable_in_every_known_envelope() {
        let shapes = [
            json!({"timer": {"relativeHourToStart": leaf(&["r", "w"])}}),
            json!({"property": {"timer": {"relativeHourToStart": leaf(&["w"])}}}),
            json!({"property": [{"timer": {"relativeHourToStart": leaf(&["w"])}}]}),
            json!({"value": {"timer": {"relativeHourToStart": leaf(&["rw"])}}}),
            json!({"profile": [{}, {"timer": {"relativeHourToStart": leaf(&["w"])}}]}),
            json!([{"timer": {"relativeHourToStart": leaf(&["w"])}}]),
        ];
        for shape in shapes {
            let flat = flatten(&shape);
            assert!(
                SchemaProbe::new(&flat).is_writable("timer.relativeHourToStart"),
                "shape {shape}"
            );
        }
    }

    #[test]
    fn read_only_mode_is_not_writable() {
        let flat = flatten(&json!({"runState": {"currentState": {"type": "enum", "mode": ["r"],
            "value": {"r": ["RUNNING"]}}}}));
        assert!(!SchemaProbe::new(&flat).is_writable("runState.currentState"));
    }

    #[test]
    fn nested_writable_mode_counts_for_resource_key() {
        let flat = flatten(&json!({"operation": {"washerOperationMode": {"type": "enum", "mode": ["w"]}}}));
        assert!(SchemaProbe::new(&flat).is_writable("operation"));
    }

    #[test]
    fn enum_tokens_under_a_property_named_mode_are_not_flags() {
        let flat = flatten(&json!({"operation": {"mode": {"type": "enum", "mode": ["r"],
            "value": {"r": ["WASH", "DRY"]}}}}));
        let probe = SchemaProbe::new(&flat);
        assert!(!probe.is_writable("operation"));
        assert!(!probe.is_writable("operation.mode"));
    }

    #[test]
    fn value_w_is_last_resort() {
        let flat = flatten(&json!({"temperature": {"targetTemperature": {"type": "range",
            "value": {"w": {"min": 16, "max": 30}}}}}));
        assert!(SchemaProbe::new(&flat).is_writable("temperature.targetTemperature"));
    }

    #[test]
    fn location_replicated_resource_is_found() {
        let flat = flatten(&json!({"temperature": [
            {"locationName": "FRIDGE", "targetTemperature": leaf(&["r"])},
            {"locationName": "FREEZER", "targetTemperature": {"type": "range", "mode": ["r", "w"]}}
        ]}));
        let probe = SchemaProbe::new(&flat);
        assert!(probe.has_key("temperature.targetTemperature"));
        assert!(probe.is_writable("temperature.targetTemperature"));
        assert_eq!(
            probe.resolve("temperature.targetTemperature").as_deref(),
            Some("temperature.0.targetTemperature")
        );
    }

    #[test]
    fn ranges_and_modes_follow_the_location() {
        let flat = flatten(&json!({"property": [{"temperature": [
            {"locationName": "FRIDGE", "targetTemperature": {"type": "range", "mode": ["r"],
             "value": {"r": {"min": 1, "max": 7}}}},
            {"locationName": "FREEZER", "targetTemperature": {"type": "range", "mode": ["r", "w"],
             "value": {"w": {"min": -24, "max": -14}}}}
        ]}]}));
        let probe = SchemaProbe::new(&flat);

        let freezer = probe
            .located_range("temperature", "targetTemperature", "freezer")
            .unwrap();
        assert_eq!((freezer.min, freezer.max), (Some(-24.0), Some(-14.0)));
        let fridge = probe
            .located_range("temperature", "targetTemperature", "FRIDGE")
            .unwrap();
        assert_eq!((fridge.min, fridge.max), (Some(1.0), Some(7.0)));
        assert!(probe.located_range("temperature", "targetTemperature", "PANTRY").is_none());

        assert!(!probe.is_writable("temperature.0.targetTemperature"));
        assert!(probe.is_writable("temperature.1.targetTemperature"));
    }

    #[test]
    fn custom_prefixes_replace_defaults() {
        let flat = flatten(&json!({"envelope": {"power": {"mode": ["w"]}}}));
        let prefixes = vec!["envelope.".to_string()];
        assert!(SchemaProbe::with_prefixes(&flat, &prefixes).is_writable("power"));
        assert!(!SchemaProbe::new(&flat).is_writable("power"));
    }

    #[test]
    fn range_and_type_lookup() {
        let flat = flatten(&json!({"property": {"temperature": {"targetTemperature": {
            "type": "range",
            "value": {"r": {"min": 10, "max": 40}, "w": {"min": 16, "max": 30, "step": 0.5}}
        }}}}));
        let probe = SchemaProbe::new(&flat);
        let range = probe.range("temperature.targetTemperature").unwrap();
        assert_eq!(range.min, Some(16.0));
        assert_eq!(range.step, Some(0.5));
        assert_eq!(probe.schema_type("temperature.targetTemperature"), Some("range"));
        assert!(probe.range("temperature.missing").is_none());
    }
}
