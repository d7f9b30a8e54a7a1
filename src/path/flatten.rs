// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tree to flat-map projection.

use std::collections::BTreeMap;

use serde_json::Value;

use super::is_index_segment;

/// Flattened view of a tree: dot path to scalar leaf.
///
/// Ordered so that planning passes iterate deterministically.
pub type FlatMap = BTreeMap<String, Value>;

/// Flattens a tree into a [`FlatMap`].
///
/// Objects and arrays are descended recursively; every scalar leaf (including
/// `null`) produces exactly one entry. Empty containers and a scalar root
/// produce no entries.
#[must_use]
pub fn flatten(tree: &Value) -> FlatMap {
    let mut out = FlatMap::new();
    if matches!(tree, Value::Object(_) | Value::Array(_)) {
        walk(tree, String::new(), &mut out);
    }
    out
}

fn walk(node: &Value, prefix: String, out: &mut FlatMap) {
    match node {
        Value::Object(map) => {
            for (key, child) in map {
                walk(child, child_path(&prefix, key), out);
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                walk(child, child_path(&prefix, &index.to_string()), out);
            }
        }
        scalar => {
            out.insert(prefix, scalar.clone());
        }
    }
}

fn child_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Removes numeric (array index) segments from a path.
///
/// ```
/// use capmap_lib::path::strip_numeric_segments;
///
/// assert_eq!(strip_numeric_segments("temperature.1.targetTemperature"), "temperature.targetTemperature");
/// ```
#[must_use]
pub fn strip_numeric_segments(path: &str) -> String {
    path.split('.')
        .filter(|segment| !is_index_segment(segment))
        .collect::<Vec<_>>()
        .join(".")
}

/// Query helpers over a [`FlatMap`].
pub trait FlatMapExt {
    /// Returns the leaf at `path`, treating `null` as absent.
    fn populated(&self, path: &str) -> Option<&Value>;

    /// Returns `true` if `path` is a leaf or a prefix of some leaf path.
    fn has_node(&self, path: &str) -> bool;

    /// Iterates over leaves nested below `path` (exclusive).
    fn descendants<'a>(&'a self, path: &'a str) -> Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a>;
}

impl FlatMapExt for FlatMap {
    fn populated(&self, path: &str) -> Option<&Value> {
        self.get(path).filter(|value| !value.is_null())
    }

    fn has_node(&self, path: &str) -> bool {
        if path.is_empty() {
            return false;
        }
        if self.contains_key(path) {
            return true;
        }
        let prefix = format!("{path}.");
        self.range(prefix.clone()..)
            .next()
            .is_some_and(|(key, _)| key.starts_with(&prefix))
    }

    fn descendants<'a>(&'a self, path: &'a str) -> Box<dyn Iterator<Item = (&'a str, &'a Value)> + 'a> {
        let prefix = format!("{path}.");
        Box::new(
            self.range(prefix.clone()..)
                .take_while(move |(key, _)| key.starts_with(&prefix))
                .map(|(key, value)| (key.as_str(), value)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn flattens_nested_objects_and_arrays() {
        let flat = flatten(&json!({
            "runState": {"currentState": "RUNNING"},
            "temperature": [
                {"locationName": "FRIDGE", "targetTemperature": 3},
                {"locationName": "FREEZER", "targetTemperature": -18}
            ]
        }));

        assert_eq!(flat.len(), 5);
        assert_eq!(flat["runState.currentState"], json!("RUNNING"));
        assert_eq!(flat["temperature.1.locationName"], json!("FREEZER"));
        assert_eq!(flat["temperature.1.targetTemperature"], json!(-18));
    }

    #[test]
    fn empty_and_scalar_roots_flatten_to_nothing() {
        assert!(flatten(&json!({})).is_empty());
        assert!(flatten(&json!([])).is_empty());
        assert!(flatten(&Value::Null).is_empty());
        assert!(flatten(&json!("text")).is_empty());
    }

    #[test]
    fn null_leaves_are_kept_but_not_populated() {
        let flat = flatten(&json!({"a": null, "b": 1}));
        assert!(flat.contains_key("a"));
        assert!(flat.populated("a").is_none());
        assert_eq!(flat.populated("b"), Some(&json!(1)));
    }

    #[test]
    fn has_node_matches_leaf_and_prefix_only_on_segment_boundary() {
        let flat = flatten(&json!({"timer": {"relativeHourToStart": {"type": "range"}}}));
        assert!(flat.has_node("timer"));
        assert!(flat.has_node("timer.relativeHourToStart"));
        assert!(flat.has_node("timer.relativeHourToStart.type"));
        assert!(!flat.has_node("time"));
        assert!(!flat.has_node(""));
    }

    #[test]
    fn descendants_lists_nested_leaves() {
        let flat = flatten(&json!({"a": {"b": 1, "c": {"d": 2}}, "ab": 3}));
        let keys: Vec<&str> = flat.descendants("a").map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a.b", "a.c.d"]);
    }

    #[test]
    fn strips_index_segments() {
        assert_eq!(strip_numeric_segments("a.0.b.12.c"), "a.b.c");
        assert_eq!(strip_numeric_segments("plain"), "plain");
    }
}
