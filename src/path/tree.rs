// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Navigation, construction and merging of nested trees by dot path.

use serde_json::{Map, Value};

use super::{FlatMap, is_index_segment};

/// Returns the node at `path`, descending objects by key and arrays by index.
///
/// An empty path returns the tree itself.
#[must_use]
pub fn get_path<'a>(tree: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(tree);
    }
    path.split('.').try_fold(tree, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Sets `value` at `path`, creating intermediate objects as needed.
///
/// Existing arrays are indexed by numeric segments (and padded with `null`
/// when the index is past the end); any other non-object node on the way is
/// replaced by an object.
pub fn set_path(tree: &mut Value, path: &str, value: Value) {
    let mut node = tree;
    for segment in path.split('.').filter(|s| !s.is_empty()) {
        let index = match &*node {
            Value::Array(items) if is_index_segment(segment) => {
                Some(segment.parse::<usize>().unwrap_or(items.len()))
            }
            _ => None,
        };
        node = match (index, node) {
            (Some(index), Value::Array(items)) => {
                if index >= items.len() {
                    items.resize(index + 1, Value::Null);
                }
                &mut items[index]
            }
            (_, current) => {
                if !current.is_object() {
                    *current = Value::Object(Map::new());
                }
                match current.as_object_mut() {
                    Some(map) => map.entry(segment).or_insert(Value::Null),
                    None => return,
                }
            }
        };
    }
    *node = value;
}

/// Rebuilds a tree from a flat map.
///
/// Levels whose keys are exactly `0..n` become arrays again; any other level
/// stays an object.
#[must_use]
pub fn unflatten(flat: &FlatMap) -> Value {
    let mut tree = Value::Object(Map::new());
    for (path, value) in flat {
        set_path(&mut tree, path, value.clone());
    }
    restore_arrays(tree)
}

fn restore_arrays(node: Value) -> Value {
    match node {
        Value::Object(map) => {
            let restored: Map<String, Value> = map
                .into_iter()
                .map(|(key, child)| (key, restore_arrays(child)))
                .collect();
            let dense = !restored.is_empty()
                && restored.keys().all(|key| is_index_segment(key))
                && (0..restored.len()).all(|i| restored.contains_key(&i.to_string()));
            if dense {
                densify(Value::Object(restored))
            } else {
                Value::Object(restored)
            }
        }
        Value::Array(items) => Value::Array(items.into_iter().map(restore_arrays).collect()),
        scalar => scalar,
    }
}

/// Converts an object whose keys are all numeric into a dense array ordered by
/// index, dropping the gaps. Any other value is returned unchanged.
///
/// ```
/// use capmap_lib::path::densify;
/// use serde_json::json;
///
/// assert_eq!(densify(json!({"3": "b", "1": "a"})), json!(["a", "b"]));
/// assert_eq!(densify(json!({"x": 1})), json!({"x": 1}));
/// ```
#[must_use]
pub fn densify(value: Value) -> Value {
    match value {
        Value::Object(map) if !map.is_empty() && map.keys().all(|k| is_index_segment(k)) => {
            let mut items: Vec<(usize, Value)> = map
                .into_iter()
                .filter_map(|(key, child)| key.parse::<usize>().ok().map(|i| (i, child)))
                .collect();
            items.sort_by_key(|(index, _)| *index);
            Value::Array(items.into_iter().map(|(_, child)| child).collect())
        }
        other => other,
    }
}

/// Deep-merges `delta` into `base`.
///
/// Object fields are merged recursively; every other value (arrays included)
/// replaces the previous one wholesale. Returns `true` if `base` changed.
pub fn deep_merge(base: &mut Value, delta: &Value) -> bool {
    match (base, delta) {
        (Value::Object(target), Value::Object(source)) => {
            let mut changed = false;
            for (key, value) in source {
                match target.get_mut(key) {
                    Some(existing) => changed |= deep_merge(existing, value),
                    None => {
                        target.insert(key.clone(), value.clone());
                        changed = true;
                    }
                }
            }
            changed
        }
        (target, source) => {
            if target == source {
                false
            } else {
                *target = source.clone();
                true
            }
        }
    }
}
