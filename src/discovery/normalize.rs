// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Profile unwrapping and resource enumeration.

use serde_json::{Map, Value};

/// Envelope keys descended into before the resource map.
const ENVELOPE_KEYS: &[&str] = &["property", "profile"];

/// Keys carrying a location tag rather than a property.
const LOCATION_KEYS: &[&str] = &["locationName", "location"];

/// Unwraps the known profile envelopes into one resource map.
///
/// Accepts a resource map, a `property`/`profile` envelope around it, and
/// any of those wrapped in an array (the first object element is used).
/// Anything else yields an empty map.
#[must_use]
pub fn resource_map(profile: &Value) -> Map<String, Value> {
    let mut node = profile;
    loop {
        node = match node {
            Value::Array(items) => match items.iter().find(|item| item.is_object()) {
                Some(first) => first,
                None => return Map::new(),
            },
            Value::Object(map) => {
                let envelope = ENVELOPE_KEYS
                    .iter()
                    .find_map(|key| map.get(*key).filter(|v| v.is_object() || v.is_array()));
                match envelope {
                    Some(inner) if !is_property_leaf(inner) => inner,
                    _ => return map.clone(),
                }
            }
            _ => return Map::new(),
        };
    }
}

/// One resource body, optionally tagged with a location.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSet<'a> {
    /// Resource name.
    pub resource: &'a str,
    /// Location tag, if the resource is location-tagged.
    pub location: Option<&'a str>,
    /// Array index, when the resource is an array of located objects.
    pub index: Option<usize>,
    /// Property leaves and groups.
    pub body: &'a Map<String, Value>,
}

impl ResourceSet<'_> {
    /// Profile path of the resource body.
    #[must_use]
    pub fn base_path(&self) -> String {
        match self.index {
            Some(index) => format!("{}.{index}", self.resource),
            None => self.resource.to_string(),
        }
    }
}

/// Enumerates resource sets: one per location for location arrays, one for
/// a single located object, one for a plain resource.
#[must_use]
pub fn resource_sets(map: &Map<String, Value>) -> Vec<ResourceSet<'_>> {
    let mut sets = Vec::new();
    for (resource, value) in map {
        match value {
            Value::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    if let Value::Object(body) = item {
                        sets.push(ResourceSet {
                            resource,
                            location: location_of(body),
                            index: Some(index),
                            body,
                        });
                    }
                }
            }
            Value::Object(body) if !is_property_leaf(value) => sets.push(ResourceSet {
                resource,
                location: location_of(body),
                index: None,
                body,
            }),
            _ => {}
        }
    }
    sets
}

/// Walks the property leaves of a resource body.
///
/// Untyped nested objects are groups and are descended into; the returned
/// property name is the dotted path below the resource.
#[must_use]
pub fn property_leaves(body: &Map<String, Value>) -> Vec<(String, &Map<String, Value>)> {
    let mut out = Vec::new();
    collect_leaves(body, "", &mut out);
    out
}

fn collect_leaves<'a>(
    body: &'a Map<String, Value>,
    prefix: &str,
    out: &mut Vec<(String, &'a Map<String, Value>)>,
) {
    for (key, value) in body {
        if LOCATION_KEYS.contains(&key.as_str()) {
            continue;
        }
        let Value::Object(object) = value else {
            continue;
        };
        let name = crate::path::join(prefix, key);
        if is_property_leaf(value) {
            out.push((name, object));
        } else {
            collect_leaves(object, &name, out);
        }
    }
}

/// A schema leaf declares its `type` as text.
#[must_use]
pub fn is_property_leaf(value: &Value) -> bool {
    value.get("type").is_some_and(Value::is_string)
}

fn location_of(body: &Map<String, Value>) -> Option<&str> {
    body.get("locationName")
        .and_then(Value::as_str)
        .or_else(|| {
            body.get("location")
                .and_then(|l| l.get("locationName"))
                .and_then(Value::as_str)
        })
}
