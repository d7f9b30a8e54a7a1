// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Completion of hour/minute timer pairs in built payloads.

use serde_json::{Map, Value};

use crate::descriptor::{Descriptor, DescriptorSet};
use crate::host::BoundValues;
use crate::schema::TimerField;
use crate::types::{PropertyType, PropertyValue};

/// Adds the missing half of every timer pair in `payload`.
///
/// The sibling value is the bound value of the descriptor that writes (or
/// reads) the sibling path, or `0` when nothing is bound.
pub(crate) fn complete_timer_pairs(
    payload: &mut Value,
    descriptors: &DescriptorSet,
    bound: &dyn BoundValues,
) {
    walk(payload, "", descriptors, bound);
}

fn walk(node: &mut Value, prefix: &str, descriptors: &DescriptorSet, bound: &dyn BoundValues) {
    let Value::Object(map) = node else {
        return;
    };
    let missing: Vec<String> = map
        .keys()
        .filter_map(|key| TimerField::parse(key))
        .map(|field| field.sibling())
        .filter(|sibling| !map.contains_key(sibling))
        .collect();
    for sibling in missing {
        let path = crate::path::join(prefix, &sibling);
        let value = sibling_value(&path, descriptors, bound);
        tracing::debug!(path = %path, value, "Completing timer pair");
        map.insert(sibling, Value::from(value));
    }
    recurse(map, prefix, descriptors, bound);
}

fn recurse(map: &mut Map<String, Value>, prefix: &str, descriptors: &DescriptorSet, bound: &dyn BoundValues) {
    for (key, child) in map.iter_mut() {
        walk(child, &crate::path::join(prefix, key), descriptors, bound);
    }
}

fn sibling_value(path: &str, descriptors: &DescriptorSet, bound: &dyn BoundValues) -> i64 {
    descriptors
        .iter()
        .filter(|descriptor| binds_path(descriptor, path))
        .find_map(|descriptor| bound.bound_value(&descriptor.ident))
        .and_then(|value| match value.convert(PropertyType::Integer).ok()? {
            PropertyValue::Integer(i) => Some(i),
            _ => None,
        })
        .unwrap_or(0)
}

fn binds_path(descriptor: &Descriptor, path: &str) -> bool {
    descriptor
        .write
        .as_ref()
        .is_some_and(|write| write.target_paths().iter().any(|p| p == path))
        || descriptor.read.sources.iter().any(|s| s == path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{AttributeWrite, ReadSpec, WriteSpec, WriteStrategy};
    use serde_json::json;
    use std::collections::HashMap;

    fn set() -> DescriptorSet {
        let hour = Descriptor::new("HOUR", "Hour", PropertyType::Integer).with_write(
            WriteSpec::new(WriteStrategy::Attribute(AttributeWrite::new(
                "timer",
                "relativeHourToStop",
            ))),
        );
        let minute = Descriptor::new("MIN", "Minute", PropertyType::Integer)
            .with_read(ReadSpec::sources(["timer.relativeMinuteToStop"]));
        DescriptorSet::merge(vec![hour, minute], Vec::new(), Vec::new())
    }

    #[test]
    fn adds_bound_sibling() {
        let mut bound = HashMap::new();
        bound.insert("MIN".to_string(), PropertyValue::Integer(45));
        let mut payload = json!({"timer": {"relativeHourToStop": 3}});
        complete_timer_pairs(&mut payload, &set(), &bound);
        assert_eq!(
            payload,
            json!({"timer": {"relativeHourToStop": 3, "relativeMinuteToStop": 45}})
        );
    }

    #[test]
    fn defaults_to_zero_and_keeps_complete_pairs() {
        let bound: HashMap<String, PropertyValue> = HashMap::new();
        let mut payload = json!({"timer": {"relativeMinuteToStop": 10}});
        complete_timer_pairs(&mut payload, &set(), &bound);
        assert_eq!(payload["timer"]["relativeHourToStop"], json!(0));

        let mut complete = json!({"timer": {"relativeHourToStop": 1, "relativeMinuteToStop": 2}});
        complete_timer_pairs(&mut complete, &set(), &bound);
        assert_eq!(complete, json!({"timer": {"relativeHourToStop": 1, "relativeMinuteToStop": 2}}));
    }
}
