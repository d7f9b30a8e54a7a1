// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Numeric range definitions declared by range/number schema leaves.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::{FlatMap, FlatMapExt};

/// `min`/`max`/`step`/`except` of a range schema leaf.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SchemaRange {
    /// Lower bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Increment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    /// Values inside the bounds that the device rejects.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub except: Vec<f64>,
}

impl SchemaRange {
    /// Reads a range from a JSON object such as `{"min": 0, "max": 23}`.
    ///
    /// Returns `None` unless at least one bound is present.
    #[must_use]
    pub fn from_json(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let number = |key: &str| object.get(key).and_then(as_number);
        let range = Self {
            min: number("min"),
            max: number("max"),
            step: number("step"),
            except: object
                .get("except")
                .and_then(Value::as_array)
                .map(|items| items.iter().filter_map(as_number).collect())
                .unwrap_or_default(),
        };
        range.has_bounds().then_some(range)
    }

    /// Reads a range stored below `base` in a flattened tree.
    #[must_use]
    pub fn from_flat(flat: &FlatMap, base: &str) -> Option<Self> {
        let number = |key: &str| flat.get(&format!("{base}.{key}")).and_then(as_number);
        let range = Self {
            min: number("min"),
            max: number("max"),
            step: number("step"),
            except: flat
                .descendants(&format!("{base}.except"))
                .filter_map(|(_, value)| as_number(value))
                .collect(),
        };
        range.has_bounds().then_some(range)
    }

    /// Returns `true` if either bound is declared.
    #[must_use]
    pub fn has_bounds(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }

    /// Returns `true` if every declared bound and step is a whole number.
    #[must_use]
    pub fn is_integral(&self) -> bool {
        [self.min, self.max, self.step]
            .iter()
            .flatten()
            .all(|v| v.fract() == 0.0)
    }

    /// Clamps `value` into the bounds and steps off excluded values.
    ///
    /// An excluded value moves one step up, or one step down when that would
    /// leave the range.
    #[must_use]
    pub fn clamp(&self, value: f64) -> f64 {
        let mut clamped = value;
        if let Some(min) = self.min {
            clamped = clamped.max(min);
        }
        if let Some(max) = self.max {
            clamped = clamped.min(max);
        }
        if self.except.iter().any(|e| (e - clamped).abs() < f64::EPSILON) {
            let step = self.step.filter(|s| *s > 0.0).unwrap_or(1.0);
            let up = clamped + step;
            clamped = if self.max.is_none_or(|max| up <= max) {
                up
            } else {
                clamped - step
            };
        }
        clamped
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::flatten;
    use serde_json::json;

    #[test]
    fn from_json_requires_a_bound() {
        assert!(SchemaRange::from_json(&json!({"step": 1})).is_none());
        let range = SchemaRange::from_json(&json!({"min": "16", "max": 30, "except": [20]})).unwrap();
        assert_eq!(range.min, Some(16.0));
        assert_eq!(range.except, vec![20.0]);
    }

    #[test]
    fn from_flat_reads_nested_section() {
        let flat = flatten(&json!({"a": {"value": {"w": {"min": 0, "max": 23, "step": 1, "except": [5, 6]}}}}));
        let range = SchemaRange::from_flat(&flat, "a.value.w").unwrap();
        assert_eq!(range.max, Some(23.0));
        assert_eq!(range.except, vec![5.0, 6.0]);
        assert!(range.is_integral());
    }

    #[test]
    fn clamp_bounds_and_exceptions() {
        let range = SchemaRange {
            min: Some(16.0),
            max: Some(30.0),
            step: Some(1.0),
            except: vec![20.0, 30.0],
        };
        assert_eq!(range.clamp(10.0), 16.0);
        assert_eq!(range.clamp(99.0), 29.0);
        assert_eq!(range.clamp(20.0), 21.0);
        assert_eq!(range.clamp(25.0), 25.0);
    }

    #[test]
    fn fractional_steps_are_not_integral() {
        let range = SchemaRange::from_json(&json!({"min": 16, "max": 30, "step": 0.5})).unwrap();
        assert!(!range.is_integral());
    }
}
