// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Status snapshot tracking.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::path::{FlatMap, deep_merge, flatten};

/// Last known full status of one device instance.
///
/// All fields start empty because status may not be known until the device
/// reports it. Non-object documents are ignored on apply.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    tree: Value,
    updated_at: Option<DateTime<Utc>>,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            tree: Value::Object(Map::new()),
            updated_at: None,
        }
    }
}

impl StatusSnapshot {
    /// Creates a snapshot from a full status document.
    ///
    /// A non-object document yields an empty snapshot.
    #[must_use]
    pub fn new(full: Value) -> Self {
        if full.is_object() {
            Self {
                tree: full,
                updated_at: Some(Utc::now()),
            }
        } else {
            tracing::debug!("Ignoring non-object status document");
            Self::default()
        }
    }

    /// Replaces the retained tree with a new full document.
    ///
    /// Returns `true` if the content changed.
    pub fn replace(&mut self, full: Value) -> bool {
        if !full.is_object() {
            tracing::debug!("Ignoring non-object status document");
            return false;
        }
        let changed = self.tree != full;
        self.tree = full;
        self.updated_at = Some(Utc::now());
        changed
    }

    /// Deep-merges a partial status delta onto the retained tree.
    ///
    /// Objects merge recursively; arrays and scalars replace. Returns `true`
    /// if the snapshot changed.
    pub fn apply(&mut self, delta: &Value) -> bool {
        if !delta.is_object() {
            tracing::debug!("Ignoring non-object status delta");
            return false;
        }
        let changed = deep_merge(&mut self.tree, delta);
        if changed {
            self.updated_at = Some(Utc::now());
        }
        tracing::trace!(changed, "Applied status delta");
        changed
    }

    /// Returns the retained tree.
    #[must_use]
    pub fn tree(&self) -> &Value {
        &self.tree
    }

    /// Returns the flattened retained tree.
    #[must_use]
    pub fn flatten(&self) -> FlatMap {
        flatten(&self.tree)
    }

    /// Returns when the snapshot last changed.
    #[must_use]
    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Returns `true` if nothing has been retained yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tree.as_object().is_none_or(Map::is_empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_snapshot_ignores_non_objects() {
        assert!(StatusSnapshot::new(json!(null)).is_empty());
        assert!(StatusSnapshot::new(json!([1, 2])).is_empty());
        assert!(!StatusSnapshot::new(json!({"a": 1})).is_empty());
    }

    #[test]
    fn apply_merges_partial_delta() {
        let mut snapshot = StatusSnapshot::new(json!({
            "runState": {"currentState": "RUNNING"},
            "timer": {"remainHour": 1, "remainMinute": 30}
        }));

        assert!(snapshot.apply(&json!({"timer": {"remainMinute": 29}})));

        let flat = snapshot.flatten();
        assert_eq!(flat["runState.currentState"], json!("RUNNING"));
        assert_eq!(flat["timer.remainHour"], json!(1));
        assert_eq!(flat["timer.remainMinute"], json!(29));
        assert!(snapshot.updated_at().is_some());
    }

    #[test]
    fn apply_replaces_arrays_wholesale() {
        let mut snapshot = StatusSnapshot::new(json!({"zones": [{"name": "A"}, {"name": "B"}]}));
        snapshot.apply(&json!({"zones": [{"name": "B", "power": true}]}));
        assert_eq!(snapshot.tree(), &json!({"zones": [{"name": "B", "power": true}]}));
    }

    #[test]
    fn apply_ignores_non_object_delta() {
        let mut snapshot = StatusSnapshot::new(json!({"a": 1}));
        assert!(!snapshot.apply(&json!("garbage")));
        assert_eq!(snapshot.tree(), &json!({"a": 1}));
    }

    #[test]
    fn replace_reports_change() {
        let mut snapshot = StatusSnapshot::default();
        assert!(snapshot.replace(json!({"a": 1})));
        assert!(!snapshot.replace(json!({"a": 1})));
        assert!(!snapshot.replace(json!(3)));
    }
}
