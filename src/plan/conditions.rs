// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Creation and action-enablement conditions.

use crate::descriptor::{CreateRule, Descriptor, EnableWhen};
use crate::path::{FlatMap, FlatMapExt, strip_numeric_segments};
use crate::schema::SchemaProbe;

/// Evaluates descriptor conditions against one flattened profile and status.
#[derive(Debug, Clone, Copy)]
pub struct Conditions<'a> {
    profile: &'a FlatMap,
    status: &'a FlatMap,
    probe: SchemaProbe<'a>,
}

impl<'a> Conditions<'a> {
    /// Creates an evaluator probing with the given wrapper prefixes.
    #[must_use]
    pub fn new(profile: &'a FlatMap, status: &'a FlatMap, prefixes: &'a [String]) -> Self {
        Self {
            profile,
            status,
            probe: SchemaProbe::with_prefixes(profile, prefixes),
        }
    }

    /// Evaluates a creation rule.
    #[must_use]
    pub fn should_create(&self, rule: &CreateRule) -> bool {
        match rule {
            CreateRule::Always => true,
            CreateRule::ProfileHasAll(keys) => {
                !keys.is_empty() && keys.iter().all(|key| self.profile_has(key))
            }
            CreateRule::ProfileHasAny(keys) => keys
                .iter()
                .any(|key| self.profile_has(key) || self.probe.is_writable(key)),
            CreateRule::StatusHasAny(keys) => keys.iter().any(|key| self.status_has(key)),
        }
    }

    /// Evaluates whether the descriptor's action is enabled.
    #[must_use]
    pub fn action_enabled(&self, descriptor: &Descriptor) -> bool {
        match descriptor.action.enable_when {
            EnableWhen::Never => false,
            EnableWhen::Always => true,
            EnableWhen::ProfileWritableAny => descriptor
                .writable_keys()
                .iter()
                .any(|key| self.probe.is_writable(key)),
        }
    }

    /// Direct presence (through the wrapper prefixes), then containment of
    /// the key in any path with or without its index segments.
    fn profile_has(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        if self.probe.has_key(key) {
            return true;
        }
        self.profile
            .keys()
            .any(|path| path.contains(key) || strip_numeric_segments(path).contains(key))
    }

    /// Direct presence, then comparison with index segments stripped.
    fn status_has(&self, key: &str) -> bool {
        if key.is_empty() {
            return false;
        }
        if self.status.has_node(key) {
            return true;
        }
        let nested = format!("{key}.");
        self.status.keys().any(|path| {
            let stripped = strip_numeric_segments(path);
            stripped == key || stripped.starts_with(&nested)
        })
    }
}
