// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered, identifier-unique descriptor collection.

use std::collections::HashMap;

use super::{Descriptor, DescriptorOrigin};

/// Descriptors of one device instance, in plan order.
///
/// An identifier is held at most once; the first insertion wins.
#[derive(Debug, Clone, Default)]
pub struct DescriptorSet {
    descriptors: Vec<Descriptor>,
    index: HashMap<String, usize>,
}

impl DescriptorSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges the three descriptor sources.
    ///
    /// Manual descriptors come first, auto-discovered ones fill identifiers
    /// not yet defined, synthetic trackers are appended last.
    ///
    /// ```
    /// use capmap_lib::descriptor::{Descriptor, DescriptorSet};
    /// use capmap_lib::types::PropertyType;
    ///
    /// let manual = vec![Descriptor::new("POWER", "Power", PropertyType::Boolean)];
    /// let auto = vec![
    ///     Descriptor::new("POWER", "Auto power", PropertyType::String),
    ///     Descriptor::new("MODE", "Mode", PropertyType::String),
    /// ];
    /// let set = DescriptorSet::merge(manual, auto, Vec::new());
    ///
    /// assert_eq!(set.len(), 2);
    /// assert_eq!(set.get("POWER").unwrap().name, "Power");
    /// ```
    #[must_use]
    pub fn merge(
        manual: Vec<Descriptor>,
        auto: Vec<Descriptor>,
        synthetic: Vec<Descriptor>,
    ) -> Self {
        let mut set = Self::new();
        let sources = [
            (DescriptorOrigin::Manual, manual),
            (DescriptorOrigin::Auto, auto),
            (DescriptorOrigin::Synthetic, synthetic),
        ];
        for (origin, descriptors) in sources {
            for descriptor in descriptors {
                let ident = descriptor.ident.clone();
                if !set.insert(descriptor.with_origin(origin)) {
                    tracing::trace!(ident = %ident, ?origin, "Identifier already defined, skipping");
                }
            }
        }
        set
    }

    /// Appends a descriptor unless its identifier exists.
    ///
    /// Returns `true` if it was added.
    pub fn insert(&mut self, descriptor: Descriptor) -> bool {
        if self.index.contains_key(&descriptor.ident) {
            return false;
        }
        self.index
            .insert(descriptor.ident.clone(), self.descriptors.len());
        self.descriptors.push(descriptor);
        true
    }

    /// Returns the descriptor for `ident`.
    #[must_use]
    pub fn get(&self, ident: &str) -> Option<&Descriptor> {
        self.index.get(ident).map(|&i| &self.descriptors[i])
    }

    /// Returns `true` if `ident` is defined.
    #[must_use]
    pub fn contains(&self, ident: &str) -> bool {
        self.index.contains_key(ident)
    }

    /// Iterates in plan order.
    pub fn iter(&self) -> std::slice::Iter<'_, Descriptor> {
        self.descriptors.iter()
    }

    /// Number of descriptors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// Returns `true` if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

impl<'a> IntoIterator for &'a DescriptorSet {
    type Item = &'a Descriptor;
    type IntoIter = std::slice::Iter<'a, Descriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
