// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Property display-name table.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{humanize, normalize_key};
use crate::error::{LoadError, Result};

/// Property names too generic to stand on their own; the resource name is
/// prepended to disambiguate them.
const GENERIC_PROPERTY_NAMES: &[&str] = &[
    "state", "status", "mode", "value", "type", "level", "current", "enabled", "set",
];

/// Display names keyed by normalized property name.
///
/// Keys may also take the form `resource.property` to name one property of
/// one resource specifically; such entries take precedence.
///
/// # Examples
///
/// ```
/// use capmap_lib::translate::NameTable;
///
/// let table = NameTable::from_pairs([
///     ("targetTemperature", "Target temperature"),
///     ("runState.currentState", "Program state"),
/// ]);
///
/// assert_eq!(table.display_name("temperature", "targetTemperature"), "Target temperature");
/// assert_eq!(table.display_name("runState", "currentState"), "Program state");
/// assert_eq!(table.display_name("operation", "state"), "Operation State");
/// assert_eq!(table.display_name("misc", "filterRemainPercent"), "Filter Remain Percent");
/// ```
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    entries: HashMap<String, String>,
}

#[derive(Deserialize)]
#[serde(transparent)]
struct NameTableFile(HashMap<String, String>);

impl NameTable {
    /// Creates an empty table; every lookup humanizes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from `(key, name)` pairs.
    #[must_use]
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(key, name)| (table_key(key.as_ref()), name.into()))
                .collect(),
        }
    }

    /// Parses a table from a JSON object of `key: name` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] if the document is not such an object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: NameTableFile = serde_json::from_str(json).map_err(LoadError::from)?;
        Ok(Self::from_pairs(file.0))
    }

    /// Loads a table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] if the file cannot be read, or
    /// [`LoadError::Json`] if it cannot be decoded.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the table has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a raw table entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(&table_key(key)).map(String::as_str)
    }

    /// Resolves the display name of `resource.property`.
    ///
    /// Order: the `resource.property` entry, then the property entry (for
    /// non-generic names), then resource + property for generic names, then
    /// the humanized property name.
    #[must_use]
    pub fn display_name(&self, resource: &str, property: &str) -> String {
        if let Some(name) = self.get(&format!("{resource}.{property}")) {
            return name.to_string();
        }
        let property_name = self
            .get(property)
            .map_or_else(|| humanize(property), str::to_string);
        if is_generic(property) {
            let resource_name = self
                .get(resource)
                .map_or_else(|| humanize(resource), str::to_string);
            return format!("{resource_name} {property_name}");
        }
        property_name
    }
}

fn is_generic(property: &str) -> bool {
    let key = normalize_key(property);
    GENERIC_PROPERTY_NAMES.contains(&key.as_str())
}

fn table_key(key: &str) -> String {
    key.split('.').map(normalize_key).collect::<Vec<_>>().join(".")
}
