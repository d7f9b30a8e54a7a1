// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Catalog of descriptor-file selection rules.
//!
//! The catalog maps a device type (and, as a fallback, profile content) to
//! the descriptor files that curate its properties. It is an explicit,
//! immutable value: the host loads it once and shares it (typically in an
//! `Arc`) across device instances.
//!
//! # Resolution
//!
//! 1. **Strict pass**: rules are tested against device-type candidates only;
//!    the first matching rule decides.
//! 2. **Fallback pass**: rules are tested against the candidates and the
//!    serialized profile; every matching rule contributes its files.
//! 3. **Default**: the catalog's `fallback` list, which may be empty.
//!
//! # Examples
//!
//! ```
//! use capmap_lib::EngineConfig;
//! use capmap_lib::catalog::{Catalog, MatchPass};
//! use serde_json::json;
//!
//! let catalog = Catalog::from_json_str(r#"{
//!     "rules": [
//!         {"match": {"any": ["washer"]}, "files": ["washer.json"]},
//!         {"match": {"all": ["wash"]}, "files": ["generic_wash.json"]}
//!     ],
//!     "fallback": ["common.json"]
//! }"#).unwrap();
//!
//! let resolution = catalog.resolve("DEVICE_WASHER", &json!({}), &EngineConfig::default());
//! assert_eq!(resolution.pass, MatchPass::Strict);
//! assert_eq!(resolution.files, vec!["washer.json"]);
//! ```

mod resolver;
mod rule;

use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::config::EngineConfig;
use crate::error::{LoadError, Result};

pub use resolver::{MatchPass, Resolution, device_type_candidates};
pub use rule::{Condition, Rule};

use rule::CompiledRule;

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    rules: Vec<Rule>,
    #[serde(default)]
    fallback: Vec<String>,
}

/// A compiled catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    rules: Vec<CompiledRule>,
    fallback: Vec<String>,
}

impl Catalog {
    /// Creates an empty catalog: no rules, no fallback files.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compiles rules and a fallback list.
    #[must_use]
    pub fn new(rules: &[Rule], fallback: Vec<String>) -> Self {
        Self {
            rules: rules
                .iter()
                .enumerate()
                .map(|(index, rule)| CompiledRule::compile(index, rule))
                .collect(),
            fallback,
        }
    }

    /// Parses a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or not a catalog object.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json).map_err(LoadError::from)?;
        if !value.is_object() {
            return Err(LoadError::InvalidDocument {
                file: "catalog".to_string(),
                message: "catalog must be an object".to_string(),
            }
            .into());
        }
        let document: CatalogDocument = serde_json::from_value(value).map_err(LoadError::from)?;
        tracing::debug!(
            rules = document.rules.len(),
            fallback = document.fallback.len(),
            "Loaded catalog"
        );
        Ok(Self::new(&document.rules, document.fallback))
    }

    /// Reads and parses a catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Like [`from_path`](Self::from_path), degrading to an empty catalog.
    #[must_use]
    pub fn from_path_or_default(path: impl AsRef<Path>) -> Self {
        Self::from_path(path.as_ref()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Catalog unavailable, using an empty rule set");
            Self::empty()
        })
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the catalog has no rules.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// The default file list.
    #[must_use]
    pub fn fallback(&self) -> &[String] {
        &self.fallback
    }

    /// Selects the descriptor files for a device.
    #[must_use]
    pub fn resolve(&self, device_type: &str, profile: &Value, config: &EngineConfig) -> Resolution {
        resolver::resolve(&self.rules, &self.fallback, device_type, profile, config)
    }
}
