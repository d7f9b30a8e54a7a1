// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named descriptor files.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use super::Descriptor;
use crate::error::{Error, LoadError, Result};

/// Descriptor lists keyed by file name.
///
/// Names are stored without a `.json` extension, so the catalog may refer
/// to `washer` or `washer.json` interchangeably.
#[derive(Debug, Clone, Default)]
pub struct DescriptorLibrary {
    files: BTreeMap<String, Vec<Descriptor>>,
}

impl DescriptorLibrary {
    /// Creates an empty library.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a descriptor list.
    pub fn insert(&mut self, name: &str, descriptors: Vec<Descriptor>) {
        self.files.insert(file_key(name), descriptors);
    }

    /// Parses a descriptor file and adds it under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a list of descriptors.
    pub fn add_json(&mut self, name: &str, json: &str) -> Result<()> {
        let value: serde_json::Value = serde_json::from_str(json).map_err(LoadError::from)?;
        if !value.is_array() {
            return Err(LoadError::InvalidDocument {
                file: name.to_string(),
                message: "descriptor file must be a list".to_string(),
            }
            .into());
        }
        let descriptors: Vec<Descriptor> =
            serde_json::from_value(value).map_err(LoadError::from)?;
        tracing::debug!(file = %name, count = descriptors.len(), "Loaded descriptor file");
        self.insert(name, descriptors);
        Ok(())
    }

    /// Builds a library from in-memory `(name, json)` pairs, skipping
    /// documents that fail to parse.
    #[must_use]
    pub fn from_json_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut library = Self::new();
        for (name, json) in pairs {
            if let Err(e) = library.add_json(name, json) {
                tracing::warn!(file = %name, error = %e, "Skipping descriptor file");
            }
        }
        library
    }

    /// Loads every `*.json` file of a directory.
    ///
    /// Individual files that cannot be read or parsed are skipped with a
    /// warning.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory itself cannot be listed.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let io_error = |source| LoadError::Io {
            path: dir.display().to_string(),
            source,
        };
        let mut paths: Vec<_> = std::fs::read_dir(dir)
            .map_err(io_error)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        let mut library = Self::new();
        for path in paths {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            let loaded = std::fs::read_to_string(&path)
                .map_err(|source| {
                    Error::from(LoadError::Io {
                        path: path.display().to_string(),
                        source,
                    })
                })
                .and_then(|text| library.add_json(name, &text));
            if let Err(e) = loaded {
                tracing::warn!(file = %path.display(), error = %e, "Skipping descriptor file");
            }
        }
        Ok(library)
    }

    /// Like [`load_dir`](Self::load_dir), degrading to an empty library.
    #[must_use]
    pub fn load_dir_or_default(dir: impl AsRef<Path>) -> Self {
        Self::load_dir(dir.as_ref()).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Descriptor directory unavailable, using none");
            Self::default()
        })
    }

    /// Returns the descriptors of one file.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[Descriptor]> {
        self.files.get(&file_key(name)).map(Vec::as_slice)
    }

    /// Number of files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no file is loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Concatenates the descriptors of `files` in order.
    ///
    /// Unknown files are skipped; when an identifier appears twice the first
    /// occurrence wins.
    #[must_use]
    pub fn select(&self, files: &[String]) -> Vec<Descriptor> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for file in files {
            let Some(descriptors) = self.get(file) else {
                tracing::debug!(file = %file, "Descriptor file not in library");
                continue;
            };
            for descriptor in descriptors {
                if seen.insert(descriptor.ident.clone()) {
                    out.push(descriptor.clone());
                }
            }
        }
        out
    }
}

fn file_key(name: &str) -> String {
    name.strip_suffix(".json").unwrap_or(name).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WASHER: &str = r#"[
        {"ident": "RUN_STATE", "name": "State", "read": {"sources": ["runState.currentState"]}},
        {"ident": "REMAIN", "name": "Remaining", "type": "integer"}
    ]"#;
    const COMMON: &str = r#"[
        {"ident": "RUN_STATE", "name": "Other state"},
        {"ident": "ERROR", "name": "Error"}
    ]"#;

    #[test]
    fn select_concatenates_and_dedupes() {
        let library = DescriptorLibrary::from_json_pairs([("washer.json", WASHER), ("common", COMMON)]);
        let idents: Vec<String> = library
            .select(&["washer".into(), "missing".into(), "common.json".into()])
            .into_iter()
            .map(|d| d.ident)
            .collect();
        assert_eq!(idents, vec!["RUN_STATE", "REMAIN", "ERROR"]);
    }

    #[test]
    fn invalid_documents_are_skipped() {
        let library = DescriptorLibrary::from_json_pairs([
            ("broken", "{"),
            ("object", r#"{"ident": "X"}"#),
            ("washer", WASHER),
        ]);
        assert_eq!(library.len(), 1);
        assert!(library.get("broken").is_none());
    }

    #[test]
    fn add_json_rejects_non_list() {
        let mut library = DescriptorLibrary::new();
        let err = library.add_json("object", r#"{"ident": "X"}"#).unwrap_err();
        assert!(err.to_string().contains("must be a list"));
    }

    #[test]
    fn load_dir_reads_json_files() {
        let dir = std::env::temp_dir().join(format!("capmap-library-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("washer.json"), WASHER).unwrap();
        std::fs::write(dir.join("broken.json"), "[").unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let library = DescriptorLibrary::load_dir(&dir).unwrap();
        std::fs::remove_dir_all(&dir).unwrap();

        assert_eq!(library.len(), 1);
        assert_eq!(library.get("washer").map(<[Descriptor]>::len), Some(2));
    }

    #[test]
    fn missing_dir_degrades_to_empty() {
        let library = DescriptorLibrary::load_dir_or_default("/nonexistent/capmap/descriptors");
        assert!(library.is_empty());
    }
}
