// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Enum caption table.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use super::{humanize, normalize_key};
use crate::error::{LoadError, Result};

/// Property key matching every property.
const ANY_PROPERTY: &str = "*";

/// Language used when the requested one has no caption.
const FALLBACK_LANGUAGE: &str = "en";

type Languages = HashMap<String, String>;

/// Captions for enum tokens, per property and language.
///
/// The JSON form is `{ property: { TOKEN: { lang: caption } } }`, where the
/// property `*` applies to every property.
///
/// # Examples
///
/// ```
/// use capmap_lib::translate::EnumCaptions;
///
/// let captions = EnumCaptions::from_json_str(r#"{
///     "currentState": {"RUNNING": {"en": "Running", "de": "Läuft"}},
///     "*": {"POWER_OFF": {"en": "Off"}}
/// }"#).unwrap();
///
/// assert_eq!(captions.caption("currentState", "RUNNING", "de"), "Läuft");
/// assert_eq!(captions.caption("anything", "POWER_OFF", "de"), "Off");
/// assert_eq!(captions.caption("airQuality", "VERY_BAD", "en"), "Very Bad");
/// ```
#[derive(Debug, Clone, Default)]
pub struct EnumCaptions {
    entries: HashMap<String, HashMap<String, Languages>>,
}

#[derive(Deserialize)]
#[serde(transparent)]
struct CaptionFile(HashMap<String, HashMap<String, Languages>>);

impl EnumCaptions {
    /// Creates an empty table; every lookup humanizes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Captions for the tokens that recur across device families.
    #[must_use]
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (token, en, de) in [
            ("POWER_ON", "On", "Ein"),
            ("POWER_OFF", "Off", "Aus"),
            ("START", "Start", "Start"),
            ("STOP", "Stop", "Stopp"),
            ("SET", "Set", "Gesetzt"),
            ("UNSET", "Not set", "Nicht gesetzt"),
        ] {
            table.insert(ANY_PROPERTY, token, "en", en);
            table.insert(ANY_PROPERTY, token, "de", de);
        }
        table
    }

    /// Parses a caption table from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Json`] if the document has the wrong shape.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: CaptionFile = serde_json::from_str(json).map_err(LoadError::from)?;
        let mut table = Self::new();
        for (property, tokens) in file.0 {
            for (token, languages) in tokens {
                for (language, caption) in languages {
                    table.insert(&property, &token, &language, caption);
                }
            }
        }
        Ok(table)
    }

    /// Loads a caption table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Io`] or [`LoadError::Json`] on failure.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Adds or replaces one caption.
    pub fn insert(
        &mut self,
        property: &str,
        token: &str,
        language: &str,
        caption: impl Into<String>,
    ) {
        self.entries
            .entry(property_key(property))
            .or_default()
            .entry(token.to_string())
            .or_default()
            .insert(language.to_ascii_lowercase(), caption.into());
    }

    /// Merges another table into this one; entries in `other` win.
    pub fn merge(&mut self, other: Self) {
        for (property, tokens) in other.entries {
            let target = self.entries.entry(property).or_default();
            for (token, languages) in tokens {
                target.entry(token).or_default().extend(languages);
            }
        }
    }

    /// Returns the caption of `token` for `property` in `language`, if known.
    #[must_use]
    pub fn lookup(&self, property: &str, token: &str, language: &str) -> Option<&str> {
        let language = language.to_ascii_lowercase();
        [property_key(property), ANY_PROPERTY.to_string()]
            .iter()
            .filter_map(|key| self.entries.get(key)?.get(token))
            .find_map(|languages| {
                languages
                    .get(&language)
                    .or_else(|| languages.get(FALLBACK_LANGUAGE))
                    .or_else(|| {
                        let mut sorted: Vec<_> = languages.iter().collect();
                        sorted.sort();
                        sorted.first().map(|(_, caption)| *caption)
                    })
            })
            .map(String::as_str)
    }

    /// Returns the caption of `token`, humanizing the token when unknown.
    #[must_use]
    pub fn caption(&self, property: &str, token: &str, language: &str) -> String {
        self.lookup(property, token, language)
            .map_or_else(|| humanize(token), str::to_string)
    }
}

fn property_key(property: &str) -> String {
    if property == ANY_PROPERTY {
        ANY_PROPERTY.to_string()
    } else {
        normalize_key(property)
    }
}
