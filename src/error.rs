// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the `capmap` library.
//!
//! The mapping engine itself never fails: partial or malformed vendor data is
//! the expected steady state and is absorbed by treating the affected section
//! as absent. Errors only surface from the loaders (catalog, descriptor files,
//! translation tables) and from explicit value conversions, and even those have
//! `*_or_default` companions that log and degrade.

use thiserror::Error;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// Error occurred while loading a configuration document.
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    /// Error occurred while converting a property value.
    #[error("value error: {0}")]
    Value(#[from] ValueError),
}

/// Errors related to loading catalog, descriptor and translation documents.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document could not be read from disk.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the document.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not match the expected shape.
    #[error("JSON decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document decoded but is structurally unusable.
    #[error("invalid document {file}: {message}")]
    InvalidDocument {
        /// Name of the offending document.
        file: String,
        /// Description of the problem.
        message: String,
    },
}

/// Errors related to property value conversion.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    /// A value cannot be represented as the requested property type.
    #[error("cannot convert {actual} to {expected}")]
    Conversion {
        /// The requested property type.
        expected: String,
        /// Rendering of the rejected value.
        actual: String,
    },

    /// A template contains a placeholder token that is not recognized.
    #[error("unknown placeholder: {0}")]
    UnknownPlaceholder(String),
}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_error_display() {
        let err = ValueError::Conversion {
            expected: "integer".to_string(),
            actual: "\"abc\"".to_string(),
        };
        assert_eq!(err.to_string(), "cannot convert \"abc\" to integer");
    }

    #[test]
    fn error_from_value_error() {
        let err: Error = ValueError::UnknownPlaceholder("@nope".to_string()).into();
        assert!(matches!(
            err,
            Error::Value(ValueError::UnknownPlaceholder(ref token)) if token == "@nope"
        ));
    }

    #[test]
    fn load_error_display() {
        let err = LoadError::InvalidDocument {
            file: "catalog.json".to_string(),
            message: "rules must be a list".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid document catalog.json: rules must be a list"
        );
    }

    #[test]
    fn load_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = LoadError::from(json_err).into();
        assert!(err.to_string().starts_with("load error: JSON decode error"));
    }
}
