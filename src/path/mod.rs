// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dot-path projection of nested JSON trees.
//!
//! Every other component queries profiles and status snapshots through a
//! [`FlatMap`]: a deterministic mapping from dot-joined paths to scalar leaves.
//! Array indices become numeric path segments, so `{"zones": [{"name": "A"}]}`
//! flattens to `zones.0.name = "A"`.
//!
//! # Examples
//!
//! ```
//! use capmap_lib::path::flatten;
//! use serde_json::json;
//!
//! let flat = flatten(&json!({"timer": {"relativeHourToStart": 2}, "zones": [{"name": "A"}]}));
//! assert_eq!(flat.get("timer.relativeHourToStart"), Some(&json!(2)));
//! assert_eq!(flat.get("zones.0.name"), Some(&json!("A")));
//! ```

mod flatten;
mod tree;

pub use flatten::{FlatMap, FlatMapExt, flatten, strip_numeric_segments};
pub use tree::{deep_merge, densify, get_path, set_path, unflatten};

/// Returns `true` if a path segment is an array index.
#[must_use]
pub fn is_index_segment(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

/// Joins two path fragments with a dot, skipping empty fragments.
#[must_use]
pub fn join(prefix: &str, tail: &str) -> String {
    match (prefix.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => prefix.to_string(),
        _ => format!("{prefix}.{tail}"),
    }
}
