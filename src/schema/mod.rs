// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Probing of flattened profile schemas.
//!
//! The same logical schema reaches this crate in several nesting shapes:
//! already unwrapped, wrapped in a `property` envelope, wrapped in `value` or
//! `profile`, or array-wrapped at any of those levels. Rather than scatter
//! guesses across call sites, every probe goes through [`SchemaProbe`], which
//! tries an explicit, ordered list of wrapper prefixes ([`WRAPPER_PREFIXES`],
//! each optionally followed by an array index `0..=4`) in front of the key.
//! Supporting a new envelope means adding one prefix to that list (or to
//! [`EngineConfig::wrapper_prefixes`](crate::EngineConfig)).
//!
//! # Examples
//!
//! ```
//! use capmap_lib::path::flatten;
//! use capmap_lib::schema::SchemaProbe;
//! use serde_json::json;
//!
//! let profile = flatten(&json!({
//!     "property": [{
//!         "timer": {"relativeHourToStart": {"type": "range", "mode": ["r", "w"],
//!                   "value": {"w": {"min": 0, "max": 19, "step": 1}}}}
//!     }]
//! }));
//!
//! let probe = SchemaProbe::new(&profile);
//! assert!(probe.is_writable("timer.relativeHourToStart"));
//! assert_eq!(probe.range("timer.relativeHourToStart").unwrap().max, Some(19.0));
//! ```

mod probe;
mod range;
mod timer;

pub use probe::{MAX_WRAPPER_INDEX, SchemaProbe, WRAPPER_PREFIXES};
pub use range::SchemaRange;
pub use timer::{TimerField, TimerUnit, is_timer_field, is_timer_flag};
