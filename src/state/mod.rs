// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Retained device status.
//!
//! Event-driven status updates are partial deltas. The [`StatusSnapshot`]
//! keeps the last full tree and deep-merges each delta onto it, so the read
//! engine always sees a complete picture.
//!
//! # Examples
//!
//! ```
//! use capmap_lib::state::StatusSnapshot;
//! use serde_json::json;
//!
//! let mut snapshot = StatusSnapshot::new(json!({"runState": {"currentState": "RUNNING"}}));
//!
//! // Apply returns true if the snapshot actually changed
//! assert!(snapshot.apply(&json!({"runState": {"currentState": "END"}})));
//! assert!(!snapshot.apply(&json!({"runState": {"currentState": "END"}})));
//! ```

mod snapshot;

pub use snapshot::StatusSnapshot;
