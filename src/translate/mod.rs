// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Display-name and enum-caption lookup.
//!
//! Names are resolved through a [`NameTable`] keyed by normalized property
//! name, enum captions through [`EnumCaptions`] keyed by normalized property
//! name and raw token. Missing entries are never an error: both fall back to
//! [`humanize`].
//!
//! # Examples
//!
//! ```
//! use capmap_lib::translate::{humanize, to_upper_snake};
//!
//! assert_eq!(humanize("VERY_BAD"), "Very Bad");
//! assert_eq!(humanize("targetTemperature"), "Target Temperature");
//! assert_eq!(to_upper_snake("relativeHourToStart"), "RELATIVE_HOUR_TO_START");
//! ```

mod captions;
mod case;
mod names;

pub use captions::EnumCaptions;
pub use case::{humanize, normalize_key, split_words, to_upper_snake};
pub use names::NameTable;
