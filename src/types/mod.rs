// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types shared by the mapping components.
//!
//! # Types
//!
//! - [`PropertyType`] - Declared type of a bindable property
//! - [`PropertyValue`] - A typed scalar read from or written to a device
//! - [`Presentation`] - Rendering hint (value, switch, slider, buttons)
//! - [`EnumOption`] - One option of an enum property

mod presentation;
mod value;

pub use presentation::{EnumOption, Presentation, PresentationKind};
pub use value::{PropertyType, PropertyValue, parse_bool_token};
