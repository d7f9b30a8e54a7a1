// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error and push-message trackers.
//!
//! The synthetic `LAST_ERROR` and `LAST_PUSH_MESSAGE` properties are not read
//! from status. The host feeds raw vendor codes into an [`EventTracker`] and
//! binds the returned update.
//!
//! # Examples
//!
//! ```
//! use capmap_lib::EngineConfig;
//! use capmap_lib::events::EventTracker;
//! use capmap_lib::translate::EnumCaptions;
//! use capmap_lib::types::PropertyValue;
//! use chrono::{Local, TimeZone};
//!
//! let config = EngineConfig::default();
//! let captions = EnumCaptions::new();
//! let tracker = EventTracker::new(&config, &captions);
//!
//! let at = Local.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap();
//! let (ident, value) = tracker.record_error_at("DOOR_OPEN_ERROR", &at).unwrap();
//! assert_eq!(ident, "LAST_ERROR");
//! assert_eq!(value, PropertyValue::from("2024-05-01 08:30:00: Door Open Error"));
//! ```

use std::fmt;

use chrono::{DateTime, Local, TimeZone};

use crate::config::EngineConfig;
use crate::descriptor::{LAST_ERROR, LAST_PUSH_MESSAGE};
use crate::translate::EnumCaptions;
use crate::types::PropertyValue;

/// Kind of a tracked device event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// A device error code.
    Error,
    /// A push notification code.
    Push,
}

impl EventKind {
    /// Identifier of the synthetic property fed by this kind.
    #[must_use]
    pub const fn ident(&self) -> &'static str {
        match self {
            Self::Error => LAST_ERROR,
            Self::Push => LAST_PUSH_MESSAGE,
        }
    }

    /// Profile section whose captions apply to this kind.
    #[must_use]
    pub const fn section(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Push => "notification",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

/// Turns raw event codes into timestamped, captioned property updates.
#[derive(Debug, Clone, Copy)]
pub struct EventTracker<'a> {
    config: &'a EngineConfig,
    captions: &'a EnumCaptions,
}

impl<'a> EventTracker<'a> {
    /// Creates a tracker using the configured language and time format.
    #[must_use]
    pub fn new(config: &'a EngineConfig, captions: &'a EnumCaptions) -> Self {
        Self { config, captions }
    }

    /// Records an error code at the current local time.
    ///
    /// Returns `None` for a blank code.
    #[must_use]
    pub fn record_error(&self, code: &str) -> Option<(&'static str, PropertyValue)> {
        self.record_at(EventKind::Error, code, &Local::now())
    }

    /// Records a push message code at the current local time.
    ///
    /// Returns `None` for a blank code.
    #[must_use]
    pub fn record_push(&self, code: &str) -> Option<(&'static str, PropertyValue)> {
        self.record_at(EventKind::Push, code, &Local::now())
    }

    /// Records an error code at a given time.
    #[must_use]
    pub fn record_error_at<Tz>(&self, code: &str, at: &DateTime<Tz>) -> Option<(&'static str, PropertyValue)>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.record_at(EventKind::Error, code, at)
    }

    /// Records a push message code at a given time.
    #[must_use]
    pub fn record_push_at<Tz>(&self, code: &str, at: &DateTime<Tz>) -> Option<(&'static str, PropertyValue)>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        self.record_at(EventKind::Push, code, at)
    }

    /// Records an event of `kind` at a given time.
    #[must_use]
    pub fn record_at<Tz>(
        &self,
        kind: EventKind,
        code: &str,
        at: &DateTime<Tz>,
    ) -> Option<(&'static str, PropertyValue)>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let code = code.trim();
        if code.is_empty() {
            tracing::debug!(kind = %kind, "Ignoring blank event code");
            return None;
        }

        let caption = self
            .captions
            .caption(kind.section(), code, &self.config.language);
        let stamp = at.format(&self.config.time_format);
        tracing::debug!(kind = %kind, code, caption = %caption, "Recorded device event");

        Some((kind.ident(), PropertyValue::String(format!("{stamp}: {caption}"))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap()
    }

    #[test]
    fn error_uses_section_caption_and_language() {
        let config = EngineConfig::builder().language("de").build();
        let mut captions = EnumCaptions::new();
        captions.insert("error", "OE_ERROR", "de", "Abpumpfehler");

        let tracker = EventTracker::new(&config, &captions);
        assert_eq!(
            tracker.record_error_at("OE_ERROR", &at()),
            Some((LAST_ERROR, PropertyValue::from("2024-05-01 08:30:00: Abpumpfehler")))
        );
    }

    #[test]
    fn push_humanizes_unknown_codes_with_custom_format() {
        let config = EngineConfig::builder().time_format("%H:%M").build();
        let captions = EnumCaptions::new();

        let tracker = EventTracker::new(&config, &captions);
        assert_eq!(
            tracker.record_push_at("WASHING_IS_COMPLETE", &at()),
            Some((LAST_PUSH_MESSAGE, PropertyValue::from("08:30: Washing Is Complete")))
        );
    }

    #[test]
    fn blank_codes_are_ignored() {
        let config = EngineConfig::default();
        let captions = EnumCaptions::new();
        let tracker = EventTracker::new(&config, &captions);
        assert_eq!(tracker.record_error("  "), None);
        assert!(tracker.record_push("DOOR_IS_OPEN").is_some());
    }
}
