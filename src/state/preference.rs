//! Durable boolean UI preferences and their storage encodings.
//!
//! The dashboard has always stored these as strings, and the encodings
//! differ per key: the theme uses `enabled`/`disabled`, the sidebar uses
//! `true`/`false`. Anything unrecognized reads as the default (off).

#[cfg(test)]
#[path = "preference_test.rs"]
mod preference_test;

use crate::config::PreferencesConfig;

/// One of the two persisted presentation flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Preference {
    DarkTheme,
    SidebarCollapsed,
}

impl Preference {
    /// Storage key for this preference.
    pub fn key(self, config: &PreferencesConfig) -> &str {
        match self {
            Self::DarkTheme => &config.dark_mode_key,
            Self::SidebarCollapsed => &config.sidebar_collapsed_key,
        }
    }

    /// Decode a stored value. Missing or unrecognized values mean "off".
    #[must_use]
    pub fn decode(self, raw: Option<&str>) -> bool {
        match (self, raw) {
            (Self::DarkTheme, Some(value)) => value == "enabled",
            (Self::SidebarCollapsed, Some(value)) => value == "true",
            (_, None) => false,
        }
    }

    #[must_use]
    pub fn encode(self, on: bool) -> &'static str {
        match (self, on) {
            (Self::DarkTheme, true) => "enabled",
            (Self::DarkTheme, false) => "disabled",
            (Self::SidebarCollapsed, true) => "true",
            (Self::SidebarCollapsed, false) => "false",
        }
    }
}
