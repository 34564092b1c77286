#[cfg(test)]
#[path = "ui_test.rs"]
mod ui_test;

use std::fmt;
use std::time::Duration;

use crate::config::Labels;

/// Page-lifetime UI state shared by the preference and auto-refresh controllers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UiState {
    pub dark_theme: bool,
    pub sidebar_collapsed: bool,
    /// Overlay sidebar shown on narrow viewports. Never persisted.
    pub sidebar_overlay: bool,
    pub auto_refresh: RefreshState,
}

/// Auto-refresh control state. Initial state is enabled at 30 seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshState {
    pub enabled: bool,
    pub interval: RefreshInterval,
}

impl Default for RefreshState {
    fn default() -> Self {
        Self { enabled: true, interval: RefreshInterval::default() }
    }
}

/// Reload periods offered by the interval selector.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RefreshInterval {
    FiveSeconds,
    TenSeconds,
    #[default]
    ThirtySeconds,
    OneMinute,
}

impl RefreshInterval {
    pub const ALL: [Self; 4] = [Self::FiveSeconds, Self::TenSeconds, Self::ThirtySeconds, Self::OneMinute];

    /// Map a number of seconds onto a supported interval.
    #[must_use]
    pub fn from_secs(secs: u64) -> Option<Self> {
        match secs {
            5 => Some(Self::FiveSeconds),
            10 => Some(Self::TenSeconds),
            30 => Some(Self::ThirtySeconds),
            60 => Some(Self::OneMinute),
            _ => None,
        }
    }

    /// Parse the `value` attribute of a selector option (seconds, as text).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u64>().ok().and_then(Self::from_secs)
    }

    #[must_use]
    pub fn secs(self) -> u64 {
        match self {
            Self::FiveSeconds => 5,
            Self::TenSeconds => 10,
            Self::ThirtySeconds => 30,
            Self::OneMinute => 60,
        }
    }

    #[must_use]
    pub fn duration(self) -> Duration {
        Duration::from_secs(self.secs())
    }

    /// Human label for the selector option, e.g. `30 segundos` or `1 minuto`.
    #[must_use]
    pub fn label(self, labels: &Labels) -> String {
        match self {
            Self::OneMinute => labels.one_minute.clone(),
            other => format!("{} {}", other.secs(), labels.seconds),
        }
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.secs())
    }
}
