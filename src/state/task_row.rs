//! Read-only view over one server-rendered task row.
//!
//! Rows are rebuilt from the changelist markup on every page load and thrown
//! away on reload; nothing here is persisted.

#[cfg(test)]
#[path = "task_row_test.rs"]
mod task_row_test;

use std::fmt;

use crate::config::TaskListConfig;

/// Kind of live ingestion task a changelist page manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TaskCategory {
    Fixture,
    Odds,
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixture => f.write_str("fixture"),
            Self::Odds => f.write_str("odds"),
        }
    }
}

/// A task row the augmenter can act on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRow {
    pub id: u64,
    pub enabled: bool,
    pub failed: bool,
    pub category: TaskCategory,
}

impl TaskRow {
    /// Build a row from the first cell's link and the status cell's text.
    ///
    /// Returns `None` when the link is missing or does not end in a numeric
    /// path segment; callers skip such rows.
    pub fn parse(
        href: Option<&str>,
        status_text: &str,
        category: TaskCategory,
        config: &TaskListConfig,
    ) -> Option<Self> {
        let id = parse_task_id(href?)?;
        let status = status_text.to_lowercase();
        Some(Self {
            id,
            enabled: status.contains(&config.enabled_marker.to_lowercase()),
            failed: status.contains(&config.failed_marker.to_lowercase()),
            category,
        })
    }
}

/// Extract the task id from a change link: the last non-empty path segment.
///
/// Query string and fragment are ignored. The segment must be a plain
/// unsigned integer; `42abc` is rejected.
#[must_use]
pub fn parse_task_id(href: &str) -> Option<u64> {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    let segment = path.split('/').filter(|s| !s.is_empty()).next_back()?;
    if !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse::<u64>().ok()
}
