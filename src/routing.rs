//! Classify the current admin URL into the kind of page being shown.
//!
//! Admin URLs look like `/admin/<app_label>/<model>/[<id>/<action>/]`. The
//! model segment decides which controller applies; a form segment anywhere
//! (`add`, `change`, ...) means a create/edit view that is left alone.

#[cfg(test)]
#[path = "routing_test.rs"]
mod routing_test;

use crate::config::TaskListConfig;
use crate::state::task_row::TaskCategory;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageKind {
    /// Changelist of schedulable live tasks: rows get action buttons.
    TaskList(TaskCategory),
    /// Changelist of live ingested data: gets the auto-refresh control.
    LiveData(TaskCategory),
    /// Create/edit/delete/history view of any model.
    Form,
    /// Any other page.
    Unrelated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageRoute {
    /// Model segment following the app label, when present.
    pub model: Option<String>,
    pub kind: PageKind,
}

impl PageRoute {
    #[must_use]
    pub fn augments_rows(&self) -> Option<TaskCategory> {
        match self.kind {
            PageKind::TaskList(category) => Some(category),
            _ => None,
        }
    }

    #[must_use]
    pub fn auto_refreshes(&self) -> bool {
        matches!(self.kind, PageKind::LiveData(_))
    }
}

/// Classify `path` (a `location.pathname`).
#[must_use]
pub fn classify(path: &str, config: &TaskListConfig) -> PageRoute {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    let model = segments
        .iter()
        .position(|s| *s == config.app_label)
        .and_then(|i| segments.get(i + 1))
        .map(|s| s.to_lowercase());

    if segments.iter().any(|s| config.form_segments.iter().any(|f| f == s)) {
        return PageRoute { model, kind: PageKind::Form };
    }

    let kind = model.as_deref().map_or(PageKind::Unrelated, |name| model_kind(name, config));
    PageRoute { model, kind }
}

fn model_kind(name: &str, config: &TaskListConfig) -> PageKind {
    let names = &config.models;
    let listed = |list: &[String]| list.iter().any(|candidate| candidate == name);
    if listed(&names.fixture_tasks) {
        PageKind::TaskList(TaskCategory::Fixture)
    } else if listed(&names.odds_tasks) {
        PageKind::TaskList(TaskCategory::Odds)
    } else if listed(&names.fixture_data) {
        PageKind::LiveData(TaskCategory::Fixture)
    } else if listed(&names.odds_data) {
        PageKind::LiveData(TaskCategory::Odds)
    } else {
        PageKind::Unrelated
    }
}
