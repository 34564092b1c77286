//! Row action buttons for the live task changelists.
//!
//! SYSTEM CONTEXT
//! ==============
//! The admin renders `#result_list` server-side. This controller appends an
//! "actions" column, then for every row whose first cell links to a numeric
//! task id it adds a toggle button and, for failed tasks, a restart button.
//! Clicking a button POSTs to the task endpoint and reloads on success so the
//! row reflects the server's new state.
//!
//! DESIGN
//! ======
//! The click handler disables the button and swaps its label synchronously,
//! before anything is spawned, so a second click cannot reach the handler
//! while a request is in flight. Only the POST and its settlement run on the
//! event loop.
//!
//! ERROR HANDLING
//! ==============
//! Rows that cannot be parsed are skipped and counted. A rejected or failed
//! request is shown to the user with a blocking alert and the button comes
//! back enabled with the retry label. Nothing here aborts the page.

#[cfg(test)]
#[path = "task_list_test.rs"]
mod task_list_test;

use std::future::Future;
use std::rc::Rc;

use crate::config::AdminUiConfig;
use crate::dom::{self, DomEvent, DomPort};
use crate::error::{ApiError, DomError};
use crate::net::api::{action_url, csrf_token, TaskAction, TaskApi};
use crate::platform::Browser;
use crate::state::task_row::{TaskCategory, TaskRow};

/// Summary of one augmentation pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AugmentReport {
    /// Rows that received an actions cell.
    pub augmented: usize,
    /// Rows left untouched (no cells, no link, non-numeric id).
    pub skipped: usize,
    pub restart_buttons: usize,
}

/// How a row action settled.
#[derive(Clone, Debug, PartialEq)]
pub enum ActionOutcome {
    /// Backend accepted; the page is reloading.
    Reloaded,
    /// Backend answered `success: false` with this message.
    Rejected(String),
    /// No usable answer.
    Failed(ApiError),
}

pub struct TaskListAugmenter<D, B, A> {
    dom: Rc<D>,
    browser: Rc<B>,
    api: Rc<A>,
    config: Rc<AdminUiConfig>,
}

impl<D, B, A> TaskListAugmenter<D, B, A>
where
    D: DomPort + 'static,
    B: Browser + 'static,
    A: TaskApi + 'static,
{
    pub fn new(dom: Rc<D>, browser: Rc<B>, api: Rc<A>, config: Rc<AdminUiConfig>) -> Rc<Self> {
        Rc::new(Self { dom, browser, api, config })
    }

    /// Add the actions column and per-row buttons to the changelist table.
    /// A page without the table yields an empty report.
    ///
    /// # Errors
    ///
    /// Returns a [`DomError`] if an element cannot be created, inserted or
    /// wired. Rows processed before the failure keep their buttons.
    pub fn augment(self: &Rc<Self>, category: TaskCategory) -> Result<AugmentReport, DomError> {
        let list = &self.config.task_list;
        let Some(table) = self.dom.by_id(&list.table_id) else {
            log::debug!("#{} not present; nothing to augment", list.table_id);
            return Ok(AugmentReport::default());
        };

        let labels = &self.config.labels;
        for header_row in self.dom.query(Some(&table), "thead tr") {
            let th = dom::element(&*self.dom, "th", "column-actions", &labels.actions_header)?;
            self.dom.set_attr(&th, "scope", "col")?;
            self.dom.append(&header_row, &th)?;
        }

        let mut report = AugmentReport::default();
        for row in self.dom.query(Some(&table), "tbody tr") {
            let Some(task) = self.read_row(&row, category) else {
                report.skipped += 1;
                continue;
            };
            let cell = dom::element(&*self.dom, "td", "action-buttons", "")?;

            let toggle = self.toggle_button(&task)?;
            self.dom.append(&cell, &toggle)?;
            self.on_click(&toggle, TaskAction::ToggleStatus, &task)?;

            if task.failed {
                let restart = dom::button(&*self.dom, "button warning", &labels.restart, &labels.restart_title)?;
                self.dom.append(&cell, &restart)?;
                self.on_click(&restart, TaskAction::Restart, &task)?;
                report.restart_buttons += 1;
            }

            self.dom.append(&row, &cell)?;
            report.augmented += 1;
            log::debug!("task {} ({}): enabled={} failed={}", task.id, task.category, task.enabled, task.failed);
        }

        log::info!(
            "{category} task list augmented: {} rows, {} skipped, {} restartable",
            report.augmented,
            report.skipped,
            report.restart_buttons
        );
        Ok(report)
    }

    /// Lock `button`, POST `action` for `task`, then reload or restore the
    /// button for a retry. The lock is applied before this returns; the
    /// returned future performs the request.
    ///
    /// # Errors
    ///
    /// The future yields a [`DomError`] if the button state cannot be
    /// updated. Backend failures are reported through [`ActionOutcome`].
    pub fn run_action(
        self: Rc<Self>,
        button: D::Node,
        action: TaskAction,
        task: TaskRow,
    ) -> impl Future<Output = Result<ActionOutcome, DomError>> {
        let locked = self.set_busy(&button, true);
        async move {
            locked?;
            let url = action_url(&self.browser.pathname(), action, task.id);
            let cookies = self.browser.cookies();
            let token = csrf_token(&cookies, &self.config.task_list.csrf_cookie);
            if token.is_none() {
                log::warn!("{} cookie missing; sending {action} without CSRF header", self.config.task_list.csrf_cookie);
            }

            let labels = &self.config.labels;
            let outcome = match self.api.post_action(&url, token.as_deref()).await {
                Ok(resp) if resp.success => ActionOutcome::Reloaded,
                Ok(resp) => ActionOutcome::Rejected(resp.message.unwrap_or_else(|| labels.unknown_error.clone())),
                Err(err) => ActionOutcome::Failed(err),
            };

            match &outcome {
                ActionOutcome::Reloaded => {
                    log::info!("{action} accepted for {} task {}", task.category, task.id);
                    self.browser.reload();
                }
                ActionOutcome::Rejected(message) => {
                    log::warn!("{action} rejected for task {}: {message}", task.id);
                    self.browser.alert(&format!("{}: {message}", labels.error_prefix));
                    self.set_busy(&button, false)?;
                }
                ActionOutcome::Failed(err) => {
                    log::warn!("{action} request for task {} failed: {err}", task.id);
                    self.browser.alert(&format!("{}: {err}", labels.request_error_prefix));
                    self.set_busy(&button, false)?;
                }
            }
            Ok(outcome)
        }
    }

    fn read_row(&self, row: &D::Node, category: TaskCategory) -> Option<TaskRow> {
        let cells = self.dom.query(Some(row), "td");
        let first = cells.first()?;
        let href = self
            .dom
            .query(Some(first), "a")
            .first()
            .and_then(|link| self.dom.attr(link, "href"));
        let status = cells.get(1).map(|cell| self.dom.text(cell)).unwrap_or_default();
        let task = TaskRow::parse(href.as_deref(), &status, category, &self.config.task_list);
        if task.is_none() {
            log::debug!("skipping row with link {href:?}");
        }
        task
    }

    fn toggle_button(&self, task: &TaskRow) -> Result<D::Node, DomError> {
        let labels = &self.config.labels;
        let (class, text, title) = if task.enabled {
            ("button default", &labels.disable, &labels.disable_title)
        } else {
            ("button primary", &labels.enable, &labels.enable_title)
        };
        let button = dom::button(&*self.dom, class, text, title)?;
        self.dom.set_style(&button, "margin-right", "5px")?;
        Ok(button)
    }

    fn on_click(self: &Rc<Self>, button: &D::Node, action: TaskAction, task: &TaskRow) -> Result<(), DomError> {
        let this = Rc::clone(self);
        let target = button.clone();
        let task = task.clone();
        self.dom.listen(
            Some(button),
            DomEvent::Click,
            Box::new(move |_: Option<D::Node>| {
                let pending = Rc::clone(&this).run_action(target.clone(), action, task.clone());
                this.browser.spawn(Box::pin(async move {
                    if let Err(err) = pending.await {
                        log::warn!("{action} button could not be updated: {err}");
                    }
                }));
            }),
        )
    }

    /// Busy: disabled with the processing label. Idle: enabled with the retry label.
    fn set_busy(&self, button: &D::Node, busy: bool) -> Result<(), DomError> {
        let labels = &self.config.labels;
        self.dom.set_disabled(button, busy)?;
        self.dom.set_text(button, if busy { &labels.processing } else { &labels.retry });
        Ok(())
    }
}
