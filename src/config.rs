//! Page configuration for the admin UI controllers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The admin templates may embed a JSON block
//! (`<script type="application/json" id="admin-ui-config">`) overriding any
//! subset of these values. Without one, the defaults below match the markup
//! the dashboard templates render today.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::state::ui::RefreshInterval;

/// Id of the optional JSON configuration element.
pub const CONFIG_ELEMENT_ID: &str = "admin-ui-config";

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_NARROW_BREAKPOINT_PX: f64 = 768.0;
pub const DEFAULT_REFRESH_SECS: u64 = 30;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdminUiConfig {
    pub log_level: String,
    pub preferences: PreferencesConfig,
    pub task_list: TaskListConfig,
    pub auto_refresh: AutoRefreshConfig,
    pub labels: Labels,
}

impl Default for AdminUiConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            preferences: PreferencesConfig::default(),
            task_list: TaskListConfig::default(),
            auto_refresh: AutoRefreshConfig::default(),
            labels: Labels::default(),
        }
    }
}

impl AdminUiConfig {
    /// Build config from the optional JSON block text.
    ///
    /// Blank or missing input yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for malformed JSON, unknown fields, an
    /// unsupported refresh interval, an unknown log level, a non-positive
    /// breakpoint, or an id/class that is empty or contains whitespace.
    pub fn from_json(raw: Option<&str>) -> Result<Self, ConfigError> {
        let config = match raw.map(str::trim) {
            None | Some("") => Self::default(),
            Some(text) => serde_json::from_str::<Self>(text)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.level()?;
        self.auto_refresh.initial_interval()?;
        let breakpoint = self.preferences.narrow_breakpoint_px;
        if !(breakpoint.is_finite() && breakpoint > 0.0) {
            return Err(ConfigError::InvalidBreakpoint(breakpoint));
        }
        let prefs = &self.preferences;
        let tokens = [
            ("preferences.sidebar_toggle_id", &prefs.sidebar_toggle_id),
            ("preferences.theme_toggle_id", &prefs.theme_toggle_id),
            ("preferences.dark_class", &prefs.dark_class),
            ("preferences.collapsed_class", &prefs.collapsed_class),
            ("preferences.overlay_class", &prefs.overlay_class),
            ("preferences.icons.moon", &prefs.icons.moon),
            ("preferences.icons.sun", &prefs.icons.sun),
            ("preferences.icons.bars", &prefs.icons.bars),
            ("preferences.icons.close", &prefs.icons.close),
            ("task_list.table_id", &self.task_list.table_id),
            ("auto_refresh.select_id", &self.auto_refresh.select_id),
        ];
        for (field, value) in tokens {
            if value.is_empty() || value.chars().any(char::is_whitespace) {
                return Err(ConfigError::InvalidToken { field, value: value.clone() });
            }
        }
        Ok(())
    }

    /// Parsed log level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLogLevel`] when the name is not a `log::Level`.
    pub fn level(&self) -> Result<log::Level, ConfigError> {
        self.log_level
            .parse::<log::Level>()
            .map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }
}

/// Config from the optional JSON block, falling back to the defaults.
///
/// The error, if any, is handed back so the caller can log it once its
/// logger is up.
pub fn load_config(raw: Option<&str>) -> (AdminUiConfig, Option<ConfigError>) {
    match AdminUiConfig::from_json(raw) {
        Ok(config) => (config, None),
        Err(err) => (AdminUiConfig::default(), Some(err)),
    }
}

/// Theme and sidebar toggles (dashboard chrome, every admin page).
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PreferencesConfig {
    pub sidebar_toggle_id: String,
    pub theme_toggle_id: String,
    pub sidebar_selector: String,
    pub dark_class: String,
    pub collapsed_class: String,
    pub overlay_class: String,
    pub dark_mode_key: String,
    pub sidebar_collapsed_key: String,
    pub narrow_breakpoint_px: f64,
    pub icons: Icons,
}

impl Default for PreferencesConfig {
    fn default() -> Self {
        Self {
            sidebar_toggle_id: "sidebar-toggle".to_owned(),
            theme_toggle_id: "theme-toggle".to_owned(),
            sidebar_selector: ".sidebar".to_owned(),
            dark_class: "dark-theme".to_owned(),
            collapsed_class: "sidebar-collapsed".to_owned(),
            overlay_class: "sidebar-visible".to_owned(),
            dark_mode_key: "darkMode".to_owned(),
            sidebar_collapsed_key: "sidebarCollapsed".to_owned(),
            narrow_breakpoint_px: DEFAULT_NARROW_BREAKPOINT_PX,
            icons: Icons::default(),
        }
    }
}

/// Font Awesome glyph classes on the `<i>` inside each toggle.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Icons {
    pub moon: String,
    pub sun: String,
    pub bars: String,
    pub close: String,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            moon: "fa-moon".to_owned(),
            sun: "fa-sun".to_owned(),
            bars: "fa-bars".to_owned(),
            close: "fa-times".to_owned(),
        }
    }
}

/// Changelist augmentation: where the table is and how rows are read.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TaskListConfig {
    /// Path segment preceding the model name, e.g. `/admin/sports_data/<model>/`.
    pub app_label: String,
    pub table_id: String,
    pub csrf_cookie: String,
    pub csrf_header: String,
    /// Substring of the status cell meaning "enabled". Matched case-insensitively.
    pub enabled_marker: String,
    /// Substring of the status cell meaning "failed". Matched case-insensitively.
    pub failed_marker: String,
    /// Path segments that mark a non-list (create/edit) view.
    pub form_segments: Vec<String>,
    pub models: ModelNames,
}

impl Default for TaskListConfig {
    fn default() -> Self {
        Self {
            app_label: "sports_data".to_owned(),
            table_id: "result_list".to_owned(),
            csrf_cookie: "csrftoken".to_owned(),
            csrf_header: "X-CSRFToken".to_owned(),
            enabled_marker: "✓".to_owned(),
            failed_marker: "fall".to_owned(),
            form_segments: ["add", "change", "delete", "history"].map(str::to_owned).to_vec(),
            models: ModelNames::default(),
        }
    }
}

/// Admin model names (lowercase, as they appear in URLs) per page kind.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelNames {
    pub fixture_tasks: Vec<String>,
    pub odds_tasks: Vec<String>,
    pub fixture_data: Vec<String>,
    pub odds_data: Vec<String>,
}

impl Default for ModelNames {
    fn default() -> Self {
        Self {
            fixture_tasks: vec!["livefixturetask".to_owned(), "livefixturtask".to_owned()],
            odds_tasks: vec!["liveoddstask".to_owned()],
            fixture_data: vec!["livefixturedata".to_owned()],
            odds_data: vec!["liveoddsdata".to_owned()],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutoRefreshConfig {
    /// Element the control bar is inserted after.
    pub anchor_selector: String,
    pub select_id: String,
    pub default_interval_secs: u64,
    pub enabled_on_load: bool,
}

impl Default for AutoRefreshConfig {
    fn default() -> Self {
        Self {
            anchor_selector: ".breadcrumbs".to_owned(),
            select_id: "refresh-interval".to_owned(),
            default_interval_secs: DEFAULT_REFRESH_SECS,
            enabled_on_load: true,
        }
    }
}

impl AutoRefreshConfig {
    /// The interval the control starts with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidInterval`] for values the selector does not offer.
    pub fn initial_interval(&self) -> Result<RefreshInterval, ConfigError> {
        RefreshInterval::from_secs(self.default_interval_secs)
            .ok_or(ConfigError::InvalidInterval(self.default_interval_secs))
    }
}

/// User-visible strings. Defaults match the Spanish admin site.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    pub actions_header: String,
    pub enable: String,
    pub disable: String,
    pub enable_title: String,
    pub disable_title: String,
    pub restart: String,
    pub restart_title: String,
    pub processing: String,
    pub retry: String,
    pub error_prefix: String,
    pub request_error_prefix: String,
    pub unknown_error: String,
    pub refresh_on: String,
    pub refresh_off: String,
    pub seconds: String,
    pub one_minute: String,
    pub theme_to_light: String,
    pub theme_to_dark: String,
    pub sidebar_expand: String,
    pub sidebar_collapse: String,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            actions_header: "Acciones".to_owned(),
            enable: "Activar".to_owned(),
            disable: "Desactivar".to_owned(),
            enable_title: "Activar esta tarea".to_owned(),
            disable_title: "Desactivar esta tarea".to_owned(),
            restart: "Reiniciar".to_owned(),
            restart_title: "Reiniciar la tarea fallida".to_owned(),
            processing: "Procesando...".to_owned(),
            retry: "Reintentar".to_owned(),
            error_prefix: "Error".to_owned(),
            request_error_prefix: "Error en la petición".to_owned(),
            unknown_error: "error desconocido".to_owned(),
            refresh_on: "Auto-recarga activada".to_owned(),
            refresh_off: "Auto-recarga desactivada".to_owned(),
            seconds: "segundos".to_owned(),
            one_minute: "1 minuto".to_owned(),
            theme_to_light: "Cambiar a modo claro".to_owned(),
            theme_to_dark: "Cambiar a modo oscuro".to_owned(),
            sidebar_expand: "Expandir menú lateral".to_owned(),
            sidebar_collapse: "Colapsar menú lateral".to_owned(),
        }
    }
}
