use crate::common::kv_store::DEFAULT_STATE_FILE;
use crate::dashboard::metrics::MetricsFilter;
use crate::dashboard::module::{BusinessUnit, DashboardModule, DateRange};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// When enabled the application initialises the logger at debug level.
    /// Defaults to `false` when the field is missing in the settings file.
    #[serde(default)]
    pub debug_logging: bool,
    /// Write logs to this file instead of stderr.
    #[serde(default)]
    pub log_file: Option<String>,
    /// Location of the widget state file. Relative paths resolve against the
    /// settings file's directory; `None` keeps it next to the settings file.
    #[serde(default)]
    pub state_path: Option<String>,
    /// Module shown at startup.
    #[serde(default)]
    pub default_module: DashboardModule,
    #[serde(default)]
    pub date_range: DateRange,
    #[serde(default)]
    pub business_unit: BusinessUnit,
    /// Enable toast notifications in the UI.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            state_path: None,
            default_module: DashboardModule::default(),
            date_range: DateRange::default(),
            business_unit: BusinessUnit::default(),
            enable_toasts: default_toasts(),
            toast_duration: default_toast_duration(),
        }
    }
}

impl Settings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Widget state file for a settings file stored at `settings_path`.
    pub fn state_file(&self, settings_path: &Path) -> PathBuf {
        let base = settings_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        match &self.state_path {
            Some(p) if Path::new(p).is_absolute() => PathBuf::from(p),
            Some(p) => base.join(p),
            None => base.join(DEFAULT_STATE_FILE),
        }
    }

    pub fn filter(&self) -> MetricsFilter {
        MetricsFilter::new(self.date_range, self.business_unit)
    }
}

/// Settings path used when none is given on the command line.
pub fn default_settings_path() -> PathBuf {
    dirs_next::config_dir()
        .map(|dir| dir.join("exec_dashboard").join(SETTINGS_FILE))
        .unwrap_or_else(|| PathBuf::from(SETTINGS_FILE))
}
