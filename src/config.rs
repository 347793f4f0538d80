// File: src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use strum::{Display, EnumIter, EnumString};

fn default_true() -> bool {
    true
}
fn default_language() -> String {
    "en".to_string()
}

fn default_pomodoro_mins() -> u32 {
    25
}
fn default_short_sprint_mins() -> u32 {
    15
}
fn default_deep_work_mins() -> u32 {
    60
}
fn default_break_mins() -> u32 {
    5
}

/// Which screen the app opens on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StartView {
    #[default]
    Tasks,
    Focus,
    Stats,
}

/// Focus-session durations, in minutes.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct FocusConfig {
    #[serde(default = "default_pomodoro_mins")]
    pub pomodoro_mins: u32,
    #[serde(default = "default_short_sprint_mins")]
    pub short_sprint_mins: u32,
    #[serde(default = "default_deep_work_mins")]
    pub deep_work_mins: u32,
    #[serde(default = "default_break_mins")]
    pub break_mins: u32,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            pomodoro_mins: 25,
            short_sprint_mins: 15,
            deep_work_mins: 60,
            break_mins: 5,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Config {
    #[serde(default = "default_true")]
    pub dark_mode: bool,
    /// BCP 47-ish language tag persisted for the UI layer ("en", "es", ...).
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub start_view: StartView,
    #[serde(default)]
    pub focus: FocusConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dark_mode: true,
            language: default_language(),
            start_view: StartView::default(),
            focus: FocusConfig::default(),
        }
    }
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        // Explicitly detect missing file so callers (first run) can behave
        // accordingly.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Load, falling back to defaults when the file simply does not exist.
    /// Parse and IO errors still propagate — a corrupt config should be
    /// seen, not silently replaced.
    pub fn load_or_default(ctx: &dyn AppContext) -> Result<Self> {
        match Self::load(ctx) {
            Ok(config) => Ok(config),
            Err(e) if Self::is_missing_config_error(&e) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    /// Detect whether an error indicates the config file was missing,
    /// checking the explicit message and the IO error chain.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }
        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }
        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }
}
