//! Configuration for schedularr.
//!
//! Everything lives in one directory:
//!   ~/.config/schedularr/settings.toml    (user preferences)
//!   ~/.config/schedularr/session.toml     (OAuth tokens, owner-only)
//!   ~/.config/schedularr/app_config.toml  (OAuth client credentials)
//!
//! Set `SCHEDULARR_CONFIG_DIR` to use a different directory.

mod app_config;
mod settings;
mod theme;

use std::path::PathBuf;

use crate::error::{SchedularrError, SchedularrResult};

pub use app_config::AppConfig;
pub use settings::{SettingKey, Settings, SettingsStore};
pub use theme::Theme;

pub const CONFIG_DIR_ENV: &str = "SCHEDULARR_CONFIG_DIR";

pub fn base_dir() -> SchedularrResult<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }

    Ok(dirs::config_dir()
        .ok_or_else(|| SchedularrError::Config("Could not determine config directory".into()))?
        .join("schedularr"))
}
