//! User preferences, persisted to settings.toml.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::{Theme, base_dir};
use crate::error::{SchedularrError, SchedularrResult};

pub const MAX_CURRENCY_CHARS: usize = 3;

/// Preferences shared by every command.
///
/// Missing keys fall back to the defaults below, so an empty or partial
/// settings.toml is always valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub hourly_rate: f64,
    pub currency: String,
    pub display_title: String,
    pub calendar_id: String,
    pub calendar_name: String,
    pub input_theme: Theme,
    pub button_theme: Theme,
    pub dev_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            hourly_rate: 20.0,
            currency: "$".to_string(),
            display_title: "Schedularr".to_string(),
            calendar_id: String::new(),
            calendar_name: "Schedularr".to_string(),
            input_theme: Theme::Sunset,
            button_theme: Theme::Ocean,
            dev_mode: false,
        }
    }
}

/// Addressable setting names, as used by `schedularr config get/set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    HourlyRate,
    Currency,
    DisplayTitle,
    CalendarId,
    CalendarName,
    InputGradient,
    ButtonGradient,
    DevMode,
}

impl SettingKey {
    pub const ALL: [SettingKey; 8] = [
        SettingKey::HourlyRate,
        SettingKey::Currency,
        SettingKey::DisplayTitle,
        SettingKey::CalendarId,
        SettingKey::CalendarName,
        SettingKey::InputGradient,
        SettingKey::ButtonGradient,
        SettingKey::DevMode,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SettingKey::HourlyRate => "hourlyRate",
            SettingKey::Currency => "currency",
            SettingKey::DisplayTitle => "displayTitle",
            SettingKey::CalendarId => "calendarId",
            SettingKey::CalendarName => "calendarName",
            SettingKey::InputGradient => "inputGradient",
            SettingKey::ButtonGradient => "buttonGradient",
            SettingKey::DevMode => "devMode",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SettingKey {
    type Err = SchedularrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept camelCase, snake_case and kebab-case spellings.
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        let key = match normalized.as_str() {
            "hourlyrate" | "rate" => SettingKey::HourlyRate,
            "currency" | "currencysymbol" => SettingKey::Currency,
            "displaytitle" | "whowhat" | "userapptitle" | "title" => SettingKey::DisplayTitle,
            "calendarid" => SettingKey::CalendarId,
            "calendarname" => SettingKey::CalendarName,
            "inputgradient" | "inputtheme" => SettingKey::InputGradient,
            "buttongradient" | "buttontheme" => SettingKey::ButtonGradient,
            "devmode" => SettingKey::DevMode,
            _ => return Err(SchedularrError::UnknownSetting(s.to_string())),
        };

        Ok(key)
    }
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> String {
        match key {
            SettingKey::HourlyRate => self.hourly_rate.to_string(),
            SettingKey::Currency => self.currency.clone(),
            SettingKey::DisplayTitle => self.display_title.clone(),
            SettingKey::CalendarId => self.calendar_id.clone(),
            SettingKey::CalendarName => self.calendar_name.clone(),
            SettingKey::InputGradient => self.input_theme.to_string(),
            SettingKey::ButtonGradient => self.button_theme.to_string(),
            SettingKey::DevMode => self.dev_mode.to_string(),
        }
    }

    /// Parse `value` and assign it. The settings are left untouched on error.
    pub fn set(&mut self, key: SettingKey, value: &str) -> SchedularrResult<()> {
        let reject = |reason: &str| invalid(key, reason);

        match key {
            SettingKey::HourlyRate => {
                let rate: f64 = value
                    .trim()
                    .parse()
                    .map_err(|_| reject("expected a number"))?;
                check_rate(rate)?;
                self.hourly_rate = rate;
            }
            SettingKey::Currency => {
                let symbol = value.trim();
                check_currency(symbol)?;
                self.currency = symbol.to_string();
            }
            SettingKey::DisplayTitle => self.display_title = value.to_string(),
            SettingKey::CalendarId => self.calendar_id = value.trim().to_string(),
            SettingKey::CalendarName => {
                check_calendar_name(value.trim())?;
                self.calendar_name = value.trim().to_string();
            }
            SettingKey::InputGradient => self.input_theme = value.parse()?,
            SettingKey::ButtonGradient => self.button_theme = value.parse()?,
            SettingKey::DevMode => {
                self.dev_mode = match value.trim().to_lowercase().as_str() {
                    "true" | "1" | "yes" | "on" => true,
                    "false" | "0" | "no" | "off" => false,
                    _ => return Err(reject("expected true or false")),
                };
            }
        }

        Ok(())
    }

    /// Check the invariants `set` enforces, for settings that arrived some
    /// other way (a hand-edited file).
    pub fn validate(&self) -> SchedularrResult<()> {
        check_rate(self.hourly_rate)?;
        check_currency(&self.currency)?;
        check_calendar_name(&self.calendar_name)
    }
}

fn invalid(key: SettingKey, reason: &str) -> SchedularrError {
    SchedularrError::InvalidSetting {
        key: key.name().to_string(),
        reason: reason.to_string(),
    }
}

fn check_rate(rate: f64) -> SchedularrResult<()> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(invalid(SettingKey::HourlyRate, "must be zero or more"));
    }
    Ok(())
}

fn check_currency(symbol: &str) -> SchedularrResult<()> {
    if symbol.chars().count() > MAX_CURRENCY_CHARS {
        return Err(invalid(SettingKey::Currency, "at most 3 characters"));
    }
    Ok(())
}

fn check_calendar_name(name: &str) -> SchedularrResult<()> {
    if name.trim().is_empty() {
        return Err(invalid(SettingKey::CalendarName, "must not be empty"));
    }
    Ok(())
}

/// Settings bound to the file they were loaded from.
///
/// Every mutation goes through `set` or `update`, which write the file
/// before returning.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    settings: Settings,
}

impl SettingsStore {
    pub fn default_path() -> SchedularrResult<PathBuf> {
        Ok(base_dir()?.join("settings.toml"))
    }

    pub fn open_default() -> SchedularrResult<Self> {
        Self::open(Self::default_path()?)
    }

    /// Load settings from `path`, using defaults if the file doesn't exist.
    pub fn open(path: impl Into<PathBuf>) -> SchedularrResult<Self> {
        let path = path.into();

        let settings: Settings = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            toml::from_str(&contents).map_err(|e| {
                SchedularrError::Config(format!(
                    "Failed to parse settings from {}: {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            Settings::default()
        };
        settings.validate()?;

        Ok(SettingsStore { path, settings })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set(&mut self, key: SettingKey, value: &str) -> SchedularrResult<()> {
        self.settings.set(key, value)?;
        self.save()
    }

    pub fn update(&mut self, f: impl FnOnce(&mut Settings)) -> SchedularrResult<()> {
        f(&mut self.settings);
        self.save()
    }

    pub fn save(&self) -> SchedularrResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(&self.settings)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }

    /// Delete the settings file and fall back to defaults.
    pub fn reset(&mut self) -> SchedularrResult<()> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        self.settings = Settings::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::open(dir.path().join("settings.toml")).unwrap();

        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "hourly_rate = 35.0\ndev_mode = true\n").unwrap();

        let store = SettingsStore::open(&path).unwrap();

        assert_eq!(store.settings().hourly_rate, 35.0);
        assert!(store.settings().dev_mode);
        assert_eq!(store.settings().currency, "$");
    }

    #[test]
    fn set_persists_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut store = SettingsStore::open(&path).unwrap();
        store.set(SettingKey::HourlyRate, "42.5").unwrap();
        store.set(SettingKey::Currency, "EUR").unwrap();
        store.set(SettingKey::ButtonGradient, "forest").unwrap();

        let reopened = SettingsStore::open(&path).unwrap();
        assert_eq!(reopened.settings().hourly_rate, 42.5);
        assert_eq!(reopened.settings().currency, "EUR");
        assert_eq!(reopened.settings().button_theme, Theme::Forest);
    }

    #[test]
    fn rejected_values_leave_settings_untouched() {
        let mut settings = Settings::default();

        assert!(settings.set(SettingKey::HourlyRate, "-1").is_err());
        assert!(settings.set(SettingKey::HourlyRate, "lots").is_err());
        assert!(settings.set(SettingKey::Currency, "EURO").is_err());
        assert!(settings.set(SettingKey::DevMode, "maybe").is_err());

        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn hand_edited_file_is_checked_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        std::fs::write(&path, "hourly_rate = -20.0\n").unwrap();
        let err = SettingsStore::open(&path).unwrap_err();
        assert!(matches!(
            err,
            SchedularrError::InvalidSetting { ref key, .. } if key == "hourlyRate"
        ));

        std::fs::write(&path, "currency = \"EURO$\"\n").unwrap();
        let err = SettingsStore::open(&path).unwrap_err();
        assert!(matches!(
            err,
            SchedularrError::InvalidSetting { ref key, .. } if key == "currency"
        ));

        std::fs::write(&path, "calendar_name = \"  \"\n").unwrap();
        assert!(SettingsStore::open(&path).is_err());
    }

    #[test]
    fn key_aliases() {
        assert_eq!(
            "hourlyRate".parse::<SettingKey>().unwrap(),
            SettingKey::HourlyRate
        );
        assert_eq!(
            "hourly_rate".parse::<SettingKey>().unwrap(),
            SettingKey::HourlyRate
        );
        assert_eq!(
            "whoWhat".parse::<SettingKey>().unwrap(),
            SettingKey::DisplayTitle
        );
        assert_eq!(
            "UserAppTitle".parse::<SettingKey>().unwrap(),
            SettingKey::DisplayTitle
        );
        assert!("colour".parse::<SettingKey>().is_err());
    }

    #[test]
    fn get_round_trips_through_set() {
        let mut settings = Settings::default();
        for key in SettingKey::ALL {
            let value = settings.get(key);
            settings.set(key, &value).unwrap();
        }
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn reset_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut store = SettingsStore::open(&path).unwrap();
        store.set(SettingKey::DevMode, "true").unwrap();
        assert!(path.exists());

        store.reset().unwrap();
        assert!(!path.exists());
        assert!(!store.settings().dev_mode);
    }
}
