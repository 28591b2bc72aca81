use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use schedularr_core::config::{AppConfig, SettingKey};

use super::{open_session_store, open_settings};
use crate::render::render_settings;
use crate::utils::tui;

pub fn show() -> Result<()> {
    let store = open_settings()?;
    let settings = store.settings();

    println!("{}", tui::gradient(&settings.display_title, settings.input_theme).bold());
    for line in render_settings(settings) {
        println!("{}", line);
    }

    Ok(())
}

pub fn get(key: &str) -> Result<()> {
    let key: SettingKey = key.parse()?;
    let store = open_settings()?;

    println!("{}", store.settings().get(key));

    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let key: SettingKey = key.parse()?;
    let mut store = open_settings()?;

    store
        .set(key, value)
        .with_context(|| format!("Failed to set {}", key))?;

    println!("{} = {}", key.name(), store.settings().get(key).bold());

    Ok(())
}

pub fn path() -> Result<()> {
    let settings = open_settings()?;
    let session = open_session_store()?;
    let app_config = AppConfig::path().context("Failed to locate OAuth client config")?;

    println!("{}", "Paths".bold());
    println!("  Settings:    {}", settings.path().display());
    println!("  Session:     {}", session.path().display());
    println!("  OAuth app:   {}", app_config.display());

    Ok(())
}
