use anyhow::Result;
use owo_colors::OwoColorize;
use schedularr_core::embed::embed_url;
use schedularr_google::provision;
use schedularr_google::types::CreatedCalendar;

use super::{booking_calendar, calendar_client, open_settings};
use crate::render::Render;
use crate::utils::tui;

pub async fn ensure(name: Option<String>) -> Result<()> {
    let mut settings = open_settings()?;
    let name = name.unwrap_or_else(|| settings.settings().calendar_name.clone());
    let client = calendar_client().await?;

    let spinner = tui::create_spinner(format!("Looking for \"{}\"", name));
    let result = provision::ensure_calendar(&client, &name).await;
    spinner.finish_and_clear();

    let calendar = result?;
    remember(&mut settings, &calendar)?;

    println!("{} {}", "Using calendar".green(), calendar.summary.bold());
    println!("  {}", calendar.id.dimmed());

    Ok(())
}

pub async fn create(name: Option<String>) -> Result<()> {
    let mut settings = open_settings()?;
    let base = name.unwrap_or_else(|| settings.settings().calendar_name.clone());
    let client = calendar_client().await?;

    let spinner = tui::create_spinner(format!("Creating \"{}\"", base));
    let result = provision::create_unique(&client, &base).await;
    spinner.finish_and_clear();

    let calendar = result?;
    remember(&mut settings, &calendar)?;

    println!("{} {}", "Created calendar".green(), calendar.summary.bold());
    println!("  {}", calendar.id.dimmed());

    Ok(())
}

fn remember(
    settings: &mut schedularr_core::config::SettingsStore,
    calendar: &CreatedCalendar,
) -> Result<()> {
    settings.update(|s| {
        s.calendar_id = calendar.id.clone();
        s.calendar_name = calendar.summary.clone();
    })?;

    Ok(())
}

pub async fn list() -> Result<()> {
    let settings = open_settings()?;
    let client = calendar_client().await?;

    let spinner = tui::create_spinner("Fetching calendars");
    let result = client.list_calendars().await;
    spinner.finish_and_clear();

    let calendars = result?;
    if calendars.is_empty() {
        println!("{}", "No calendars found".dimmed());
        return Ok(());
    }

    let current = &settings.settings().calendar_id;
    for calendar in &calendars {
        let line = calendar.render();
        if &calendar.id == current {
            println!("{} {}", "*".green(), line);
        } else {
            println!("  {}", line);
        }
    }

    Ok(())
}

pub fn embed() -> Result<()> {
    let store = open_settings()?;
    let calendar_id = booking_calendar(store.settings())?;

    println!("{}", embed_url(calendar_id));

    Ok(())
}
