pub mod auth;
pub mod book;
pub mod calendar;
pub mod config;
pub mod quote;
pub mod share;

use anyhow::{Context, Result};
use schedularr_core::config::{AppConfig, Settings, SettingsStore};
use schedularr_core::session::{Session, SessionStore};
use schedularr_google::auth::load_valid_session;
use schedularr_google::{CalendarClient, OAuthClient};

pub(crate) fn open_settings() -> Result<SettingsStore> {
    SettingsStore::open_default().context("Failed to load settings")
}

pub(crate) fn open_session_store() -> Result<SessionStore> {
    SessionStore::open_default().context("Failed to locate session file")
}

/// The stored session, refreshed if its access token has expired.
pub(crate) async fn session() -> Result<Session> {
    let store = open_session_store()?;

    let session = load_valid_session(&store, || Ok(OAuthClient::new(AppConfig::load()?))).await?;

    Ok(session)
}

pub(crate) async fn calendar_client() -> Result<CalendarClient> {
    let session = session().await?;
    Ok(CalendarClient::new(session.access_token))
}

/// The calendar bookings go to. Errors until one has been set up.
pub(crate) fn booking_calendar(settings: &Settings) -> Result<&str> {
    if settings.calendar_id.is_empty() {
        anyhow::bail!(
            "No booking calendar yet.\n\n\
            Set one up with:\n  \
            schedularr calendar ensure"
        );
    }

    Ok(&settings.calendar_id)
}
