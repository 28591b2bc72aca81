use anyhow::Result;
use owo_colors::OwoColorize;
use schedularr_core::booking::validate::validate_email;
use schedularr_google::{GoogleError, sharing};

use super::{booking_calendar, calendar_client, open_settings};
use crate::utils::tui;

pub async fn add(email: &str) -> Result<()> {
    let email = email.trim();
    if !validate_email(email) {
        return Err(GoogleError::InvalidEmail(email.to_string()).into());
    }

    let store = open_settings()?;
    let settings = store.settings();
    let calendar_id = booking_calendar(settings)?;
    let client = calendar_client().await?;

    let spinner = tui::create_spinner(format!("Sharing with {}", email));
    let result = sharing::share(&client, calendar_id, email).await;
    spinner.finish_and_clear();

    result?;
    println!(
        "{} {} can now edit {}",
        "Shared.".green(),
        email.bold(),
        tui::accent(&settings.calendar_name, settings.button_theme)
    );

    Ok(())
}

pub async fn list() -> Result<()> {
    let store = open_settings()?;
    let calendar_id = booking_calendar(store.settings())?;
    let client = calendar_client().await?;

    let spinner = tui::create_spinner("Fetching collaborators");
    let result = sharing::list_shared_users(&client, calendar_id).await;
    spinner.finish_and_clear();

    let users = result?;
    if users.is_empty() {
        println!("{}", "Not shared with anyone yet".dimmed());
        return Ok(());
    }

    for user in users {
        println!("  {}", user);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use schedularr_core::config::CONFIG_DIR_ENV;

    #[tokio::test]
    async fn malformed_email_is_rejected_before_sign_in() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.toml"),
            "calendar_id = \"abc@group.calendar.google.com\"\n",
        )
        .unwrap();
        // SAFETY: this is the only test in the crate that touches the environment.
        unsafe { std::env::set_var(CONFIG_DIR_ENV, dir.path()) };

        // No session file exists, so reaching the client would fail with NotSignedIn.
        let err = add(" bob.example.com ").await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<GoogleError>(),
            Some(GoogleError::InvalidEmail(email)) if email == "bob.example.com"
        ));
    }
}
