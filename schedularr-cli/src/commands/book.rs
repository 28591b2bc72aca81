use anyhow::Result;
use dialoguer::Input;
use owo_colors::OwoColorize;
use schedularr_core::booking::BookingForm;
use schedularr_google::{BookingSubmitter, CalendarClient, GoogleError};

use super::{open_settings, session};
use crate::render::{Render, render_quote};
use crate::utils::tui;

pub async fn run(
    title: Option<String>,
    date: String,
    time: String,
    duration_hours: f64,
    note: Option<String>,
) -> Result<()> {
    let store = open_settings()?;
    let settings = store.settings();

    println!(
        "{}",
        tui::gradient(&settings.display_title, settings.input_theme).bold()
    );

    let title = match title {
        Some(t) => t,
        None => Input::<String>::new()
            .with_prompt("  What?")
            .allow_empty(settings.dev_mode)
            .interact_text()?,
    };

    let mut form = BookingForm::new(settings.hourly_rate);
    form.set_title(title);
    form.set_start_date(date);
    form.set_start_time(time);
    form.set_duration(Some(duration_hours));
    form.set_note(note.unwrap_or_default());

    let derived = form.derived();
    if !derived.is_empty() {
        println!(
            "  {}",
            render_quote(&derived.end_date, &derived.end_time, derived.fee, &settings.currency)
        );
    }

    let session = match session().await {
        Ok(session) => Some(session),
        Err(e) if matches!(e.downcast_ref::<GoogleError>(), Some(GoogleError::NotSignedIn)) => None,
        Err(e) => return Err(e),
    };
    let signed_in = session.is_some();
    let token = session.map(|s| s.access_token).unwrap_or_default();

    let submitter = BookingSubmitter::new(CalendarClient::new(token));

    let spinner = tui::create_spinner(tui::accent("Booking", settings.button_theme));
    let result = submitter.submit(&mut form, settings, signed_in).await;
    spinner.finish_and_clear();

    let outcome = result?;
    println!("{}", outcome.render());

    if !outcome.is_success() {
        if !signed_in {
            println!("\n{}", "Sign in with: schedularr auth login".dimmed());
        }
        anyhow::bail!("booking was not created");
    }

    Ok(())
}
