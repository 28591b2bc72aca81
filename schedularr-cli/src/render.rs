//! Terminal rendering for schedularr types.

use owo_colors::OwoColorize;
use schedularr_core::config::{SettingKey, Settings};
use schedularr_core::session::Session;
use schedularr_google::SubmitOutcome;
use schedularr_google::types::CalendarListEntry;

pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarListEntry {
    fn render(&self) -> String {
        let marker = if self.primary { " (primary)" } else { "" };
        format!("📅 {}{}  {}", self.summary, marker, self.id.dimmed())
    }
}

impl Render for Session {
    fn render(&self) -> String {
        match (self.user_name.is_empty(), self.user_email.is_empty()) {
            (false, false) => format!("{} <{}>", self.user_name, self.user_email),
            (true, false) => self.user_email.clone(),
            (false, true) => self.user_name.clone(),
            (true, true) => "unknown account".to_string(),
        }
    }
}

impl Render for SubmitOutcome {
    fn render(&self) -> String {
        match self {
            SubmitOutcome::Created(event) => match &event.html_link {
                Some(link) => format!("{}\n  {}", "Booked!".green().bold(), link.dimmed()),
                None => "Booked!".green().bold().to_string(),
            },
            SubmitOutcome::DevModeAccepted { message } => format!(
                "{} {}",
                "Booked (dev mode).".yellow().bold(),
                format!("Google said: {}", message).dimmed()
            ),
            SubmitOutcome::Invalid(errors) => {
                let mut lines = vec!["Booking not sent:".red().bold().to_string()];
                lines.extend(errors.messages().iter().map(|m| format!("  - {}", m)));
                lines.join("\n")
            }
            SubmitOutcome::Failed(message) => {
                format!("{} {}", "Booking failed:".red().bold(), message)
            }
        }
    }
}

/// "Ends 2024-06-01 15:30 · Fee $30"
pub fn render_quote(end_date: &str, end_time: &str, fee: i64, currency: &str) -> String {
    format!(
        "Ends {} {} · Fee {}{}",
        end_date,
        end_time.bold(),
        currency,
        fee.to_string().bold()
    )
}

pub fn render_settings(settings: &Settings) -> Vec<String> {
    let width = SettingKey::ALL
        .iter()
        .map(|k| k.name().len())
        .max()
        .unwrap_or(0);

    SettingKey::ALL
        .iter()
        .map(|key| {
            let value = settings.get(*key);
            let value = if value.is_empty() {
                "(not set)".dimmed().to_string()
            } else {
                value
            };
            format!("  {:width$}  {}", key.name(), value, width = width)
        })
        .collect()
}
