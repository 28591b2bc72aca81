//! Checks run before anything is sent to Google.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

use crate::booking::calc::{parse_date, validate_time};
use crate::booking::draft::BookingDraft;

pub const NOTE_MAX_CHARS: usize = 500;

/// Durations are booked in quarter hours.
const DURATION_STEPS_PER_HOUR: f64 = 4.0;

static CALENDAR_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@group\.calendar\.google\.com$").unwrap()
});

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// True for ids of secondary ("group") calendars.
pub fn validate_calendar_id(id: &str) -> bool {
    CALENDAR_ID_RE.is_match(id)
}

pub fn validate_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn validate_duration(duration_hours: f64) -> bool {
    if !duration_hours.is_finite() || duration_hours <= 0.0 {
        return false;
    }
    let steps = duration_hours * DURATION_STEPS_PER_HOUR;
    (steps - steps.round()).abs() < 1e-9
}

/// Every problem found with a submission, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self) -> &[String] {
        &self.0
    }

    fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn validate_submission(
    draft: &BookingDraft,
    signed_in: bool,
    calendar_id: &str,
) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if !signed_in {
        errors.push("Please sign in first");
    }

    if draft.title.trim().is_empty() {
        errors.push("Title is required");
    }

    if draft.start_date.trim().is_empty() {
        errors.push("Start date is required");
    } else if parse_date(&draft.start_date).is_none() {
        errors.push("Start date must be YYYY-MM-DD");
    }

    if draft.start_time.trim().is_empty() {
        errors.push("Start time is required");
    } else if !validate_time(&draft.start_time) {
        errors.push("Start time must be on a 15-minute mark (:00, :15, :30, :45)");
    }

    match draft.duration_hours {
        Some(d) if validate_duration(d) => {}
        Some(_) => errors.push("Duration must be a positive multiple of 0.25 hours"),
        None => errors.push("Duration is required"),
    }

    if draft.note.chars().count() > NOTE_MAX_CHARS {
        errors.push(format!("Note must be at most {NOTE_MAX_CHARS} characters"));
    }

    if !validate_calendar_id(calendar_id) {
        errors.push("No valid calendar selected; run `schedularr calendar ensure`");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
