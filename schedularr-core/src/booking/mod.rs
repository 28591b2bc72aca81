//! Bookings: the form, its arithmetic, and what gets sent to the calendar.

pub mod calc;
mod draft;
pub mod validate;

use chrono::{DateTime, Utc};

pub use calc::{CalcError, Computed};
pub use draft::{BookingDraft, BookingForm, DerivedFields};
pub use validate::ValidationErrors;

/// A booking ready to become a calendar event.
///
/// Times are wall-clock values from the form, tagged as UTC.
#[derive(Debug, Clone, PartialEq)]
pub struct Booking {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub duration_hours: f64,
    pub fee: i64,
    pub currency: String,
    pub note: Option<String>,
}

impl Booking {
    /// Build from a draft that has already passed validation.
    pub fn from_draft(
        draft: &BookingDraft,
        hourly_rate: f64,
        currency: &str,
    ) -> Result<Self, CalcError> {
        let duration = draft.duration_hours.ok_or(CalcError::Duration)?;
        let computed = calc::compute(&draft.start_date, &draft.start_time, duration, hourly_rate)?;
        Ok(Self::new(draft, computed, duration, currency))
    }

    /// Like `from_draft`, but tolerates start times off the 15-minute grid.
    /// Used when validation is switched off.
    pub fn from_draft_lenient(
        draft: &BookingDraft,
        hourly_rate: f64,
        currency: &str,
    ) -> Result<Self, CalcError> {
        let duration = draft.duration_hours.ok_or(CalcError::Duration)?;
        let (start, end) = calc::span(&draft.start_date, &draft.start_time, duration)?;
        let computed = Computed {
            start,
            end,
            fee: calc::fee(duration, hourly_rate),
        };
        Ok(Self::new(draft, computed, duration, currency))
    }

    fn new(draft: &BookingDraft, computed: Computed, duration_hours: f64, currency: &str) -> Self {
        let note = Some(draft.note.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string);

        Booking {
            title: draft.title.trim().to_string(),
            start: computed.start.and_utc(),
            end: computed.end.and_utc(),
            duration_hours,
            fee: computed.fee,
            currency: currency.to_string(),
            note,
        }
    }

    /// Event description: duration, fee and the optional note.
    pub fn description(&self) -> String {
        let hours = if self.duration_hours == 1.0 {
            "hour"
        } else {
            "hours"
        };

        let mut lines = vec![
            format!("Duration: {} {}", self.duration_hours, hours),
            format!("Fee: {}{}", self.currency, self.fee),
        ];

        if let Some(note) = &self.note {
            lines.push(format!("Note: {}", note));
        }

        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BookingDraft {
        BookingDraft {
            title: " Visit Mars ".into(),
            start_date: "2024-06-01".into(),
            start_time: "14:00".into(),
            duration_hours: Some(1.5),
            note: "bring snacks".into(),
        }
    }

    #[test]
    fn from_draft_tags_utc() {
        let booking = Booking::from_draft(&draft(), 20.0, "$").unwrap();

        assert_eq!(booking.title, "Visit Mars");
        assert_eq!(booking.start.to_rfc3339(), "2024-06-01T14:00:00+00:00");
        assert_eq!(booking.end.to_rfc3339(), "2024-06-01T15:30:00+00:00");
        assert_eq!(booking.fee, 30);
    }

    #[test]
    fn description_embeds_fee_and_note() {
        let booking = Booking::from_draft(&draft(), 20.0, "$").unwrap();

        assert_eq!(
            booking.description(),
            "Duration: 1.5 hours\nFee: $30\nNote: bring snacks"
        );
    }

    #[test]
    fn blank_note_is_dropped() {
        let mut d = draft();
        d.note = "   ".into();
        d.duration_hours = Some(1.0);

        let booking = Booking::from_draft(&d, 20.0, "€").unwrap();
        assert_eq!(booking.note, None);
        assert_eq!(booking.description(), "Duration: 1 hour\nFee: €20");
    }

    #[test]
    fn lenient_accepts_off_grid() {
        let mut d = draft();
        d.start_time = "14:10".into();

        assert_eq!(
            Booking::from_draft(&d, 20.0, "$"),
            Err(CalcError::TimeIncrement)
        );
        let booking = Booking::from_draft_lenient(&d, 20.0, "$").unwrap();
        assert_eq!(booking.end.format("%H:%M").to_string(), "15:40");
    }
}
