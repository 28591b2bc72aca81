//! The booking form and the fields derived from it.

use serde::{Deserialize, Serialize};

use crate::booking::calc;

/// What the user has typed so far.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookingDraft {
    pub title: String,
    pub start_date: String,
    pub start_time: String,
    pub duration_hours: Option<f64>,
    pub note: String,
}

impl BookingDraft {
    /// Date, time and duration are all filled in.
    pub fn has_schedule(&self) -> bool {
        !self.start_date.trim().is_empty()
            && !self.start_time.trim().is_empty()
            && self.duration_hours.is_some()
    }
}

/// End date/time and fee shown next to the form.
///
/// All empty/zero whenever the schedule is incomplete or invalid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DerivedFields {
    pub end_date: String,
    pub end_time: String,
    pub fee: i64,
}

impl DerivedFields {
    pub fn derive(draft: &BookingDraft, hourly_rate: f64) -> Self {
        let Some(duration) = draft.duration_hours.filter(|_| draft.has_schedule()) else {
            return DerivedFields::default();
        };

        match calc::compute(&draft.start_date, &draft.start_time, duration, hourly_rate) {
            Ok(computed) => DerivedFields {
                end_date: computed.end_date(),
                end_time: computed.end_time(),
                fee: computed.fee,
            },
            Err(_) => DerivedFields::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.end_date.is_empty()
    }
}

/// A draft plus its derived fields, kept in sync on every edit.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    draft: BookingDraft,
    hourly_rate: f64,
    derived: DerivedFields,
    generation: u64,
}

impl BookingForm {
    pub fn new(hourly_rate: f64) -> Self {
        BookingForm {
            hourly_rate,
            ..Default::default()
        }
    }

    pub fn draft(&self) -> &BookingDraft {
        &self.draft
    }

    pub fn derived(&self) -> &DerivedFields {
        &self.derived
    }

    pub fn hourly_rate(&self) -> f64 {
        self.hourly_rate
    }

    /// Bumped after every successful submission so views showing the
    /// calendar know to reload it.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_note(&mut self, note: impl Into<String>) {
        self.draft.note = note.into();
    }

    pub fn set_start_date(&mut self, date: impl Into<String>) {
        self.draft.start_date = date.into();
        self.recompute();
    }

    pub fn set_start_time(&mut self, time: impl Into<String>) {
        self.draft.start_time = time.into();
        self.recompute();
    }

    pub fn set_duration(&mut self, duration_hours: Option<f64>) {
        self.draft.duration_hours = duration_hours;
        self.recompute();
    }

    pub fn set_hourly_rate(&mut self, hourly_rate: f64) {
        self.hourly_rate = hourly_rate;
        self.recompute();
    }

    /// Reset the draft after a successful submission.
    pub fn complete(&mut self) {
        self.draft = BookingDraft::default();
        self.derived = DerivedFields::default();
        self.generation += 1;
    }

    fn recompute(&mut self) {
        self.derived = DerivedFields::derive(&self.draft, self.hourly_rate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_fields_follow_edits() {
        let mut form = BookingForm::new(20.0);
        form.set_start_date("2024-06-01");
        assert!(form.derived().is_empty());

        form.set_start_time("14:00");
        assert!(form.derived().is_empty());

        form.set_duration(Some(1.5));
        assert_eq!(
            form.derived(),
            &DerivedFields {
                end_date: "2024-06-01".into(),
                end_time: "15:30".into(),
                fee: 30,
            }
        );

        form.set_hourly_rate(40.0);
        assert_eq!(form.derived().fee, 60);

        form.set_start_time("14:10");
        assert!(form.derived().is_empty());
        assert_eq!(form.derived().fee, 0);
    }

    #[test]
    fn clearing_an_input_resets_derived() {
        let mut form = BookingForm::new(20.0);
        form.set_start_date("2024-06-01");
        form.set_start_time("09:00");
        form.set_duration(Some(1.0));
        assert!(!form.derived().is_empty());

        form.set_duration(None);
        assert_eq!(form.derived(), &DerivedFields::default());
    }

    #[test]
    fn complete_clears_and_bumps_generation() {
        let mut form = BookingForm::new(20.0);
        form.set_title("Visit Mars");
        form.set_start_date("2024-06-01");
        form.set_start_time("14:00");
        form.set_duration(Some(1.5));

        form.complete();

        assert_eq!(form.draft(), &BookingDraft::default());
        assert!(form.derived().is_empty());
        assert_eq!(form.generation(), 1);
        assert_eq!(form.hourly_rate(), 20.0);
    }
}
