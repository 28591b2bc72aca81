//! Submitting a booking as a calendar event.
//!
//! Each attempt goes Idle → Validating → Invalid, or
//! Idle → Validating → Submitting → Succeeded | Failed.
//! With dev mode on, validation is skipped and a failed insert is reported
//! as `DevModeAccepted` so the success path can still be exercised.

use schedularr_core::booking::validate::validate_submission;
use schedularr_core::booking::{Booking, BookingForm, ValidationErrors};
use schedularr_core::config::Settings;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::client::CalendarClient;
use crate::error::{GoogleError, GoogleResult};
use crate::to_google::ToGoogle;
use crate::types::CreatedEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Created(CreatedEvent),
    /// Dev mode only: the insert failed (or was never possible) but the
    /// form was treated as submitted anyway.
    DevModeAccepted { message: String },
    Invalid(ValidationErrors),
    Failed(String),
}

impl SubmitOutcome {
    /// Whether the form was cleared.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            SubmitOutcome::Created(_) | SubmitOutcome::DevModeAccepted { .. }
        )
    }
}

/// Sends bookings one at a time; a second `submit` while one is in flight
/// is rejected rather than queued.
#[derive(Debug)]
pub struct BookingSubmitter {
    client: CalendarClient,
    in_flight: Mutex<()>,
}

impl BookingSubmitter {
    pub fn new(client: CalendarClient) -> Self {
        BookingSubmitter {
            client,
            in_flight: Mutex::new(()),
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.try_lock().is_err()
    }

    pub async fn submit(
        &self,
        form: &mut BookingForm,
        settings: &Settings,
        signed_in: bool,
    ) -> GoogleResult<SubmitOutcome> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| GoogleError::SubmissionInProgress)?;

        let outcome = if settings.dev_mode {
            self.submit_unchecked(form, settings).await
        } else {
            self.submit_checked(form, settings, signed_in).await
        };

        if outcome.is_success() {
            form.complete();
        }

        Ok(outcome)
    }

    async fn submit_checked(
        &self,
        form: &BookingForm,
        settings: &Settings,
        signed_in: bool,
    ) -> SubmitOutcome {
        debug!("validating booking");
        if let Err(errors) = validate_submission(form.draft(), signed_in, &settings.calendar_id) {
            debug!(%errors, "booking invalid");
            return SubmitOutcome::Invalid(errors);
        }

        let booking = match Booking::from_draft(form.draft(), form.hourly_rate(), &settings.currency)
        {
            Ok(booking) => booking,
            Err(e) => return SubmitOutcome::Failed(format!("Could not compute booking: {}", e)),
        };

        match self.insert(&settings.calendar_id, &booking).await {
            Ok(event) => SubmitOutcome::Created(event),
            Err(e) => SubmitOutcome::Failed(e.user_message()),
        }
    }

    async fn submit_unchecked(&self, form: &BookingForm, settings: &Settings) -> SubmitOutcome {
        debug!("dev mode: skipping validation");

        let booking =
            match Booking::from_draft_lenient(form.draft(), form.hourly_rate(), &settings.currency)
            {
                Ok(booking) => booking,
                Err(e) => {
                    let message = format!("Could not compute booking: {}", e);
                    warn!(%message, "dev mode: accepting booking anyway");
                    return SubmitOutcome::DevModeAccepted { message };
                }
            };

        match self.insert(&settings.calendar_id, &booking).await {
            Ok(event) => SubmitOutcome::Created(event),
            Err(e) => {
                let message = e.user_message();
                warn!(%message, "dev mode: event insert failed, accepting booking anyway");
                SubmitOutcome::DevModeAccepted { message }
            }
        }
    }

    async fn insert(&self, calendar_id: &str, booking: &Booking) -> GoogleResult<CreatedEvent> {
        debug!(calendar_id, title = %booking.title, "submitting booking");

        let event = self
            .client
            .insert_event(calendar_id, &booking.to_google())
            .await?;

        info!(calendar_id, event_id = %event.id, "booking created");
        Ok(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CAL: &str = "abc@group.calendar.google.com";

    fn settings() -> Settings {
        Settings {
            calendar_id: CAL.to_string(),
            ..Settings::default()
        }
    }

    fn visit_mars(rate: f64) -> BookingForm {
        let mut form = BookingForm::new(rate);
        form.set_title("Visit Mars");
        form.set_start_date("2024-06-01");
        form.set_start_time("14:00");
        form.set_duration(Some(1.5));
        form
    }

    fn created() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "evt123",
            "htmlLink": "https://www.google.com/calendar/event?eid=evt123"
        }))
    }

    #[tokio::test]
    async fn valid_booking_is_posted_and_form_cleared() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/calendars/{CAL}/events")))
            .and(header("Authorization", "Bearer tok"))
            .and(body_json(serde_json::json!({
                "summary": "Visit Mars",
                "description": "Duration: 1.5 hours\nFee: $30",
                "start": {"dateTime": "2024-06-01T14:00:00Z", "timeZone": "UTC"},
                "end": {"dateTime": "2024-06-01T15:30:00Z", "timeZone": "UTC"}
            })))
            .respond_with(created())
            .expect(1)
            .mount(&server)
            .await;

        let submitter = BookingSubmitter::new(CalendarClient::new("tok").with_api_base(server.uri()));
        let mut form = visit_mars(20.0);
        assert_eq!(form.derived().end_time, "15:30");
        assert_eq!(form.derived().fee, 30);

        let outcome = submitter.submit(&mut form, &settings(), true).await.unwrap();

        match outcome {
            SubmitOutcome::Created(event) => assert_eq!(event.id, "evt123"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(form.draft().title.is_empty());
        assert_eq!(form.generation(), 1);
    }

    #[tokio::test]
    async fn off_grid_time_is_invalid_and_not_sent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(created())
            .expect(0)
            .mount(&server)
            .await;

        let submitter = BookingSubmitter::new(CalendarClient::new("tok").with_api_base(server.uri()));
        let mut form = visit_mars(20.0);
        form.set_start_time("14:10");

        let outcome = submitter.submit(&mut form, &settings(), true).await.unwrap();

        assert!(matches!(outcome, SubmitOutcome::Invalid(_)));
        assert_eq!(form.draft().start_time, "14:10");
        assert_eq!(form.generation(), 0);
    }

    #[tokio::test]
    async fn api_failure_reports_message_and_keeps_form() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path(format!("/calendars/{CAL}/events")))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": 404, "message": "Not Found"}
            })))
            .mount(&server)
            .await;

        let submitter = BookingSubmitter::new(CalendarClient::new("tok").with_api_base(server.uri()));
        let mut form = visit_mars(20.0);

        let outcome = submitter.submit(&mut form, &settings(), true).await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Failed("Not Found".to_string()));
        assert_eq!(form.draft().title, "Visit Mars");
    }

    #[tokio::test]
    async fn dev_mode_skips_validation_and_tolerates_failure() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"code": 400, "message": "Invalid calendar"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let submitter = BookingSubmitter::new(CalendarClient::new("tok").with_api_base(server.uri()));
        let mut form = visit_mars(20.0);
        form.set_title("");
        form.set_start_time("14:10");
        let settings = Settings {
            dev_mode: true,
            calendar_id: "primary".to_string(),
            ..Settings::default()
        };

        let outcome = submitter.submit(&mut form, &settings, false).await.unwrap();

        assert_eq!(
            outcome,
            SubmitOutcome::DevModeAccepted {
                message: "Invalid calendar".to_string()
            }
        );
        assert_eq!(form.generation(), 1);
    }

    #[tokio::test]
    async fn concurrent_submission_is_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(created().set_delay(Duration::from_millis(200)))
            .expect(1)
            .mount(&server)
            .await;

        let submitter = BookingSubmitter::new(CalendarClient::new("tok").with_api_base(server.uri()));
        let settings = settings();
        let mut first = visit_mars(20.0);
        let mut second = visit_mars(20.0);

        let (a, b) = tokio::join!(
            submitter.submit(&mut first, &settings, true),
            submitter.submit(&mut second, &settings, true),
        );

        assert!(matches!(a, Ok(SubmitOutcome::Created(_))));
        assert!(matches!(b, Err(GoogleError::SubmissionInProgress)));
        assert!(!submitter.is_busy());
    }
}
