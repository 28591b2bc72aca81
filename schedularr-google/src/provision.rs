//! Finding or creating the calendar bookings go into.
//!
//! Calendar summaries aren't unique on Google's side, so we treat them as
//! keys ourselves: `ensure_calendar` reuses an exact match, and
//! `create_unique` picks the first free name out of `X`, `X 1`, `X 2`, ...

use std::collections::HashSet;

use tracing::info;

use crate::client::CalendarClient;
use crate::error::{GoogleError, GoogleResult};
use crate::types::CreatedCalendar;

/// Upper bound on candidate names tried by `create_unique`.
pub const MAX_NAME_ATTEMPTS: u32 = 100;

/// `base` for attempt 0, `base N` after that.
pub fn candidate_name(base: &str, attempt: u32) -> String {
    if attempt == 0 {
        base.to_string()
    } else {
        format!("{} {}", base, attempt)
    }
}

/// Id of the first calendar whose summary is exactly `name`.
pub async fn find_by_name(client: &CalendarClient, name: &str) -> GoogleResult<Option<String>> {
    let calendars = client.list_calendars().await.map_err(operation_error)?;

    Ok(calendars
        .into_iter()
        .find(|cal| cal.summary == name)
        .map(|cal| cal.id))
}

/// Find-or-create. Calling this repeatedly with the same name keeps
/// returning the same calendar.
pub async fn ensure_calendar(client: &CalendarClient, name: &str) -> GoogleResult<CreatedCalendar> {
    if let Some(id) = find_by_name(client, name).await? {
        info!(name, id = %id, "using existing calendar");
        return Ok(CreatedCalendar {
            id,
            summary: name.to_string(),
        });
    }

    create(client, name).await
}

/// Always create a new calendar, named after the first unused candidate.
pub async fn create_unique(client: &CalendarClient, base: &str) -> GoogleResult<CreatedCalendar> {
    let calendars = client.list_calendars().await.map_err(operation_error)?;
    let taken: HashSet<String> = calendars.into_iter().map(|cal| cal.summary).collect();

    let name = (0..MAX_NAME_ATTEMPTS)
        .map(|attempt| candidate_name(base, attempt))
        .find(|candidate| !taken.contains(candidate))
        .ok_or_else(|| GoogleError::NameAttemptsExhausted {
            base: base.to_string(),
            attempts: MAX_NAME_ATTEMPTS,
        })?;

    create(client, &name).await
}

async fn create(client: &CalendarClient, name: &str) -> GoogleResult<CreatedCalendar> {
    let created = client.insert_calendar(name).await.map_err(operation_error)?;
    info!(name, id = %created.id, "created calendar");
    Ok(created)
}

fn operation_error(e: GoogleError) -> GoogleError {
    GoogleError::CalendarOperation(e.user_message())
}
