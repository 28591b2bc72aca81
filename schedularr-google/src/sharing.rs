//! Sharing a calendar with collaborators.

use schedularr_core::booking::validate::validate_email;
use tracing::info;

use crate::client::CalendarClient;
use crate::error::{GoogleError, GoogleResult};
use crate::types::AclRule;

/// "Make changes to events"
pub const COLLABORATOR_ROLE: &str = "writer";

/// In characters. Longer scope values are group or domain artifacts, not people.
const MAX_COLLABORATOR_EMAIL_LEN: usize = 50;

/// Calendars appear in their own ACL under addresses like
/// `abc@group.calendar.google.com`.
const CALENDAR_ADDRESS_SUFFIX: &str = "calendar.google.com";

/// Give `email` writer access to the calendar. Malformed addresses are
/// rejected before anything is sent.
pub async fn share(client: &CalendarClient, calendar_id: &str, email: &str) -> GoogleResult<()> {
    let email = email.trim();
    if !validate_email(email) {
        return Err(GoogleError::InvalidEmail(email.to_string()));
    }

    client
        .insert_acl(calendar_id, COLLABORATOR_ROLE, email)
        .await
        .map_err(|e| GoogleError::ShareFailed(e.user_message()))?;

    info!(calendar_id, email, "shared calendar");
    Ok(())
}

/// Email addresses of the people the calendar is shared with.
pub async fn list_shared_users(
    client: &CalendarClient,
    calendar_id: &str,
) -> GoogleResult<Vec<String>> {
    let rules = client.list_acl(calendar_id).await?;

    Ok(rules
        .into_iter()
        .filter(is_collaborator)
        .filter_map(|rule| rule.scope.value)
        .collect())
}

fn is_collaborator(rule: &AclRule) -> bool {
    if rule.scope.scope_type != "user" {
        return false;
    }

    match rule.scope.value.as_deref() {
        Some(value) => {
            value.contains('@')
                && value.chars().count() <= MAX_COLLABORATOR_EMAIL_LEN
                && !value.ends_with(CALENDAR_ADDRESS_SUFFIX)
        }
        None => false,
    }
}
