//! Wire types for the Calendar v3 and OAuth endpoints we use.

use serde::{Deserialize, Serialize};

// =============================================================================
// Calendars
// =============================================================================

/// An entry of `users/me/calendarList`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarListEntry {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub primary: bool,
    #[serde(default)]
    pub access_role: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CalendarListPage {
    #[serde(default)]
    pub items: Vec<CalendarListEntry>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NewCalendar<'a> {
    pub summary: &'a str,
    pub time_zone: &'a str,
}

/// A calendar returned by `calendars.insert`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedCalendar {
    pub id: String,
    #[serde(default)]
    pub summary: String,
}

// =============================================================================
// ACL
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AclRule {
    #[serde(default, skip_serializing)]
    pub id: String,
    pub role: String,
    pub scope: AclScope,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AclScope {
    #[serde(rename = "type")]
    pub scope_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AclPage {
    #[serde(default)]
    pub items: Vec<AclRule>,
    pub next_page_token: Option<String>,
}

// =============================================================================
// Events
// =============================================================================

/// Body of `events.insert`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventBody {
    pub summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    pub date_time: String,
    pub time_zone: String,
}

/// The parts of an inserted event we show back to the user.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub id: String,
    #[serde(default)]
    pub html_link: Option<String>,
}

// =============================================================================
// Errors
// =============================================================================

/// `{"error": {"code": 403, "message": "..."}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl ApiErrorBody {
    pub fn into_message(self) -> String {
        match self.error {
            ApiErrorDetail::Structured { message } => message,
            ApiErrorDetail::Code(code) => self.error_description.unwrap_or(code),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum ApiErrorDetail {
    Structured { message: String },
    // OAuth endpoints answer {"error": "invalid_grant", "error_description": ...}
    Code(String),
}

// =============================================================================
// OAuth
// =============================================================================

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UserInfo {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
}
