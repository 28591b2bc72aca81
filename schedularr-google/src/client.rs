//! Thin authenticated client for the Calendar v3 REST API.

use reqwest::{Client, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{GoogleError, GoogleResult};
use crate::types::{
    AclPage, AclRule, AclScope, ApiErrorBody, CalendarListEntry, CalendarListPage,
    CreatedCalendar, CreatedEvent, EventBody, NewCalendar,
};

pub const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";

/// Bookings are stored in UTC, so new calendars are too.
const NEW_CALENDAR_TIME_ZONE: &str = "UTC";

#[derive(Debug, Clone)]
pub struct CalendarClient {
    http: Client,
    api_base: String,
    access_token: String,
}

impl CalendarClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        CalendarClient {
            http: Client::new(),
            api_base: GOOGLE_CALENDAR_API_BASE.to_string(),
            access_token: access_token.into(),
        }
    }

    /// Point the client somewhere else (tests use a mock server).
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    // CALENDARS:

    /// Every calendar the user can see, across all pages.
    pub async fn list_calendars(&self) -> GoogleResult<Vec<CalendarListEntry>> {
        let url = self.endpoint(&["users", "me", "calendarList"])?;
        let mut calendars = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(url.clone()).bearer_auth(&self.access_token);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            debug!(%url, page_token = ?page_token, "listing calendars");
            let page: CalendarListPage = parse_response(request.send().await?).await?;
            calendars.extend(page.items);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(calendars)
    }

    pub async fn insert_calendar(&self, summary: &str) -> GoogleResult<CreatedCalendar> {
        let body = NewCalendar {
            summary,
            time_zone: NEW_CALENDAR_TIME_ZONE,
        };
        self.post_json(&["calendars"], &body).await
    }

    // EVENTS:

    pub async fn insert_event(
        &self,
        calendar_id: &str,
        event: &EventBody,
    ) -> GoogleResult<CreatedEvent> {
        self.post_json(&["calendars", calendar_id, "events"], event)
            .await
    }

    // ACL:

    pub async fn insert_acl(
        &self,
        calendar_id: &str,
        role: &str,
        email: &str,
    ) -> GoogleResult<AclRule> {
        let rule = AclRule {
            id: String::new(),
            role: role.to_string(),
            scope: AclScope {
                scope_type: "user".to_string(),
                value: Some(email.to_string()),
            },
        };
        self.post_json(&["calendars", calendar_id, "acl"], &rule)
            .await
    }

    pub async fn list_acl(&self, calendar_id: &str) -> GoogleResult<Vec<AclRule>> {
        let url = self.endpoint(&["calendars", calendar_id, "acl"])?;
        let mut rules = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut request = self.http.get(url.clone()).bearer_auth(&self.access_token);
            if let Some(token) = &page_token {
                request = request.query(&[("pageToken", token)]);
            }

            debug!(%url, "listing acl");
            let page: AclPage = parse_response(request.send().await?).await?;
            rules.extend(page.items);

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(rules)
    }

    async fn post_json<B, T>(&self, segments: &[&str], body: &B) -> GoogleResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        debug!(%url, "POST");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .json(body)
            .send()
            .await?;

        parse_response(response).await
    }

    /// Base URL plus percent-encoded path segments (calendar ids contain
    /// `@` and sometimes `#`).
    fn endpoint(&self, segments: &[&str]) -> GoogleResult<Url> {
        let mut url = Url::parse(&self.api_base)?;
        url.path_segments_mut()
            .map_err(|_| GoogleError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

/// Deserialize a 2xx body, or turn anything else into `GoogleError::Api`
/// carrying Google's own message when it sent one.
pub(crate) async fn parse_response<T: DeserializeOwned>(response: Response) -> GoogleResult<T> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GoogleError::Api {
            status: status.as_u16(),
            message: error_message(&body, status.canonical_reason()),
        });
    }

    Ok(response.json().await?)
}

/// Like `parse_response` for endpoints whose body we don't need.
pub(crate) async fn check_response(response: Response) -> GoogleResult<()> {
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(GoogleError::Api {
            status: status.as_u16(),
            message: error_message(&body, status.canonical_reason()),
        });
    }

    Ok(())
}

fn error_message(body: &str, reason: Option<&str>) -> String {
    if let Ok(parsed) = serde_json::from_str::<ApiErrorBody>(body) {
        return parsed.into_message();
    }

    let body = body.trim();
    if !body.is_empty() {
        return body.to_string();
    }

    reason.unwrap_or("Unknown error").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn error_message_prefers_google_message() {
        let body = r#"{"error": {"code": 403, "message": "Insufficient Permission"}}"#;
        assert_eq!(error_message(body, Some("Forbidden")), "Insufficient Permission");

        let body = r#"{"error": "invalid_grant", "error_description": "Token has been expired"}"#;
        assert_eq!(error_message(body, None), "Token has been expired");

        assert_eq!(error_message("upstream exploded", None), "upstream exploded");
        assert_eq!(error_message("", Some("Bad Gateway")), "Bad Gateway");
        assert_eq!(error_message("", None), "Unknown error");
    }

    #[tokio::test]
    async fn list_calendars_follows_pages() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/users/me/calendarList"))
            .and(query_param("pageToken", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "b@group.calendar.google.com", "summary": "B"}]
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/users/me/calendarList"))
            .and(header("Authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "items": [{"id": "ada@example.com", "summary": "ada@example.com", "primary": true}],
                "nextPageToken": "p2"
            })))
            .mount(&server)
            .await;

        let client = CalendarClient::new("tok").with_api_base(server.uri());
        let calendars = client.list_calendars().await.unwrap();

        assert_eq!(calendars.len(), 2);
        assert!(calendars[0].primary);
        assert_eq!(calendars[1].summary, "B");
    }

    #[tokio::test]
    async fn non_2xx_becomes_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/calendars"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": {"code": 401, "message": "Invalid Credentials"}
            })))
            .mount(&server)
            .await;

        let client = CalendarClient::new("stale").with_api_base(server.uri());
        let err = client.insert_calendar("Schedularr").await.unwrap_err();

        match err {
            GoogleError::Api { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid Credentials");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
