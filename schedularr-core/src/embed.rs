//! Embeddable calendar view.

use url::form_urlencoded;

const EMBED_BASE: &str = "https://calendar.google.com/calendar/embed";

/// Public embed URL for a calendar, pinned to UTC like the bookings.
pub fn embed_url(calendar_id: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("src", calendar_id)
        .append_pair("ctz", "UTC")
        .finish();
    format!("{}?{}", EMBED_BASE, query)
}
