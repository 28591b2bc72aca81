//! Google side of schedularr: OAuth sign-in and the Calendar v3 calls the
//! app needs (calendar provisioning, sharing and event insertion).

pub mod auth;
pub mod client;
pub mod error;
pub mod provision;
pub mod sharing;
pub mod submit;
pub mod to_google;
pub mod types;

pub use auth::{AuthState, OAuthClient, OAuthEndpoints, OAuthFlow, PendingLogin};
pub use client::CalendarClient;
pub use error::{GoogleError, GoogleResult};
pub use submit::{BookingSubmitter, SubmitOutcome};
