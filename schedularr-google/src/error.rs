//! Error types for Google calls.

use std::time::Duration;

use schedularr_core::SchedularrError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GoogleError {
    #[error("Google API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Calendar operation failed: {0}")]
    CalendarOperation(String),

    #[error("No free calendar name for '{base}' after {attempts} attempts")]
    NameAttemptsExhausted { base: String, attempts: u32 },

    #[error("Invalid email address: '{0}'")]
    InvalidEmail(String),

    #[error("Failed to share calendar: {0}")]
    ShareFailed(String),

    #[error("A booking is already being submitted")]
    SubmissionInProgress,

    #[error("Not signed in. Run `schedularr auth login` first.")]
    NotSignedIn,

    #[error("OAuth error: {0}")]
    Auth(String),

    #[error("Sign-in timed out after {}s", .0.as_secs())]
    AuthTimeout(Duration),

    #[error("Sign-in cancelled")]
    AuthCancelled,

    #[error(transparent)]
    Core(#[from] SchedularrError),
}

impl GoogleError {
    /// Message suitable for a one-line banner (the API's own message when
    /// there is one).
    pub fn user_message(&self) -> String {
        match self {
            GoogleError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type GoogleResult<T> = Result<T, GoogleError>;
