//! Core types for schedularr.
//!
//! This crate holds everything that doesn't talk to Google:
//! - `config` for persisted settings and OAuth client configuration
//! - `session` for the signed-in user's tokens
//! - `booking` for the booking form, time/fee arithmetic and validation
//! - `embed` for the calendar embed URL

pub mod booking;
pub mod config;
pub mod embed;
pub mod error;
pub mod session;

pub use error::{SchedularrError, SchedularrResult};
