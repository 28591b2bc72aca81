//! End time and fee arithmetic.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use thiserror::Error;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Minutes a start time may fall on.
pub const TIME_GRID_MINUTES: [u32; 4] = [0, 15, 30, 45];

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcError {
    #[error("time-increment")]
    TimeIncrement,
    #[error("bad-date")]
    BadDate,
    #[error("duration")]
    Duration,
}

/// Result of a successful computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Computed {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub fee: i64,
}

impl Computed {
    pub fn end_date(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }

    pub fn end_time(&self) -> String {
        self.end.format("%H:%M").to_string()
    }
}

pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()
}

/// Accepts `HH:MM` and `HH:MM:SS`.
pub fn parse_time(time: &str) -> Option<NaiveTime> {
    let time = time.trim();
    NaiveTime::parse_from_str(time, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time, "%H:%M:%S"))
        .ok()
}

/// True iff `time` parses and its minute is 0, 15, 30 or 45.
pub fn validate_time(time: &str) -> bool {
    parse_time(time).is_some_and(|t| TIME_GRID_MINUTES.contains(&t.minute()))
}

/// Fee in whole currency units, rounded half away from zero.
pub fn fee(duration_hours: f64, hourly_rate: f64) -> i64 {
    (duration_hours * hourly_rate).round() as i64
}

/// Start and end instants, without the 15-minute grid check.
pub fn span(
    start_date: &str,
    start_time: &str,
    duration_hours: f64,
) -> Result<(NaiveDateTime, NaiveDateTime), CalcError> {
    if !duration_hours.is_finite() || duration_hours <= 0.0 {
        return Err(CalcError::Duration);
    }

    let date = parse_date(start_date).ok_or(CalcError::BadDate)?;
    let time = parse_time(start_time).ok_or(CalcError::BadDate)?;
    let start = date.and_time(time);

    let millis = (duration_hours * MS_PER_HOUR).round() as i64;
    let end = start
        .checked_add_signed(Duration::milliseconds(millis))
        .ok_or(CalcError::BadDate)?;

    Ok((start, end))
}

pub fn compute(
    start_date: &str,
    start_time: &str,
    duration_hours: f64,
    hourly_rate: f64,
) -> Result<Computed, CalcError> {
    if !validate_time(start_time) {
        return Err(CalcError::TimeIncrement);
    }

    let (start, end) = span(start_date, start_time, duration_hours)?;

    Ok(Computed {
        start,
        end,
        fee: fee(duration_hours, hourly_rate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_times() {
        for t in ["00:00", "09:15", "14:30", "23:45", "14:00:00"] {
            assert!(validate_time(t), "{t} should be on the grid");
        }
        for t in ["14:10", "09:59", "", "noon", "25:00"] {
            assert!(!validate_time(t), "{t} should be rejected");
        }
    }

    #[test]
    fn visit_mars() {
        let computed = compute("2024-06-01", "14:00", 1.5, 20.0).unwrap();

        assert_eq!(computed.end_date(), "2024-06-01");
        assert_eq!(computed.end_time(), "15:30");
        assert_eq!(computed.fee, 30);
    }

    #[test]
    fn end_rolls_over_midnight() {
        let computed = compute("2024-12-31", "23:00", 2.25, 10.0).unwrap();

        assert_eq!(computed.end_date(), "2025-01-01");
        assert_eq!(computed.end_time(), "01:15");
    }

    #[test]
    fn end_is_start_plus_duration() {
        for quarters in 1..=96 {
            let hours = quarters as f64 * 0.25;
            let computed = compute("2024-02-28", "22:45", hours, 0.0).unwrap();
            assert_eq!(
                computed.end - computed.start,
                Duration::minutes(quarters * 15)
            );
        }
    }

    #[test]
    fn fee_rounding() {
        assert_eq!(fee(2.5, 20.0), 50);
        assert_eq!(fee(0.5, 15.0), 8);
        assert_eq!(fee(0.25, 10.0), 3);
        assert_eq!(fee(1.0, 0.0), 0);
    }

    #[test]
    fn invalid_inputs() {
        assert_eq!(
            compute("2024-06-01", "14:10", 1.0, 20.0),
            Err(CalcError::TimeIncrement)
        );
        assert_eq!(
            compute("2024-02-30", "14:00", 1.0, 20.0),
            Err(CalcError::BadDate)
        );
        assert_eq!(
            compute("not a date", "14:00", 1.0, 20.0),
            Err(CalcError::BadDate)
        );
        assert_eq!(
            compute("2024-06-01", "14:00", 0.0, 20.0),
            Err(CalcError::Duration)
        );
        assert_eq!(
            compute("2024-06-01", "14:00", f64::NAN, 20.0),
            Err(CalcError::Duration)
        );
    }

    #[test]
    fn span_ignores_grid() {
        let (start, end) = span("2024-06-01", "14:10", 1.0).unwrap();
        assert_eq!(end - start, Duration::hours(1));
    }
}
