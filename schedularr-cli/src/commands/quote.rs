use anyhow::Result;
use schedularr_core::booking::CalcError;
use schedularr_core::booking::calc::compute;

use super::open_settings;
use crate::render::render_quote;

pub fn run(date: &str, time: &str, duration_hours: f64) -> Result<()> {
    let store = open_settings()?;
    let settings = store.settings();

    let computed = compute(date, time, duration_hours, settings.hourly_rate)
        .map_err(|e| anyhow::anyhow!(describe(e)))?;

    println!(
        "{}",
        render_quote(
            &computed.end_date(),
            &computed.end_time(),
            computed.fee,
            &settings.currency
        )
    );

    Ok(())
}

fn describe(error: CalcError) -> &'static str {
    match error {
        CalcError::TimeIncrement => "Start time must be on a quarter hour (:00, :15, :30 or :45)",
        CalcError::BadDate => "Start date and time must look like 2024-06-01 and 14:00",
        CalcError::Duration => "Duration must be a positive number of hours",
    }
}
