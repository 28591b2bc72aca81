pub mod tui;

/// Parse a duration given either as hours ("1.5") or in humantime form
/// ("90m", "1h 30m").
pub fn parse_duration_hours(input: &str) -> Result<f64, String> {
    let input = input.trim();

    if let Ok(hours) = input.parse::<f64>() {
        return Ok(hours);
    }

    humantime::parse_duration(input)
        .map(|d| d.as_secs_f64() / 3600.0)
        .map_err(|e| format!("'{}' is not a duration: {}", input, e))
}
