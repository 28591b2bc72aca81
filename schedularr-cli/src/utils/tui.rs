use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use schedularr_core::config::Theme;

pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&["-", "\\", "|", "/"])
            .template("{msg} {spinner}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.into());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Color each character of `text` along the theme's gradient.
pub fn gradient(text: &str, theme: Theme) -> String {
    let ((r0, g0, b0), (r1, g1, b1)) = theme.gradient();
    let chars: Vec<char> = text.chars().collect();
    let steps = chars.len().saturating_sub(1).max(1) as f32;

    chars
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let t = i as f32 / steps;
            let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
            c.truecolor(mix(r0, r1), mix(g0, g1), mix(b0, b1))
                .to_string()
        })
        .collect()
}

/// Text in the theme's accent color.
pub fn accent(text: &str, theme: Theme) -> String {
    let (r, g, b) = theme.accent();
    text.truecolor(r, g, b).to_string()
}
