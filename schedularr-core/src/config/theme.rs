//! Color themes for inputs and buttons.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::SchedularrError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Sunset,
    Ocean,
    Forest,
    Berry,
    Mono,
}

/// (theme, name, gradient start, gradient end)
const THEMES: &[(Theme, &str, (u8, u8, u8), (u8, u8, u8))] = &[
    (Theme::Sunset, "sunset", (255, 94, 98), (255, 195, 113)),
    (Theme::Ocean, "ocean", (33, 147, 176), (109, 213, 237)),
    (Theme::Forest, "forest", (19, 78, 94), (113, 178, 128)),
    (Theme::Berry, "berry", (142, 45, 226), (74, 0, 224)),
    (Theme::Mono, "mono", (67, 67, 67), (160, 160, 160)),
];

impl Theme {
    pub const ALL: [Theme; 5] = [
        Theme::Sunset,
        Theme::Ocean,
        Theme::Forest,
        Theme::Berry,
        Theme::Mono,
    ];

    fn entry(self) -> &'static (Theme, &'static str, (u8, u8, u8), (u8, u8, u8)) {
        // Every variant has exactly one row.
        THEMES
            .iter()
            .find(|(theme, ..)| *theme == self)
            .unwrap_or(&THEMES[0])
    }

    pub fn name(self) -> &'static str {
        self.entry().1
    }

    /// Start and end colors of the gradient, as RGB.
    pub fn gradient(self) -> ((u8, u8, u8), (u8, u8, u8)) {
        let (_, _, from, to) = *self.entry();
        (from, to)
    }

    /// Single accent color for terminals (the gradient start).
    pub fn accent(self) -> (u8, u8, u8) {
        self.gradient().0
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Theme {
    type Err = SchedularrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        THEMES
            .iter()
            .find(|(_, name, ..)| *name == wanted)
            .map(|(theme, ..)| *theme)
            .ok_or_else(|| SchedularrError::UnknownTheme(s.to_string()))
    }
}
