//! Terminal styling and unit formatting.
//!
//! Colors are plain ANSI escape sequences, resolved once into a
//! [`ColorPalette`] so renderers never branch on terminal capabilities.

use std::ffi::OsStr;

/// ANSI escape codes used by the text renderers.
pub mod colors {
    pub const RESET: &str = "\x1b[0m";
    /// Bright bold white for center and zone names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for secondary details.
    pub const GRAY: &str = "\x1b[90m";
    /// Green for low risk and safest labels.
    pub const GREEN: &str = "\x1b[32m";
    /// Cyan for fastest labels.
    pub const CYAN: &str = "\x1b[36m";
    /// Yellow for medium risk.
    pub const YELLOW: &str = "\x1b[33m";
    /// Red for high risk.
    pub const RED: &str = "\x1b[31m";
}

/// Resolved color codes, either ANSI sequences or empty strings.
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub green: &'static str,
    pub cyan: &'static str,
    pub yellow: &'static str,
    pub red: &'static str,
}

impl ColorPalette {
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            green: colors::GREEN,
            cyan: colors::CYAN,
            yellow: colors::YELLOW,
            red: colors::RED,
        }
    }

    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            green: "",
            cyan: "",
            yellow: "",
            red: "",
        }
    }

    /// `colored()` when stdout may carry ANSI codes, otherwise `plain()`.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    color_allowed(
        std::env::var_os("NO_COLOR").as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn color_allowed(no_color: Option<&OsStr>, term: Option<&str>) -> bool {
    if no_color.is_some() {
        return false;
    }
    !term.is_some_and(|term| term.eq_ignore_ascii_case("dumb"))
}

/// `850 m` below one kilometer, `3.35 km` above.
#[must_use]
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{:.0} m", meters)
    } else {
        format!("{:.2} km", meters / 1000.0)
    }
}

/// `45 s`, `8 min 20 s`, or `1 h 05 min`.
#[must_use]
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.round() as u64;
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);
    match (hours, minutes) {
        (0, 0) => format!("{} s", secs),
        (0, _) => format!("{} min {:02} s", minutes, secs),
        _ => format!("{} h {:02} min", hours, minutes),
    }
}
