//! Color theme system for hunkpeek.
//!
//! A `Theme` holds named `ratatui::style::Color` fields covering every UI surface
//! hunkpeek renders. Two built-in themes are provided:
//!
//! - `dark` — uses ANSI 16 colors (`Color::Reset`, `Color::DarkGray`, etc.) so it
//!   works on any terminal including 256-color SSH sessions with no truecolor support.
//! - `catppuccin_mocha` — Catppuccin Mocha palette in RGB; requires truecolor.

use ratatui::style::Color;
use tracing::warn;

/// All color values used across hunkpeek's UI surfaces.
///
/// Callers use `theme.field` directly inside `Style::default().fg(theme.border_active)`.
#[derive(Debug, Clone)]
pub struct Theme {
    // Panel borders
    /// Border color for the hunk panel and overlays.
    pub border_active: Color,
    /// Border color for the file view.
    pub border_inactive: Color,

    // Raw diff view
    pub diff_added: Color,
    pub diff_removed: Color,
    pub diff_context: Color,
    /// Color for hunk header lines (`@@ ... @@`).
    pub diff_hunk_header: Color,

    // Gutter markers in the file view
    pub gutter_added: Color,
    pub gutter_modified: Color,
    pub gutter_removed: Color,
    /// Line number column.
    pub line_number: Color,

    /// Background of the cursor line and of the highlighted hunk line.
    pub cursor_line_bg: Color,

    // Status bar
    pub status_bar_bg: Color,
    pub status_bar_fg: Color,
    /// Mode indicator color.
    pub status_mode_normal: Color,
    /// Status messages reporting a failure.
    pub status_error: Color,

    // General
    /// Application background (used for clearing areas).
    pub background: Color,
}

impl Theme {
    /// Returns the built-in dark theme using ANSI 16 colors.
    ///
    /// Works on all terminals: 16-color, 256-color, and truecolor.
    pub fn dark() -> Self {
        Self {
            border_active: Color::Cyan,
            border_inactive: Color::DarkGray,

            diff_added: Color::Green,
            diff_removed: Color::Red,
            diff_context: Color::Reset,
            diff_hunk_header: Color::Cyan,

            gutter_added: Color::Green,
            gutter_modified: Color::Yellow,
            gutter_removed: Color::Red,
            line_number: Color::DarkGray,

            cursor_line_bg: Color::Indexed(236),

            status_bar_bg: Color::DarkGray,
            status_bar_fg: Color::White,
            status_mode_normal: Color::Cyan,
            status_error: Color::LightRed,

            background: Color::Reset,
        }
    }

    /// Returns the Catppuccin Mocha theme using RGB truecolor values.
    ///
    /// Palette source: <https://github.com/catppuccin/catppuccin> Mocha variant.
    pub fn catppuccin_mocha() -> Self {
        let green = Color::Rgb(166, 227, 161); // #a6e3a1
        let red = Color::Rgb(243, 139, 168); // #f38ba8
        let yellow = Color::Rgb(249, 226, 175); // #f9e2af
        let teal = Color::Rgb(148, 226, 213); // #94e2d5
        let lavender = Color::Rgb(180, 190, 254); // #b4befe
        let overlay1 = Color::Rgb(127, 132, 156); // #7f849c
        let surface0 = Color::Rgb(49, 50, 68); // #313244
        let surface1 = Color::Rgb(69, 71, 90); // #45475a
        let base = Color::Rgb(30, 30, 46); // #1e1e2e
        let text = Color::Rgb(205, 214, 244); // #cdd6f4
        let maroon = Color::Rgb(235, 160, 172); // #eba0ac

        Self {
            border_active: lavender,
            border_inactive: overlay1,

            diff_added: green,
            diff_removed: red,
            diff_context: text,
            diff_hunk_header: teal,

            gutter_added: green,
            gutter_modified: yellow,
            gutter_removed: red,
            line_number: overlay1,

            cursor_line_bg: surface0,

            status_bar_bg: surface1,
            status_bar_fg: text,
            status_mode_normal: lavender,
            status_error: maroon,

            background: base,
        }
    }

    /// Resolves a theme name string to the corresponding built-in theme.
    ///
    /// Unknown names fall back to `dark()` so a typo in config never prevents
    /// startup.
    ///
    /// # Arguments
    ///
    /// * `name` — theme name from config, e.g. `"dark"` or `"catppuccin-mocha"`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "catppuccin-mocha" | "catppuccin_mocha" => Self::catppuccin_mocha(),
            "dark" => Self::dark(),
            other => {
                warn!(theme = %other, "unknown theme, falling back to 'dark'");
                Self::dark()
            }
        }
    }
}
