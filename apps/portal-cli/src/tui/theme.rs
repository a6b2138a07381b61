//! Theme system for the dashboard.
//!
//! Provides the Toma brand theme and a terminal-adaptive theme that keeps
//! the user's own color scheme.

use portal_core::NoticeLevel;
use ratatui::style::Color;
use std::env;

/// Check if the terminal supports true color (24-bit RGB).
fn supports_true_color() -> bool {
    if let Ok(colorterm) = env::var("COLORTERM") {
        let ct = colorterm.to_lowercase();
        if ct == "truecolor" || ct == "24bit" {
            return true;
        }
    }

    if let Ok(term) = env::var("TERM") {
        let t = term.to_lowercase();
        if t.contains("truecolor") || t.contains("24bit") || t.contains("direct") {
            return true;
        }
    }

    false
}

/// Theme mode selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    /// Toma brand theme (dark)
    #[default]
    Toma,
    /// ANSI colors from the terminal palette
    Terminal,
}

/// Color palette for the dashboard.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    // Backgrounds
    pub bg: Color,
    pub bg_panel: Color,
    pub bg_selection: Color,
    pub bg_input: Color,

    // Borders
    pub border: Color,
    pub border_active: Color,

    // Text
    pub text: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    pub accent: Color,

    // Semantic colors
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,

    pub spinner: Color,
}

impl Theme {
    /// Toma brand theme. Uses RGB when the terminal advertises true color,
    /// otherwise the 256-color palette.
    pub fn toma() -> Self {
        if supports_true_color() {
            Self::toma_rgb()
        } else {
            Self::toma_256()
        }
    }

    fn toma_rgb() -> Self {
        Self {
            bg: Color::Rgb(0x0B, 0x10, 0x1A),
            bg_panel: Color::Rgb(0x14, 0x1B, 0x2A),
            bg_selection: Color::Rgb(0x23, 0x2F, 0x48),
            bg_input: Color::Rgb(0x1C, 0x25, 0x38),

            border: Color::Rgb(0x3A, 0x46, 0x5E),
            border_active: Color::Rgb(0x4F, 0x8C, 0xFF), // brand blue

            text: Color::Rgb(0xF5, 0xF7, 0xFA),
            text_secondary: Color::Rgb(0xC9, 0xD1, 0xDE),
            text_muted: Color::Rgb(0x8A, 0x95, 0xA8),

            accent: Color::Rgb(0x4F, 0x8C, 0xFF),

            success: Color::Rgb(0x5F, 0xD3, 0x8D),
            warning: Color::Rgb(0xF2, 0xC1, 0x4E),
            error: Color::Rgb(0xEF, 0x6B, 0x6B),
            info: Color::Rgb(0x7F, 0xB2, 0xF0),

            spinner: Color::Rgb(0xB9, 0x9C, 0xF7),
        }
    }

    /// For terminals like macOS Terminal.app that lack true color.
    fn toma_256() -> Self {
        // 232-255: grayscale, 16-231: 6x6x6 color cube
        Self {
            bg: Color::Indexed(233),
            bg_panel: Color::Indexed(235),
            bg_selection: Color::Indexed(237),
            bg_input: Color::Indexed(236),

            border: Color::Indexed(240),
            border_active: Color::Indexed(69),

            text: Color::Indexed(255),
            text_secondary: Color::Indexed(252),
            text_muted: Color::Indexed(245),

            accent: Color::Indexed(69),

            success: Color::Indexed(78),
            warning: Color::Indexed(221),
            error: Color::Indexed(203),
            info: Color::Indexed(111),

            spinner: Color::Indexed(183),
        }
    }

    /// Terminal-adaptive theme using ANSI colors.
    pub fn terminal() -> Self {
        Self {
            bg: Color::Reset,
            bg_panel: Color::Reset,
            bg_selection: Color::DarkGray,
            bg_input: Color::Reset,

            border: Color::DarkGray,
            border_active: Color::Blue,

            text: Color::Reset,
            text_secondary: Color::Gray,
            text_muted: Color::DarkGray,

            accent: Color::Blue,

            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,

            spinner: Color::Magenta,
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Toma => Self::toma(),
            ThemeMode::Terminal => Self::terminal(),
        }
    }

    /// Color for a toast of the given level.
    pub fn notice(&self, level: NoticeLevel) -> Color {
        match level {
            NoticeLevel::Success => self.success,
            NoticeLevel::Warn => self.warning,
            NoticeLevel::Error => self.error,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::toma()
    }
}
