//! Centralized theming for the hookline TUI
//!
//! Single source of truth for the colors and styles used by every panel.

use ratatui::style::{Color, Modifier, Style};
use std::sync::RwLock;

use crate::config::ThemeVariant;

/// Global theme variant storage
static THEME_VARIANT: RwLock<ThemeVariant> = RwLock::new(ThemeVariant::Dark);

/// Initialize the theme variant (call once at startup)
pub fn init_theme(variant: ThemeVariant) {
    if let Ok(mut guard) = THEME_VARIANT.write() {
        *guard = variant;
    }
}

/// Get the current theme variant
pub fn current_theme() -> ThemeVariant {
    THEME_VARIANT.read().map(|g| *g).unwrap_or_default()
}

/// Raw colors, resolved against the current variant
mod colors {
    use super::*;

    pub fn bg_status() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::DarkGray,
            ThemeVariant::HighContrast => Color::Black,
        }
    }

    pub fn bg_error() -> Color {
        Color::Red
    }

    pub fn bg_success() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::Green,
            ThemeVariant::HighContrast => Color::LightGreen,
        }
    }

    pub fn fg_primary() -> Color {
        Color::White
    }

    pub fn fg_on_success() -> Color {
        Color::Black
    }

    pub fn fg_secondary() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::Gray,
            ThemeVariant::HighContrast => Color::White,
        }
    }

    pub fn fg_muted() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::DarkGray,
            ThemeVariant::HighContrast => Color::Gray,
        }
    }

    pub fn fg_accent() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::Cyan,
            ThemeVariant::HighContrast => Color::LightCyan,
        }
    }

    pub fn fg_warning() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::Yellow,
            ThemeVariant::HighContrast => Color::LightYellow,
        }
    }

    pub fn fg_good() -> Color {
        Color::Green
    }

    pub fn fg_bad() -> Color {
        Color::LightRed
    }

    pub fn border() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::DarkGray,
            ThemeVariant::HighContrast => Color::White,
        }
    }

    pub fn border_focused() -> Color {
        match current_theme() {
            ThemeVariant::Dark => Color::Cyan,
            ThemeVariant::HighContrast => Color::LightYellow,
        }
    }
}

/// UI symbols
pub mod symbols {
    pub const CURSOR: &str = "│";
    pub const WARNING: &str = "!";
    pub const ERROR_INDICATOR: &str = "●";
    pub const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
}

/// Pre-composed styles for common UI elements
pub struct Theme;

impl Theme {
    // === Text Styles ===

    pub fn text() -> Style {
        Style::default().fg(colors::fg_primary())
    }

    pub fn text_secondary() -> Style {
        Style::default().fg(colors::fg_secondary())
    }

    pub fn text_muted() -> Style {
        Style::default().fg(colors::fg_muted())
    }

    pub fn text_accent() -> Style {
        Style::default().fg(colors::fg_accent())
    }

    pub fn text_warning() -> Style {
        Style::default().fg(colors::fg_warning())
    }

    pub fn label() -> Style {
        Style::default()
            .fg(colors::fg_secondary())
            .add_modifier(Modifier::BOLD)
    }

    /// Score coloring: green when strong, yellow when middling, red when weak
    pub fn score(score: u8) -> Style {
        let fg = match score {
            70..=100 => colors::fg_good(),
            40..=69 => colors::fg_warning(),
            _ => colors::fg_bad(),
        };
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    }

    // === Bars ===

    pub fn status_bar() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_primary())
    }

    pub fn error_bar() -> Style {
        Style::default()
            .bg(colors::bg_error())
            .fg(colors::fg_primary())
    }

    pub fn success_bar() -> Style {
        Style::default()
            .bg(colors::bg_success())
            .fg(colors::fg_on_success())
    }

    pub fn error_indicator() -> Style {
        Style::default()
            .bg(colors::bg_status())
            .fg(colors::fg_bad())
    }

    pub fn help_key() -> Style {
        Style::default().fg(colors::fg_warning())
    }

    pub fn help_desc() -> Style {
        Style::default().fg(colors::fg_muted())
    }

    // === Borders ===

    pub fn border() -> Style {
        Style::default().fg(colors::border())
    }

    pub fn border_focused() -> Style {
        Style::default().fg(colors::border_focused())
    }
}
