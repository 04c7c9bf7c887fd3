//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;
use serde::Deserialize;

use crate::data::DeviceStatus;

/// Theme preference from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ThemeChoice {
    #[default]
    Auto,
    Dark,
    Light,
}

impl ThemeChoice {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeChoice::Auto => "auto",
            ThemeChoice::Dark => "dark",
            ThemeChoice::Light => "light",
        }
    }
}

/// Color and style theme for the TUI.
///
/// Use [`Theme::auto_detect()`] for automatic theme selection based on
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Whether this is the dark variant.
    pub dark: bool,
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for devices that are up.
    pub up: Color,
    /// Color for devices that are down.
    pub down: Color,
    /// Color for the loading indicator and notifications.
    pub notice: Color,
    /// Color for borders and separators.
    pub border: Color,
    /// Style for header rows in tables.
    pub header: Style,
    /// Style for selected/highlighted rows.
    pub selected: Style,
    /// Style for rows of devices that just went down.
    pub flash: Style,
    /// Style for the active filter.
    pub filter_active: Style,
    /// Style for inactive filters.
    pub filter_inactive: Style,
    /// Style for the error banner.
    pub error: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            dark: true,
            highlight: Color::Cyan,
            up: Color::Green,
            down: Color::Red,
            notice: Color::Yellow,
            border: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            flash: Style::default().bg(Color::Red).fg(Color::White),
            filter_active: Style::default().fg(Color::Black).bg(Color::Cyan),
            filter_inactive: Style::default().fg(Color::Gray),
            error: Style::default().fg(Color::White).bg(Color::Red),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            dark: false,
            highlight: Color::Blue,
            up: Color::Green,
            down: Color::Red,
            notice: Color::Magenta,
            border: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            flash: Style::default().bg(Color::LightRed).fg(Color::Black),
            filter_active: Style::default().fg(Color::White).bg(Color::Blue),
            filter_inactive: Style::default().fg(Color::DarkGray),
            error: Style::default().fg(Color::White).bg(Color::Red),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn from_choice(choice: ThemeChoice) -> Self {
        match choice {
            ThemeChoice::Auto => Self::auto_detect(),
            ThemeChoice::Dark => Self::dark(),
            ThemeChoice::Light => Self::light(),
        }
    }

    /// The other variant.
    pub fn toggled(&self) -> Self {
        if self.dark {
            Self::light()
        } else {
            Self::dark()
        }
    }

    /// Get style for a device status
    pub fn status_style(&self, status: DeviceStatus) -> Style {
        match status {
            DeviceStatus::Up => Style::default().fg(self.up),
            DeviceStatus::Down => Style::default().fg(self.down).add_modifier(Modifier::BOLD),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_switches_variant() {
        let dark = Theme::dark();
        assert!(!dark.toggled().dark);
        assert!(dark.toggled().toggled().dark);
    }

    #[test]
    fn test_explicit_choices() {
        assert!(Theme::from_choice(ThemeChoice::Dark).dark);
        assert!(!Theme::from_choice(ThemeChoice::Light).dark);
    }
}
