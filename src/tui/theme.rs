//! Theme support for the TUI.
//!
//! Two built-in themes, selected by name from the `[ui]` config section.

use ratatui::style::Color;

use crate::domain::{Priority, RiskLevel};

/// A complete color theme for the TUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Theme name for display and configuration
    pub name: String,
    /// Primary accent color (header, active stage, focused field)
    pub primary: Color,
    /// Secondary accent color (completed stages, confirmations)
    pub secondary: Color,
    /// Main text color
    pub text: Color,
    /// Dimmed text color (labels, secondary info)
    pub text_dim: Color,
    /// Muted text color (placeholders, hints, pending stages)
    pub text_muted: Color,
    /// Background color (Reset uses terminal default)
    pub background: Color,
    /// Border color
    pub border: Color,
    /// Low risk / success
    pub success: Color,
    /// Elevated risk / medium priority
    pub warning: Color,
    /// High risk / error banner
    pub error: Color,
    /// Critical priority
    pub critical: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    /// Default theme - emerald on the terminal's own background.
    pub fn default_theme() -> Self {
        Self {
            name: "default".to_string(),
            primary: Color::Rgb(16, 185, 129),     // Emerald-500
            secondary: Color::Rgb(52, 211, 153),   // Emerald-400
            text: Color::Rgb(226, 232, 240),       // Slate-200
            text_dim: Color::Rgb(148, 163, 184),   // Slate-400
            text_muted: Color::Rgb(100, 116, 139), // Slate-500
            background: Color::Reset,
            border: Color::Rgb(51, 65, 85),        // Slate-700
            success: Color::Rgb(34, 197, 94),      // Green
            warning: Color::Rgb(234, 179, 8),      // Yellow
            error: Color::Rgb(239, 68, 68),        // Red
            critical: Color::Rgb(217, 70, 239),    // Fuchsia
        }
    }

    /// Midnight theme - indigo on a near-black background.
    pub fn midnight() -> Self {
        Self {
            name: "midnight".to_string(),
            primary: Color::Rgb(129, 140, 248),    // Indigo-400
            secondary: Color::Rgb(96, 165, 250),   // Blue-400
            text: Color::Rgb(241, 245, 249),       // Slate-100
            text_dim: Color::Rgb(148, 163, 184),   // Slate-400
            text_muted: Color::Rgb(71, 85, 105),   // Slate-600
            background: Color::Rgb(2, 6, 23),      // Slate-950
            border: Color::Rgb(30, 41, 59),        // Slate-800
            success: Color::Rgb(74, 222, 128),     // Green-400
            warning: Color::Rgb(251, 191, 36),     // Amber-400
            error: Color::Rgb(248, 113, 113),      // Red-400
            critical: Color::Rgb(232, 121, 249),   // Fuchsia-400
        }
    }

    /// Get a theme by name (case-insensitive).
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" => Some(Self::default_theme()),
            "midnight" => Some(Self::midnight()),
            _ => None,
        }
    }

    /// List all available built-in theme names.
    pub fn available_themes() -> Vec<&'static str> {
        vec!["default", "midnight"]
    }

    /// Color of a risk band.
    pub fn risk_color(&self, level: RiskLevel) -> Color {
        match level {
            RiskLevel::Low => self.success,
            RiskLevel::Elevated => self.warning,
            RiskLevel::High => self.error,
        }
    }

    /// Color of a recommendation priority.
    pub fn priority_color(&self, priority: Priority) -> Color {
        match priority {
            Priority::Low => self.text_dim,
            Priority::Medium => self.warning,
            Priority::High => self.error,
            Priority::Critical => self.critical,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme() {
        let theme = Theme::default();
        assert_eq!(theme.name, "default");
    }

    #[test]
    fn test_theme_by_name() {
        assert!(Theme::by_name("midnight").is_some());
        assert!(Theme::by_name("MIDNIGHT").is_some());
        assert!(Theme::by_name("dracula").is_none());
    }

    #[test]
    fn test_all_builtin_themes_valid() {
        for name in Theme::available_themes() {
            let theme = Theme::by_name(name).unwrap_or_else(|| panic!("Theme {} should exist", name));
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn test_risk_and_priority_colors() {
        let theme = Theme::default();
        assert_eq!(theme.risk_color(RiskLevel::High), theme.error);
        assert_eq!(theme.risk_color(RiskLevel::Low), theme.success);
        assert_eq!(theme.priority_color(Priority::Critical), theme.critical);
        assert_ne!(theme.priority_color(Priority::Low), theme.priority_color(Priority::High));
    }
}
