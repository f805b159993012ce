//! Semantic color theme for terminal diagnostics
//!
//! - `ACTIVE` => blue - per-source announcements
//! - `SUCCESS` => green - final summary of a clean run
//! - `WARNING` => yellow - skips and refused copies
//! - `FAIL` => red - failed tasks and setup errors

use std::sync::LazyLock;

use owo_colors::Style;

/// Semantic color definitions for terminal output
pub struct SemanticColors {
    /// Blue - announcements
    pub active: Style,
    /// Green - success messages
    pub success: Style,
    /// Yellow - warnings and refusals
    pub warning: Style,
    /// Red - errors
    pub fail: Style,
}

impl Default for SemanticColors {
    fn default() -> Self {
        Self {
            active: Style::new().blue(),
            success: Style::new().green(),
            warning: Style::new().yellow(),
            fail: Style::new().red(),
        }
    }
}

/// Global default theme
pub static COLORS: LazyLock<SemanticColors> = LazyLock::new(SemanticColors::default);

/// Apply `style` to `text` only when `enabled`
pub fn paint(text: &str, style: Style, enabled: bool) -> String {
    use owo_colors::OwoColorize;

    if enabled {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}
