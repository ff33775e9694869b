//! Visual theme and styling.

use console::Style;
use std::sync::atomic::{AtomicBool, Ordering};

static COLORS_DISABLED: AtomicBool = AtomicBool::new(false);

/// The setup tool's visual theme.
#[derive(Debug, Clone)]
pub struct GearlogTheme {
    /// Style for success messages (green).
    pub success: Style,
    /// Style for warning messages (yellow).
    pub warning: Style,
    /// Style for error messages (red bold).
    pub error: Style,
    /// Style for informational elements (cyan).
    pub info: Style,
    /// Style for dim/secondary text.
    pub dim: Style,
    /// Style for highlighted/important text (bold).
    pub highlight: Style,
    /// Style for headers (cyan bold).
    pub header: Style,
    /// Style for commands shown in output (dim italic).
    pub command: Style,
    /// Style for box-drawing borders (dim).
    pub border: Style,
    /// Style for contextual hints (cyan dim).
    pub hint: Style,
}

impl Default for GearlogTheme {
    fn default() -> Self {
        Self::new()
    }
}

impl GearlogTheme {
    pub fn new() -> Self {
        Self {
            success: Style::new().green(),
            warning: Style::new().yellow(),
            error: Style::new().red().bold(),
            info: Style::new().cyan(),
            dim: Style::new().dim(),
            highlight: Style::new().bold(),
            header: Style::new().bold().cyan(),
            command: Style::new().dim().italic(),
            border: Style::new().dim(),
            hint: Style::new().cyan().dim(),
        }
    }

    /// Create a theme without colors (for non-TTY or --no-color).
    pub fn plain() -> Self {
        Self {
            success: Style::new(),
            warning: Style::new(),
            error: Style::new(),
            info: Style::new(),
            dim: Style::new(),
            highlight: Style::new(),
            header: Style::new(),
            command: Style::new(),
            border: Style::new(),
            hint: Style::new(),
        }
    }

    /// Theme matching the current color settings.
    pub fn detect() -> Self {
        if should_use_colors() {
            Self::new()
        } else {
            Self::plain()
        }
    }

    pub fn format_success(&self, msg: &str) -> String {
        format!("{}", self.success.apply_to(format!("✓ {}", msg)))
    }

    pub fn format_warning(&self, msg: &str) -> String {
        format!("{}", self.warning.apply_to(format!("⚠ {}", msg)))
    }

    pub fn format_error(&self, msg: &str) -> String {
        format!("{}", self.error.apply_to(format!("✗ {}", msg)))
    }

    pub fn format_skipped(&self, msg: &str) -> String {
        format!("{}", self.dim.apply_to(format!("○ {}", msg)))
    }

    /// Format a header banner.
    pub fn format_header(&self, title: &str) -> String {
        let rule = "=".repeat(title.chars().count() + 4);
        format!(
            "{}\n{}\n{}",
            self.header.apply_to(&rule),
            self.header.apply_to(format!("  {}", title)),
            self.header.apply_to(&rule)
        )
    }
}

/// Turn colors off for the rest of the process (`--no-color`).
pub fn set_colors_enabled(enabled: bool) {
    COLORS_DISABLED.store(!enabled, Ordering::SeqCst);
    console::set_colors_enabled(enabled);
    console::set_colors_enabled_stderr(enabled);
}

/// Check if colors should be enabled.
pub fn should_use_colors() -> bool {
    if COLORS_DISABLED.load(Ordering::SeqCst) {
        return false;
    }

    // https://no-color.org/
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    console::Term::stdout().is_term()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_formats_status_icons() {
        let theme = GearlogTheme::plain();
        assert_eq!(theme.format_success("Done"), "✓ Done");
        assert_eq!(theme.format_warning("Careful"), "⚠ Careful");
        assert_eq!(theme.format_error("Failed"), "✗ Failed");
        assert_eq!(theme.format_skipped("Skipped"), "○ Skipped");
    }

    #[test]
    fn header_is_framed() {
        let theme = GearlogTheme::plain();
        let header = theme.format_header("GearLog");
        let lines: Vec<&str> = header.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "===========");
        assert_eq!(lines[1], "  GearLog");
    }

    #[test]
    fn default_matches_new() {
        assert_eq!(
            GearlogTheme::default().format_success("x"),
            GearlogTheme::new().format_success("x")
        );
    }
}
