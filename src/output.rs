//! # Terminal Output
//!
//! Controls how the commands decorate what they print: status icons, colored
//! paths and whether a progress bar is drawn.
//!
//! The following flags and environment variables are honored:
//! - `--color=never|always|auto`
//! - `NO_COLOR` disables colors when set (see https://no-color.org/)
//! - `CLICOLOR=0` disables colors
//! - `CLICOLOR_FORCE=1` forces colors even when stdout is not a TTY
//! - `TERM=dumb` disables colors
//!
//! ```rust
//! use pandoc_sync::output::{Icon, OutputConfig};
//!
//! let out = OutputConfig::from_env_and_flag("never");
//! assert_eq!(out.icon(Icon::Ok), "[OK]");
//! ```

use std::env;
use std::fmt::Display;
use std::path::Path;

use console::style;

/// Status markers printed in front of command output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Scan,
    Ok,
    Error,
    Warning,
    Info,
    Convert,
    Delete,
    DryRun,
}

impl Icon {
    fn emoji(self) -> &'static str {
        match self {
            Icon::Scan => "🔍",
            Icon::Ok => "✅",
            Icon::Error => "❌",
            Icon::Warning => "⚠️",
            Icon::Info => "📊",
            Icon::Convert => "📝",
            Icon::Delete => "🗑️",
            Icon::DryRun => "🔎",
        }
    }

    fn plain(self) -> &'static str {
        match self {
            Icon::Scan => "[SCAN]",
            Icon::Ok => "[OK]",
            Icon::Error => "[ERR]",
            Icon::Warning => "[WARN]",
            Icon::Info => "[INFO]",
            Icon::Convert => "[CONV]",
            Icon::Delete => "[DEL]",
            Icon::DryRun => "[DRY]",
        }
    }
}

/// Output configuration for colors, icons and progress display.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used.
    pub use_color: bool,
}

impl OutputConfig {
    /// Resolve the `--color` flag against the environment.
    ///
    /// `always` forces colors on (even with `NO_COLOR`), `never` forces them
    /// off, anything else detects support from the environment and terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables colors, even when empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }
        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }
        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }
        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    /// Icon text for this configuration
    pub fn icon(&self, icon: Icon) -> &'static str {
        if self.use_color {
            icon.emoji()
        } else {
            icon.plain()
        }
    }

    /// A path, highlighted when colors are on
    pub fn path(&self, path: &Path) -> String {
        self.paint(path.display(), Color::Path)
    }

    /// A failure message, red when colors are on
    pub fn failure<D: Display>(&self, text: D) -> String {
        self.paint(text, Color::Failure)
    }

    /// A success message, green when colors are on
    pub fn success<D: Display>(&self, text: D) -> String {
        self.paint(text, Color::Success)
    }

    /// Progress bars are only drawn on an interactive, colorful terminal
    pub fn show_progress(&self) -> bool {
        self.use_color && console::Term::stderr().is_term()
    }

    fn paint<D: Display>(&self, text: D, color: Color) -> String {
        if !self.use_color {
            return text.to_string();
        }
        let styled = style(text.to_string());
        match color {
            Color::Path => styled.cyan().to_string(),
            Color::Failure => styled.red().bold().to_string(),
            Color::Success => styled.green().to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

enum Color {
    Path,
    Failure,
    Success,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}
