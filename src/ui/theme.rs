//! Theme management and ANSI escape sequence generation.
//!
//! Themes are TOML palettes of hex colors. Three are built in, a custom one
//! can be loaded from a file, and [`Theme::plain`] disables escape sequences
//! entirely (used when output is not a terminal, and in tests).
//!
//! # Built-in Themes
//!
//! - `pokedex`: Red header, yellow accents (default)
//! - `catppuccin-mocha`: Dark theme with warm tones
//! - `catppuccin-latte`: Light theme with soft pastels
//!
//! # TOML Format
//!
//! ```toml
//! name = "my-theme"
//!
//! [colors]
//! header_fg = "#cdd6f4"
//! header_bg = "#1e1e2e"        # optional
//! text_normal = "#cdd6f4"
//! text_dim = "#6c7086"
//! border = "#45475a"
//! search_bar_border = "#f5c2e7"
//! match_highlight_fg = "#1e1e2e"
//! match_highlight_bg = "#f9e2af"
//! empty_state_fg = "#89b4fa"
//! price_fg = "#a6e3a1"
//! action_fg = "#f5c2e7"
//! action_disabled_fg = "#585b70"
//! error_fg = "#f38ba8"
//! success_fg = "#a6e3a1"
//! ```
//!
//! # Example
//!
//! ```rust
//! use binderbuilder::ui::theme::Theme;
//!
//! let theme = Theme::from_name("catppuccin-mocha").unwrap();
//! println!("{}Bold{}", theme.bold(), theme.reset());
//! ```

use crate::domain::error::{BinderError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the theme used when none is configured.
pub const DEFAULT_THEME: &str = "pokedex";

/// Color scheme for UI rendering.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,

    /// Emit ANSI escape sequences. Off for [`Theme::plain`].
    #[serde(default = "default_ansi")]
    pub ansi: bool,
}

const fn default_ansi() -> bool {
    true
}

/// Hex colors (`"#cdd6f4"`) for every styled element.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ThemeColors {
    pub header_fg: String,
    #[serde(default)]
    pub header_bg: Option<String>,

    pub text_normal: String,
    /// Footer, secondary card info.
    pub text_dim: String,

    pub border: String,
    pub search_bar_border: String,

    /// Fuzzy match highlight in card names.
    pub match_highlight_fg: String,
    pub match_highlight_bg: String,

    pub empty_state_fg: String,
    pub price_fg: String,

    /// Enabled add control.
    pub action_fg: String,
    /// `Login to Add`, `No Collection`, `Adding...`.
    pub action_disabled_fg: String,

    pub error_fg: String,
    pub success_fg: String,
}

impl Theme {
    /// Loads a built-in theme by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let toml_str = match name {
            "pokedex" | "default" => include_str!("../../themes/pokedex.toml"),
            "catppuccin-mocha" => include_str!("../../themes/catppuccin-mocha.toml"),
            "catppuccin-latte" => include_str!("../../themes/catppuccin-latte.toml"),
            "plain" => return Some(Self::plain()),
            _ => return None,
        };

        toml::from_str(toml_str).ok()
    }

    /// Loads a theme from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`BinderError::Config`] if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            BinderError::Config(format!("failed to read theme file {}: {e}", path.display()))
        })?;

        toml::from_str(&contents)
            .map_err(|e| BinderError::Config(format!("failed to parse theme TOML: {e}")))
    }

    /// Resolves a configured theme: a path to a `.toml` file or a built-in name.
    ///
    /// Unknown names and unreadable files fall back to the default theme.
    #[must_use]
    pub fn resolve(name_or_path: &str) -> Self {
        if Path::new(name_or_path)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
        {
            return Self::from_file(name_or_path).unwrap_or_else(|e| {
                tracing::debug!(theme_file = %name_or_path, error = %e, "failed to load theme file, using default");
                Self::default()
            });
        }

        Self::from_name(name_or_path).unwrap_or_else(|| {
            tracing::debug!(theme_name = %name_or_path, "unknown theme, using default");
            Self::default()
        })
    }

    /// A theme that emits no escape sequences at all.
    #[must_use]
    pub fn plain() -> Self {
        let none = String::new;
        Self {
            name: "plain".to_string(),
            colors: ThemeColors {
                header_fg: none(),
                header_bg: None,
                text_normal: none(),
                text_dim: none(),
                border: none(),
                search_bar_border: none(),
                match_highlight_fg: none(),
                match_highlight_bg: none(),
                empty_state_fg: none(),
                price_fg: none(),
                action_fg: none(),
                action_disabled_fg: none(),
                error_fg: none(),
                success_fg: none(),
            },
            ansi: false,
        }
    }

    /// Converts a hex color to RGB, `None` if it is not `#rrggbb`.
    fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
        let hex = hex.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some((r, g, b))
    }

    /// 24-bit foreground escape for `hex`; empty for plain themes or bad colors.
    #[must_use]
    pub fn fg(&self, hex: &str) -> String {
        match Self::hex_to_rgb(hex) {
            Some((r, g, b)) if self.ansi => format!("\u{001b}[38;2;{r};{g};{b}m"),
            _ => String::new(),
        }
    }

    /// 24-bit background escape for `hex`; empty for plain themes or bad colors.
    #[must_use]
    pub fn bg(&self, hex: &str) -> String {
        match Self::hex_to_rgb(hex) {
            Some((r, g, b)) if self.ansi => format!("\u{001b}[48;2;{r};{g};{b}m"),
            _ => String::new(),
        }
    }

    #[must_use]
    pub const fn bold(&self) -> &'static str {
        if self.ansi {
            "\u{001b}[1m"
        } else {
            ""
        }
    }

    #[must_use]
    pub const fn dim(&self) -> &'static str {
        if self.ansi {
            "\u{001b}[2m"
        } else {
            ""
        }
    }

    #[must_use]
    pub const fn reset(&self) -> &'static str {
        if self.ansi {
            "\u{001b}[0m"
        } else {
            ""
        }
    }

    /// Wraps `text` in a foreground color and a reset.
    #[must_use]
    pub fn paint(&self, hex: &str, text: &str) -> String {
        if !self.ansi {
            return text.to_string();
        }
        format!("{}{text}{}", self.fg(hex), self.reset())
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_name(DEFAULT_THEME).unwrap_or_else(Self::plain)
    }
}
