//! Composable UI component renderers.
//!
//! Every component writes lines to a `&mut dyn Write`, so the same code renders
//! to stdout in the shell and to a `Vec<u8>` in tests.
//!
//! # Components
//!
//! - `header`: Title, subtitle, account and target collection
//! - `footer`: Command hints
//! - `search`: Search box and result cards
//! - `table`: Collection stats and card table
//! - `auth`: Login and registration screens
//! - `empty`: Empty state message

mod auth;
mod empty;
mod footer;
mod header;
mod search;
mod table;

pub use auth::render_auth_screen;
pub use empty::render_empty_state;
pub use footer::render_footer;
pub use header::render_header;
pub use search::{render_search_box, render_search_screen};
pub use table::render_collection_screen;

use crate::ui::helpers::rule;
use crate::ui::theme::Theme;
use std::io::{self, Write};

/// Horizontal separator between sections.
pub fn render_border(out: &mut dyn Write, theme: &Theme, cols: usize) -> io::Result<()> {
    writeln!(out, "{}", rule(cols, &theme.colors.border, theme))
}

/// Inline error line.
pub fn render_error(out: &mut dyn Write, message: &str, theme: &Theme) -> io::Result<()> {
    writeln!(out, "{}", theme.paint(&theme.colors.error_fg, message))
}
