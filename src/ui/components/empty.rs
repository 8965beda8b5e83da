//! Empty state component.

use crate::ui::theme::Theme;
use crate::ui::viewmodel::EmptyState;
use std::io::{self, Write};

/// Renders a centered two-line message with a blank line above.
pub fn render_empty_state(out: &mut dyn Write, empty: &EmptyState, theme: &Theme, cols: usize) -> io::Result<()> {
    writeln!(out)?;
    for (text, color, bold) in [
        (&empty.message, &theme.colors.empty_state_fg, true),
        (&empty.subtitle, &theme.colors.text_dim, false),
    ] {
        if text.is_empty() {
            continue;
        }
        let left = cols.saturating_sub(text.chars().count()) / 2;
        let weight = if bold { theme.bold() } else { "" };
        writeln!(out, "{}{weight}{}", " ".repeat(left), theme.paint(color, text))?;
    }
    Ok(())
}
