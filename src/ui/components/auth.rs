//! Login and registration screens.

use super::render_error;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::AuthScreen;
use std::io::{self, Write};

pub fn render_auth_screen(out: &mut dyn Write, screen: &AuthScreen, theme: &Theme) -> io::Result<()> {
    writeln!(out, "{}{}", theme.bold(), theme.paint(&theme.colors.header_fg, &screen.title))?;

    if let Some(target) = &screen.return_to {
        writeln!(
            out,
            "{}",
            theme.paint(&theme.colors.text_dim, &format!("You'll return to {target} after signing in."))
        )?;
    }
    if screen.submitting {
        writeln!(out, "{}", theme.paint(&theme.colors.text_dim, "Submitting..."))?;
    }
    if let Some(error) = &screen.error {
        render_error(out, error, theme)?;
    }
    Ok(())
}
