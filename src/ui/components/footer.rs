//! Footer component: command hints for the current screen.

use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;
use std::io::{self, Write};

pub fn render_footer(out: &mut dyn Write, footer: &FooterInfo, theme: &Theme) -> io::Result<()> {
    writeln!(out, "{}", theme.paint(&theme.colors.text_dim, &footer.commands))
}
