//! Header component: title bar plus account line.

use crate::ui::helpers::padding;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;
use std::io::{self, Write};

/// Renders the centered title, subtitle and the account / target line.
///
/// ```text
///                 Pokemon Card Search
///      Search for Pokemon cards and add them to your collection
/// Signed in as ash                              Adding to: Main
/// ```
pub fn render_header(out: &mut dyn Write, header: &HeaderInfo, theme: &Theme, cols: usize) -> io::Result<()> {
    let title_len = header.title.chars().count();
    let left = cols.saturating_sub(title_len) / 2;

    write!(out, "{}{}", theme.bold(), theme.fg(&theme.colors.header_fg))?;
    if let Some(bg) = &theme.colors.header_bg {
        write!(out, "{}", theme.bg(bg))?;
    }
    write!(out, "{}{}", " ".repeat(left), header.title)?;
    writeln!(out, "{}{}", " ".repeat(cols.saturating_sub(left + title_len)), theme.reset())?;

    let sub_left = cols.saturating_sub(header.subtitle.chars().count()) / 2;
    writeln!(
        out,
        "{}{}",
        " ".repeat(sub_left),
        theme.paint(&theme.colors.text_dim, &header.subtitle)
    )?;

    match &header.target_collection {
        Some(target) => {
            let right = format!("Adding to: {target}");
            let gap = padding(&header.account, cols.saturating_sub(right.chars().count()));
            writeln!(
                out,
                "{}{gap}{}",
                theme.paint(&theme.colors.text_normal, &header.account),
                theme.paint(&theme.colors.success_fg, &right)
            )
        }
        None => writeln!(out, "{}", theme.paint(&theme.colors.text_normal, &header.account)),
    }
}
