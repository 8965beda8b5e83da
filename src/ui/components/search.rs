//! Search screen: the search box and one block per result card.

use super::render_error;
use crate::ui::helpers::{highlight, padding, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{AddAffordance, CardTile, SearchScreen};
use std::io::{self, Write};

/// Horizontal margin around the search box.
const SEARCH_BOX_MARGIN: usize = 2;

/// Width of the card name column.
const NAME_WIDTH: usize = 32;

const PRICE_WIDTH: usize = 9;

/// Renders the search box.
///
/// ```text
///   ┌──────────────────────────────────────┐
///   │ Search: pikachu                      │
///   └──────────────────────────────────────┘
/// ```
pub fn render_search_box(out: &mut dyn Write, screen: &SearchScreen, theme: &Theme, cols: usize) -> io::Result<()> {
    let inner = cols.saturating_sub(SEARCH_BOX_MARGIN * 2 + 2);
    let margin = " ".repeat(SEARCH_BOX_MARGIN);
    let border = |s: &str| theme.paint(&theme.colors.search_bar_border, s);

    let text = if screen.searching {
        format!(" Search: {}  (searching...)", screen.query)
    } else {
        format!(" Search: {}", screen.query)
    };
    let text = truncate(&text, inner);

    writeln!(out, "{margin}{}", border(&format!("┌{}┐", "─".repeat(inner))))?;
    writeln!(
        out,
        "{margin}{}{}{}{}",
        border("│"),
        theme.paint(&theme.colors.text_normal, &text),
        padding(&text, inner),
        border("│")
    )?;
    writeln!(out, "{margin}{}", border(&format!("└{}┘", "─".repeat(inner))))
}

/// Renders the search screen body below the header.
pub fn render_search_screen(out: &mut dyn Write, screen: &SearchScreen, theme: &Theme, cols: usize) -> io::Result<()> {
    render_search_box(out, screen, theme, cols)?;

    if let Some(error) = &screen.error {
        render_error(out, error, theme)?;
    }

    if let Some(heading) = &screen.results_heading {
        writeln!(out)?;
        write!(out, "{}{}", theme.bold(), theme.paint(&theme.colors.header_fg, heading))?;
        match &screen.page_info {
            Some(page) => writeln!(out, "   {}", theme.paint(&theme.colors.text_dim, page))?,
            None => writeln!(out)?,
        }
    }

    for tile in &screen.tiles {
        render_tile(out, tile, theme)?;
    }

    if let Some(empty) = &screen.empty_state {
        super::render_empty_state(out, empty, theme, cols)?;
    }
    Ok(())
}

/// One result:
///
/// ```text
///  3. Pikachu                          $3.25   [Add to Collection]
///     Base Set · Base
/// ```
fn render_tile(out: &mut dyn Write, tile: &CardTile, theme: &Theme) -> io::Result<()> {
    let name = truncate(&tile.name, NAME_WIDTH);
    let ranges: &[(usize, usize)] = if name == tile.name { tile.highlight_ranges.as_slice() } else { &[] };

    write!(
        out,
        "{:>3}. {}{}{}{}",
        tile.position,
        theme.fg(&theme.colors.text_normal),
        highlight(&name, ranges, theme),
        theme.reset(),
        padding(&name, NAME_WIDTH)
    )?;

    let price = tile.price.as_deref().unwrap_or("");
    write!(
        out,
        " {}{}",
        padding(price, PRICE_WIDTH),
        theme.paint(&theme.colors.price_fg, price)
    )?;

    let color = if tile.add.is_enabled() {
        &theme.colors.action_fg
    } else {
        &theme.colors.action_disabled_fg
    };
    let label = match tile.add {
        AddAffordance::Ready => format!("[{}]", tile.add.label()),
        _ => format!("({})", tile.add.label()),
    };
    writeln!(out, "   {}", theme.paint(color, &label))?;

    let details: Vec<&str> = [tile.set_name.as_str(), tile.series.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect();
    if !details.is_empty() {
        writeln!(out, "     {}", theme.paint(&theme.colors.text_dim, &details.join(" · ")))?;
    }
    Ok(())
}
