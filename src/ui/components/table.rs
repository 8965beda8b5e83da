//! Collection screen: overview stats and the card table.

use super::render_error;
use crate::ui::helpers::{padding, rule, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{CollectionRow, CollectionScreen};
use std::io::{self, Write};

const NAME_WIDTH: usize = 30;
const SET_WIDTH: usize = 24;

pub fn render_collection_screen(
    out: &mut dyn Write,
    screen: &CollectionScreen,
    theme: &Theme,
    cols: usize,
) -> io::Result<()> {
    if let Some(name) = &screen.name {
        writeln!(out, "{}{}", theme.bold(), theme.paint(&theme.colors.header_fg, name))?;
    }
    if screen.loading {
        writeln!(out, "{}", theme.paint(&theme.colors.text_dim, "Loading collection..."))?;
    }
    if let Some(error) = &screen.error {
        render_error(out, error, theme)?;
    }

    if screen.name.is_some() {
        writeln!(
            out,
            "Total cards: {}   Sets: {}   Estimated value: {}",
            screen.stats.total_cards,
            screen.stats.sets,
            theme.paint(&theme.colors.price_fg, &screen.estimated_value)
        )?;
    }

    if !screen.rows.is_empty() {
        render_table_headers(out, theme)?;
        writeln!(out, "{}", rule(cols, &theme.colors.border, theme))?;
        for row in &screen.rows {
            render_table_row(out, row, theme)?;
        }
    }

    if let Some(empty) = &screen.empty_state {
        super::render_empty_state(out, empty, theme, cols)?;
    }
    Ok(())
}

fn render_table_headers(out: &mut dyn Write, theme: &Theme) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}{}{:<NAME_WIDTH$} {:<SET_WIDTH$} {:>4} {:>10}{}",
        theme.bold(),
        theme.fg(&theme.colors.header_fg),
        "NAME",
        "SET",
        "QTY",
        "PRICE",
        theme.reset()
    )
}

fn render_table_row(out: &mut dyn Write, row: &CollectionRow, theme: &Theme) -> io::Result<()> {
    let name = truncate(&row.name, NAME_WIDTH);
    let set = truncate(&row.set_name, SET_WIDTH);
    let price = row.price.as_deref().unwrap_or("-");

    writeln!(
        out,
        "{}{} {}{} {:>4} {}{}",
        theme.paint(&theme.colors.text_normal, &name),
        padding(&name, NAME_WIDTH),
        theme.paint(&theme.colors.text_dim, &set),
        padding(&set, SET_WIDTH),
        row.quantity,
        padding(price, 10),
        theme.paint(&theme.colors.price_fg, price)
    )
}
