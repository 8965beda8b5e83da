//! Shared rendering utilities.
//!
//! All helpers work on character indices, not bytes, so card names with
//! accents (`Flabébé`) highlight and pad correctly.

use crate::ui::theme::Theme;

/// Returns `text` with the given character ranges highlighted.
///
/// Ranges are `(start, end)` with exclusive end, sorted and non-overlapping.
/// Out-of-bounds ends are clamped.
///
/// # Example
///
/// ```rust
/// use binderbuilder::ui::helpers::highlight;
/// use binderbuilder::ui::Theme;
///
/// let plain = Theme::plain();
/// assert_eq!(highlight("Pikachu", &[(0, 4)], &plain), "Pikachu");
/// ```
#[must_use]
pub fn highlight(text: &str, ranges: &[(usize, usize)], theme: &Theme) -> String {
    if ranges.is_empty() || !theme.ansi {
        return text.to_string();
    }

    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + ranges.len() * 40);
    let mut pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len());
        let end = end.min(chars.len());
        if start < pos || start >= end {
            continue;
        }

        out.extend(&chars[pos..start]);
        out.push_str(&theme.fg(&theme.colors.match_highlight_fg));
        out.push_str(&theme.bg(&theme.colors.match_highlight_bg));
        out.extend(&chars[start..end]);
        out.push_str(theme.reset());
        out.push_str(&theme.fg(&theme.colors.text_normal));
        pos = end;
    }

    out.extend(&chars[pos..]);
    out
}

/// Truncates `text` to `width` characters, ending in `…` when cut.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

/// Spaces needed after `text` to fill `width` columns.
#[must_use]
pub fn padding(text: &str, width: usize) -> String {
    " ".repeat(width.saturating_sub(text.chars().count()))
}

/// A horizontal rule `cols` wide in the given color.
#[must_use]
pub fn rule(cols: usize, color: &str, theme: &Theme) -> String {
    theme.paint(color, &"─".repeat(cols))
}
