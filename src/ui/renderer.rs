//! Top-level rendering coordinator.
//!
//! Rendering is a two-step process:
//!
//! 1. **View Model Computation**: `AppState::compute_viewmodel`
//! 2. **Component Rendering**: header, screen body, footer
//!
//! Output is a sequence of lines; the shell prints a fresh screen after each
//! command rather than positioning the cursor.

use crate::app::{AppState, Notice, NoticeLevel};
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{Screen, UIViewModel};
use std::io::{self, Write};

/// Computes the view model and renders it to `out`.
///
/// # Errors
///
/// Returns any error from writing to `out`.
///
/// # Example
///
/// ```rust
/// use binderbuilder::app::AppState;
/// use binderbuilder::ui::{render, Theme};
///
/// let state = AppState::new(20, Theme::plain());
/// let mut out = Vec::new();
/// render(&state, 80, &mut out).unwrap();
/// assert!(String::from_utf8(out).unwrap().contains("Loading..."));
/// ```
pub fn render(state: &AppState, cols: usize, out: &mut dyn Write) -> io::Result<()> {
    let viewmodel = state.compute_viewmodel();
    render_viewmodel(&viewmodel, &state.theme, cols, out)
}

/// Renders a pre-computed view model.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render_viewmodel(vm: &UIViewModel, theme: &Theme, cols: usize, out: &mut dyn Write) -> io::Result<()> {
    if vm.screen == Screen::Loading {
        writeln!(out, "{}", theme.paint(&theme.colors.text_dim, "Loading..."))?;
        return out.flush();
    }

    components::render_header(out, &vm.header, theme, cols)?;
    components::render_border(out, theme, cols)?;

    match &vm.screen {
        Screen::Loading => {}
        Screen::Search(search) => components::render_search_screen(out, search, theme, cols)?,
        Screen::Collection(collection) => {
            components::render_collection_screen(out, collection, theme, cols)?;
        }
        Screen::Login(auth) | Screen::Register(auth) => {
            components::render_auth_screen(out, auth, theme)?;
        }
    }

    components::render_border(out, theme, cols)?;
    components::render_footer(out, &vm.footer, theme)?;
    out.flush()
}

/// Prints a notice on its own line.
///
/// # Errors
///
/// Returns any error from writing to `out`.
pub fn render_notice(notice: &Notice, theme: &Theme, out: &mut dyn Write) -> io::Result<()> {
    let color = match notice.level {
        NoticeLevel::Info => &theme.colors.success_fg,
        NoticeLevel::Error => &theme.colors.error_fg,
    };
    writeln!(out, "{}", theme.paint(color, &notice.to_string()))
}
