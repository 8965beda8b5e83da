//! User interface rendering layer with component-based architecture.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → lines on a Write
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: View model types representing renderable UI state
//! - [`renderer`]: Top-level rendering coordinator
//! - [`components`]: Composable UI component renderers
//! - [`helpers`]: Shared rendering utilities (highlighting, padding)
//! - [`theme`]: Color palettes and ANSI escape sequence generation

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::{render, render_notice, render_viewmodel};
pub use theme::Theme;
pub use viewmodel::{
    AddAffordance, CardTile, CollectionRow, CollectionScreen, EmptyState, FooterInfo, HeaderInfo,
    Screen, SearchScreen, UIViewModel,
};
