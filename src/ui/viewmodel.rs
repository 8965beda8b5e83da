//! View model types representing renderable UI state.
//!
//! View models are computed from application state by
//! `AppState::compute_viewmodel()` and consumed by the renderer. They hold no
//! business logic, only display-ready data: formatted prices, highlight
//! ranges, button labels and empty-state messages.

use crate::domain::CollectionStats;

/// Complete UI view model for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct UIViewModel {
    pub header: HeaderInfo,

    /// What the body of the screen shows.
    pub screen: Screen,

    pub footer: FooterInfo,
}

/// Body of the screen, one variant per route plus the loading placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    /// Neutral placeholder shown while the session is being restored.
    Loading,
    Search(SearchScreen),
    Collection(CollectionScreen),
    Login(AuthScreen),
    Register(AuthScreen),
}

/// Header display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
    pub subtitle: String,

    /// `Signed in as ...` or `Not signed in`.
    pub account: String,

    /// Name of the collection that receives added cards, if any.
    pub target_collection: Option<String>,
}

/// Footer display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterInfo {
    /// Command help text for the current screen.
    pub commands: String,
}

/// Empty state message display information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchScreen {
    /// Text in the search box.
    pub query: String,

    /// Search box and button are disabled while a search runs.
    pub searching: bool,

    pub error: Option<String>,

    /// `Search Results (20 cards)` style heading, present when there are results.
    pub results_heading: Option<String>,

    /// `Page 1 of 3` when the backend reported more than one page.
    pub page_info: Option<String>,

    pub tiles: Vec<CardTile>,

    pub empty_state: Option<EmptyState>,
}

/// One search result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTile {
    /// 1-based position used by the `add <n>` command.
    pub position: usize,
    pub card_id: String,
    pub name: String,

    /// Character ranges of `name` matching the query, `(start, end)` exclusive.
    pub highlight_ranges: Vec<(usize, usize)>,

    pub set_name: String,
    pub series: String,

    /// `$3.25`, absent when the catalog has no price.
    pub price: Option<String>,
    pub image_url: String,
    pub add: AddAffordance,
}

/// State of the per-card add control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddAffordance {
    /// No session: the control asks the user to log in.
    LoginRequired,
    /// Logged in, but there is no default collection to add to.
    NoCollection,
    /// An add for this card is in flight.
    Adding,
    /// The add button is enabled.
    Ready,
}

impl AddAffordance {
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LoginRequired => "Login to Add",
            Self::NoCollection => "No Collection",
            Self::Adding => "Adding...",
            Self::Ready => "Add to Collection",
        }
    }

    /// Whether activating the control issues a request.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Ready)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionScreen {
    /// Collection name, absent when the user has no collection.
    pub name: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
    pub stats: CollectionStats,

    /// Formatted `$12.50` of `stats.estimated_value`.
    pub estimated_value: String,

    pub rows: Vec<CollectionRow>,
    pub empty_state: Option<EmptyState>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRow {
    pub name: String,
    pub set_name: String,
    pub quantity: u32,
    pub price: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthScreen {
    pub title: String,
    pub submitting: bool,
    pub error: Option<String>,

    /// Where the user will land after signing in, when a guard sent them here.
    pub return_to: Option<String>,
}

/// Formats a dollar amount the way prices are shown throughout the UI.
#[must_use]
pub fn format_price(value: f64) -> String {
    format!("${value:.2}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ready_affordance_is_enabled() {
        for affordance in [
            AddAffordance::LoginRequired,
            AddAffordance::NoCollection,
            AddAffordance::Adding,
        ] {
            assert!(!affordance.is_enabled());
        }
        assert!(AddAffordance::Ready.is_enabled());
        assert_eq!(AddAffordance::LoginRequired.label(), "Login to Add");
    }

    #[test]
    fn prices_use_two_decimals() {
        assert_eq!(format_price(3.0), "$3.00");
        assert_eq!(format_price(12.346), "$12.35");
    }
}
