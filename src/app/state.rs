//! Application state management and view model computation.
//!
//! This module defines [`AppState`], the single owner of everything the client
//! knows: the session, the current route, the collection resolver, the set of
//! pending adds and the per-screen state of search, collection and auth forms.
//! Only the event handler mutates it; the renderer reads it through
//! [`AppState::compute_viewmodel`].
//!
//! # State Components
//!
//! - **Session**: who is logged in, plus the restore loading flag
//! - **Route**: the screen the user asked for, filtered through the guard
//! - **Epoch**: bumped on every session transition to discard stale replies
//! - **Resolver**: the user's collections and the default add target
//! - **Pending**: card ids with an add request in flight
//! - **Search / Collection view / Auth form**: per-screen transient state

use super::collections::{CollectionResolver, ResolverStatus};
use super::guard::{self, GuardDecision};
use super::pending::PendingAdds;
use super::routes::Route;
use super::session::{Session, SessionEvent};
use crate::domain::{Card, CollectionDetail, CollectionStats, SearchPage};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::{
    format_price, AddAffordance, AuthScreen, CardTile, CollectionRow, CollectionScreen,
    EmptyState, FooterInfo, HeaderInfo, Screen, SearchScreen, UIViewModel,
};
use fuzzy_matcher::skim::SkimMatcherV2;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Search screen state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchState {
    /// Contents of the search box.
    pub query: String,

    /// Query of the request awaiting a reply. Set means "searching".
    pub in_flight: Option<String>,

    /// Query the current results belong to.
    pub shown_query: Option<String>,

    pub results: Vec<Card>,
    pub page: u32,
    pub total_pages: u32,
    pub total_count: u32,
    pub error: Option<String>,
}

impl SearchState {
    #[must_use]
    pub const fn is_searching(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Stores a reply page as the visible results.
    pub fn show(&mut self, query: String, page: SearchPage) {
        self.page = page.page;
        self.total_pages = page.total_pages();
        self.total_count = page.total_count;
        self.results = page.data;
        self.shown_query = Some(query);
        self.in_flight = None;
        self.error = None;
    }

    /// Clears results after a failed search.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.results.clear();
        self.page = 0;
        self.total_pages = 0;
        self.total_count = 0;
        self.in_flight = None;
        self.error = Some(message.into());
    }
}

/// Collection screen state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionViewState {
    pub detail: Option<CollectionDetail>,
    pub loading: bool,
    pub error: Option<String>,
}

impl CollectionViewState {
    pub fn clear(&mut self) {
        self.detail = None;
        self.loading = false;
        self.error = None;
    }
}

/// Login/register form state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthFormState {
    pub submitting: bool,
    pub error: Option<String>,
}

/// Central application state container.
#[derive(Debug, Clone)]
pub struct AppState {
    pub session: Session,

    /// The route the user is on. Guard redirects replace it.
    pub route: Route,

    /// Protected route a guard redirect came from; login returns there.
    pub redirect_from: Option<Route>,

    /// Session epoch, bumped on every session transition.
    pub epoch: u64,

    pub resolver: CollectionResolver,
    pub pending: PendingAdds,
    pub search: SearchState,
    pub collection_view: CollectionViewState,
    pub auth_form: AuthFormState,

    /// Results per search page.
    pub page_size: u32,

    pub theme: Theme,
}

impl AppState {
    /// Creates the startup state.
    ///
    /// The session starts out loading: nothing is rendered and no redirect is
    /// made until the `Start` event has resolved the persisted session.
    #[must_use]
    pub fn new(page_size: u32, theme: Theme) -> Self {
        Self {
            session: Session::new().reduce(&SessionEvent::RestoreStarted),
            route: Route::Home,
            redirect_from: None,
            epoch: 0,
            resolver: CollectionResolver::new(),
            pending: PendingAdds::new(),
            search: SearchState::default(),
            collection_view: CollectionViewState::default(),
            auth_form: AuthFormState::default(),
            page_size: if page_size == 0 { DEFAULT_PAGE_SIZE } else { page_size },
            theme,
        }
    }

    #[must_use]
    pub fn guard_decision(&self) -> GuardDecision {
        guard::evaluate(&self.session, self.route)
    }

    /// Looks up a card in the current search results.
    #[must_use]
    pub fn find_result(&self, card_id: &str) -> Option<&Card> {
        self.search.results.iter().find(|card| card.id == card_id)
    }

    /// Card at 1-based `position` in the current results.
    #[must_use]
    pub fn result_at(&self, position: usize) -> Option<&Card> {
        position
            .checked_sub(1)
            .and_then(|index| self.search.results.get(index))
    }

    /// What the add control for `card_id` shows.
    ///
    /// The control is only enabled when both a token and a default collection
    /// exist and no add for the same card is in flight.
    #[must_use]
    pub fn add_affordance(&self, card_id: &str) -> AddAffordance {
        if !self.session.is_authenticated() {
            AddAffordance::LoginRequired
        } else if self.pending.contains(card_id) {
            AddAffordance::Adding
        } else if self.resolver.default_id().is_none() {
            AddAffordance::NoCollection
        } else {
            AddAffordance::Ready
        }
    }

    /// Computes a renderable view model from current state.
    #[must_use]
    pub fn compute_viewmodel(&self) -> UIViewModel {
        let _span = tracing::trace_span!("compute_viewmodel", route = %self.route).entered();

        let screen = match self.guard_decision() {
            GuardDecision::Placeholder | GuardDecision::Redirect { .. } => Screen::Loading,
            GuardDecision::Render => match self.route {
                Route::Home => Screen::Search(self.compute_search_screen()),
                Route::Collection => Screen::Collection(self.compute_collection_screen()),
                Route::Login => Screen::Login(self.compute_auth_screen("Login")),
                Route::Register => Screen::Register(self.compute_auth_screen("Create Account")),
            },
        };

        UIViewModel {
            header: self.compute_header(&screen),
            footer: self.compute_footer(&screen),
            screen,
        }
    }

    fn compute_search_screen(&self) -> SearchScreen {
        let search = &self.search;

        let matcher = search
            .shown_query
            .as_ref()
            .filter(|query| !query.contains(':'))
            .map(|_| SkimMatcherV2::default());

        let tiles: Vec<CardTile> = search
            .results
            .iter()
            .enumerate()
            .map(|(index, card)| CardTile {
                position: index + 1,
                card_id: card.id.clone(),
                name: card.name.clone(),
                highlight_ranges: matcher.as_ref().map_or_else(Vec::new, |m| {
                    Self::compute_highlight_ranges(
                        &card.name,
                        search.shown_query.as_deref().unwrap_or_default(),
                        m,
                    )
                }),
                set_name: card.set.name.clone(),
                series: card.set.series.clone(),
                price: card.market_price().map(format_price),
                image_url: card.images.small.clone(),
                add: self.add_affordance(&card.id),
            })
            .collect();

        let results_heading =
            (!tiles.is_empty()).then(|| format!("Search Results ({} cards)", tiles.len()));

        let page_info = (search.total_pages > 1).then(|| {
            format!(
                "Page {} of {} ({} cards)",
                search.page, search.total_pages, search.total_count
            )
        });

        let empty_state = match &search.shown_query {
            Some(query) if tiles.is_empty() && !search.is_searching() && search.error.is_none() => {
                Some(EmptyState {
                    message: format!("No cards found for \"{query}\". Try a different search term."),
                    subtitle: "Search tips: Try searching by Pokemon name, set name, or use filters like \"set.name:base\" or \"subtypes:mega\"".to_string(),
                })
            }
            _ => None,
        };

        SearchScreen {
            query: search.query.clone(),
            searching: search.is_searching(),
            error: search.error.clone(),
            results_heading,
            page_info,
            tiles,
            empty_state,
        }
    }

    fn compute_collection_screen(&self) -> CollectionScreen {
        let view = &self.collection_view;
        let default = self.resolver.default_collection();

        let cards = view
            .detail
            .as_ref()
            .map(|detail| detail.cards.as_slice())
            .unwrap_or_default();
        let stats = CollectionStats::from_cards(cards);

        let rows = cards
            .iter()
            .map(|card| CollectionRow {
                name: card.name.clone(),
                set_name: card.set_name.clone().unwrap_or_default(),
                quantity: card.quantity,
                price: card.price.filter(|price| *price > 0.0).map(format_price),
            })
            .collect::<Vec<_>>();

        let resolving = self.resolver.status() == ResolverStatus::Fetching;
        let error = view.error.clone().or_else(|| {
            (self.resolver.status() == ResolverStatus::Failed)
                .then(|| "Failed to load your collections.".to_string())
        });

        let empty_state = if default.is_none() && !resolving && error.is_none() {
            Some(EmptyState {
                message: "You don't have a collection yet".to_string(),
                subtitle: "Cards can be added once a collection exists for your account."
                    .to_string(),
            })
        } else if view.detail.is_some() && rows.is_empty() {
            Some(EmptyState {
                message: "Your collection is empty".to_string(),
                subtitle: "Start building your collection by searching for cards and adding them to your binder!".to_string(),
            })
        } else {
            None
        };

        CollectionScreen {
            name: default.map(|collection| collection.name.clone()),
            loading: view.loading || resolving,
            error,
            estimated_value: format_price(stats.estimated_value),
            stats,
            rows,
            empty_state,
        }
    }

    fn compute_auth_screen(&self, title: &str) -> AuthScreen {
        AuthScreen {
            title: title.to_string(),
            submitting: self.auth_form.submitting,
            error: self.auth_form.error.clone(),
            return_to: self.redirect_from.map(|route| route.path().to_string()),
        }
    }

    /// Computes character index ranges to highlight for fuzzy match visualization.
    ///
    /// Consecutive matched indices are coalesced into `(start, end)` ranges
    /// with an exclusive end.
    fn compute_highlight_ranges(
        text: &str,
        query: &str,
        matcher: &SkimMatcherV2,
    ) -> Vec<(usize, usize)> {
        use fuzzy_matcher::FuzzyMatcher;

        let Some((_score, indices)) = matcher.fuzzy_indices(text, query.trim()) else {
            return vec![];
        };

        let mut ranges: Vec<(usize, usize)> = Vec::new();
        for idx in indices {
            match ranges.last_mut() {
                Some((_, end)) if *end == idx => *end = idx + 1,
                _ => ranges.push((idx, idx + 1)),
            }
        }
        ranges
    }

    fn compute_header(&self, screen: &Screen) -> HeaderInfo {
        let (title, subtitle) = match screen {
            Screen::Search(_) => (
                "Pokemon Card Search",
                "Search through thousands of Pokemon cards",
            ),
            Screen::Collection(_) => (
                "My Pokemon Collection",
                "View and manage your Pokemon card collection",
            ),
            Screen::Loading | Screen::Login(_) | Screen::Register(_) => ("BinderBuilder", ""),
        };

        let account = self.session.user().map_or_else(
            || "Not signed in".to_string(),
            |user| format!("Signed in as {}", user.username),
        );

        HeaderInfo {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            account,
            target_collection: self
                .resolver
                .default_collection()
                .map(|collection| collection.name.clone()),
        }
    }

    fn compute_footer(&self, screen: &Screen) -> FooterInfo {
        let signed_in = self.session.is_authenticated();

        let commands = match screen {
            Screen::Loading => "quit",
            Screen::Search(_) if signed_in => {
                "search <query>  add <n>  page <n>  collection  logout  quit"
            }
            Screen::Search(_) => "search <query>  page <n>  login  register  quit",
            Screen::Collection(_) => "refresh  search  logout  quit",
            Screen::Login(_) => "login <username> <password>  register  search  quit",
            Screen::Register(_) => "register <username> <password> [email]  login  quit",
        };

        FooterInfo {
            commands: commands.to_string(),
        }
    }
}
