//! BinderBuilder: a Pokemon card search and collection client.
//!
//! BinderBuilder searches a card catalog through its backend and, for signed-in
//! users, adds cards to a personal collection stored server-side. The crate is
//! built around the client-side flow that keeps this consistent:
//! - Token-based session restored across runs and shared by every route
//! - Route guards that wait for restore, then render or redirect
//! - One collections fetch per sign-in, with the first collection as the add target
//! - Per-card "adding" tracking that is always released, success or failure

#![allow(clippy::multiple_crate_versions)]

//!
//! # Architecture
//!
//! The crate follows a layered architecture pattern:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │  Interactive shell (main.rs, shell)                 │  ← Entry point
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Runtime (runtime)                                  │  ← Event loop
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Application Layer (app/)                           │  ← State machine
//! │  - Session, guard, resolver, pending adds           │  ← Business logic
//! │  - Event handling and action emission               │
//! │  - View model computation                           │
//! └─────────────────────────────────────────────────────┘
//!         │                    │                    │
//! ┌───────────────┐   ┌───────────────┐   ┌───────────────┐
//! │ UI Layer      │   │ Storage Layer │   │ API Layer     │
//! │ (ui/)         │   │ (storage/)    │   │ (api/)        │
//! │ - Rendering   │   │ - JSON file   │   │ - HTTP client │
//! │ - Theming     │   │ - In-memory   │   │ - Worker      │
//! │ - Components  │   │ - Records     │   │ - Messages    │
//! └───────────────┘   └───────────────┘   └───────────────┘
//!         │                    │                    │
//! ┌─────────────────────────────────────────────────────┐
//! │  Infrastructure & Domain Layers                     │
//! │  - Data directory paths (infrastructure/)           │
//! │  - Error types (domain/error)                       │
//! │  - Users, cards, collections (domain/)              │
//! └─────────────────────────────────────────────────────┘
//!                        │
//! ┌─────────────────────────────────────────────────────┐
//! │  Observability (observability/)                     │
//! │  - OpenTelemetry tracing, file-based OTLP export    │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`api`]: Backend client, request/reply messages and the API worker
//! - [`app`]: Application state machine with event/action model
//! - [`cli`]: Command-line arguments and layered configuration loading
//! - [`domain`]: Core domain types (users, cards, collections, errors)
//! - [`infrastructure`]: Data directory resolution
//! - [`observability`]: OpenTelemetry tracing with file export
//! - [`runtime`]: Event loop executing actions on tokio
//! - [`shell`]: Command parsing for the interactive front end
//! - [`storage`]: Persisted session record
//! - [`ui`]: Terminal rendering with theme support
//!
//! # Configuration
//!
//! Sources are applied in order, later wins: defaults, a TOML file,
//! `BINDERBUILDER_*` environment variables, command-line flags. The last two
//! are parsed by [`cli::CliArgs`].
//!
//! ```toml
//! # ~/.local/share/binderbuilder/config.toml
//! api_base_url = "http://localhost:5001"
//! page_size = 20
//! request_timeout_secs = 15
//! trace_level = "info"
//! theme = "catppuccin-mocha"
//! ```
//!
//! # Examples
//!
//! ```rust
//! use binderbuilder::{handle_event, initialize, Config, Event};
//!
//! let mut state = initialize(&Config::default());
//! let (should_render, actions) = handle_event(&mut state, &Event::Start { persisted: None })?;
//! assert!(should_render);
//! assert!(actions.is_empty());
//! # Ok::<(), binderbuilder::BinderError>(())
//! ```
//!
//! # Key Design Decisions
//!
//! ## Reducer plus actions
//!
//! `handle_event` is synchronous and performs no I/O. It mutates [`AppState`]
//! and returns [`Action`]s; the [`runtime::Runtime`] executes them. Every
//! transition can be tested without a network or terminal.
//!
//! ## Session epochs
//!
//! Every identity change bumps `AppState::epoch`. Requests carry the epoch they
//! were issued under and replies from an older epoch are dropped, so a
//! collections reply for a signed-out user can never repopulate the view.
//! Add replies are the exception: they always release their pending mark.

pub mod api;
pub mod app;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod observability;
pub mod runtime;
pub mod shell;
pub mod storage;
pub mod ui;

pub use app::{handle_event, Action, AppState, Event};
pub use cli::CliArgs;
pub use domain::{BinderError, Result};
pub use runtime::Runtime;
pub use ui::Theme;

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Backend used when none is configured.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5001";

/// Upper bound the card catalog accepts for `pageSize`.
pub const MAX_PAGE_SIZE: u32 = 250;

/// Client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Backend root, e.g. `http://localhost:5001`. Default: [`DEFAULT_API_BASE_URL`]
    pub api_base_url: String,

    /// Directory holding the session file and trace log.
    ///
    /// Default: see [`infrastructure::default_data_dir`].
    pub data_dir: PathBuf,

    /// Search results per page, 1 to [`MAX_PAGE_SIZE`]. Default: 20
    pub page_size: u32,

    /// Per-request timeout. Default: 15
    pub request_timeout_secs: u64,

    /// `EnvFilter` directive for exported spans. Default: `"info"`
    pub trace_level: String,

    /// Built-in theme name or path to a `.toml` theme. Default: `"default"`
    pub theme: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            data_dir: infrastructure::default_data_dir(),
            page_size: app::state::DEFAULT_PAGE_SIZE,
            request_timeout_secs: 15,
            trace_level: "info".to_string(),
            theme: "default".to_string(),
        }
    }
}

/// Shape of the TOML configuration file; every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_base_url: Option<String>,
    data_dir: Option<String>,
    page_size: Option<u32>,
    request_timeout_secs: Option<u64>,
    trace_level: Option<String>,
    theme: Option<String>,
}

impl Config {
    /// Builds a configuration from defaults plus string overrides.
    ///
    /// # Parsing Rules
    ///
    /// - `api_base_url`: trailing `/` removed, blank ignored
    /// - `data_dir`: `~` expanded
    /// - `page_size`: `u32` in `1..=250`, otherwise the default
    /// - `request_timeout_secs`: positive `u64`, otherwise the default
    /// - `trace_level`, `theme`: taken as-is when not blank
    ///
    /// Unknown keys are ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::collections::BTreeMap;
    /// use binderbuilder::Config;
    ///
    /// let mut map = BTreeMap::new();
    /// map.insert("api_base_url".to_string(), "http://cards.local/".to_string());
    /// map.insert("page_size".to_string(), "abc".to_string());
    ///
    /// let config = Config::from_map(&map);
    /// assert_eq!(config.api_base_url, "http://cards.local");
    /// assert_eq!(config.page_size, 20);
    /// ```
    #[must_use]
    pub fn from_map(map: &BTreeMap<String, String>) -> Self {
        Self::default().with_overrides(map)
    }

    /// Applies string overrides on top of `self`, using the rules of [`Config::from_map`].
    #[must_use]
    pub fn with_overrides(mut self, map: &BTreeMap<String, String>) -> Self {
        let get = |key: &str| {
            map.get(key)
                .map(|value| value.trim())
                .filter(|value| !value.is_empty())
        };

        if let Some(url) = get("api_base_url") {
            self.api_base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(dir) = get("data_dir") {
            self.data_dir = infrastructure::expand_tilde(dir);
        }
        if let Some(size) = get("page_size") {
            self.page_size = size
                .parse::<u32>()
                .ok()
                .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
                .unwrap_or(app::state::DEFAULT_PAGE_SIZE);
        }
        if let Some(secs) = get("request_timeout_secs") {
            self.request_timeout_secs = secs
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .unwrap_or(15);
        }
        if let Some(level) = get("trace_level") {
            self.trace_level = level.to_string();
        }
        if let Some(theme) = get("theme") {
            self.theme = theme.to_string();
        }
        self
    }

    /// Reads a TOML configuration file and applies it over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BinderError::Config`] if the file cannot be read, is not valid
    /// TOML, or contains unknown keys.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BinderError::Config(format!("failed to read {}: {e}", path.display()))
        })?;
        let file: ConfigFile = toml::from_str(&contents).map_err(|e| {
            BinderError::Config(format!("failed to parse {}: {e}", path.display()))
        })?;

        let mut map = BTreeMap::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        };
        put("api_base_url", file.api_base_url);
        put("data_dir", file.data_dir);
        put("page_size", file.page_size.map(|v| v.to_string()));
        put(
            "request_timeout_secs",
            file.request_timeout_secs.map(|v| v.to_string()),
        );
        put("trace_level", file.trace_level);
        put("theme", file.theme);

        Ok(Self::from_map(&map))
    }

    /// Path of the configuration file in a data directory.
    #[must_use]
    pub fn default_file(data_dir: &Path) -> PathBuf {
        data_dir.join("config.toml")
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub fn session_file(&self) -> PathBuf {
        infrastructure::session_file(&self.data_dir)
    }
}

/// Builds the initial application state for a configuration.
///
/// The theme is resolved from `config.theme`, falling back to the default
/// theme when it cannot be loaded. The session starts in its loading state
/// until [`Event::Start`] arrives.
#[must_use]
pub fn initialize(config: &Config) -> AppState {
    tracing::debug!(api = %config.api_base_url, page_size = config.page_size, "initializing binderbuilder");

    AppState::new(config.page_size, Theme::resolve(&config.theme))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_replace_defaults() {
        let mut map = BTreeMap::new();
        map.insert("page_size".to_string(), "40".to_string());
        map.insert("request_timeout_secs".to_string(), "0".to_string());
        map.insert("trace_level".to_string(), "  ".to_string());
        map.insert("theme".to_string(), "catppuccin-latte".to_string());

        let config = Config::from_map(&map);
        assert_eq!(config.page_size, 40);
        assert_eq!(config.request_timeout_secs, 15);
        assert_eq!(config.trace_level, "info");
        assert_eq!(config.theme, "catppuccin-latte");
    }

    #[test]
    fn page_size_is_bounded() {
        let mut map = BTreeMap::new();
        map.insert("page_size".to_string(), "500".to_string());
        assert_eq!(Config::from_map(&map).page_size, 20);
    }

    #[test]
    fn config_file_applies_over_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_base_url = \"https://binder.example/\"\npage_size = 12\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.api_base_url, "https://binder.example");
        assert_eq!(config.page_size, 12);
        assert_eq!(config.request_timeout_secs, 15);
    }

    #[test]
    fn invalid_config_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "colour = \"red\"\n").unwrap();

        assert!(matches!(
            Config::from_file(&path),
            Err(BinderError::Config(_))
        ));
    }
}
