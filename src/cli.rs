//! Command-line arguments and layered configuration loading.
//!
//! Sources, highest priority first:
//! - CLI arguments
//! - `BINDERBUILDER_*` environment variables
//! - TOML config file (`--config`, else `<data_dir>/config.toml` if present)
//! - Defaults

use crate::domain::Result;
use crate::{Config, MAX_PAGE_SIZE};
use clap::Parser;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Command-line arguments for the interactive client.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "binderbuilder")]
#[command(about = "Search Pokemon cards and add them to your BinderBuilder collection")]
#[command(version)]
pub struct CliArgs {
    /// Backend root URL
    #[arg(long, env = "BINDERBUILDER_API_BASE_URL")]
    pub api_base_url: Option<String>,

    /// Directory holding the session file, trace log and config.toml
    #[arg(long, env = "BINDERBUILDER_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(long, short = 'c', env = "BINDERBUILDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Search results per page
    #[arg(
        long,
        env = "BINDERBUILDER_PAGE_SIZE",
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE_SIZE))
    )]
    pub page_size: Option<u32>,

    /// Per-request timeout in seconds
    #[arg(
        long,
        env = "BINDERBUILDER_REQUEST_TIMEOUT_SECS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub request_timeout_secs: Option<u64>,

    /// Trace filter directive
    #[arg(long, env = "BINDERBUILDER_TRACE_LEVEL")]
    pub trace_level: Option<String>,

    /// Built-in theme name or path to a .toml theme
    #[arg(long, env = "BINDERBUILDER_THEME")]
    pub theme: Option<String>,

    /// Keep the session in memory only
    #[arg(long, env = "BINDERBUILDER_EPHEMERAL")]
    pub ephemeral: bool,
}

impl CliArgs {
    /// Merges the config file, then these arguments, over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`BinderError::Config`](crate::BinderError::Config) when an
    /// explicit or discovered config file cannot be read or parsed.
    pub fn load_config(&self) -> Result<Config> {
        let base = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => {
                let data_dir = self
                    .data_dir
                    .clone()
                    .unwrap_or_else(crate::infrastructure::default_data_dir);
                let default_file = Config::default_file(&data_dir);
                if default_file.exists() {
                    tracing::debug!(path = %default_file.display(), "using config file from data dir");
                    Config::from_file(&default_file)?
                } else {
                    Config::default()
                }
            }
        };

        Ok(base.with_overrides(&self.overrides()))
    }

    /// Arguments that were given, keyed like the config file.
    fn overrides(&self) -> BTreeMap<String, String> {
        let mut map = BTreeMap::new();
        let mut put = |key: &str, value: Option<String>| {
            if let Some(value) = value {
                map.insert(key.to_string(), value);
            }
        };
        put("api_base_url", self.api_base_url.clone());
        put(
            "data_dir",
            self.data_dir
                .as_ref()
                .map(|dir| dir.to_string_lossy().into_owned()),
        );
        put("page_size", self.page_size.map(|v| v.to_string()));
        put(
            "request_timeout_secs",
            self.request_timeout_secs.map(|v| v.to_string()),
        );
        put("trace_level", self.trace_level.clone());
        put("theme", self.theme.clone());
        map
    }
}
