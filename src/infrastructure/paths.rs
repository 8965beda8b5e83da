//! Path resolution for the client's data directory.
//!
//! The data directory is chosen in this order:
//!
//! 1. `BINDERBUILDER_DATA_DIR`
//! 2. `$XDG_DATA_HOME/binderbuilder`
//! 3. `$HOME/.local/share/binderbuilder`
//! 4. `./.binderbuilder` when no home directory is known

use std::path::{Path, PathBuf};

/// Name of the persisted session file inside the data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

/// Name of the trace export file inside the data directory.
pub const TRACE_FILE_NAME: &str = "binderbuilder-traces.json";

/// Returns the data directory for the current environment.
///
/// # Examples
///
/// ```
/// use binderbuilder::infrastructure::default_data_dir;
///
/// let session = binderbuilder::infrastructure::session_file(&default_data_dir());
/// assert!(session.ends_with("session.json"));
/// ```
#[must_use]
pub fn default_data_dir() -> PathBuf {
    data_dir_from(
        std::env::var_os("BINDERBUILDER_DATA_DIR").map(PathBuf::from),
        std::env::var_os("XDG_DATA_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn data_dir_from(
    explicit: Option<PathBuf>,
    xdg_data_home: Option<PathBuf>,
    home: Option<PathBuf>,
) -> PathBuf {
    let non_empty = |p: &PathBuf| !p.as_os_str().is_empty();

    if let Some(dir) = explicit.filter(non_empty) {
        return dir;
    }
    if let Some(dir) = xdg_data_home.filter(non_empty) {
        return dir.join("binderbuilder");
    }
    home.filter(non_empty).map_or_else(
        || PathBuf::from(".binderbuilder"),
        |home| home.join(".local").join("share").join("binderbuilder"),
    )
}

#[must_use]
pub fn session_file(data_dir: &Path) -> PathBuf {
    data_dir.join(SESSION_FILE_NAME)
}

#[must_use]
pub fn trace_file(data_dir: &Path) -> PathBuf {
    data_dir.join(TRACE_FILE_NAME)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading `~`, or when `HOME` is unset, are returned as-is.
///
/// # Examples
///
/// ```
/// use binderbuilder::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, std::env::var_os("HOME").map(PathBuf::from))
}

fn expand_tilde_with(path: &str, home: Option<PathBuf>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
