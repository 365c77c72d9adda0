//! Runtime configuration read from the environment.
//!
//! Every setting has a default, so an empty environment yields a working
//! configuration. A `.env` file in the working directory is honoured.

use super::persistence::CorruptionPolicy;
use std::path::PathBuf;

const DEFAULT_DATA_DIR: &str = ".loanbook";
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Directory holding `books.json`.
    pub data_dir: PathBuf,
    /// Directory for `loanbook.log`.
    pub log_dir: PathBuf,
    /// `EnvFilter` directive for the log file.
    pub log_filter: String,
    pub corruption_policy: CorruptionPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_dir: PathBuf::from(DEFAULT_DATA_DIR),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            corruption_policy: CorruptionPolicy::FailFast,
        }
    }
}

impl AppConfig {
    /// Loads `.env` if present, then reads `LOANBOOK_*` variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let data_dir = non_empty("LOANBOOK_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let log_dir = non_empty("LOANBOOK_LOG_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| data_dir.clone());
        let log_filter = non_empty("LOANBOOK_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());
        let corruption_policy = if parse_bool(lookup("LOANBOOK_RESET_ON_CORRUPT").as_deref(), false) {
            CorruptionPolicy::Reset
        } else {
            CorruptionPolicy::FailFast
        };

        Self {
            data_dir,
            log_dir,
            log_filter,
            corruption_policy,
        }
    }
}

/// Accepts `true`/`1`/`yes` and `false`/`0`/`no` in any case; anything else is `default`.
fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") | Some("yes") => true,
        Some("false") | Some("0") | Some("no") => false,
        _ => default,
    }
}
