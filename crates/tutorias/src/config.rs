use std::{env, path::PathBuf};

use crate::backend::Platform;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Platform override; detected from the build target when `None`
    pub platform: Option<Platform>,
    /// Path to SQLite database file (default: "tutorias.db")
    pub sqlite_path: String,
    /// Redis connection URL, the async key-value tier is skipped when unset.
    /// Only used when the `redis` feature is enabled.
    pub redis_url: Option<String>,
    /// Directory for the local-storage tier (default: "tutorias-data")
    pub local_storage_dir: PathBuf,
    /// Load the demo accounts on `init` (default: true)
    pub seed_demo_data: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TUTORIAS_PLATFORM` - `native` or `browser` (default: detected)
    /// - `SQLITE_PATH` - SQLite database path (default: "tutorias.db")
    /// - `REDIS_URL` - Redis connection URL (default: unset)
    /// - `LOCAL_STORAGE_DIR` - local-storage directory (default: "tutorias-data")
    /// - `SEED_DEMO_DATA` - load demo data on init (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            platform: lookup("TUTORIAS_PLATFORM").and_then(|v| v.parse().ok()),
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "tutorias.db".to_string()),
            redis_url: lookup("REDIS_URL").filter(|v| !v.trim().is_empty()),
            local_storage_dir: lookup("LOCAL_STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("tutorias-data")),
            seed_demo_data: lookup("SEED_DEMO_DATA")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(true),
        }
    }

    /// The platform to select a backend for.
    pub fn platform(&self) -> Platform {
        self.platform.unwrap_or_else(Platform::detect)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
