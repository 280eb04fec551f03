//! Storage backend selection.
//!
//! Runs once at startup and hands back an explicitly constructed store. The
//! selector never fails: each unavailable tier is logged and the next one is
//! tried, down to the in-memory store.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use clap::ValueEnum;
use serde::Serialize;

use tutorias_core::storage::TutoringStore;

use crate::config::Config;
#[cfg(feature = "redis")]
use crate::storage::kv::RedisStore;
use crate::storage::kv::{KvRepository, LocalStore, MemoryStore};
#[cfg(feature = "sqlite")]
use crate::storage::sqlite::SqliteRepository;

/// Runtime the process is serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Native,
    Browser,
}

impl Platform {
    pub fn detect() -> Self {
        if cfg!(target_arch = "wasm32") {
            Platform::Browser
        } else {
            Platform::Native
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Native => "native",
            Platform::Browser => "browser",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "native" => Ok(Platform::Native),
            "browser" | "web" => Ok(Platform::Browser),
            other => Err(format!("Unknown platform: {other}")),
        }
    }
}

/// Storage tier backing the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Embedded SQL database.
    Sqlite,
    /// Redis.
    AsyncKeyValue,
    /// Directory of JSON files.
    BrowserKeyValue,
    /// Process memory.
    Memory,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Sqlite => "sqlite",
            BackendKind::AsyncKeyValue => "async_key_value",
            BackendKind::BrowserKeyValue => "browser_key_value",
            BackendKind::Memory => "memory",
        }
    }

    pub fn is_sql(&self) -> bool {
        matches!(self, BackendKind::Sqlite)
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The store chosen at startup together with its tier.
#[derive(Clone)]
pub struct SelectedBackend {
    kind: BackendKind,
    store: Arc<dyn TutoringStore>,
}

impl SelectedBackend {
    pub fn new(kind: BackendKind, store: Arc<dyn TutoringStore>) -> Self {
        Self { kind, store }
    }

    pub fn memory() -> Self {
        Self::new(
            BackendKind::Memory,
            Arc::new(KvRepository::new(MemoryStore::new())),
        )
    }

    pub fn kind(&self) -> BackendKind {
        self.kind
    }

    /// Whether the SQL backend is active.
    pub fn is_sql(&self) -> bool {
        self.kind.is_sql()
    }

    pub fn store(&self) -> Arc<dyn TutoringStore> {
        Arc::clone(&self.store)
    }
}

impl fmt::Debug for SelectedBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectedBackend")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

/// Picks the best available backend for the configured platform.
pub async fn select_backend(config: &Config) -> SelectedBackend {
    let platform = config.platform();
    let selected = match platform {
        Platform::Native => select_native(config).await,
        Platform::Browser => select_browser(config).await,
    };

    tracing::info!(
        platform = %platform,
        backend = %selected.kind(),
        "storage backend selected"
    );
    selected
}

#[cfg_attr(
    not(any(feature = "sqlite", feature = "redis")),
    allow(unused_variables)
)]
async fn select_native(config: &Config) -> SelectedBackend {
    #[cfg(feature = "sqlite")]
    {
        match SqliteRepository::new(&config.sqlite_path).await {
            Ok(repo) => return SelectedBackend::new(BackendKind::Sqlite, Arc::new(repo)),
            Err(e) => tracing::warn!(
                path = %config.sqlite_path,
                error = %e,
                "SQLite unavailable, falling back"
            ),
        }
    }
    #[cfg(not(feature = "sqlite"))]
    tracing::warn!("SQLite support not compiled in, falling back");

    #[cfg(feature = "redis")]
    {
        match config.redis_url.as_deref() {
            Some(url) => match RedisStore::new(url).await {
                Ok(store) => {
                    return SelectedBackend::new(
                        BackendKind::AsyncKeyValue,
                        Arc::new(KvRepository::new(store)),
                    )
                }
                Err(e) => tracing::warn!(error = %e, "Redis unavailable, falling back"),
            },
            None => tracing::debug!("REDIS_URL not set, skipping Redis"),
        }
    }

    tracing::warn!("no persistent storage available, data will not survive restarts");
    SelectedBackend::memory()
}

async fn select_browser(config: &Config) -> SelectedBackend {
    match LocalStore::open(&config.local_storage_dir).await {
        Ok(store) => SelectedBackend::new(
            BackendKind::BrowserKeyValue,
            Arc::new(KvRepository::new(store)),
        ),
        Err(e) => {
            tracing::warn!(
                dir = %config.local_storage_dir.display(),
                error = %e,
                "local storage unavailable, falling back to memory"
            );
            SelectedBackend::memory()
        }
    }
}
