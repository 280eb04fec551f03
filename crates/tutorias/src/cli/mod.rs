//! CLI command definitions.

pub mod notifications;
pub mod sessions;
pub mod subjects;
pub mod users;

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::backend::Platform;
use crate::config::Config;

/// Inspect and maintain the tutorias data store.
#[derive(Debug, Parser)]
#[command(name = "tutorias")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Platform to select a backend for (default: detected).
    #[arg(long, value_enum)]
    pub platform: Option<Platform>,

    /// SQLite database path.
    #[arg(long)]
    pub sqlite_path: Option<String>,

    /// Redis connection URL.
    #[arg(long)]
    pub redis_url: Option<String>,

    /// Directory for the local-storage backend.
    #[arg(long)]
    pub local_storage_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Environment configuration with the command-line overrides applied.
    pub fn config(&self) -> Config {
        self.apply_overrides(Config::from_env())
    }

    /// Replaces the fields of `config` given on the command line.
    pub fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(platform) = self.platform {
            config.platform = Some(platform);
        }
        if let Some(path) = &self.sqlite_path {
            config.sqlite_path = path.clone();
        }
        if let Some(url) = &self.redis_url {
            config.redis_url = Some(url.clone());
        }
        if let Some(dir) = &self.local_storage_dir {
            config.local_storage_dir = dir.clone();
        }
        config
    }
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Create the tables and load the demo data.
    Init {
        /// Skip the demo data even when SEED_DEMO_DATA is set.
        #[arg(long)]
        no_seed: bool,
    },
    /// Show which storage backend was selected.
    Backend,
    /// User management.
    Users(users::UsersCommand),
    /// Session bookings.
    Sessions(sessions::SessionsCommand),
    /// Subjects taught by tutors.
    Subjects(subjects::SubjectsCommand),
    /// User notifications.
    Notifications(notifications::NotificationsCommand),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::parse_from([
            "tutorias",
            "--platform",
            "browser",
            "--sqlite-path",
            "/tmp/other.db",
            "--local-storage-dir",
            "/tmp/store",
            "backend",
        ]);

        let config = cli.apply_overrides(Config::from_lookup(|_| None));

        assert_eq!(config.platform, Some(Platform::Browser));
        assert_eq!(config.sqlite_path, "/tmp/other.db");
        assert_eq!(config.local_storage_dir, PathBuf::from("/tmp/store"));
        assert!(matches!(cli.command, Commands::Backend));
    }

    #[test]
    fn test_default_format_is_pretty() {
        let cli = Cli::parse_from(["tutorias", "init", "--no-seed"]);

        assert_eq!(cli.format, OutputFormat::Pretty);
        assert!(matches!(cli.command, Commands::Init { no_seed: true }));
    }
}
