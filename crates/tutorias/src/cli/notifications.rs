//! Notification CLI commands.

use clap::{Parser, Subcommand};

/// Notification commands.
#[derive(Debug, Parser)]
pub struct NotificationsCommand {
    #[command(subcommand)]
    pub action: NotificationsAction,
}

/// Available notification actions.
#[derive(Debug, Subcommand)]
pub enum NotificationsAction {
    /// List a user's notifications, newest first.
    List {
        user_id: i64,
    },
    /// Delete one notification.
    Delete {
        id: i64,
    },
    /// Delete every notification of a user.
    Clear {
        user_id: i64,
    },
}
