//! Session CLI commands.

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};

/// Session booking commands.
#[derive(Debug, Parser)]
pub struct SessionsCommand {
    #[command(subcommand)]
    pub action: SessionsAction,
}

/// Whose sessions to list.
#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct SessionOwner {
    /// Sessions booked by this student.
    #[arg(long)]
    pub student: Option<i64>,
    /// Sessions assigned to this tutor.
    #[arg(long)]
    pub tutor: Option<i64>,
}

/// Available session actions.
#[derive(Debug, Subcommand)]
pub enum SessionsAction {
    /// List sessions of a student or tutor, by date and time.
    List {
        #[command(flatten)]
        owner: SessionOwner,
        /// Only accepted sessions (tutor lists only).
        #[arg(long, conflicts_with = "student")]
        upcoming: bool,
    },
    /// Get a session by ID.
    Get {
        id: i64,
    },
    /// Book a session in a free slot.
    Book {
        #[arg(long)]
        student: i64,
        #[arg(long)]
        tutor: Option<i64>,
        #[arg(long)]
        subject: String,
        /// Session date (RFC 3339, e.g. 2024-01-10T10:00:00Z).
        #[arg(long)]
        date: DateTime<Utc>,
        /// Display time (e.g. "10:00 AM").
        #[arg(long)]
        time: String,
    },
    /// Accept a pending session.
    Accept {
        id: i64,
        /// Name shown to the student.
        #[arg(long)]
        tutor_name: String,
    },
    /// Reject a pending session.
    Reject {
        id: i64,
        /// Name shown to the student.
        #[arg(long)]
        tutor_name: String,
    },
    /// Cancel a pending or accepted session.
    Cancel {
        id: i64,
    },
    /// Move a session to a new slot.
    Reschedule {
        id: i64,
        #[arg(long)]
        date: DateTime<Utc>,
        #[arg(long)]
        time: String,
    },
    /// Delete a session by ID.
    Delete {
        id: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(subcommand)]
        action: SessionsAction,
    }

    #[test]
    fn test_list_requires_an_owner() {
        assert!(Harness::try_parse_from(["sessions", "list"]).is_err());
        let both = ["sessions", "list", "--student", "1", "--tutor", "2"];
        assert!(Harness::try_parse_from(both).is_err());
    }

    #[test]
    fn test_upcoming_requires_tutor() {
        let student = ["sessions", "list", "--student", "1", "--upcoming"];
        assert!(Harness::try_parse_from(student).is_err());

        let tutor = ["sessions", "list", "--tutor", "2", "--upcoming"];
        match Harness::try_parse_from(tutor).unwrap().action {
            SessionsAction::List { owner, upcoming } => {
                assert_eq!(owner.tutor, Some(2));
                assert!(upcoming);
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_book_parses_rfc3339_date() {
        let harness = Harness::parse_from([
            "sessions",
            "book",
            "--student",
            "1",
            "--tutor",
            "2",
            "--subject",
            "Programacion",
            "--date",
            "2024-01-10T10:00:00Z",
            "--time",
            "10:00 AM",
        ]);

        match harness.action {
            SessionsAction::Book { date, tutor, .. } => {
                assert_eq!(date, Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap());
                assert_eq!(tutor, Some(2));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }
}
