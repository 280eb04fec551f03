//! Subject CLI commands.

use clap::{Parser, Subcommand};

/// Tutor/subject mapping commands.
#[derive(Debug, Parser)]
pub struct SubjectsCommand {
    #[command(subcommand)]
    pub action: SubjectsAction,
}

/// Available subject actions.
#[derive(Debug, Subcommand)]
pub enum SubjectsAction {
    /// List every subject someone teaches.
    List,
    /// Subjects of one tutor, with their ratings.
    Tutor {
        tutor_id: i64,
    },
    /// Tutors teaching a subject.
    Tutors {
        subject: String,
    },
    /// Link a tutor to a subject.
    Assign {
        tutor_id: i64,
        subject: String,
    },
    /// Unlink a tutor from a subject.
    Remove {
        tutor_id: i64,
        subject: String,
    },
}
