//! User CLI commands.

use clap::{Parser, Subcommand, ValueEnum};

pub use tutorias_core::tutoring::UserType as CoreUserType;

/// User management commands.
#[derive(Debug, Parser)]
pub struct UsersCommand {
    #[command(subcommand)]
    pub action: UsersAction,
}

/// CLI user role (with clap ValueEnum).
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Role {
    Tutorado,
    Tutor,
    Maestro,
    Profesor,
}

impl From<Role> for CoreUserType {
    fn from(role: Role) -> Self {
        match role {
            Role::Tutorado => CoreUserType::Tutorado,
            Role::Tutor => CoreUserType::Tutor,
            Role::Maestro => CoreUserType::Maestro,
            Role::Profesor => CoreUserType::Profesor,
        }
    }
}

/// Available user actions.
#[derive(Debug, Subcommand)]
pub enum UsersAction {
    /// List users holding the given roles (all roles by default).
    List {
        #[arg(long = "role", value_enum)]
        roles: Vec<Role>,
    },
    /// Get a user by ID.
    Get {
        id: i64,
    },
    /// Get a user by email address.
    Find {
        email: String,
    },
    /// Create a new user.
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long, value_enum, default_value = "tutorado")]
        role: Role,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        group: Option<String>,
        /// Student enrollment number.
        #[arg(long)]
        enrollment: Option<String>,
        #[arg(long)]
        building: Option<String>,
        /// Subjects to link when the role teaches (repeatable).
        #[arg(long = "subject")]
        subjects: Vec<String>,
    },
    /// Replace the password of the account with this email.
    Password {
        email: String,
        password: String,
    },
    /// Delete a user by ID.
    Delete {
        id: i64,
    },
    /// List everyone who teaches.
    Tutors,
    /// List every student.
    Students,
}
