//! Demo data for a fresh installation.
//!
//! Pure functions only; the loaders that write these records live in the
//! application crate.

use super::requests::NewUser;
use super::types::UserType;

/// Email of the default student account.
pub const INITIAL_USER_EMAIL: &str = "124050107@upq.edu.mx";

/// The default student account created on first launch.
pub fn initial_user() -> NewUser {
    NewUser::new("Monse", INITIAL_USER_EMAIL, "12345678", UserType::Tutorado)
        .with_phone("4423828724")
}

/// Additional student accounts.
pub fn seed_students() -> Vec<NewUser> {
    vec![
        NewUser::new("Luis Hernandez", "124050110@upq.edu.mx", "12345678", UserType::Tutorado)
            .with_phone("4421112233")
            .with_group("S-301")
            .with_enrollment("124050110")
            .with_building("Edificio A"),
        NewUser::new("Karla Ramirez", "124050111@upq.edu.mx", "12345678", UserType::Tutorado)
            .with_phone("4422223344")
            .with_group("S-301")
            .with_enrollment("124050111")
            .with_building("Edificio A"),
        NewUser::new("Diego Torres", "124050112@upq.edu.mx", "12345678", UserType::Tutorado)
            .with_phone("4423334455")
            .with_group("S-302")
            .with_enrollment("124050112")
            .with_building("Edificio B"),
    ]
}

/// A tutor account together with the subjects they teach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTutor {
    pub user: NewUser,
    pub subjects: Vec<&'static str>,
}

/// Tutor accounts and their subjects.
pub fn seed_tutors() -> Vec<SeedTutor> {
    vec![
        SeedTutor {
            user: NewUser::new(
                "Roberto Jimenez",
                "rjimenez@upq.edu.mx",
                "12345678",
                UserType::Maestro,
            )
            .with_phone("4425556677")
            .with_building("Edificio C"),
            subjects: vec!["Programacion", "Bases de Datos"],
        },
        SeedTutor {
            user: NewUser::new(
                "Laura Mendoza",
                "lmendoza@upq.edu.mx",
                "12345678",
                UserType::Profesor,
            )
            .with_phone("4426667788")
            .with_building("Edificio C"),
            subjects: vec!["Calculo", "Algebra Lineal"],
        },
        SeedTutor {
            user: NewUser::new("Andrea Soto", "124040201@upq.edu.mx", "12345678", UserType::Tutor)
                .with_phone("4427778899")
                .with_group("S-501")
                .with_enrollment("124040201"),
            subjects: vec!["Programacion", "Ingles"],
        },
    ]
}

/// A rating expressed with emails, resolved to ids when loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedRating {
    pub tutor_email: &'static str,
    pub rater_email: &'static str,
    pub subject: &'static str,
    pub score: u8,
    pub comment: &'static str,
}

/// Ratings left by the seeded students.
pub fn seed_ratings() -> Vec<SeedRating> {
    vec![
        SeedRating {
            tutor_email: "rjimenez@upq.edu.mx",
            rater_email: INITIAL_USER_EMAIL,
            subject: "Programacion",
            score: 5,
            comment: "Explica muy bien los ejemplos",
        },
        SeedRating {
            tutor_email: "rjimenez@upq.edu.mx",
            rater_email: "124050110@upq.edu.mx",
            subject: "Programacion",
            score: 4,
            comment: "Buena sesion",
        },
        SeedRating {
            tutor_email: "lmendoza@upq.edu.mx",
            rater_email: "124050111@upq.edu.mx",
            subject: "Calculo",
            score: 5,
            comment: "Muy paciente",
        },
        SeedRating {
            tutor_email: "124040201@upq.edu.mx",
            rater_email: "124050112@upq.edu.mx",
            subject: "Ingles",
            score: 3,
            comment: "",
        },
    ]
}
