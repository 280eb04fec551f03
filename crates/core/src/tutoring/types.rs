use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::TutoringError;

/// Role of a user, which decides the screens and lists they appear in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    /// A student who books sessions.
    Tutorado,
    Tutor,
    Maestro,
    Profesor,
}

impl UserType {
    /// Every role that offers tutoring.
    pub const TUTOR_ROLES: [UserType; 3] = [UserType::Tutor, UserType::Maestro, UserType::Profesor];

    /// Returns the persisted name of this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Tutorado => "Tutorado",
            UserType::Tutor => "Tutor",
            UserType::Maestro => "Maestro",
            UserType::Profesor => "Profesor",
        }
    }

    /// Returns true for roles that teach.
    pub fn is_tutor(&self) -> bool {
        !matches!(self, UserType::Tutorado)
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = TutoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Tutorado" => Ok(UserType::Tutorado),
            "Tutor" => Ok(UserType::Tutor),
            "Maestro" => Ok(UserType::Maestro),
            "Profesor" => Ok(UserType::Profesor),
            other => Err(TutoringError::UnknownUserType(other.to_string())),
        }
    }
}

/// A registered person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    /// Globally unique.
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    /// Stored as entered.
    pub password: String,
    pub user_type: UserType,
    #[serde(rename = "grupo", default)]
    pub group: Option<String>,
    #[serde(rename = "matricula", default)]
    pub enrollment: Option<String>,
    #[serde(rename = "edificio", default)]
    pub building: Option<String>,
}

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Pendiente,
    Aceptada,
    Rechazada,
    Cancelada,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Pendiente => "pendiente",
            SessionStatus::Aceptada => "aceptada",
            SessionStatus::Rechazada => "rechazada",
            SessionStatus::Cancelada => "cancelada",
        }
    }

    /// Pending and accepted sessions still occupy the tutor's slot.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionStatus::Pendiente | SessionStatus::Aceptada)
    }

    /// Returns true if no transition leaves this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionStatus::Rechazada | SessionStatus::Cancelada)
    }

    /// Transitions driven by the tutor (accept/reject a pending request) and
    /// the student (cancel a pending or accepted booking).
    pub fn can_transition_to(&self, next: SessionStatus) -> bool {
        matches!(
            (self, next),
            (
                SessionStatus::Pendiente,
                SessionStatus::Aceptada | SessionStatus::Rechazada | SessionStatus::Cancelada
            ) | (SessionStatus::Aceptada, SessionStatus::Cancelada)
        )
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = TutoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pendiente" => Ok(SessionStatus::Pendiente),
            "aceptada" => Ok(SessionStatus::Aceptada),
            "rechazada" => Ok(SessionStatus::Rechazada),
            "cancelada" => Ok(SessionStatus::Cancelada),
            other => Err(TutoringError::UnknownSessionStatus(other.to_string())),
        }
    }
}

/// One scheduled tutoring slot between a student and a tutor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: i64,
    #[serde(rename = "usuarioId")]
    pub student_id: i64,
    #[serde(rename = "tutorId", default)]
    pub tutor_id: Option<i64>,
    #[serde(rename = "materia")]
    pub subject: String,
    #[serde(rename = "fecha")]
    pub scheduled_at: DateTime<Utc>,
    /// Display label of the slot, e.g. "09:00 AM".
    #[serde(rename = "hora")]
    pub time_label: String,
    #[serde(rename = "estado")]
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
}

/// Link between a tutor and a subject they teach.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeacherSubject {
    pub id: i64,
    #[serde(rename = "maestroId")]
    pub tutor_id: i64,
    #[serde(rename = "materia")]
    pub subject: String,
}

/// Who a rating is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RatingTarget {
    Tutor(i64),
    Student(i64),
}

impl RatingTarget {
    /// Builds a target from the two nullable columns used in storage.
    pub fn from_columns(
        tutor_id: Option<i64>,
        student_id: Option<i64>,
    ) -> Result<Self, TutoringError> {
        match (tutor_id, student_id) {
            (Some(id), None) => Ok(RatingTarget::Tutor(id)),
            (None, Some(id)) => Ok(RatingTarget::Student(id)),
            _ => Err(TutoringError::InvalidRatingTarget),
        }
    }

    pub fn tutor_id(&self) -> Option<i64> {
        match self {
            RatingTarget::Tutor(id) => Some(*id),
            RatingTarget::Student(_) => None,
        }
    }

    pub fn student_id(&self) -> Option<i64> {
        match self {
            RatingTarget::Student(id) => Some(*id),
            RatingTarget::Tutor(_) => None,
        }
    }
}

/// A 1-5 star review left by one user about a tutor or a student.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RatingRecord", into = "RatingRecord")]
pub struct Rating {
    pub id: i64,
    pub target: RatingTarget,
    pub subject: Option<String>,
    pub score: u8,
    pub comment: Option<String>,
    /// The user who left the rating.
    pub rater_id: i64,
    pub created_at: DateTime<Utc>,
}

/// Flat persisted shape of a [`Rating`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingRecord {
    id: i64,
    #[serde(default)]
    tutor_id: Option<i64>,
    #[serde(default)]
    alumno_id: Option<i64>,
    #[serde(default)]
    materia: Option<String>,
    calificacion: u8,
    #[serde(default)]
    comentario: Option<String>,
    usuario_id: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<RatingRecord> for Rating {
    type Error = TutoringError;

    fn try_from(record: RatingRecord) -> Result<Self, Self::Error> {
        Ok(Rating {
            id: record.id,
            target: RatingTarget::from_columns(record.tutor_id, record.alumno_id)?,
            subject: record.materia,
            score: record.calificacion,
            comment: record.comentario,
            rater_id: record.usuario_id,
            created_at: record.created_at,
        })
    }
}

impl From<Rating> for RatingRecord {
    fn from(rating: Rating) -> Self {
        RatingRecord {
            id: rating.id,
            tutor_id: rating.target.tutor_id(),
            alumno_id: rating.target.student_id(),
            materia: rating.subject,
            calificacion: rating.score,
            comentario: rating.comment,
            usuario_id: rating.rater_id,
            created_at: rating.created_at,
        }
    }
}

/// Category of a notification, used to pick its icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    SesionConfirmada,
    SesionRechazada,
    SesionPendiente,
    Calificacion,
    Mensaje,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationKind::SesionConfirmada => "sesion_confirmada",
            NotificationKind::SesionRechazada => "sesion_rechazada",
            NotificationKind::SesionPendiente => "sesion_pendiente",
            NotificationKind::Calificacion => "calificacion",
            NotificationKind::Mensaje => "mensaje",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationKind {
    type Err = TutoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sesion_confirmada" => Ok(NotificationKind::SesionConfirmada),
            "sesion_rechazada" => Ok(NotificationKind::SesionRechazada),
            "sesion_pendiente" => Ok(NotificationKind::SesionPendiente),
            "calificacion" => Ok(NotificationKind::Calificacion),
            "mensaje" => Ok(NotificationKind::Mensaje),
            other => Err(TutoringError::UnknownNotificationKind(other.to_string())),
        }
    }
}

/// Informational record shown on a user's notifications screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    /// Recipient.
    #[serde(rename = "usuarioId")]
    pub user_id: i64,
    #[serde(rename = "tipo")]
    pub kind: NotificationKind,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    pub created_at: DateTime<Utc>,
}
