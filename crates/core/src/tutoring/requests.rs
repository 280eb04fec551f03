//! Insert payloads and partial-update changesets.
//!
//! Following the Functional Core pattern, these are pure data types. Every
//! backend turns a payload into a stored record through the same
//! `into_*`/`apply_to` functions, so the resulting records are identical no
//! matter which storage is active.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::TutoringError;
use super::operations::{normalize_timestamp, validate_score};
use super::types::{
    Notification, NotificationKind, Rating, RatingTarget, Session, SessionStatus, TeacherSubject,
    User, UserType,
};

/// Payload for registering a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
    pub user_type: UserType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
}

impl NewUser {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        user_type: UserType,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: None,
            password: password.into(),
            user_type,
            group: None,
            enrollment: None,
            building: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_enrollment(mut self, enrollment: impl Into<String>) -> Self {
        self.enrollment = Some(enrollment.into());
        self
    }

    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = Some(building.into());
        self
    }

    /// Checks the fields every backend requires.
    pub fn validate(&self) -> Result<(), TutoringError> {
        if self.name.trim().is_empty() {
            return Err(TutoringError::EmptyField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(TutoringError::EmptyField("email"));
        }
        if self.password.is_empty() {
            return Err(TutoringError::EmptyField("password"));
        }
        Ok(())
    }

    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
            phone: self.phone,
            password: self.password,
            user_type: self.user_type,
            group: self.group,
            enrollment: self.enrollment,
            building: self.building,
        }
    }
}

/// Partial update of a user. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enrollment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building: Option<String>,
}

impl UserChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn with_enrollment(mut self, enrollment: impl Into<String>) -> Self {
        self.enrollment = Some(enrollment.into());
        self
    }

    pub fn with_building(mut self, building: impl Into<String>) -> Self {
        self.building = Some(building.into());
        self
    }

    /// Merges the changes into `user`. The id is never touched.
    pub fn apply_to(self, user: &mut User) {
        if let Some(name) = self.name {
            user.name = name;
        }
        if let Some(email) = self.email {
            user.email = email;
        }
        if let Some(phone) = self.phone {
            user.phone = Some(phone);
        }
        if let Some(password) = self.password {
            user.password = password;
        }
        if let Some(user_type) = self.user_type {
            user.user_type = user_type;
        }
        if let Some(group) = self.group {
            user.group = Some(group);
        }
        if let Some(enrollment) = self.enrollment {
            user.enrollment = Some(enrollment);
        }
        if let Some(building) = self.building {
            user.building = Some(building);
        }
    }
}

/// Payload for booking a session. Sessions always start as `pendiente`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSession {
    pub student_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutor_id: Option<i64>,
    pub subject: String,
    pub scheduled_at: DateTime<Utc>,
    pub time_label: String,
}

impl NewSession {
    pub fn new(
        student_id: i64,
        tutor_id: Option<i64>,
        subject: impl Into<String>,
        scheduled_at: DateTime<Utc>,
        time_label: impl Into<String>,
    ) -> Self {
        Self {
            student_id,
            tutor_id,
            subject: subject.into(),
            scheduled_at,
            time_label: time_label.into(),
        }
    }

    pub fn into_session(self, id: i64, created_at: DateTime<Utc>) -> Session {
        Session {
            id,
            student_id: self.student_id,
            tutor_id: self.tutor_id,
            subject: self.subject,
            scheduled_at: normalize_timestamp(self.scheduled_at),
            time_label: self.time_label,
            status: SessionStatus::Pendiente,
            created_at: normalize_timestamp(created_at),
        }
    }
}

/// Partial update of a session. Any status may be written here; the
/// transition table is only enforced by intent-level service calls.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionChanges {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tutor_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SessionStatus>,
}

impl SessionChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tutor(mut self, tutor_id: i64) -> Self {
        self.tutor_id = Some(tutor_id);
        self
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_schedule(
        mut self,
        scheduled_at: DateTime<Utc>,
        time_label: impl Into<String>,
    ) -> Self {
        self.scheduled_at = Some(scheduled_at);
        self.time_label = Some(time_label.into());
        self
    }

    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Merges the changes into `session`. The id and creation time are kept.
    pub fn apply_to(self, session: &mut Session) {
        if let Some(tutor_id) = self.tutor_id {
            session.tutor_id = Some(tutor_id);
        }
        if let Some(subject) = self.subject {
            session.subject = subject;
        }
        if let Some(scheduled_at) = self.scheduled_at {
            session.scheduled_at = normalize_timestamp(scheduled_at);
        }
        if let Some(time_label) = self.time_label {
            session.time_label = time_label;
        }
        if let Some(status) = self.status {
            session.status = status;
        }
    }
}

/// Builds a teacher-subject link record.
pub fn new_teacher_subject(id: i64, tutor_id: i64, subject: impl Into<String>) -> TeacherSubject {
    TeacherSubject {
        id,
        tutor_id,
        subject: subject.into(),
    }
}

/// Payload for leaving a rating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRating {
    pub target: RatingTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub score: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    pub rater_id: i64,
}

impl NewRating {
    pub fn new(target: RatingTarget, score: u8, rater_id: i64) -> Self {
        Self {
            target,
            subject: None,
            score,
            comment: None,
            rater_id,
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the comment; blank comments are stored as `None`.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        let trimmed = comment.trim();
        self.comment = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), TutoringError> {
        validate_score(self.score)
    }

    pub fn into_rating(self, id: i64, created_at: DateTime<Utc>) -> Rating {
        Rating {
            id,
            target: self.target,
            subject: self.subject,
            score: self.score,
            comment: self.comment,
            rater_id: self.rater_id,
            created_at: normalize_timestamp(created_at),
        }
    }
}

/// Payload for a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    pub user_id: i64,
    pub kind: NotificationKind,
    pub title: String,
    pub description: String,
}

impl NewNotification {
    pub fn new(
        user_id: i64,
        kind: NotificationKind,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            kind,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn into_notification(self, id: i64, created_at: DateTime<Utc>) -> Notification {
        Notification {
            id,
            user_id: self.user_id,
            kind: self.kind,
            title: self.title,
            description: self.description,
            created_at: normalize_timestamp(created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_user() -> User {
        NewUser::new("Ana", "ana@upq.edu.mx", "secret", UserType::Tutorado)
            .with_phone("4420000000")
            .into_user(1)
    }

    #[test]
    fn test_new_user_validation() {
        assert!(NewUser::new("Ana", "a@b.com", "pw", UserType::Tutor)
            .validate()
            .is_ok());
        assert_eq!(
            NewUser::new("  ", "a@b.com", "pw", UserType::Tutor).validate(),
            Err(TutoringError::EmptyField("name"))
        );
        assert_eq!(
            NewUser::new("Ana", "", "pw", UserType::Tutor).validate(),
            Err(TutoringError::EmptyField("email"))
        );
        assert_eq!(
            NewUser::new("Ana", "a@b.com", "", UserType::Tutor).validate(),
            Err(TutoringError::EmptyField("password"))
        );
    }

    #[test]
    fn test_user_changes_merge_keeps_untouched_fields() {
        let mut user = sample_user();

        UserChanges::new()
            .with_name("Ana Maria")
            .with_group("S-101")
            .apply_to(&mut user);

        assert_eq!(user.id, 1);
        assert_eq!(user.name, "Ana Maria");
        assert_eq!(user.group.as_deref(), Some("S-101"));
        assert_eq!(user.email, "ana@upq.edu.mx");
        assert_eq!(user.phone.as_deref(), Some("4420000000"));
    }

    #[test]
    fn test_new_session_starts_pending() {
        let when = Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap();
        let session = NewSession::new(1, Some(2), "Programacion", when, "10:00 AM")
            .into_session(5, when);

        assert_eq!(session.id, 5);
        assert_eq!(session.status, SessionStatus::Pendiente);
        assert_eq!(session.scheduled_at, when);
    }

    #[test]
    fn test_session_changes_only_touch_supplied_fields() {
        let when = Utc.with_ymd_and_hms(2024, 1, 10, 10, 0, 0).unwrap();
        let mut session = NewSession::new(1, Some(2), "Programacion", when, "10:00 AM")
            .into_session(5, when);

        SessionChanges::new()
            .with_status(SessionStatus::Aceptada)
            .apply_to(&mut session);

        assert_eq!(session.status, SessionStatus::Aceptada);
        assert_eq!(session.subject, "Programacion");
        assert_eq!(session.time_label, "10:00 AM");
        assert_eq!(session.tutor_id, Some(2));
    }

    #[test]
    fn test_rating_comment_blank_is_none() {
        let rating = NewRating::new(RatingTarget::Tutor(2), 5, 1).with_comment("   ");
        assert_eq!(rating.comment, None);

        let rating = NewRating::new(RatingTarget::Tutor(2), 5, 1).with_comment(" Excelente ");
        assert_eq!(rating.comment.as_deref(), Some("Excelente"));
    }

    #[test]
    fn test_rating_validation() {
        assert!(NewRating::new(RatingTarget::Tutor(2), 1, 1).validate().is_ok());
        assert!(NewRating::new(RatingTarget::Tutor(2), 5, 1).validate().is_ok());
        assert_eq!(
            NewRating::new(RatingTarget::Tutor(2), 0, 1).validate(),
            Err(TutoringError::InvalidScore(0))
        );
        assert_eq!(
            NewRating::new(RatingTarget::Tutor(2), 6, 1).validate(),
            Err(TutoringError::InvalidScore(6))
        );
    }
}
