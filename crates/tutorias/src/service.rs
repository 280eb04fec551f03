//! Persistence facade used by the screens.
//!
//! `TutoringService` owns the selected store and exposes one method per
//! storage operation, plus the workflow steps (booking, responding,
//! cancelling) that combine several of them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use tutorias_core::storage::{RepositoryError, Result, TutoringStore};
use tutorias_core::tutoring::{
    average_score, session_request_notice, session_response_notices, validate_transition,
    NewNotification, NewRating, NewSession, NewUser, Notification, Rating, Session,
    SessionChanges, SessionStatus, TeacherSubject, TutoringError, User, UserChanges, UserType,
};

use crate::backend::SelectedBackend;

/// Name used in notifications when the student record cannot be read.
const UNKNOWN_STUDENT: &str = "el alumno";

/// Average score of a tutor in one of their subjects.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectRating {
    pub subject: String,
    /// `None` until the subject has been rated.
    pub average: Option<f64>,
    pub count: usize,
}

/// Entry point for every persistence call.
#[derive(Clone)]
pub struct TutoringService {
    store: Arc<dyn TutoringStore>,
}

impl TutoringService {
    pub fn new(store: Arc<dyn TutoringStore>) -> Self {
        Self { store }
    }

    pub fn from_backend(backend: &SelectedBackend) -> Self {
        Self::new(backend.store())
    }

    pub fn store(&self) -> Arc<dyn TutoringStore> {
        Arc::clone(&self.store)
    }

    /// Creates every table the service needs. Safe to call on each start.
    pub async fn init(&self) -> Result<()> {
        tracing::debug!("initializing schema");
        self.store.init_schema().await
    }

    // ==================== Users ====================

    pub async fn create_user(&self, user: NewUser) -> Result<User> {
        tracing::debug!(email = %user.email, user_type = %user.user_type, "creating user");
        self.store.create_user(user).await
    }

    pub async fn get_user(&self, id: i64) -> Result<Option<User>> {
        tracing::debug!(id, "getting user");
        self.store.get_user(id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        tracing::debug!(email, "getting user by email");
        self.store.get_user_by_email(email).await
    }

    pub async fn list_users_by_type(&self, types: &[UserType]) -> Result<Vec<User>> {
        tracing::debug!(?types, "listing users");
        self.store.list_users_by_type(types).await
    }

    /// Every user offering tutoring, whatever their teaching role.
    pub async fn list_tutors(&self) -> Result<Vec<User>> {
        self.list_users_by_type(&UserType::TUTOR_ROLES).await
    }

    pub async fn list_students(&self) -> Result<Vec<User>> {
        self.list_users_by_type(&[UserType::Tutorado]).await
    }

    pub async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User> {
        tracing::debug!(id, "updating user");
        self.store.update_user(id, changes).await
    }

    pub async fn update_password_by_email(&self, email: &str, password: &str) -> Result<User> {
        tracing::debug!(email, "updating password");
        self.store.update_password_by_email(email, password).await
    }

    pub async fn delete_user(&self, id: i64) -> Result<bool> {
        tracing::debug!(id, "deleting user");
        self.store.delete_user(id).await
    }

    // ==================== Sessions ====================

    pub async fn create_session(&self, session: NewSession) -> Result<Session> {
        tracing::debug!(
            student_id = session.student_id,
            tutor_id = ?session.tutor_id,
            subject = %session.subject,
            "creating session"
        );
        self.store.create_session(session).await
    }

    pub async fn get_session(&self, id: i64) -> Result<Option<Session>> {
        tracing::debug!(id, "getting session");
        self.store.get_session(id).await
    }

    pub async fn list_sessions_by_student(&self, student_id: i64) -> Result<Vec<Session>> {
        tracing::debug!(student_id, "listing sessions by student");
        self.store.list_sessions_by_student(student_id).await
    }

    pub async fn list_sessions_by_tutor(&self, tutor_id: i64) -> Result<Vec<Session>> {
        tracing::debug!(tutor_id, "listing sessions by tutor");
        self.store.list_sessions_by_tutor(tutor_id).await
    }

    pub async fn update_session(&self, id: i64, changes: SessionChanges) -> Result<Session> {
        tracing::debug!(id, "updating session");
        self.store.update_session(id, changes).await
    }

    pub async fn delete_session(&self, id: i64) -> Result<bool> {
        tracing::debug!(id, "deleting session");
        self.store.delete_session(id).await
    }

    pub async fn find_conflicting_session(
        &self,
        tutor_id: i64,
        scheduled_at: DateTime<Utc>,
        time_label: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Session>> {
        tracing::debug!(tutor_id, %scheduled_at, time_label, "checking slot");
        self.store
            .find_conflicting_session(tutor_id, scheduled_at, time_label, exclude_id)
            .await
    }

    /// Books a session if the tutor's slot is free, then tells the tutor
    /// about the request. The store checks and inserts in one step.
    ///
    /// Fails with `AlreadyExists` naming the session that holds the slot.
    pub async fn book_session(&self, session: NewSession) -> Result<Session> {
        tracing::debug!(
            student_id = session.student_id,
            tutor_id = ?session.tutor_id,
            subject = %session.subject,
            "booking session"
        );
        let created = self.store.create_session_if_free(session).await?;
        let student_name = self.student_name(created.student_id).await;
        if let Some(notice) = session_request_notice(&created, &student_name) {
            self.notify(notice).await;
        }
        Ok(created)
    }

    /// Accepts or rejects a pending request and notifies both sides.
    ///
    /// A failed notification is logged and does not undo the status change.
    pub async fn respond_to_session(
        &self,
        session_id: i64,
        accept: bool,
        tutor_name: &str,
    ) -> Result<Session> {
        let next = if accept {
            SessionStatus::Aceptada
        } else {
            SessionStatus::Rechazada
        };
        let updated = self.transition(session_id, next).await?;

        let student_name = self.student_name(updated.student_id).await;
        for notice in session_response_notices(&updated, accept, tutor_name, &student_name) {
            self.notify(notice).await;
        }
        Ok(updated)
    }

    pub async fn cancel_session(&self, session_id: i64) -> Result<Session> {
        self.transition(session_id, SessionStatus::Cancelada).await
    }

    /// Moves an open session to a new slot. The session goes back to
    /// `pendiente` so the tutor confirms the new time.
    pub async fn reschedule_session(
        &self,
        session_id: i64,
        scheduled_at: DateTime<Utc>,
        time_label: &str,
    ) -> Result<Session> {
        let session = self.require_session(session_id).await?;
        if session.status.is_terminal() {
            return Err(TutoringError::InvalidTransition {
                from: session.status,
                to: SessionStatus::Pendiente,
            }
            .into());
        }

        tracing::debug!(session_id, %scheduled_at, time_label, "rescheduling session");
        let changes = SessionChanges::new()
            .with_schedule(scheduled_at, time_label)
            .with_status(SessionStatus::Pendiente);
        self.store.update_session_if_free(session_id, changes).await
    }

    /// Accepted sessions of a tutor, in date order. Past sessions are
    /// included.
    pub async fn upcoming_sessions_for_tutor(&self, tutor_id: i64) -> Result<Vec<Session>> {
        let sessions = self.list_sessions_by_tutor(tutor_id).await?;
        Ok(sessions
            .into_iter()
            .filter(|session| session.status == SessionStatus::Aceptada)
            .collect())
    }

    async fn require_session(&self, id: i64) -> Result<Session> {
        self.get_session(id)
            .await?
            .ok_or_else(|| RepositoryError::not_found("Session", id))
    }

    async fn transition(&self, id: i64, next: SessionStatus) -> Result<Session> {
        let session = self.require_session(id).await?;
        validate_transition(session.status, next)?;
        tracing::debug!(id, from = %session.status, to = %next, "session transition");
        self.update_session(id, SessionChanges::new().with_status(next))
            .await
    }

    async fn student_name(&self, student_id: i64) -> String {
        match self.get_user(student_id).await {
            Ok(Some(user)) => user.name,
            Ok(None) => UNKNOWN_STUDENT.to_string(),
            Err(e) => {
                tracing::warn!(student_id, error = %e, "could not load student");
                UNKNOWN_STUDENT.to_string()
            }
        }
    }

    async fn notify(&self, notice: NewNotification) {
        let user_id = notice.user_id;
        let kind = notice.kind;
        if let Err(e) = self.create_notification(notice).await {
            tracing::warn!(user_id, %kind, error = %e, "failed to store notification");
        }
    }

    // ==================== Subjects ====================

    pub async fn assign_subject(&self, tutor_id: i64, subject: &str) -> Result<TeacherSubject> {
        tracing::debug!(tutor_id, subject, "assigning subject");
        self.store.assign_subject(tutor_id, subject).await
    }

    pub async fn list_subjects_by_tutor(&self, tutor_id: i64) -> Result<Vec<String>> {
        tracing::debug!(tutor_id, "listing subjects by tutor");
        self.store.list_subjects_by_tutor(tutor_id).await
    }

    pub async fn list_tutors_by_subject(&self, subject: &str) -> Result<Vec<User>> {
        tracing::debug!(subject, "listing tutors by subject");
        self.store.list_tutors_by_subject(subject).await
    }

    pub async fn list_all_subjects(&self) -> Result<Vec<String>> {
        tracing::debug!("listing all subjects");
        self.store.list_all_subjects().await
    }

    pub async fn remove_subject(&self, tutor_id: i64, subject: &str) -> Result<bool> {
        tracing::debug!(tutor_id, subject, "removing subject");
        self.store.remove_subject(tutor_id, subject).await
    }

    /// Creates a teaching account and links its subjects.
    ///
    /// Not atomic: if a link fails the user stays registered.
    pub async fn register_tutor(&self, user: NewUser, subjects: &[&str]) -> Result<User> {
        if !user.user_type.is_tutor() {
            return Err(RepositoryError::InvalidData(format!(
                "{} cannot teach subjects",
                user.user_type
            )));
        }

        let created = self.create_user(user).await?;
        for subject in subjects {
            self.assign_subject(created.id, subject).await?;
        }
        tracing::debug!(id = created.id, subjects = subjects.len(), "tutor registered");
        Ok(created)
    }

    // ==================== Ratings ====================

    pub async fn create_rating(&self, rating: NewRating) -> Result<Rating> {
        tracing::debug!(score = rating.score, rater_id = rating.rater_id, "creating rating");
        self.store.create_rating(rating).await
    }

    pub async fn list_ratings_for_tutor(
        &self,
        tutor_id: i64,
        subject: Option<&str>,
    ) -> Result<Vec<Rating>> {
        tracing::debug!(tutor_id, ?subject, "listing ratings for tutor");
        self.store.list_ratings_for_tutor(tutor_id, subject).await
    }

    pub async fn list_ratings_for_student(&self, student_id: i64) -> Result<Vec<Rating>> {
        tracing::debug!(student_id, "listing ratings for student");
        self.store.list_ratings_for_student(student_id).await
    }

    /// Average score of a tutor, overall or in one subject.
    pub async fn average_rating(
        &self,
        tutor_id: i64,
        subject: Option<&str>,
    ) -> Result<Option<f64>> {
        let ratings = self.list_ratings_for_tutor(tutor_id, subject).await?;
        Ok(average_score(&ratings))
    }

    /// Rating summary for each subject the tutor teaches.
    pub async fn tutor_subject_ratings(&self, tutor_id: i64) -> Result<Vec<SubjectRating>> {
        let subjects = self.list_subjects_by_tutor(tutor_id).await?;
        let ratings = self.list_ratings_for_tutor(tutor_id, None).await?;

        Ok(subjects
            .into_iter()
            .map(|subject| {
                let matching: Vec<Rating> = ratings
                    .iter()
                    .filter(|rating| rating.subject.as_deref() == Some(subject.as_str()))
                    .cloned()
                    .collect();
                SubjectRating {
                    average: average_score(&matching),
                    count: matching.len(),
                    subject,
                }
            })
            .collect())
    }

    // ==================== Notifications ====================

    pub async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        tracing::debug!(
            user_id = notification.user_id,
            kind = %notification.kind,
            "creating notification"
        );
        self.store.create_notification(notification).await
    }

    pub async fn list_notifications(&self, user_id: i64) -> Result<Vec<Notification>> {
        tracing::debug!(user_id, "listing notifications");
        self.store.list_notifications(user_id).await
    }

    pub async fn delete_notification(&self, id: i64) -> Result<bool> {
        tracing::debug!(id, "deleting notification");
        self.store.delete_notification(id).await
    }

    pub async fn clear_notifications(&self, user_id: i64) -> Result<u64> {
        tracing::debug!(user_id, "clearing notifications");
        self.store.clear_notifications(user_id).await
    }
}

impl std::fmt::Debug for TutoringService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TutoringService").finish_non_exhaustive()
    }
}
