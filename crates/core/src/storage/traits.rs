use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::tutoring::{
    NewNotification, NewRating, NewSession, NewUser, Notification, Rating, Session,
    SessionChanges, TeacherSubject, User, UserChanges, UserType,
};

use super::{Result, Table};

/// Creation of the backing tables.
#[async_trait]
pub trait SchemaRepository: Send + Sync {
    /// Ensures a table exists. Calling it again is a no-op.
    async fn init_table(&self, table: Table) -> Result<()>;

    /// Ensures every table exists.
    async fn init_schema(&self) -> Result<()> {
        for table in Table::ALL {
            self.init_table(table).await?;
        }
        Ok(())
    }
}

/// Repository for user operations.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a user and returns it with its assigned id.
    ///
    /// Fails with `AlreadyExists` when the email is taken.
    async fn create_user(&self, user: NewUser) -> Result<User>;

    /// Gets a user by id.
    async fn get_user(&self, id: i64) -> Result<Option<User>>;

    /// Gets a user by email address.
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Lists users holding any of the given roles, ordered by id.
    async fn list_users_by_type(&self, types: &[UserType]) -> Result<Vec<User>>;

    /// Merges `changes` into an existing user.
    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User>;

    /// Replaces the password of the user with this email.
    async fn update_password_by_email(&self, email: &str, password: &str) -> Result<User>;

    /// Deletes a user. Returns false if there was nothing to delete.
    async fn delete_user(&self, id: i64) -> Result<bool>;
}

/// Repository for session bookings.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Books a session; its status is always `pendiente`.
    async fn create_session(&self, session: NewSession) -> Result<Session>;

    /// Gets a session by id.
    async fn get_session(&self, id: i64) -> Result<Option<Session>>;

    /// Sessions booked by a student, ordered by date and time.
    async fn list_sessions_by_student(&self, student_id: i64) -> Result<Vec<Session>>;

    /// Sessions assigned to a tutor, ordered by date and time.
    async fn list_sessions_by_tutor(&self, tutor_id: i64) -> Result<Vec<Session>>;

    /// Merges `changes` into an existing session.
    async fn update_session(&self, id: i64, changes: SessionChanges) -> Result<Session>;

    /// Deletes a session. Returns false if there was nothing to delete.
    async fn delete_session(&self, id: i64) -> Result<bool>;

    /// Books a session unless its tutor already holds an active one in the
    /// same slot. Check and insert happen under one write lock.
    ///
    /// Fails with `AlreadyExists` naming the session that holds the slot.
    async fn create_session_if_free(&self, session: NewSession) -> Result<Session>;

    /// Merges `changes` unless the result clashes with another active
    /// session of the same tutor. Same errors as
    /// [`create_session_if_free`](Self::create_session_if_free), plus
    /// `NotFound`.
    async fn update_session_if_free(&self, id: i64, changes: SessionChanges) -> Result<Session>;

    /// Returns an active session of the tutor in the same slot, if any.
    async fn find_conflicting_session(
        &self,
        tutor_id: i64,
        scheduled_at: DateTime<Utc>,
        time_label: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Session>>;
}

/// Repository for the tutor/subject mapping.
#[async_trait]
pub trait TeacherSubjectRepository: Send + Sync {
    /// Links a tutor to a subject. An existing link is returned unchanged.
    async fn assign_subject(&self, tutor_id: i64, subject: &str) -> Result<TeacherSubject>;

    /// Subjects taught by a tutor, in the order they were assigned.
    async fn list_subjects_by_tutor(&self, tutor_id: i64) -> Result<Vec<String>>;

    /// Users that teach a subject, ordered by id.
    async fn list_tutors_by_subject(&self, subject: &str) -> Result<Vec<User>>;

    /// Every subject taught by someone, distinct and alphabetical.
    async fn list_all_subjects(&self) -> Result<Vec<String>>;

    /// Removes a link. Returns false if it did not exist.
    async fn remove_subject(&self, tutor_id: i64, subject: &str) -> Result<bool>;
}

/// Repository for ratings.
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Stores a rating. Fails with `InvalidData` for scores outside 1-5.
    async fn create_rating(&self, rating: NewRating) -> Result<Rating>;

    /// Ratings about a tutor, optionally restricted to one subject.
    async fn list_ratings_for_tutor(
        &self,
        tutor_id: i64,
        subject: Option<&str>,
    ) -> Result<Vec<Rating>>;

    /// Ratings about a student.
    async fn list_ratings_for_student(&self, student_id: i64) -> Result<Vec<Rating>>;
}

/// Repository for notifications.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification>;

    /// Notifications of a user, newest first.
    async fn list_notifications(&self, user_id: i64) -> Result<Vec<Notification>>;

    /// Deletes one notification. Returns false if it did not exist.
    async fn delete_notification(&self, id: i64) -> Result<bool>;

    /// Deletes every notification of a user and returns how many were removed.
    async fn clear_notifications(&self, user_id: i64) -> Result<u64>;
}

/// Combined trait for backends that store the whole tutoring model.
pub trait TutoringStore:
    SchemaRepository
    + UserRepository
    + SessionRepository
    + TeacherSubjectRepository
    + RatingRepository
    + NotificationRepository
{
}

impl<T> TutoringStore for T where
    T: SchemaRepository
        + UserRepository
        + SessionRepository
        + TeacherSubjectRepository
        + RatingRepository
        + NotificationRepository
{
}
