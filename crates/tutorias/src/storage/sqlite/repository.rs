//! SQLite repository implementation.
//!
//! Implements the repository traits from `tutorias_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, TransactionBehavior};
use tokio_rusqlite::Connection;

use tutorias_core::storage::{
    NotificationRepository, RatingRepository, RepositoryError, Result, SchemaRepository,
    SessionRepository, Table, TeacherSubjectRepository, UserRepository,
};
use tutorias_core::tutoring::{
    normalize_timestamp, now, NewNotification, NewRating, NewSession, NewUser, Notification,
    Rating, Session, SessionChanges, TeacherSubject, User, UserChanges, UserType,
};

use super::conversions::{
    format_datetime, row_to_notification, row_to_rating, row_to_session, row_to_teacher_subject,
    row_to_user,
};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Collects mapped rows, stopping at the first conversion failure.
fn collect_rows<T>(
    rows: impl Iterator<Item = rusqlite::Result<T>>,
) -> tokio_rusqlite::Result<Vec<T>> {
    let mut items = Vec::new();
    for row_result in rows {
        items.push(row_result.map_err(wrap_err)?);
    }
    Ok(items)
}

fn write_user(conn: &rusqlite::Connection, user: &User) -> rusqlite::Result<usize> {
    conn.execute(
        schema::UPDATE_USER,
        rusqlite::params![
            user.id,
            user.name,
            user.email,
            user.phone,
            user.password,
            user.user_type.as_str(),
            user.group,
            user.enrollment,
            user.building
        ],
    )
}

fn insert_session(conn: &rusqlite::Connection, session: &Session) -> rusqlite::Result<i64> {
    conn.execute(
        schema::INSERT_SESSION,
        rusqlite::params![
            session.student_id,
            session.tutor_id,
            session.subject,
            format_datetime(&session.scheduled_at),
            session.time_label,
            session.status.as_str(),
            format_datetime(&session.created_at)
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

fn write_session(conn: &rusqlite::Connection, session: &Session) -> rusqlite::Result<usize> {
    conn.execute(
        schema::UPDATE_SESSION,
        rusqlite::params![
            session.id,
            session.tutor_id,
            session.subject,
            format_datetime(&session.scheduled_at),
            session.time_label,
            session.status.as_str()
        ],
    )
}

/// Id of the active session, other than `session` itself, that holds its slot.
fn slot_holder(conn: &rusqlite::Connection, session: &Session) -> rusqlite::Result<Option<i64>> {
    let Some(tutor_id) = session.tutor_id else {
        return Ok(None);
    };
    conn.query_row(
        schema::SELECT_CONFLICTING_SESSION,
        rusqlite::params![
            tutor_id,
            format_datetime(&session.scheduled_at),
            session.time_label,
            session.id
        ],
        |row| row.get(0),
    )
    .optional()
}

/// Result of an update that first checks the tutor's slot.
enum SlotWrite {
    Written(Session),
    Taken(i64),
    Missing,
}

/// SQLite-based repository implementation.
///
/// Provides async access to SQLite storage for all entity types. Tables are
/// created by [`SchemaRepository::init_schema`], not by the constructors.
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Opens (or creates) a file-based database.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::configure(conn).await
    }

    /// Creates a new repository with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::configure(conn).await
    }

    async fn configure(conn: Connection) -> Result<Self> {
        conn.call(|conn| {
            conn.execute_batch(schema::DISABLE_FOREIGN_KEYS)
                .map_err(wrap_err)
        })
        .await
        .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Ok(Self { conn })
    }
}

// ============================================================================
// SchemaRepository implementation
// ============================================================================

#[async_trait]
impl SchemaRepository for SqliteRepository {
    async fn init_table(&self, table: Table) -> Result<()> {
        let ddl = schema::create_statement(table);

        self.conn
            .call(move |conn| {
                conn.execute_batch(ddl).map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, table.entity_type()))
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl UserRepository for SqliteRepository {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        user.validate()?;
        let email = user.email.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_USER,
                    rusqlite::params![
                        user.name,
                        user.email,
                        user.phone,
                        user.password,
                        user.user_type.as_str(),
                        user.group,
                        user.enrollment,
                        user.building
                    ],
                )
                .map_err(wrap_err)?;
                Ok(user.into_user(conn.last_insert_rowid()))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", email))
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_USER_BY_ID).map_err(wrap_err)?;
                stmt.query_row([id], row_to_user)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id.to_string()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let email = email.to_string();
        let user_email = email.clone();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_USER_BY_EMAIL)
                    .map_err(wrap_err)?;
                stmt.query_row([&email], row_to_user)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_email))
    }

    async fn list_users_by_type(&self, types: &[UserType]) -> Result<Vec<User>> {
        if types.is_empty() {
            return Ok(Vec::new());
        }
        let sql = schema::select_users_by_type(types.len());
        let names: Vec<&'static str> = types.iter().map(UserType::as_str).collect();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql).map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(names), row_to_user)
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User> {
        // A UNIQUE failure here can only come from a new email
        let conflict_key = changes.email.clone().unwrap_or_else(|| id.to_string());

        let updated = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let current = tx
                    .query_row(schema::SELECT_USER_BY_ID, [id], row_to_user)
                    .optional()
                    .map_err(wrap_err)?;
                let Some(mut user) = current else {
                    return Ok(None);
                };
                changes.apply_to(&mut user);
                write_user(&tx, &user).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(Some(user))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", conflict_key))?;

        updated.ok_or_else(|| RepositoryError::not_found("User", id))
    }

    async fn update_password_by_email(&self, email: &str, password: &str) -> Result<User> {
        let email = email.to_string();
        let password = password.to_string();
        let user_email = email.clone();

        let updated = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let current = tx
                    .query_row(schema::SELECT_USER_BY_EMAIL, [&email], row_to_user)
                    .optional()
                    .map_err(wrap_err)?;
                let Some(mut user) = current else {
                    return Ok(None);
                };
                user.password = password;
                write_user(&tx, &user).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(Some(user))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", user_email.clone()))?;

        updated.ok_or_else(|| RepositoryError::not_found("User", user_email))
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.conn
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_USER, [id]).map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "User", id.to_string()))
    }
}

// ============================================================================
// SessionRepository implementation
// ============================================================================

#[async_trait]
impl SessionRepository for SqliteRepository {
    async fn create_session(&self, session: NewSession) -> Result<Session> {
        let mut session = session.into_session(0, now());

        self.conn
            .call(move |conn| {
                session.id = insert_session(conn, &session).map_err(wrap_err)?;
                Ok(session)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Session"))
    }

    async fn create_session_if_free(&self, session: NewSession) -> Result<Session> {
        let mut session = session.into_session(0, now());

        let outcome = self
            .conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;
                if let Some(holder) = slot_holder(&tx, &session).map_err(wrap_err)? {
                    return Ok(Err(holder));
                }
                session.id = insert_session(&tx, &session).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(Ok(session))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Session"))?;

        outcome.map_err(|holder| RepositoryError::already_exists("Session", holder))
    }

    async fn update_session_if_free(&self, id: i64, changes: SessionChanges) -> Result<Session> {
        let outcome = self
            .conn
            .call(move |conn| {
                let tx = conn
                    .transaction_with_behavior(TransactionBehavior::Immediate)
                    .map_err(wrap_err)?;
                let current = tx
                    .query_row(schema::SELECT_SESSION_BY_ID, [id], row_to_session)
                    .optional()
                    .map_err(wrap_err)?;
                let Some(mut session) = current else {
                    return Ok(SlotWrite::Missing);
                };
                changes.apply_to(&mut session);
                if let Some(holder) = slot_holder(&tx, &session).map_err(wrap_err)? {
                    return Ok(SlotWrite::Taken(holder));
                }
                write_session(&tx, &session).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(SlotWrite::Written(session))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Session", id.to_string()))?;

        match outcome {
            SlotWrite::Written(session) => Ok(session),
            SlotWrite::Taken(holder) => Err(RepositoryError::already_exists("Session", holder)),
            SlotWrite::Missing => Err(RepositoryError::not_found("Session", id)),
        }
    }

    async fn get_session(&self, id: i64) -> Result<Option<Session>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_SESSION_BY_ID)
                    .map_err(wrap_err)?;
                stmt.query_row([id], row_to_session)
                    .optional()
                    .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Session", id.to_string()))
    }

    async fn list_sessions_by_student(&self, student_id: i64) -> Result<Vec<Session>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_SESSIONS_BY_STUDENT)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([student_id], row_to_session)
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Session"))
    }

    async fn list_sessions_by_tutor(&self, tutor_id: i64) -> Result<Vec<Session>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_SESSIONS_BY_TUTOR)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([tutor_id], row_to_session)
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Session"))
    }

    async fn update_session(&self, id: i64, changes: SessionChanges) -> Result<Session> {
        let updated = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                let current = tx
                    .query_row(schema::SELECT_SESSION_BY_ID, [id], row_to_session)
                    .optional()
                    .map_err(wrap_err)?;
                let Some(mut session) = current else {
                    return Ok(None);
                };
                changes.apply_to(&mut session);
                write_session(&tx, &session).map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;
                Ok(Some(session))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Session", id.to_string()))?;

        updated.ok_or_else(|| RepositoryError::not_found("Session", id))
    }

    async fn delete_session(&self, id: i64) -> Result<bool> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_SESSION, [id])
                    .map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Session", id.to_string()))
    }

    async fn find_conflicting_session(
        &self,
        tutor_id: i64,
        scheduled_at: DateTime<Utc>,
        time_label: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Session>> {
        let fecha = format_datetime(&normalize_timestamp(scheduled_at));
        let hora = time_label.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_CONFLICTING_SESSION)
                    .map_err(wrap_err)?;
                stmt.query_row(
                    rusqlite::params![tutor_id, fecha, hora, exclude_id],
                    row_to_session,
                )
                .optional()
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Session"))
    }
}

// ============================================================================
// TeacherSubjectRepository implementation
// ============================================================================

#[async_trait]
impl TeacherSubjectRepository for SqliteRepository {
    async fn assign_subject(&self, tutor_id: i64, subject: &str) -> Result<TeacherSubject> {
        let subject = subject.to_string();
        let link_id = format!("{tutor_id}/{subject}");

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_OR_IGNORE_TEACHER_SUBJECT,
                    rusqlite::params![tutor_id, subject],
                )
                .map_err(wrap_err)?;
                conn.query_row(
                    schema::SELECT_TEACHER_SUBJECT,
                    rusqlite::params![tutor_id, subject],
                    row_to_teacher_subject,
                )
                .map_err(wrap_err)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "TeacherSubject", link_id))
    }

    async fn list_subjects_by_tutor(&self, tutor_id: i64) -> Result<Vec<String>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_SUBJECTS_BY_TUTOR)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([tutor_id], |row| row.get::<_, String>(0))
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "TeacherSubject"))
    }

    async fn list_tutors_by_subject(&self, subject: &str) -> Result<Vec<User>> {
        let subject = subject.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_TUTORS_BY_SUBJECT)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&subject], row_to_user)
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "User"))
    }

    async fn list_all_subjects(&self) -> Result<Vec<String>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_ALL_SUBJECTS)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([], |row| row.get::<_, String>(0))
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "TeacherSubject"))
    }

    async fn remove_subject(&self, tutor_id: i64, subject: &str) -> Result<bool> {
        let subject = subject.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::DELETE_TEACHER_SUBJECT,
                        rusqlite::params![tutor_id, subject],
                    )
                    .map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "TeacherSubject"))
    }
}

// ============================================================================
// RatingRepository implementation
// ============================================================================

#[async_trait]
impl RatingRepository for SqliteRepository {
    async fn create_rating(&self, rating: NewRating) -> Result<Rating> {
        rating.validate()?;
        let mut rating = rating.into_rating(0, now());

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_RATING,
                    rusqlite::params![
                        rating.target.tutor_id(),
                        rating.target.student_id(),
                        rating.subject,
                        rating.score,
                        rating.comment,
                        rating.rater_id,
                        format_datetime(&rating.created_at)
                    ],
                )
                .map_err(wrap_err)?;
                rating.id = conn.last_insert_rowid();
                Ok(rating)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Rating"))
    }

    async fn list_ratings_for_tutor(
        &self,
        tutor_id: i64,
        subject: Option<&str>,
    ) -> Result<Vec<Rating>> {
        let subject = subject.map(str::to_string);

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_RATINGS_FOR_TUTOR)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map(rusqlite::params![tutor_id, subject], row_to_rating)
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Rating"))
    }

    async fn list_ratings_for_student(&self, student_id: i64) -> Result<Vec<Rating>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_RATINGS_FOR_STUDENT)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([student_id], row_to_rating)
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Rating"))
    }
}

// ============================================================================
// NotificationRepository implementation
// ============================================================================

#[async_trait]
impl NotificationRepository for SqliteRepository {
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        let mut notification = notification.into_notification(0, now());

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_NOTIFICATION,
                    rusqlite::params![
                        notification.user_id,
                        notification.kind.as_str(),
                        notification.title,
                        notification.description,
                        format_datetime(&notification.created_at)
                    ],
                )
                .map_err(wrap_err)?;
                notification.id = conn.last_insert_rowid();
                Ok(notification)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Notification"))
    }

    async fn list_notifications(&self, user_id: i64) -> Result<Vec<Notification>> {
        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_NOTIFICATIONS_BY_USER)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([user_id], row_to_notification)
                    .map_err(wrap_err)?;
                collect_rows(rows)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Notification"))
    }

    async fn delete_notification(&self, id: i64) -> Result<bool> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_NOTIFICATION, [id])
                    .map_err(wrap_err)?;
                Ok(rows > 0)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, "Notification", id.to_string()))
    }

    async fn clear_notifications(&self, user_id: i64) -> Result<u64> {
        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_NOTIFICATIONS_BY_USER, [user_id])
                    .map_err(wrap_err)?;
                Ok(rows as u64)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, "Notification"))
    }
}
