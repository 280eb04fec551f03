//! Repository implementation over any [`KeyValueStore`].
//!
//! Every table is a JSON array under its table key. Writes are
//! read-modify-write cycles on that array, serialized per table by a mutex
//! owned by the repository.

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::{Mutex, MutexGuard};

use tutorias_core::kv::{decode_table, encode_table, KeyValueStore};
use tutorias_core::storage::{
    NotificationRepository, RatingRepository, RepositoryError, Result, SchemaRepository,
    SessionRepository, Table, TeacherSubjectRepository, UserRepository,
};
use tutorias_core::tutoring::{
    distinct_subjects, find_conflicting_session, new_teacher_subject, next_id, now,
    sort_notifications, sort_sessions, NewNotification, NewRating, NewSession, NewUser,
    Notification, Rating, Session, SessionChanges, TeacherSubject, User, UserChanges, UserType,
};

/// Key-value backed repository implementing every storage trait.
pub struct KvRepository<S> {
    store: S,
    locks: [Mutex<()>; Table::COUNT],
}

impl<S: KeyValueStore> KvRepository<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: std::array::from_fn(|_| Mutex::new(())),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Holds the table's write lock for a read-modify-write cycle.
    async fn lock(&self, table: Table) -> MutexGuard<'_, ()> {
        self.locks[table as usize].lock().await
    }

    async fn load<T: DeserializeOwned>(&self, table: Table) -> Result<Vec<T>> {
        let raw = self.store.get_item(table.name()).await?;
        Ok(decode_table(raw.as_deref())?)
    }

    async fn save<T: Serialize + Sync>(&self, table: Table, records: &[T]) -> Result<()> {
        let raw = encode_table(records)?;
        self.store.set_item(table.name(), &raw).await?;
        Ok(())
    }
}

fn ensure_email_free(users: &[User], email: &str, except_id: Option<i64>) -> Result<()> {
    let taken = users
        .iter()
        .any(|user| user.email == email && Some(user.id) != except_id);
    if taken {
        Err(RepositoryError::already_exists("User", email))
    } else {
        Ok(())
    }
}

/// Id of the active session, other than `session` itself, that holds its slot.
fn slot_holder(sessions: &[Session], session: &Session) -> Option<i64> {
    let tutor_id = session.tutor_id?;
    find_conflicting_session(
        sessions,
        tutor_id,
        session.scheduled_at,
        &session.time_label,
        Some(session.id),
    )
    .map(|holder| holder.id)
}

// ============================================================================
// SchemaRepository implementation
// ============================================================================

#[async_trait]
impl<S: KeyValueStore> SchemaRepository for KvRepository<S> {
    async fn init_table(&self, table: Table) -> Result<()> {
        let _guard = self.lock(table).await;
        if self.store.get_item(table.name()).await?.is_none() {
            self.store.set_item(table.name(), "[]").await?;
        }
        Ok(())
    }
}

// ============================================================================
// UserRepository implementation
// ============================================================================

#[async_trait]
impl<S: KeyValueStore> UserRepository for KvRepository<S> {
    async fn create_user(&self, user: NewUser) -> Result<User> {
        user.validate()?;
        let _guard = self.lock(Table::Users).await;

        let mut users: Vec<User> = self.load(Table::Users).await?;
        ensure_email_free(&users, &user.email, None)?;

        let user = user.into_user(next_id(users.iter().map(|u| u.id)));
        users.push(user.clone());
        self.save(Table::Users, &users).await?;
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        let users: Vec<User> = self.load(Table::Users).await?;
        Ok(users.into_iter().find(|u| u.id == id))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let users: Vec<User> = self.load(Table::Users).await?;
        Ok(users.into_iter().find(|u| u.email == email))
    }

    async fn list_users_by_type(&self, types: &[UserType]) -> Result<Vec<User>> {
        let users: Vec<User> = self.load(Table::Users).await?;
        let mut matching: Vec<User> = users
            .into_iter()
            .filter(|u| types.contains(&u.user_type))
            .collect();
        matching.sort_by_key(|u| u.id);
        Ok(matching)
    }

    async fn update_user(&self, id: i64, changes: UserChanges) -> Result<User> {
        let _guard = self.lock(Table::Users).await;

        let mut users: Vec<User> = self.load(Table::Users).await?;
        let index = users
            .iter()
            .position(|u| u.id == id)
            .ok_or_else(|| RepositoryError::not_found("User", id))?;
        if let Some(email) = changes.email.as_deref() {
            ensure_email_free(&users, email, Some(id))?;
        }
        let user = &mut users[index];
        changes.apply_to(user);
        let updated = user.clone();

        self.save(Table::Users, &users).await?;
        Ok(updated)
    }

    async fn update_password_by_email(&self, email: &str, password: &str) -> Result<User> {
        let _guard = self.lock(Table::Users).await;

        let mut users: Vec<User> = self.load(Table::Users).await?;
        let user = users
            .iter_mut()
            .find(|u| u.email == email)
            .ok_or_else(|| RepositoryError::not_found("User", email))?;
        user.password = password.to_string();
        let updated = user.clone();

        self.save(Table::Users, &users).await?;
        Ok(updated)
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        let _guard = self.lock(Table::Users).await;

        let mut users: Vec<User> = self.load(Table::Users).await?;
        let before = users.len();
        users.retain(|u| u.id != id);
        if users.len() == before {
            return Ok(false);
        }
        self.save(Table::Users, &users).await?;
        Ok(true)
    }
}

// ============================================================================
// SessionRepository implementation
// ============================================================================

#[async_trait]
impl<S: KeyValueStore> SessionRepository for KvRepository<S> {
    async fn create_session(&self, session: NewSession) -> Result<Session> {
        let _guard = self.lock(Table::Sessions).await;

        let mut sessions: Vec<Session> = self.load(Table::Sessions).await?;
        let session = session.into_session(next_id(sessions.iter().map(|s| s.id)), now());
        sessions.push(session.clone());
        self.save(Table::Sessions, &sessions).await?;
        Ok(session)
    }

    async fn create_session_if_free(&self, session: NewSession) -> Result<Session> {
        let _guard = self.lock(Table::Sessions).await;

        let mut sessions: Vec<Session> = self.load(Table::Sessions).await?;
        sessions.sort_by_key(|s| s.id);
        let session = session.into_session(next_id(sessions.iter().map(|s| s.id)), now());
        if let Some(holder) = slot_holder(&sessions, &session) {
            return Err(RepositoryError::already_exists("Session", holder));
        }
        sessions.push(session.clone());
        self.save(Table::Sessions, &sessions).await?;
        Ok(session)
    }

    async fn update_session_if_free(&self, id: i64, changes: SessionChanges) -> Result<Session> {
        let _guard = self.lock(Table::Sessions).await;

        let mut sessions: Vec<Session> = self.load(Table::Sessions).await?;
        sessions.sort_by_key(|s| s.id);
        let index = sessions
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| RepositoryError::not_found("Session", id))?;
        let mut updated = sessions[index].clone();
        changes.apply_to(&mut updated);
        if let Some(holder) = slot_holder(&sessions, &updated) {
            return Err(RepositoryError::already_exists("Session", holder));
        }
        sessions[index] = updated.clone();

        self.save(Table::Sessions, &sessions).await?;
        Ok(updated)
    }

    async fn get_session(&self, id: i64) -> Result<Option<Session>> {
        let sessions: Vec<Session> = self.load(Table::Sessions).await?;
        Ok(sessions.into_iter().find(|s| s.id == id))
    }

    async fn list_sessions_by_student(&self, student_id: i64) -> Result<Vec<Session>> {
        let sessions: Vec<Session> = self.load(Table::Sessions).await?;
        let mut matching: Vec<Session> = sessions
            .into_iter()
            .filter(|s| s.student_id == student_id)
            .collect();
        sort_sessions(&mut matching);
        Ok(matching)
    }

    async fn list_sessions_by_tutor(&self, tutor_id: i64) -> Result<Vec<Session>> {
        let sessions: Vec<Session> = self.load(Table::Sessions).await?;
        let mut matching: Vec<Session> = sessions
            .into_iter()
            .filter(|s| s.tutor_id == Some(tutor_id))
            .collect();
        sort_sessions(&mut matching);
        Ok(matching)
    }

    async fn update_session(&self, id: i64, changes: SessionChanges) -> Result<Session> {
        let _guard = self.lock(Table::Sessions).await;

        let mut sessions: Vec<Session> = self.load(Table::Sessions).await?;
        let session = sessions
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| RepositoryError::not_found("Session", id))?;
        changes.apply_to(session);
        let updated = session.clone();

        self.save(Table::Sessions, &sessions).await?;
        Ok(updated)
    }

    async fn delete_session(&self, id: i64) -> Result<bool> {
        let _guard = self.lock(Table::Sessions).await;

        let mut sessions: Vec<Session> = self.load(Table::Sessions).await?;
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        if sessions.len() == before {
            return Ok(false);
        }
        self.save(Table::Sessions, &sessions).await?;
        Ok(true)
    }

    async fn find_conflicting_session(
        &self,
        tutor_id: i64,
        scheduled_at: DateTime<Utc>,
        time_label: &str,
        exclude_id: Option<i64>,
    ) -> Result<Option<Session>> {
        let mut sessions: Vec<Session> = self.load(Table::Sessions).await?;
        sessions.sort_by_key(|s| s.id);
        Ok(
            find_conflicting_session(&sessions, tutor_id, scheduled_at, time_label, exclude_id)
                .cloned(),
        )
    }
}

// ============================================================================
// TeacherSubjectRepository implementation
// ============================================================================

#[async_trait]
impl<S: KeyValueStore> TeacherSubjectRepository for KvRepository<S> {
    async fn assign_subject(&self, tutor_id: i64, subject: &str) -> Result<TeacherSubject> {
        let _guard = self.lock(Table::TeacherSubjects).await;

        let mut links: Vec<TeacherSubject> = self.load(Table::TeacherSubjects).await?;
        if let Some(existing) = links
            .iter()
            .find(|l| l.tutor_id == tutor_id && l.subject == subject)
        {
            return Ok(existing.clone());
        }

        let link = new_teacher_subject(next_id(links.iter().map(|l| l.id)), tutor_id, subject);
        links.push(link.clone());
        self.save(Table::TeacherSubjects, &links).await?;
        Ok(link)
    }

    async fn list_subjects_by_tutor(&self, tutor_id: i64) -> Result<Vec<String>> {
        let mut links: Vec<TeacherSubject> = self.load(Table::TeacherSubjects).await?;
        links.sort_by_key(|l| l.id);
        Ok(links
            .into_iter()
            .filter(|l| l.tutor_id == tutor_id)
            .map(|l| l.subject)
            .collect())
    }

    async fn list_tutors_by_subject(&self, subject: &str) -> Result<Vec<User>> {
        let links: Vec<TeacherSubject> = self.load(Table::TeacherSubjects).await?;
        let tutor_ids: HashSet<i64> = links
            .iter()
            .filter(|l| l.subject == subject)
            .map(|l| l.tutor_id)
            .collect();
        if tutor_ids.is_empty() {
            return Ok(Vec::new());
        }

        let users: Vec<User> = self.load(Table::Users).await?;
        let mut tutors: Vec<User> = users
            .into_iter()
            .filter(|u| tutor_ids.contains(&u.id))
            .collect();
        tutors.sort_by_key(|u| u.id);
        Ok(tutors)
    }

    async fn list_all_subjects(&self) -> Result<Vec<String>> {
        let links: Vec<TeacherSubject> = self.load(Table::TeacherSubjects).await?;
        Ok(distinct_subjects(links.iter().map(|l| l.subject.as_str())))
    }

    async fn remove_subject(&self, tutor_id: i64, subject: &str) -> Result<bool> {
        let _guard = self.lock(Table::TeacherSubjects).await;

        let mut links: Vec<TeacherSubject> = self.load(Table::TeacherSubjects).await?;
        let before = links.len();
        links.retain(|l| !(l.tutor_id == tutor_id && l.subject == subject));
        if links.len() == before {
            return Ok(false);
        }
        self.save(Table::TeacherSubjects, &links).await?;
        Ok(true)
    }
}

// ============================================================================
// RatingRepository implementation
// ============================================================================

#[async_trait]
impl<S: KeyValueStore> RatingRepository for KvRepository<S> {
    async fn create_rating(&self, rating: NewRating) -> Result<Rating> {
        rating.validate()?;
        let _guard = self.lock(Table::Ratings).await;

        let mut ratings: Vec<Rating> = self.load(Table::Ratings).await?;
        let rating = rating.into_rating(next_id(ratings.iter().map(|r| r.id)), now());
        ratings.push(rating.clone());
        self.save(Table::Ratings, &ratings).await?;
        Ok(rating)
    }

    async fn list_ratings_for_tutor(
        &self,
        tutor_id: i64,
        subject: Option<&str>,
    ) -> Result<Vec<Rating>> {
        let ratings: Vec<Rating> = self.load(Table::Ratings).await?;
        let mut matching: Vec<Rating> = ratings
            .into_iter()
            .filter(|r| r.target.tutor_id() == Some(tutor_id))
            .filter(|r| subject.is_none_or(|s| r.subject.as_deref() == Some(s)))
            .collect();
        matching.sort_by_key(|r| r.id);
        Ok(matching)
    }

    async fn list_ratings_for_student(&self, student_id: i64) -> Result<Vec<Rating>> {
        let ratings: Vec<Rating> = self.load(Table::Ratings).await?;
        let mut matching: Vec<Rating> = ratings
            .into_iter()
            .filter(|r| r.target.student_id() == Some(student_id))
            .collect();
        matching.sort_by_key(|r| r.id);
        Ok(matching)
    }
}

// ============================================================================
// NotificationRepository implementation
// ============================================================================

#[async_trait]
impl<S: KeyValueStore> NotificationRepository for KvRepository<S> {
    async fn create_notification(&self, notification: NewNotification) -> Result<Notification> {
        let _guard = self.lock(Table::Notifications).await;

        let mut notifications: Vec<Notification> = self.load(Table::Notifications).await?;
        let notification =
            notification.into_notification(next_id(notifications.iter().map(|n| n.id)), now());
        notifications.push(notification.clone());
        self.save(Table::Notifications, &notifications).await?;
        Ok(notification)
    }

    async fn list_notifications(&self, user_id: i64) -> Result<Vec<Notification>> {
        let notifications: Vec<Notification> = self.load(Table::Notifications).await?;
        let mut matching: Vec<Notification> = notifications
            .into_iter()
            .filter(|n| n.user_id == user_id)
            .collect();
        sort_notifications(&mut matching);
        Ok(matching)
    }

    async fn delete_notification(&self, id: i64) -> Result<bool> {
        let _guard = self.lock(Table::Notifications).await;

        let mut notifications: Vec<Notification> = self.load(Table::Notifications).await?;
        let before = notifications.len();
        notifications.retain(|n| n.id != id);
        if notifications.len() == before {
            return Ok(false);
        }
        self.save(Table::Notifications, &notifications).await?;
        Ok(true)
    }

    async fn clear_notifications(&self, user_id: i64) -> Result<u64> {
        let _guard = self.lock(Table::Notifications).await;

        let mut notifications: Vec<Notification> = self.load(Table::Notifications).await?;
        let before = notifications.len();
        notifications.retain(|n| n.user_id != user_id);
        let removed = (before - notifications.len()) as u64;
        if removed > 0 {
            self.save(Table::Notifications, &notifications).await?;
        }
        Ok(removed)
    }
}
