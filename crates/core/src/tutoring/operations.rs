use std::cmp::Ordering;

use chrono::{DateTime, SubsecRound, Utc};

use super::error::TutoringError;
use super::types::{Notification, Rating, Session, SessionStatus};

/// Timestamps are kept at microsecond precision so that every backend stores
/// and returns the same value.
pub fn normalize_timestamp(timestamp: DateTime<Utc>) -> DateTime<Utc> {
    timestamp.trunc_subsecs(6)
}

/// Current time, normalized.
pub fn now() -> DateTime<Utc> {
    normalize_timestamp(Utc::now())
}

/// Next id for an append-only table: `max(existing) + 1`, or 1 when empty.
pub fn next_id(ids: impl IntoIterator<Item = i64>) -> i64 {
    ids.into_iter().max().map_or(1, |max| max + 1)
}

/// Orders sessions by date, then by time label.
fn compare_sessions(a: &Session, b: &Session) -> Ordering {
    a.scheduled_at
        .cmp(&b.scheduled_at)
        .then_with(|| a.time_label.cmp(&b.time_label))
        .then_with(|| a.id.cmp(&b.id))
}

/// Sorts sessions by (`fecha` ascending, `hora` ascending).
pub fn sort_sessions(sessions: &mut [Session]) {
    sessions.sort_by(compare_sessions);
}

/// Sorts notifications newest first.
pub fn sort_notifications(notifications: &mut [Notification]) {
    notifications.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Finds an active session that already occupies the tutor's slot.
///
/// `exclude_id` skips the session being edited.
pub fn find_conflicting_session<'a>(
    sessions: &'a [Session],
    tutor_id: i64,
    scheduled_at: DateTime<Utc>,
    time_label: &str,
    exclude_id: Option<i64>,
) -> Option<&'a Session> {
    let scheduled_at = normalize_timestamp(scheduled_at);
    sessions.iter().find(|session| {
        session.tutor_id == Some(tutor_id)
            && session.scheduled_at == scheduled_at
            && session.time_label == time_label
            && session.status.is_active()
            && exclude_id != Some(session.id)
    })
}

/// Average score of the given ratings, `None` when there are none.
pub fn average_score(ratings: &[Rating]) -> Option<f64> {
    if ratings.is_empty() {
        return None;
    }
    let total: u32 = ratings.iter().map(|rating| u32::from(rating.score)).sum();
    Some(f64::from(total) / ratings.len() as f64)
}

/// Distinct subject names in alphabetical order.
pub fn distinct_subjects<'a>(subjects: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut subjects: Vec<String> = subjects.into_iter().map(str::to_string).collect();
    subjects.sort();
    subjects.dedup();
    subjects
}

/// Validates a 1-5 star score.
pub fn validate_score(score: u8) -> Result<(), TutoringError> {
    if (1..=5).contains(&score) {
        Ok(())
    } else {
        Err(TutoringError::InvalidScore(score))
    }
}

/// Validates a status change requested by a tutor or student action.
pub fn validate_transition(from: SessionStatus, to: SessionStatus) -> Result<(), TutoringError> {
    if from.can_transition_to(to) {
        Ok(())
    } else {
        Err(TutoringError::InvalidTransition { from, to })
    }
}
