mod error;
mod notices;
mod operations;
mod requests;
pub mod seed;
mod types;

pub use error::TutoringError;
pub use notices::{session_request_notice, session_response_notices};
pub use operations::{
    average_score, distinct_subjects, find_conflicting_session, next_id, normalize_timestamp,
    now, sort_notifications, sort_sessions, validate_score, validate_transition,
};
pub use requests::{
    new_teacher_subject, NewNotification, NewRating, NewSession, NewUser, SessionChanges,
    UserChanges,
};
pub use types::{
    Notification, NotificationKind, Rating, RatingTarget, Session, SessionStatus, TeacherSubject,
    User, UserType,
};
