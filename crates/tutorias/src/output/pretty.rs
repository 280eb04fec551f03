//! Pretty output formatting.

use tutorias_core::tutoring::{Notification, Session, User};

use crate::service::SubjectRating;

fn format_list<T>(title: &str, empty: &str, items: &[T], format_item: fn(&T) -> String) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    let mut output = format!("{title} ({})\n", items.len());
    output.push_str(&"-".repeat(40));
    for item in items {
        output.push_str(&format!("\n{}", format_item(item)));
        output.push('\n');
    }
    output
}

/// Format a user for display.
pub fn format_user(user: &User) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Email: {}",
        user.name, user.user_type, user.id, user.email
    );
    if let Some(phone) = &user.phone {
        output.push_str(&format!("\n  Phone: {phone}"));
    }
    if let Some(group) = &user.group {
        output.push_str(&format!("\n  Group: {group}"));
    }
    if let Some(enrollment) = &user.enrollment {
        output.push_str(&format!("\n  Enrollment: {enrollment}"));
    }
    if let Some(building) = &user.building {
        output.push_str(&format!("\n  Building: {building}"));
    }
    output
}

pub fn format_users(users: &[User]) -> String {
    format_list("USERS", "No users found.", users, format_user)
}

/// Format a session for display.
pub fn format_session(session: &Session) -> String {
    let tutor = session
        .tutor_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "{} [{}]\n  ID: {}\n  Date: {} {}\n  Student: {}\n  Tutor: {}",
        session.subject,
        session.status,
        session.id,
        session.scheduled_at.format("%d/%m/%Y"),
        session.time_label,
        session.student_id,
        tutor
    )
}

pub fn format_sessions(sessions: &[Session]) -> String {
    format_list("SESSIONS", "No sessions found.", sessions, format_session)
}

pub fn format_subjects(subjects: &[String]) -> String {
    format_list("SUBJECTS", "No subjects found.", subjects, String::clone)
}

/// Format one subject summary, `-` when it has no ratings.
pub fn format_subject_rating(rating: &SubjectRating) -> String {
    match rating.average {
        Some(average) => format!("{}: {average:.1} ({} ratings)", rating.subject, rating.count),
        None => format!("{}: -", rating.subject),
    }
}

pub fn format_subject_ratings(ratings: &[SubjectRating]) -> String {
    format_list("SUBJECTS", "No subjects found.", ratings, format_subject_rating)
}

pub fn format_notification(notification: &Notification) -> String {
    format!(
        "{} [{}]\n  ID: {}\n  {}\n  {}",
        notification.title,
        notification.kind,
        notification.id,
        notification.description,
        notification.created_at.format("%d/%m/%Y %H:%M")
    )
}

pub fn format_notifications(notifications: &[Notification]) -> String {
    format_list(
        "NOTIFICATIONS",
        "No notifications.",
        notifications,
        format_notification,
    )
}
