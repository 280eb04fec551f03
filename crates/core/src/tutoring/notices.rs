//! Notification texts produced by session workflow steps.

use super::requests::NewNotification;
use super::types::{NotificationKind, Session};

fn display_date(session: &Session) -> String {
    session.scheduled_at.format("%d/%m/%Y").to_string()
}

/// Notifications sent when a tutor accepts or rejects a request.
///
/// The student is always notified. The tutor gets a confirmation of their
/// own action when the session names one.
pub fn session_response_notices(
    session: &Session,
    accepted: bool,
    tutor_name: &str,
    student_name: &str,
) -> Vec<NewNotification> {
    let kind = if accepted {
        NotificationKind::SesionConfirmada
    } else {
        NotificationKind::SesionRechazada
    };
    let date = display_date(session);

    let (title, description) = if accepted {
        (
            format!("Sesión Confirmada con {tutor_name}"),
            format!(
                "Tu tutoría para {} fue aceptada. Será el {date} a las {}",
                session.subject, session.time_label
            ),
        )
    } else {
        (
            format!("Sesión Rechazada por {tutor_name}"),
            format!(
                "Tu tutoría para {} fue rechazada por {tutor_name}.",
                session.subject
            ),
        )
    };
    let mut notices = vec![NewNotification::new(session.student_id, kind, title, description)];

    if let Some(tutor_id) = session.tutor_id {
        let (title, description) = if accepted {
            (
                format!("Aceptaste la sesión con {student_name}"),
                format!(
                    "Has aceptado la tutoría de {} con {student_name}. La sesión será el {date} a las {}",
                    session.subject, session.time_label
                ),
            )
        } else {
            (
                format!("Rechazaste la sesión con {student_name}"),
                format!(
                    "Has rechazado la tutoría de {} con {student_name}.",
                    session.subject
                ),
            )
        };
        notices.push(NewNotification::new(tutor_id, kind, title, description));
    }

    notices
}

/// Notification for a tutor when a student books a session with them.
pub fn session_request_notice(session: &Session, student_name: &str) -> Option<NewNotification> {
    let tutor_id = session.tutor_id?;
    Some(NewNotification::new(
        tutor_id,
        NotificationKind::SesionPendiente,
        format!("Nueva solicitud de {student_name}"),
        format!(
            "{student_name} solicitó una tutoría de {} para el {} a las {}",
            session.subject,
            display_date(session),
            session.time_label
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tutoring::requests::NewSession;
    use chrono::{TimeZone, Utc};

    fn session(tutor_id: Option<i64>) -> Session {
        let when = Utc.with_ymd_and_hms(2024, 3, 5, 16, 0, 0).unwrap();
        NewSession::new(7, tutor_id, "Calculo", when, "04:00 PM").into_session(1, when)
    }

    #[test]
    fn test_accept_notifies_student_and_tutor() {
        let notices = session_response_notices(&session(Some(3)), true, "Laura", "Monse");

        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].user_id, 7);
        assert_eq!(notices[0].kind, NotificationKind::SesionConfirmada);
        assert_eq!(notices[0].title, "Sesión Confirmada con Laura");
        assert_eq!(
            notices[0].description,
            "Tu tutoría para Calculo fue aceptada. Será el 05/03/2024 a las 04:00 PM"
        );
        assert_eq!(notices[1].user_id, 3);
        assert_eq!(notices[1].title, "Aceptaste la sesión con Monse");
    }

    #[test]
    fn test_reject_uses_rejected_kind() {
        let notices = session_response_notices(&session(Some(3)), false, "Laura", "Monse");

        assert!(notices
            .iter()
            .all(|n| n.kind == NotificationKind::SesionRechazada));
        assert_eq!(
            notices[0].description,
            "Tu tutoría para Calculo fue rechazada por Laura."
        );
    }

    #[test]
    fn test_session_without_tutor_only_notifies_student() {
        let notices = session_response_notices(&session(None), true, "Laura", "Monse");
        assert_eq!(notices.len(), 1);
    }

    #[test]
    fn test_request_notice_targets_tutor() {
        let notice = session_request_notice(&session(Some(3)), "Monse").unwrap();
        assert_eq!(notice.user_id, 3);
        assert_eq!(notice.kind, NotificationKind::SesionPendiente);

        assert!(session_request_notice(&session(None), "Monse").is_none());
    }
}
