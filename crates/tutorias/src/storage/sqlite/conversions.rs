//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;

use tutorias_core::tutoring::{
    Notification, NotificationKind, Rating, RatingTarget, Session, SessionStatus, TeacherSubject,
    User, UserType,
};

// ============================================================================
// User conversions
// ============================================================================

/// Convert a SQLite row to a User.
///
/// Expected columns: id, name, email, phone, password, user_type, grupo, matricula, edificio
pub fn row_to_user(row: &Row) -> rusqlite::Result<User> {
    let user_type: String = row.get(5)?;

    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        password: row.get(4)?,
        user_type: parse_text::<UserType>(5, &user_type)?,
        group: row.get(6)?,
        enrollment: row.get(7)?,
        building: row.get(8)?,
    })
}

// ============================================================================
// Session conversions
// ============================================================================

/// Convert a SQLite row to a Session.
///
/// Expected columns: id, usuario_id, tutor_id, materia, fecha, hora, estado, created_at
pub fn row_to_session(row: &Row) -> rusqlite::Result<Session> {
    let scheduled_at: String = row.get(4)?;
    let status: String = row.get(6)?;
    let created_at: String = row.get(7)?;

    Ok(Session {
        id: row.get(0)?,
        student_id: row.get(1)?,
        tutor_id: row.get(2)?,
        subject: row.get(3)?,
        scheduled_at: parse_datetime(4, &scheduled_at)?,
        time_label: row.get(5)?,
        status: parse_text::<SessionStatus>(6, &status)?,
        created_at: parse_datetime(7, &created_at)?,
    })
}

// ============================================================================
// Teacher-subject conversions
// ============================================================================

/// Expected columns: id, maestro_id, materia
pub fn row_to_teacher_subject(row: &Row) -> rusqlite::Result<TeacherSubject> {
    Ok(TeacherSubject {
        id: row.get(0)?,
        tutor_id: row.get(1)?,
        subject: row.get(2)?,
    })
}

// ============================================================================
// Rating conversions
// ============================================================================

/// Convert a SQLite row to a Rating.
///
/// Expected columns: id, tutor_id, alumno_id, materia, calificacion, comentario,
/// usuario_id, created_at
pub fn row_to_rating(row: &Row) -> rusqlite::Result<Rating> {
    let tutor_id: Option<i64> = row.get(1)?;
    let student_id: Option<i64> = row.get(2)?;
    let created_at: String = row.get(7)?;

    let target = RatingTarget::from_columns(tutor_id, student_id).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Integer, Box::new(e))
    })?;

    Ok(Rating {
        id: row.get(0)?,
        target,
        subject: row.get(3)?,
        score: row.get(4)?,
        comment: row.get(5)?,
        rater_id: row.get(6)?,
        created_at: parse_datetime(7, &created_at)?,
    })
}

// ============================================================================
// Notification conversions
// ============================================================================

/// Expected columns: id, usuario_id, tipo, titulo, descripcion, created_at
pub fn row_to_notification(row: &Row) -> rusqlite::Result<Notification> {
    let kind: String = row.get(2)?;
    let created_at: String = row.get(5)?;

    Ok(Notification {
        id: row.get(0)?,
        user_id: row.get(1)?,
        kind: parse_text::<NotificationKind>(2, &kind)?,
        title: row.get(3)?,
        description: row.get(4)?,
        created_at: parse_datetime(5, &created_at)?,
    })
}

// ============================================================================
// Helper functions
// ============================================================================

/// Parse a text column into any domain enum with a `FromStr` impl.
fn parse_text<T>(column: usize, s: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
    })
}

/// Parse a datetime from RFC 3339 string.
fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(
                column,
                rusqlite::types::Type::Text,
                Box::new(e),
            )
        })
}

/// Format a DateTime<Utc> for SQLite storage.
///
/// Always RFC 3339 with microseconds and a `Z` suffix, so text comparison in
/// SQL (`ORDER BY fecha`, `fecha = ?`) agrees with chronological order.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_datetime_fixed_width() {
        let dt = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        assert_eq!(format_datetime(&dt), "2024-01-10T09:00:00.000000Z");
    }

    #[test]
    fn test_format_datetime_orders_lexically() {
        let earlier = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
        let later = Utc.timestamp_opt(earlier.timestamp(), 500_000_000).unwrap();
        assert!(format_datetime(&earlier) < format_datetime(&later));
    }

    #[test]
    fn test_parse_datetime_round_trip() {
        let dt = Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap();
        let parsed = parse_datetime(0, &format_datetime(&dt)).unwrap();
        assert_eq!(parsed, dt);
    }

    #[test]
    fn test_parse_datetime_accepts_offsets() {
        let parsed = parse_datetime(0, "2024-01-10T03:00:00-06:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_datetime_invalid() {
        assert!(parse_datetime(0, "not-a-date").is_err());
    }

    #[test]
    fn test_parse_text_status() {
        assert_eq!(
            parse_text::<SessionStatus>(6, "aceptada").unwrap(),
            SessionStatus::Aceptada
        );
        assert!(matches!(
            parse_text::<SessionStatus>(6, "borrada"),
            Err(rusqlite::Error::FromSqlConversionFailure(6, _, _))
        ));
    }

    #[test]
    fn test_parse_text_user_type() {
        assert_eq!(parse_text::<UserType>(5, "Maestro").unwrap(), UserType::Maestro);
        assert!(parse_text::<UserType>(5, "maestro").is_err());
    }
}
