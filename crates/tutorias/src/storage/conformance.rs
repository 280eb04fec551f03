//! Behavior shared by every backend.
//!
//! Each test runs the same scenario against SQLite (in memory), the memory
//! store and the directory store, so the backends cannot drift apart.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use tempfile::TempDir;

use tutorias_core::storage::{RepositoryError, TutoringStore};
use tutorias_core::tutoring::{
    NewNotification, NewRating, NewSession, NewUser, NotificationKind, RatingTarget,
    SessionChanges, SessionStatus, UserChanges, UserType,
};

use super::kv::{KvRepository, LocalStore, MemoryStore};
#[cfg(feature = "sqlite")]
use super::sqlite::SqliteRepository;

struct Backend {
    name: &'static str,
    store: Arc<dyn TutoringStore>,
    // Keeps the directory of the local store alive for the test
    _dir: Option<TempDir>,
}

async fn backends() -> Vec<Backend> {
    let mut backends = Vec::new();

    #[cfg(feature = "sqlite")]
    backends.push(Backend {
        name: "sqlite",
        store: Arc::new(SqliteRepository::new_in_memory().await.unwrap()),
        _dir: None,
    });

    backends.push(Backend {
        name: "memory",
        store: Arc::new(KvRepository::new(MemoryStore::new())),
        _dir: None,
    });

    let dir = tempfile::tempdir().unwrap();
    backends.push(Backend {
        name: "local",
        store: Arc::new(KvRepository::new(LocalStore::open(dir.path()).await.unwrap())),
        _dir: Some(dir),
    });

    for backend in &backends {
        backend.store.init_schema().await.unwrap();
    }
    backends
}

fn at(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

fn student(email: &str) -> NewUser {
    NewUser::new("Monse", email, "12345678", UserType::Tutorado)
}

fn tutor(email: &str) -> NewUser {
    NewUser::new("Roberto", email, "12345678", UserType::Tutor)
}

// ==================== Equivalence ====================

/// Observable state after a fixed sequence of operations, minus timestamps.
#[derive(Debug, PartialEq)]
struct Snapshot {
    user_before: Option<(i64, String, Option<String>)>,
    user_after: Option<(i64, String, Option<String>)>,
    deleted: bool,
    remaining_students: Vec<String>,
    tutor_sessions: Vec<(i64, String, SessionStatus)>,
    subjects: Vec<String>,
    ratings: Vec<(u8, Option<String>)>,
}

async fn run_scenario(store: &dyn TutoringStore) -> Snapshot {
    let ana = store.create_user(student("ana@upq.edu.mx")).await.unwrap();
    let luis = store.create_user(student("luis@upq.edu.mx")).await.unwrap();
    let rob = store.create_user(tutor("rob@upq.edu.mx")).await.unwrap();

    let user_before = store
        .get_user_by_email("ana@upq.edu.mx")
        .await
        .unwrap()
        .map(|u| (u.id, u.name, u.group));
    store
        .update_user(ana.id, UserChanges::new().with_name("Ana").with_group("S-301"))
        .await
        .unwrap();
    let user_after = store
        .get_user(ana.id)
        .await
        .unwrap()
        .map(|u| (u.id, u.name, u.group));
    let deleted = store.delete_user(luis.id).await.unwrap();
    let remaining_students = store
        .list_users_by_type(&[UserType::Tutorado])
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.email)
        .collect();

    store
        .create_session(NewSession::new(ana.id, Some(rob.id), "Calculo", at(12, 9), "09:00 AM"))
        .await
        .unwrap();
    let second = store
        .create_session(NewSession::new(ana.id, Some(rob.id), "Redes", at(11, 9), "09:00 AM"))
        .await
        .unwrap();
    store
        .update_session(second.id, SessionChanges::new().with_status(SessionStatus::Aceptada))
        .await
        .unwrap();
    let tutor_sessions = store
        .list_sessions_by_tutor(rob.id)
        .await
        .unwrap()
        .into_iter()
        .map(|s| (s.id, s.subject, s.status))
        .collect();

    store.assign_subject(rob.id, "Redes").await.unwrap();
    store.assign_subject(rob.id, "Calculo").await.unwrap();
    store.assign_subject(rob.id, "Redes").await.unwrap();
    let subjects = store.list_subjects_by_tutor(rob.id).await.unwrap();

    store
        .create_rating(
            NewRating::new(RatingTarget::Tutor(rob.id), 5, ana.id)
                .with_subject("Redes")
                .with_comment("Excelente"),
        )
        .await
        .unwrap();
    store
        .create_rating(
            NewRating::new(RatingTarget::Tutor(rob.id), 3, ana.id).with_subject("Calculo"),
        )
        .await
        .unwrap();
    let ratings = store
        .list_ratings_for_tutor(rob.id, None)
        .await
        .unwrap()
        .into_iter()
        .map(|r| (r.score, r.comment))
        .collect();

    Snapshot {
        user_before,
        user_after,
        deleted,
        remaining_students,
        tutor_sessions,
        subjects,
        ratings,
    }
}

#[tokio::test]
async fn test_backends_produce_equivalent_state() {
    let backends = backends().await;
    let mut snapshots = Vec::new();
    for backend in &backends {
        snapshots.push((backend.name, run_scenario(backend.store.as_ref()).await));
    }

    let (first_name, expected) = &snapshots[0];
    assert_eq!(expected.user_after, Some((1, "Ana".to_string(), Some("S-301".to_string()))));
    assert_eq!(expected.remaining_students, vec!["ana@upq.edu.mx".to_string()]);
    assert_eq!(expected.subjects, vec!["Redes".to_string(), "Calculo".to_string()]);
    for (name, snapshot) in &snapshots[1..] {
        assert_eq!(snapshot, expected, "{name} differs from {first_name}");
    }
}

// ==================== Initialization ====================

#[tokio::test]
async fn test_init_twice_keeps_records() {
    for backend in backends().await {
        let store = backend.store;
        let user = store.create_user(student("ana@upq.edu.mx")).await.unwrap();

        store.init_schema().await.unwrap();
        store.init_schema().await.unwrap();

        assert_eq!(store.get_user(user.id).await.unwrap(), Some(user), "{}", backend.name);
    }
}

// ==================== Users ====================

#[tokio::test]
async fn test_duplicate_email_keeps_one_record() {
    for backend in backends().await {
        let store = backend.store;
        store.create_user(student("a@b.com")).await.unwrap();

        let result = store.create_user(tutor("a@b.com")).await;

        assert_eq!(
            result,
            Err(RepositoryError::already_exists("User", "a@b.com")),
            "{}",
            backend.name
        );
        let all = store
            .list_users_by_type(&[UserType::Tutorado, UserType::Tutor])
            .await
            .unwrap();
        assert_eq!(all.len(), 1, "{}", backend.name);
        assert_eq!(all[0].user_type, UserType::Tutorado, "{}", backend.name);
    }
}

#[tokio::test]
async fn test_user_round_trip() {
    for backend in backends().await {
        let store = backend.store;
        let new_user = NewUser::new(
            "Luis Hernandez",
            "124050110@upq.edu.mx",
            "pw",
            UserType::Tutorado,
        )
        .with_phone("4421112233")
        .with_group("S-301")
        .with_enrollment("124050110")
        .with_building("Edificio A");

        let created = store.create_user(new_user.clone()).await.unwrap();

        assert_eq!(created, new_user.into_user(created.id), "{}", backend.name);
        assert_eq!(store.get_user(created.id).await.unwrap(), Some(created), "{}", backend.name);
    }
}

#[tokio::test]
async fn test_update_password_by_email() {
    for backend in backends().await {
        let store = backend.store;
        let user = store.create_user(student("ana@upq.edu.mx")).await.unwrap();

        let updated = store
            .update_password_by_email("ana@upq.edu.mx", "nueva")
            .await
            .unwrap();

        assert_eq!(updated.id, user.id, "{}", backend.name);
        assert_eq!(updated.password, "nueva", "{}", backend.name);
        assert_eq!(store.get_user(user.id).await.unwrap(), Some(updated), "{}", backend.name);
    }
}

#[tokio::test]
async fn test_invalid_user_rejected_before_storage() {
    for backend in backends().await {
        let result = backend.store.create_user(student("")).await;
        assert!(matches!(result, Err(RepositoryError::InvalidData(_))), "{}", backend.name);
    }
}

// ==================== Not-found contract ====================

#[tokio::test]
async fn test_missing_ids_follow_one_contract() {
    for backend in backends().await {
        let store = backend.store;
        let name = backend.name;

        assert_eq!(store.get_user(42).await.unwrap(), None, "{name}");
        assert_eq!(store.get_user_by_email("nadie@upq.edu.mx").await.unwrap(), None, "{name}");
        assert_eq!(store.get_session(42).await.unwrap(), None, "{name}");

        assert_eq!(
            store.update_user(42, UserChanges::new().with_name("X")).await,
            Err(RepositoryError::not_found("User", 42)),
            "{name}"
        );
        assert_eq!(
            store
                .update_session(42, SessionChanges::new().with_status(SessionStatus::Aceptada))
                .await,
            Err(RepositoryError::not_found("Session", 42)),
            "{name}"
        );
        assert_eq!(
            store.update_password_by_email("nadie@upq.edu.mx", "x").await,
            Err(RepositoryError::not_found("User", "nadie@upq.edu.mx")),
            "{name}"
        );

        assert!(!store.delete_user(42).await.unwrap(), "{name}");
        assert!(!store.delete_session(42).await.unwrap(), "{name}");
        assert!(!store.delete_notification(42).await.unwrap(), "{name}");
        assert!(!store.remove_subject(42, "Calculo").await.unwrap(), "{name}");
    }
}

#[tokio::test]
async fn test_update_to_taken_email_rejected() {
    for backend in backends().await {
        let store = backend.store;
        store.create_user(student("ana@upq.edu.mx")).await.unwrap();
        let luis = store.create_user(student("luis@upq.edu.mx")).await.unwrap();

        let result = store
            .update_user(luis.id, UserChanges::new().with_email("ana@upq.edu.mx"))
            .await;

        assert_eq!(
            result,
            Err(RepositoryError::already_exists("User", "ana@upq.edu.mx")),
            "{}",
            backend.name
        );
    }
}

#[tokio::test]
async fn test_update_missing_user_is_not_found_even_with_taken_email() {
    for backend in backends().await {
        let store = backend.store;
        store.create_user(student("ana@upq.edu.mx")).await.unwrap();

        let result = store
            .update_user(999, UserChanges::new().with_email("ana@upq.edu.mx"))
            .await;

        assert_eq!(
            result,
            Err(RepositoryError::not_found("User", 999)),
            "{}",
            backend.name
        );
    }
}

// ==================== References ====================

#[tokio::test]
async fn test_references_to_missing_users_are_accepted() {
    for backend in backends().await {
        let store = backend.store;
        let name = backend.name;
        let pupil = store.create_user(student("ana@upq.edu.mx")).await.unwrap();
        let teacher = store.create_user(tutor("rob@upq.edu.mx")).await.unwrap();
        let session = store
            .create_session(NewSession::new(
                pupil.id,
                Some(teacher.id),
                "Calculo",
                at(10, 9),
                "09:00 AM",
            ))
            .await
            .unwrap();

        assert!(store.delete_user(pupil.id).await.unwrap(), "{name}");
        assert!(store.get_session(session.id).await.unwrap().is_some(), "{name}");

        let orphan = store
            .create_session(NewSession::new(99, Some(98), "Redes", at(11, 9), "09:00 AM"))
            .await;
        assert!(orphan.is_ok(), "{name}: {orphan:?}");
        let link = store.assign_subject(77, "Redes").await;
        assert!(link.is_ok(), "{name}: {link:?}");
        let rating = store
            .create_rating(NewRating::new(RatingTarget::Tutor(77), 4, 76))
            .await;
        assert!(rating.is_ok(), "{name}: {rating:?}");
        let notice = store
            .create_notification(NewNotification::new(
                75,
                NotificationKind::Mensaje,
                "hola",
                "texto",
            ))
            .await;
        assert!(notice.is_ok(), "{name}: {notice:?}");
    }
}

// ==================== Sessions ====================

#[tokio::test]
async fn test_sessions_ordered_by_date_then_time() {
    for backend in backends().await {
        let store = backend.store;
        let inserts = [
            (at(12, 9), "09:00 AM"),
            (at(10, 11), "11:00 AM"),
            (at(10, 9), "10:00 AM"),
            (at(10, 9), "09:00 AM"),
        ];
        for (when, label) in inserts {
            store
                .create_session(NewSession::new(1, Some(2), "Calculo", when, label))
                .await
                .unwrap();
        }

        let by_student: Vec<(DateTime<Utc>, String)> = store
            .list_sessions_by_student(1)
            .await
            .unwrap()
            .into_iter()
            .map(|s| (s.scheduled_at, s.time_label))
            .collect();
        let by_tutor: Vec<(DateTime<Utc>, String)> = store
            .list_sessions_by_tutor(2)
            .await
            .unwrap()
            .into_iter()
            .map(|s| (s.scheduled_at, s.time_label))
            .collect();

        let expected = vec![
            (at(10, 9), "09:00 AM".to_string()),
            (at(10, 9), "10:00 AM".to_string()),
            (at(10, 11), "11:00 AM".to_string()),
            (at(12, 9), "09:00 AM".to_string()),
        ];
        assert_eq!(by_student, expected, "{}", backend.name);
        assert_eq!(by_tutor, expected, "{}", backend.name);
    }
}

#[tokio::test]
async fn test_accept_changes_only_status() {
    for backend in backends().await {
        let store = backend.store;
        let teacher = store.create_user(tutor("a@b.com")).await.unwrap();
        let pupil = store.create_user(student("alumno@upq.edu.mx")).await.unwrap();
        store.assign_subject(teacher.id, "Programacion").await.unwrap();
        let fecha = DateTime::parse_from_rfc3339("2024-01-10T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let session = store
            .create_session(NewSession::new(
                pupil.id,
                Some(teacher.id),
                "Programacion",
                fecha,
                "10:00 AM",
            ))
            .await
            .unwrap();
        assert_eq!(session.status, SessionStatus::Pendiente, "{}", backend.name);

        store
            .update_session(session.id, SessionChanges::new().with_status(SessionStatus::Aceptada))
            .await
            .unwrap();

        let fetched = store.get_session(session.id).await.unwrap().unwrap();
        let mut expected = session.clone();
        expected.status = SessionStatus::Aceptada;
        assert_eq!(fetched, expected, "{}", backend.name);
    }
}

#[tokio::test]
async fn test_any_status_can_be_written_directly() {
    for backend in backends().await {
        let store = backend.store;
        let session = store
            .create_session(NewSession::new(1, Some(2), "Calculo", at(10, 9), "09:00 AM"))
            .await
            .unwrap();
        store
            .update_session(session.id, SessionChanges::new().with_status(SessionStatus::Cancelada))
            .await
            .unwrap();

        let reopened = store
            .update_session(session.id, SessionChanges::new().with_status(SessionStatus::Pendiente))
            .await
            .unwrap();

        assert_eq!(reopened.status, SessionStatus::Pendiente, "{}", backend.name);
    }
}

#[tokio::test]
async fn test_delete_session_then_get() {
    for backend in backends().await {
        let store = backend.store;
        let keep = store
            .create_session(NewSession::new(1, Some(2), "Calculo", at(10, 9), "09:00 AM"))
            .await
            .unwrap();
        let gone = store
            .create_session(NewSession::new(1, Some(2), "Redes", at(11, 9), "09:00 AM"))
            .await
            .unwrap();

        assert!(store.delete_session(gone.id).await.unwrap(), "{}", backend.name);
        assert!(!store.delete_session(gone.id).await.unwrap(), "{}", backend.name);

        assert_eq!(store.get_session(gone.id).await.unwrap(), None, "{}", backend.name);
        let remaining: Vec<i64> = store
            .list_sessions_by_student(1)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(remaining, vec![keep.id], "{}", backend.name);
    }
}

#[tokio::test]
async fn test_conflicting_session_lookup() {
    for backend in backends().await {
        let store = backend.store;
        let booked = store
            .create_session(NewSession::new(1, Some(2), "Calculo", at(10, 9), "09:00 AM"))
            .await
            .unwrap();
        let rejected = store
            .create_session(NewSession::new(3, Some(2), "Calculo", at(11, 9), "09:00 AM"))
            .await
            .unwrap();
        store
            .update_session(
                rejected.id,
                SessionChanges::new().with_status(SessionStatus::Rechazada),
            )
            .await
            .unwrap();

        let same_slot = store
            .find_conflicting_session(2, at(10, 9), "09:00 AM", None)
            .await
            .unwrap();
        let editing_itself = store
            .find_conflicting_session(2, at(10, 9), "09:00 AM", Some(booked.id))
            .await
            .unwrap();
        let other_label = store
            .find_conflicting_session(2, at(10, 9), "10:00 AM", None)
            .await
            .unwrap();
        let freed_slot = store
            .find_conflicting_session(2, at(11, 9), "09:00 AM", None)
            .await
            .unwrap();

        assert_eq!(same_slot.map(|s| s.id), Some(booked.id), "{}", backend.name);
        assert!(editing_itself.is_none(), "{}", backend.name);
        assert!(other_label.is_none(), "{}", backend.name);
        assert!(freed_slot.is_none(), "{}", backend.name);
    }
}

#[tokio::test]
async fn test_slot_checked_writes() {
    for backend in backends().await {
        let store = backend.store;
        let name = backend.name;
        let first = store
            .create_session_if_free(NewSession::new(1, Some(2), "Calculo", at(10, 9), "09:00 AM"))
            .await
            .unwrap();

        let same_slot = store
            .create_session_if_free(NewSession::new(3, Some(2), "Redes", at(10, 9), "09:00 AM"))
            .await;
        assert_eq!(
            same_slot,
            Err(RepositoryError::already_exists("Session", first.id)),
            "{name}"
        );

        let later = store
            .create_session_if_free(NewSession::new(3, Some(2), "Redes", at(10, 9), "10:00 AM"))
            .await
            .unwrap();
        let unassigned = store
            .create_session_if_free(NewSession::new(3, None, "Redes", at(10, 9), "09:00 AM"))
            .await;
        assert!(unassigned.is_ok(), "{name}");

        let clash = store
            .update_session_if_free(
                later.id,
                SessionChanges::new().with_schedule(at(10, 9), "09:00 AM"),
            )
            .await;
        assert_eq!(
            clash,
            Err(RepositoryError::already_exists("Session", first.id)),
            "{name}"
        );
        let unchanged = store.get_session(later.id).await.unwrap().unwrap();
        assert_eq!(unchanged.time_label, "10:00 AM", "{name}");

        let same_place = store
            .update_session_if_free(later.id, SessionChanges::new().with_subject("Algebra"))
            .await
            .unwrap();
        assert_eq!(same_place.subject, "Algebra", "{name}");

        let missing = store
            .update_session_if_free(42, SessionChanges::new().with_schedule(at(12, 9), "09:00 AM"))
            .await;
        assert_eq!(missing, Err(RepositoryError::not_found("Session", 42)), "{name}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_bookings_take_a_slot_once() {
    for backend in backends().await {
        let store = backend.store;
        for day in 1..=20 {
            let mut handles = Vec::new();
            for student_id in 1..=4 {
                let store = Arc::clone(&store);
                handles.push(tokio::spawn(async move {
                    store
                        .create_session_if_free(NewSession::new(
                            student_id,
                            Some(10),
                            "Calculo",
                            at(day, 9),
                            "09:00 AM",
                        ))
                        .await
                }));
            }

            let mut booked = Vec::new();
            for handle in handles {
                match handle.await.unwrap() {
                    Ok(session) => booked.push(session.id),
                    Err(e) => assert!(
                        matches!(e, RepositoryError::AlreadyExists { .. }),
                        "{}: {e}",
                        backend.name
                    ),
                }
            }
            assert_eq!(booked.len(), 1, "{} day {day}", backend.name);
        }
        assert_eq!(
            store.list_sessions_by_tutor(10).await.unwrap().len(),
            20,
            "{}",
            backend.name
        );
    }
}

// ==================== Teacher subjects ====================

#[tokio::test]
async fn test_assign_subject_is_insert_or_ignore() {
    for backend in backends().await {
        let store = backend.store;
        let first = store.assign_subject(7, "Programacion").await.unwrap();
        let again = store.assign_subject(7, "Programacion").await.unwrap();

        assert_eq!(first, again, "{}", backend.name);
        assert_eq!(
            store.list_subjects_by_tutor(7).await.unwrap(),
            vec!["Programacion".to_string()],
            "{}",
            backend.name
        );
    }
}

#[tokio::test]
async fn test_subject_catalog_queries() {
    for backend in backends().await {
        let store = backend.store;
        let rob = store.create_user(tutor("rob@upq.edu.mx")).await.unwrap();
        let lau = store
            .create_user(NewUser::new("Laura", "lau@upq.edu.mx", "pw", UserType::Profesor))
            .await
            .unwrap();
        store.assign_subject(rob.id, "Programacion").await.unwrap();
        store.assign_subject(lau.id, "Calculo").await.unwrap();
        store.assign_subject(lau.id, "Programacion").await.unwrap();

        let teachers: Vec<i64> = store
            .list_tutors_by_subject("Programacion")
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.id)
            .collect();
        assert_eq!(teachers, vec![rob.id, lau.id], "{}", backend.name);
        assert_eq!(
            store.list_all_subjects().await.unwrap(),
            vec!["Calculo".to_string(), "Programacion".to_string()],
            "{}",
            backend.name
        );

        assert!(store.remove_subject(rob.id, "Programacion").await.unwrap(), "{}", backend.name);
        let teachers = store.list_tutors_by_subject("Programacion").await.unwrap();
        assert_eq!(teachers.len(), 1, "{}", backend.name);
    }
}

// ==================== Ratings ====================

#[tokio::test]
async fn test_ratings_filtered_by_target_and_subject() {
    for backend in backends().await {
        let store = backend.store;
        for (score, subject) in [(5, "Redes"), (4, "Redes"), (2, "Calculo")] {
            store
                .create_rating(
                    NewRating::new(RatingTarget::Tutor(2), score, 1).with_subject(subject),
                )
                .await
                .unwrap();
        }
        store
            .create_rating(NewRating::new(RatingTarget::Student(1), 5, 2).with_comment("Puntual"))
            .await
            .unwrap();

        let redes: Vec<u8> = store
            .list_ratings_for_tutor(2, Some("Redes"))
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.score)
            .collect();
        assert_eq!(redes, vec![5, 4], "{}", backend.name);
        let all = store.list_ratings_for_tutor(2, None).await.unwrap();
        assert_eq!(all.len(), 3, "{}", backend.name);

        let about_student = store.list_ratings_for_student(1).await.unwrap();
        assert_eq!(about_student.len(), 1, "{}", backend.name);
        assert_eq!(about_student[0].target, RatingTarget::Student(1), "{}", backend.name);
        assert_eq!(about_student[0].comment.as_deref(), Some("Puntual"), "{}", backend.name);
    }
}

#[tokio::test]
async fn test_out_of_range_score_rejected() {
    for backend in backends().await {
        let store = backend.store;
        let result = store
            .create_rating(NewRating::new(RatingTarget::Tutor(2), 0, 1))
            .await;

        assert!(
            matches!(result, Err(RepositoryError::InvalidData(_))),
            "{}",
            backend.name
        );
        let stored = store.list_ratings_for_tutor(2, None).await.unwrap();
        assert!(stored.is_empty(), "{}", backend.name);
    }
}

// ==================== Notifications ====================

#[tokio::test]
async fn test_notifications_newest_first_and_clear() {
    for backend in backends().await {
        let store = backend.store;
        let mut ids = Vec::new();
        for title in ["primera", "segunda", "tercera"] {
            let n = store
                .create_notification(NewNotification::new(
                    1,
                    NotificationKind::Mensaje,
                    title,
                    "texto",
                ))
                .await
                .unwrap();
            ids.push(n.id);
        }
        store
            .create_notification(NewNotification::new(
                2,
                NotificationKind::Calificacion,
                "otra",
                "texto",
            ))
            .await
            .unwrap();

        let listed: Vec<i64> = store
            .list_notifications(1)
            .await
            .unwrap()
            .into_iter()
            .map(|n| n.id)
            .collect();
        ids.reverse();
        assert_eq!(listed, ids, "{}", backend.name);

        assert!(store.delete_notification(ids[0]).await.unwrap(), "{}", backend.name);
        assert_eq!(store.clear_notifications(1).await.unwrap(), 2, "{}", backend.name);
        assert!(store.list_notifications(1).await.unwrap().is_empty(), "{}", backend.name);
        assert_eq!(store.list_notifications(2).await.unwrap().len(), 1, "{}", backend.name);
    }
}
