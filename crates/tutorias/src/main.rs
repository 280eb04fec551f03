//! tutorias CLI entry point.

use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tutorias::cli::notifications::NotificationsAction;
use tutorias::cli::sessions::{SessionOwner, SessionsAction};
use tutorias::cli::subjects::SubjectsAction;
use tutorias::cli::users::{CoreUserType, UsersAction};
use tutorias::cli::{Cli, Commands, OutputFormat};
use tutorias::output::{format_output, pretty};
use tutorias::{select_backend, seed, TutoringService};
use tutorias_core::storage::RepositoryError;
use tutorias_core::tutoring::{NewSession, NewUser, UserType};

/// Backend summary printed by `tutorias backend`.
#[derive(Serialize)]
struct BackendInfo {
    platform: tutorias::Platform,
    backend: tutorias::BackendKind,
    is_sql: bool,
}

fn emit<T: Serialize>(value: &T, format: OutputFormat, pretty: impl FnOnce(&T) -> String) {
    match format {
        OutputFormat::Json => println!("{}", format_output(value, format)),
        OutputFormat::Pretty => println!("{}", pretty(value)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tutorias=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.config();
    let backend = select_backend(&config).await;
    let service = TutoringService::from_backend(&backend);
    let format = cli.format;

    match cli.command {
        Commands::Init { no_seed } => {
            service.init().await?;
            if config.seed_demo_data && !no_seed {
                // Demo data is optional; the schema is usable without it
                match seed::seed_all(&service).await {
                    Ok(report) => emit(&report, format, |r| {
                        format!(
                            "Schema ready. Seeded {} users, {} subjects, {} ratings.",
                            r.users, r.subjects, r.ratings
                        )
                    }),
                    Err(e) => eprintln!("Schema ready, seeding skipped: {e}"),
                }
            } else if !cli.quiet {
                println!("Schema ready.");
            }
        }
        Commands::Backend => {
            let info = BackendInfo {
                platform: config.platform(),
                backend: backend.kind(),
                is_sql: backend.is_sql(),
            };
            emit(&info, format, |i| {
                format!("Platform: {}\nBackend: {}\nSQL: {}", i.platform, i.backend, i.is_sql)
            });
        }
        Commands::Users(users_cmd) => match users_cmd.action {
            UsersAction::List { roles } => {
                let types: Vec<UserType> = if roles.is_empty() {
                    vec![
                        UserType::Tutorado,
                        UserType::Tutor,
                        UserType::Maestro,
                        UserType::Profesor,
                    ]
                } else {
                    roles.into_iter().map(CoreUserType::from).collect()
                };
                let users = service.list_users_by_type(&types).await?;
                emit(&users, format, |u| pretty::format_users(u));
            }
            UsersAction::Get { id } => {
                let user = service
                    .get_user(id)
                    .await?
                    .ok_or_else(|| RepositoryError::not_found("User", id))?;
                emit(&user, format, pretty::format_user);
            }
            UsersAction::Find { email } => {
                let user = service
                    .get_user_by_email(&email)
                    .await?
                    .ok_or_else(|| RepositoryError::not_found("User", &email))?;
                emit(&user, format, pretty::format_user);
            }
            UsersAction::Create {
                name,
                email,
                password,
                role,
                phone,
                group,
                enrollment,
                building,
                subjects,
            } => {
                let mut new_user = NewUser::new(name, email, password, role.into());
                new_user.phone = phone;
                new_user.group = group;
                new_user.enrollment = enrollment;
                new_user.building = building;

                let user = if subjects.is_empty() {
                    service.create_user(new_user).await?
                } else {
                    let subjects: Vec<&str> = subjects.iter().map(String::as_str).collect();
                    service.register_tutor(new_user, &subjects).await?
                };
                emit(&user, format, |u| format!("Created:\n{}", pretty::format_user(u)));
            }
            UsersAction::Password { email, password } => {
                let user = service.update_password_by_email(&email, &password).await?;
                if !cli.quiet {
                    println!("Password updated for user {}", user.id);
                }
            }
            UsersAction::Delete { id } => {
                if !service.delete_user(id).await? {
                    return Err(RepositoryError::not_found("User", id).into());
                }
                if !cli.quiet {
                    println!("Deleted user {id}");
                }
            }
            UsersAction::Tutors => {
                let users = service.list_tutors().await?;
                emit(&users, format, |u| pretty::format_users(u));
            }
            UsersAction::Students => {
                let users = service.list_students().await?;
                emit(&users, format, |u| pretty::format_users(u));
            }
        },
        Commands::Sessions(sessions_cmd) => match sessions_cmd.action {
            SessionsAction::List { owner, upcoming } => {
                let sessions = match owner {
                    SessionOwner {
                        tutor: Some(tutor_id),
                        ..
                    } if upcoming => service.upcoming_sessions_for_tutor(tutor_id).await?,
                    SessionOwner {
                        tutor: Some(tutor_id),
                        ..
                    } => service.list_sessions_by_tutor(tutor_id).await?,
                    SessionOwner { .. } if upcoming => {
                        anyhow::bail!("--upcoming only applies to tutor lists")
                    }
                    SessionOwner {
                        student: Some(student_id),
                        ..
                    } => service.list_sessions_by_student(student_id).await?,
                    SessionOwner { .. } => Vec::new(),
                };
                emit(&sessions, format, |s| pretty::format_sessions(s));
            }
            SessionsAction::Get { id } => {
                let session = service
                    .get_session(id)
                    .await?
                    .ok_or_else(|| RepositoryError::not_found("Session", id))?;
                emit(&session, format, pretty::format_session);
            }
            SessionsAction::Book {
                student,
                tutor,
                subject,
                date,
                time,
            } => {
                let session = service
                    .book_session(NewSession::new(student, tutor, subject, date, time))
                    .await?;
                emit(&session, format, |s| format!("Booked:\n{}", pretty::format_session(s)));
            }
            SessionsAction::Accept { id, tutor_name } => {
                let session = service.respond_to_session(id, true, &tutor_name).await?;
                emit(&session, format, |s| format!("Accepted:\n{}", pretty::format_session(s)));
            }
            SessionsAction::Reject { id, tutor_name } => {
                let session = service.respond_to_session(id, false, &tutor_name).await?;
                emit(&session, format, |s| format!("Rejected:\n{}", pretty::format_session(s)));
            }
            SessionsAction::Cancel { id } => {
                let session = service.cancel_session(id).await?;
                emit(&session, format, |s| format!("Cancelled:\n{}", pretty::format_session(s)));
            }
            SessionsAction::Reschedule { id, date, time } => {
                let session = service.reschedule_session(id, date, &time).await?;
                emit(&session, format, |s| format!("Rescheduled:\n{}", pretty::format_session(s)));
            }
            SessionsAction::Delete { id } => {
                if !service.delete_session(id).await? {
                    return Err(RepositoryError::not_found("Session", id).into());
                }
                if !cli.quiet {
                    println!("Deleted session {id}");
                }
            }
        },
        Commands::Subjects(subjects_cmd) => match subjects_cmd.action {
            SubjectsAction::List => {
                let subjects = service.list_all_subjects().await?;
                emit(&subjects, format, |s| pretty::format_subjects(s));
            }
            SubjectsAction::Tutor { tutor_id } => {
                let ratings = service.tutor_subject_ratings(tutor_id).await?;
                emit(&ratings, format, |r| pretty::format_subject_ratings(r));
            }
            SubjectsAction::Tutors { subject } => {
                let users = service.list_tutors_by_subject(&subject).await?;
                emit(&users, format, |u| pretty::format_users(u));
            }
            SubjectsAction::Assign { tutor_id, subject } => {
                let link = service.assign_subject(tutor_id, &subject).await?;
                emit(&link, format, |l| {
                    format!("Tutor {} teaches {} (link {})", l.tutor_id, l.subject, l.id)
                });
            }
            SubjectsAction::Remove { tutor_id, subject } => {
                let removed = service.remove_subject(tutor_id, &subject).await?;
                if !cli.quiet {
                    if removed {
                        println!("Tutor {tutor_id} no longer teaches {subject}");
                    } else {
                        println!("Tutor {tutor_id} did not teach {subject}");
                    }
                }
            }
        },
        Commands::Notifications(notifications_cmd) => match notifications_cmd.action {
            NotificationsAction::List { user_id } => {
                let notifications = service.list_notifications(user_id).await?;
                emit(&notifications, format, |n| pretty::format_notifications(n));
            }
            NotificationsAction::Delete { id } => {
                if !service.delete_notification(id).await? {
                    return Err(RepositoryError::not_found("Notification", id).into());
                }
                if !cli.quiet {
                    println!("Deleted notification {id}");
                }
            }
            NotificationsAction::Clear { user_id } => {
                let removed = service.clear_notifications(user_id).await?;
                if !cli.quiet {
                    println!("Removed {removed} notifications");
                }
            }
        },
    }

    Ok(())
}
