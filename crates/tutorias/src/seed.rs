//! Loaders for the demo data in `tutorias_core::tutoring::seed`.
//!
//! Every loader can run on each start: users are skipped when their email
//! exists, ratings when the tutor already has any.

use serde::Serialize;

use tutorias_core::storage::Result;
use tutorias_core::tutoring::seed::{
    initial_user, seed_ratings as demo_ratings, seed_students as demo_students, seed_tutors,
};
use tutorias_core::tutoring::{NewRating, NewUser, RatingTarget};

use crate::service::TutoringService;

/// Records written by one seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub users: usize,
    pub subjects: usize,
    pub ratings: usize,
}

async fn insert_if_absent(service: &TutoringService, user: NewUser) -> Result<bool> {
    if service.get_user_by_email(&user.email).await?.is_some() {
        return Ok(false);
    }
    service.create_user(user).await?;
    Ok(true)
}

/// Creates the default student account.
pub async fn seed_initial_user(service: &TutoringService) -> Result<bool> {
    insert_if_absent(service, initial_user()).await
}

pub async fn seed_students(service: &TutoringService) -> Result<usize> {
    let mut created = 0;
    for student in demo_students() {
        if insert_if_absent(service, student).await? {
            created += 1;
        }
    }
    Ok(created)
}

/// Creates the demo tutors and links their subjects.
///
/// Links are refreshed for tutors that already exist.
pub async fn seed_tutors_and_subjects(service: &TutoringService) -> Result<(usize, usize)> {
    let mut users = 0;
    let mut links = 0;
    for tutor in seed_tutors() {
        let email = tutor.user.email.clone();
        let user = match service.get_user_by_email(&email).await? {
            Some(existing) => existing,
            None => {
                users += 1;
                service.create_user(tutor.user).await?
            }
        };
        let known = service.list_subjects_by_tutor(user.id).await?;
        for subject in tutor.subjects {
            if !known.iter().any(|s| s == subject) {
                service.assign_subject(user.id, subject).await?;
                links += 1;
            }
        }
    }
    Ok((users, links))
}

/// Creates the demo ratings for tutors that have none yet.
///
/// Ratings whose tutor or rater is missing are skipped.
pub async fn seed_ratings(service: &TutoringService) -> Result<usize> {
    let mut created = 0;
    let mut rated = Vec::new();
    for seed in demo_ratings() {
        let (Some(tutor), Some(rater)) = (
            service.get_user_by_email(seed.tutor_email).await?,
            service.get_user_by_email(seed.rater_email).await?,
        ) else {
            tracing::debug!(tutor = seed.tutor_email, "skipping rating, user missing");
            continue;
        };

        if !rated.contains(&tutor.id) {
            if !service.list_ratings_for_tutor(tutor.id, None).await?.is_empty() {
                continue;
            }
            rated.push(tutor.id);
        }

        let mut rating = NewRating::new(RatingTarget::Tutor(tutor.id), seed.score, rater.id)
            .with_subject(seed.subject);
        if !seed.comment.is_empty() {
            rating = rating.with_comment(seed.comment);
        }
        service.create_rating(rating).await?;
        created += 1;
    }
    Ok(created)
}

async fn run_loaders(service: &TutoringService) -> Result<SeedReport> {
    let mut report = SeedReport::default();
    if seed_initial_user(service).await? {
        report.users += 1;
    }
    report.users += seed_students(service).await?;
    let (tutors, subjects) = seed_tutors_and_subjects(service).await?;
    report.users += tutors;
    report.subjects = subjects;
    report.ratings = seed_ratings(service).await?;
    Ok(report)
}

/// Runs every loader in dependency order.
pub async fn seed_all(service: &TutoringService) -> Result<SeedReport> {
    let result = run_loaders(service).await;
    match &result {
        Ok(report) => tracing::info!(
            users = report.users,
            subjects = report.subjects,
            ratings = report.ratings,
            "demo data seeded"
        ),
        Err(e) => tracing::error!(error = %e, "seeding failed"),
    }
    result
}
