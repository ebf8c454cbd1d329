use chrono::{Datelike, NaiveDateTime};

use crate::dto::dashboard::{AdminDashboard, MonthlyRegistrations};
use crate::error::Result;
use crate::models::{Evaluation, Internship, InternshipStatus, Role, User};
use crate::repository::{EvaluationFilter, InternshipFilter, PlacementRepository};
use crate::services::buckets::{Granularity, bucket};

pub fn build_admin_dashboard(
    users: &[User],
    internships: &[Internship],
    evaluations: &[Evaluation],
    now: NaiveDateTime,
) -> AdminDashboard {
    let count_role = |role: Role| users.iter().filter(|u| u.role == role).count();

    let active_internships = internships
        .iter()
        .filter(|i| i.status == InternshipStatus::Active)
        .count();

    let completed_this_year = internships
        .iter()
        .filter(|i| i.status == InternshipStatus::Completed && i.end_date.year() == now.year())
        .count();

    let monthly_registrations = bucket(
        users.iter().map(|u| u.created_at),
        Granularity::Month,
        now,
    )
    .into_iter()
    .map(|b| MonthlyRegistrations {
        month: b.label,
        users: b.count,
    })
    .collect();

    AdminDashboard {
        total_users: users.len(),
        students: count_role(Role::Student),
        coordinators: count_role(Role::Coordinator),
        supervisors: count_role(Role::Supervisor),
        admins: count_role(Role::Admin),
        active_internships,
        completed_this_year,
        total_evaluations: evaluations.len(),
        monthly_registrations,
    }
}

pub async fn admin_dashboard<R>(repo: &R, now: NaiveDateTime) -> Result<AdminDashboard>
where
    R: PlacementRepository + ?Sized,
{
    let internship_filter = InternshipFilter::default();
    let evaluation_filter = EvaluationFilter::default();

    let (users, internships, evaluations) = tokio::try_join!(
        repo.list_users(),
        repo.list_internships(&internship_filter),
        repo.list_evaluations(&evaluation_filter),
    )?;

    tracing::debug!(
        users = users.len(),
        internships = internships.len(),
        evaluations = evaluations.len(),
        "Building admin dashboard"
    );

    Ok(build_admin_dashboard(&users, &internships, &evaluations, now))
}
