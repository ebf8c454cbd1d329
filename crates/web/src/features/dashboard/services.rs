use chrono::{NaiveDateTime, Utc};
use storage::{
    PlacementRepository,
    dto::dashboard::{
        AdminDashboard, CoordinatorAnalytics, StudentEvaluation, StudentOverview,
        SupervisorAnalytics, SupervisorOverview,
    },
    error::{Result, StorageError},
    models::Role,
    services::dashboard,
};

fn now() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// Logs an aggregation failure with the role and operation that hit it.
fn report_failure(role: Role, operation: &'static str) -> impl FnOnce(&StorageError) {
    move |error| {
        tracing::error!(role = %role, operation, error = %error, "Dashboard aggregation failed");
    }
}

pub async fn admin_dashboard(repo: &dyn PlacementRepository) -> Result<AdminDashboard> {
    dashboard::admin_dashboard(repo, now())
        .await
        .inspect_err(report_failure(Role::Admin, "admin_dashboard"))
}

pub async fn coordinator_analytics(
    repo: &dyn PlacementRepository,
    role: Role,
) -> Result<CoordinatorAnalytics> {
    dashboard::coordinator_analytics(repo, now())
        .await
        .inspect_err(report_failure(role, "coordinator_analytics"))
}

pub async fn supervisor_overview(
    repo: &dyn PlacementRepository,
    supervisor_id: i64,
) -> Result<SupervisorOverview> {
    dashboard::supervisor_overview(repo, supervisor_id, now())
        .await
        .inspect_err(report_failure(Role::Supervisor, "supervisor_overview"))
}

pub async fn supervisor_analytics(
    repo: &dyn PlacementRepository,
    supervisor_id: i64,
    weeks: u32,
) -> Result<SupervisorAnalytics> {
    dashboard::supervisor_analytics(repo, supervisor_id, weeks, now())
        .await
        .inspect_err(report_failure(Role::Supervisor, "supervisor_analytics"))
}

pub async fn student_overview(
    repo: &dyn PlacementRepository,
    student_id: i64,
) -> Result<StudentOverview> {
    dashboard::student_overview(repo, student_id)
        .await
        .inspect_err(report_failure(Role::Student, "student_overview"))
}

pub async fn student_evaluations(
    repo: &dyn PlacementRepository,
    student_id: i64,
) -> Result<Vec<StudentEvaluation>> {
    dashboard::student_evaluations(repo, student_id)
        .await
        .inspect_err(report_failure(Role::Student, "student_evaluations"))
}
