use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    dto::dashboard::{
        AdminDashboard, CoordinatorAnalytics, StudentEvaluation, StudentOverview,
        SupervisorAnalytics, SupervisorOverview, WeeklyActivityParams,
    },
    models::Role,
};
use validator::Validate;

use crate::error::ApiResult;
use crate::middleware::auth::CallerContext;
use crate::state::AppState;

use super::services;

#[utoipa::path(
    get,
    path = "/api/dashboard/admin",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Program-wide totals and registration trend", body = AdminDashboard),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller is not an admin")
    ),
    tag = "dashboard"
)]
pub async fn get_admin_dashboard(
    State(state): State<AppState>,
    caller: CallerContext,
) -> ApiResult<Response> {
    caller.require_role(&[Role::Admin])?;

    let dashboard = services::admin_dashboard(state.repo()).await?;

    Ok(Json(dashboard).into_response())
}

#[utoipa::path(
    get,
    path = "/api/dashboard/coordinator/analytics",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Placement and evaluation analytics", body = CoordinatorAnalytics),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller is neither coordinator nor admin")
    ),
    tag = "dashboard"
)]
pub async fn get_coordinator_analytics(
    State(state): State<AppState>,
    caller: CallerContext,
) -> ApiResult<Response> {
    caller.require_role(&[Role::Coordinator, Role::Admin])?;

    let analytics = services::coordinator_analytics(state.repo(), caller.role).await?;

    Ok(Json(analytics).into_response())
}

#[utoipa::path(
    get,
    path = "/api/dashboard/supervisor",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Supervisor headline numbers", body = SupervisorOverview),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller is not a supervisor")
    ),
    tag = "dashboard"
)]
pub async fn get_supervisor_overview(
    State(state): State<AppState>,
    caller: CallerContext,
) -> ApiResult<Response> {
    caller.require_role(&[Role::Supervisor])?;

    let overview = services::supervisor_overview(state.repo(), caller.user_id).await?;

    Ok(Json(overview).into_response())
}

#[utoipa::path(
    get,
    path = "/api/dashboard/supervisor/analytics",
    params(WeeklyActivityParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Evaluation trends and rankings for the caller's interns", body = SupervisorAnalytics),
        (status = 400, description = "Invalid query parameters"),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller is not a supervisor")
    ),
    tag = "dashboard"
)]
pub async fn get_supervisor_analytics(
    State(state): State<AppState>,
    caller: CallerContext,
    Query(params): Query<WeeklyActivityParams>,
) -> ApiResult<Response> {
    caller.require_role(&[Role::Supervisor])?;
    params.validate()?;

    let analytics =
        services::supervisor_analytics(state.repo(), caller.user_id, params.weeks).await?;

    Ok(Json(analytics).into_response())
}

#[utoipa::path(
    get,
    path = "/api/dashboard/student",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current internship and evaluation summary", body = StudentOverview),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller is not a student")
    ),
    tag = "dashboard"
)]
pub async fn get_student_overview(
    State(state): State<AppState>,
    caller: CallerContext,
) -> ApiResult<Response> {
    caller.require_role(&[Role::Student])?;

    let overview = services::student_overview(state.repo(), caller.user_id).await?;

    Ok(Json(overview).into_response())
}

#[utoipa::path(
    get,
    path = "/api/dashboard/student/evaluations",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "The caller's evaluations, ratings hidden until reviewed", body = Vec<StudentEvaluation>),
        (status = 401, description = "Missing caller identity"),
        (status = 403, description = "Caller is not a student")
    ),
    tag = "dashboard"
)]
pub async fn get_student_evaluations(
    State(state): State<AppState>,
    caller: CallerContext,
) -> ApiResult<Response> {
    caller.require_role(&[Role::Student])?;

    let evaluations = services::student_evaluations(state.repo(), caller.user_id).await?;

    Ok(Json(evaluations).into_response())
}
