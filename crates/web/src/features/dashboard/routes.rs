use axum::{Router, middleware, routing::get};

use super::handlers::{
    get_admin_dashboard, get_coordinator_analytics, get_student_evaluations, get_student_overview,
    get_supervisor_analytics, get_supervisor_overview,
};
use crate::middleware::auth::{ApiKeys, require_auth};
use crate::state::AppState;

pub fn routes(api_keys: ApiKeys) -> Router<AppState> {
    Router::new()
        .route("/admin", get(get_admin_dashboard))
        .route("/coordinator/analytics", get(get_coordinator_analytics))
        .route("/supervisor", get(get_supervisor_overview))
        .route("/supervisor/analytics", get(get_supervisor_analytics))
        .route("/student", get(get_student_overview))
        .route("/student/evaluations", get(get_student_evaluations))
        .route_layer(middleware::from_fn_with_state(api_keys, require_auth))
}
