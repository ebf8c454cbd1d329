use axum::Router;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::features::dashboard;
use crate::middleware::auth::ApiKeys;
use crate::state::AppState;

pub fn router(state: AppState, api_keys: ApiKeys) -> Router {
    Router::new()
        .nest("/api/dashboard", dashboard::routes::routes(api_keys))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Request, StatusCode, header::AUTHORIZATION},
    };
    use chrono::{NaiveDate, NaiveDateTime};
    use rust_decimal::Decimal;
    use serde_json::Value;
    use storage::{
        MemoryRepository,
        models::{
            Category, Company, Evaluation, EvaluationStatus, Internship, InternshipStatus, Role,
            User,
        },
    };
    use tower::ServiceExt;

    use super::*;
    use crate::middleware::auth::{USER_ID_HEADER, USER_ROLE_HEADER};

    const KEY: &str = "gateway-key";

    fn at(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap()
    }

    fn user(id: i64, role: Role, first_name: &str) -> User {
        User {
            id,
            first_name: first_name.to_string(),
            last_name: "Doe".to_string(),
            email: format!("{first_name}@example.com").to_lowercase(),
            role,
            phone: None,
            created_at: at(2026, 3, 1),
        }
    }

    fn category(name: &str, rating: &str, weight: &str) -> Category {
        Category {
            name: name.to_string(),
            rating: rating.parse::<Decimal>().unwrap(),
            weight: weight.parse::<Decimal>().unwrap(),
            comment: None,
        }
    }

    fn evaluation(id: i64, status: EvaluationStatus, created_at: NaiveDateTime) -> Evaluation {
        let mut evaluation = Evaluation {
            id,
            internship_id: 20,
            evaluator_id: 3,
            student_id: 4,
            status,
            categories: vec![
                category("Technical", "4", "0.5"),
                category("Communication", "3", "0.5"),
            ],
            overall_rating: None,
            comments: Some("Solid progress".to_string()),
            created_at,
        };
        evaluation.refresh_overall_rating();
        evaluation
    }

    fn seeded_app() -> Router {
        let users = vec![
            user(1, Role::Admin, "Ada"),
            user(2, Role::Coordinator, "Cleo"),
            user(3, Role::Supervisor, "Sam"),
            user(4, Role::Student, "Lena"),
            user(5, Role::Student, "Omar"),
        ];
        let companies = vec![Company {
            id: 10,
            name: "Acme".to_string(),
            city: Some("Lyon".to_string()),
            country: None,
            created_at: at(2025, 1, 1),
        }];
        let internships = vec![Internship {
            id: 20,
            student_id: 4,
            company_id: 10,
            supervisor_id: 3,
            status: InternshipStatus::Active,
            position: "Backend Intern".to_string(),
            department: None,
            start_date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 7, 31).unwrap(),
            created_at: at(2026, 1, 20),
        }];
        let evaluations = vec![
            evaluation(30, EvaluationStatus::Reviewed, at(2026, 5, 4)),
            evaluation(31, EvaluationStatus::Draft, at(2026, 6, 1)),
        ];

        let repo = MemoryRepository::with_records(users, companies, internships, evaluations);
        router(
            AppState::new(Arc::new(repo)),
            ApiKeys::from_comma_separated(KEY),
        )
    }

    fn request(path: &str, caller: Option<(&str, &str)>) -> Request<Body> {
        let mut builder = Request::builder()
            .uri(path)
            .header(AUTHORIZATION, format!("Bearer {KEY}"));
        if let Some((id, role)) = caller {
            builder = builder
                .header(USER_ID_HEADER, id)
                .header(USER_ROLE_HEADER, role);
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn rejects_missing_api_key() {
        let response = seeded_app()
            .oneshot(
                Request::builder()
                    .uri("/api/dashboard/admin")
                    .header(USER_ID_HEADER, "1")
                    .header(USER_ROLE_HEADER, "admin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_missing_identity() {
        let response = seeded_app()
            .oneshot(request("/api/dashboard/admin", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_non_numeric_user_id() {
        let response = seeded_app()
            .oneshot(request("/api/dashboard/student", Some(("abc", "student"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn rejects_wrong_role() {
        let response = seeded_app()
            .oneshot(request("/api/dashboard/admin", Some(("4", "student"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = json_body(response).await;
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn admin_dashboard_counts_users() {
        let response = seeded_app()
            .oneshot(request("/api/dashboard/admin", Some(("1", "admin"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["totalUsers"], 5);
        assert_eq!(body["students"], 2);
        assert_eq!(body["activeInternships"], 1);
        assert_eq!(body["totalEvaluations"], 2);
    }

    #[tokio::test]
    async fn coordinator_analytics_open_to_admins() {
        for (id, role) in [("2", "coordinator"), ("1", "admin")] {
            let response = seeded_app()
                .oneshot(request(
                    "/api/dashboard/coordinator/analytics",
                    Some((id, role)),
                ))
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::OK);
            let body = json_body(response).await;
            assert_eq!(body["placementSuccessRate"], 50);
            assert_eq!(body["evaluationCompletionRate"], 50);
            assert_eq!(body["placementsPerCompany"][0]["company"], "Acme");
        }
    }

    #[tokio::test]
    async fn supervisor_overview_counts_pending() {
        let response = seeded_app()
            .oneshot(request("/api/dashboard/supervisor", Some(("3", "supervisor"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["activeInterns"], 1);
        assert_eq!(body["pendingEvaluations"], 1);
        assert_eq!(body["reviewedEvaluations"], 1);
    }

    #[tokio::test]
    async fn supervisor_analytics_validates_weeks() {
        let response = seeded_app()
            .oneshot(request(
                "/api/dashboard/supervisor/analytics?weeks=0",
                Some(("3", "supervisor")),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Validation failed");
    }

    #[tokio::test]
    async fn supervisor_analytics_reports_histogram() {
        let response = seeded_app()
            .oneshot(request(
                "/api/dashboard/supervisor/analytics",
                Some(("3", "supervisor")),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let distribution = body["scoreDistribution"].as_array().unwrap();
        assert_eq!(distribution.len(), 5);
        assert_eq!(body["topInterns"][0]["name"], "Lena Doe");
    }

    #[tokio::test]
    async fn student_evaluations_hide_unreviewed_ratings() {
        let response = seeded_app()
            .oneshot(request(
                "/api/dashboard/student/evaluations",
                Some(("4", "student")),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let evaluations = body.as_array().unwrap();
        assert_eq!(evaluations.len(), 2);

        assert_eq!(evaluations[0]["id"], 31);
        assert!(evaluations[0]["overallRating"].is_null());
        assert_eq!(evaluations[0]["categories"].as_array().unwrap().len(), 0);

        assert_eq!(evaluations[1]["id"], 30);
        assert_eq!(evaluations[1]["overallRating"], 3.5);
        assert_eq!(evaluations[1]["evaluator"], "Sam Doe");
    }

    #[tokio::test]
    async fn student_overview_without_internship() {
        let response = seeded_app()
            .oneshot(request("/api/dashboard/student", Some(("5", "student"))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert!(body["internship"].is_null());
        assert_eq!(body["evaluations"]["total"], 0);
    }
}
