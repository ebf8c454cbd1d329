use std::sync::Arc;

use anyhow::Context;
use storage::{Database, PgRepository};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod features;
mod middleware;
mod routes;
mod state;

use config::Config;
use features::dashboard::handlers;
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::get_admin_dashboard,
        handlers::get_coordinator_analytics,
        handlers::get_supervisor_overview,
        handlers::get_supervisor_analytics,
        handlers::get_student_overview,
        handlers::get_student_evaluations,
    ),
    components(
        schemas(
            storage::dto::dashboard::AdminDashboard,
            storage::dto::dashboard::MonthlyRegistrations,
            storage::dto::dashboard::CoordinatorAnalytics,
            storage::dto::dashboard::SemesterGrowth,
            storage::dto::dashboard::CompanyPlacements,
            storage::dto::dashboard::CompanyScore,
            storage::dto::dashboard::ActiveVsCompleted,
            storage::dto::dashboard::SupervisorOverview,
            storage::dto::dashboard::SupervisorAnalytics,
            storage::dto::dashboard::WeeklyActivity,
            storage::dto::dashboard::TopIntern,
            storage::dto::dashboard::CriteriaAverage,
            storage::dto::dashboard::ScoreBucket,
            storage::dto::dashboard::StudentOverview,
            storage::dto::dashboard::StudentInternship,
            storage::dto::dashboard::EvaluationSummary,
            storage::dto::dashboard::StudentEvaluation,
            storage::dto::dashboard::CategoryRating,
            storage::models::Role,
            storage::models::EvaluationStatus,
            storage::models::EvaluationDisplayStatus,
            storage::models::PlacementStatus,
        )
    ),
    tags(
        (name = "dashboard", description = "Role-scoped dashboard aggregates"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting placement dashboard API");

    let config = Config::from_env().context("Failed to load API configuration")?;

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;

    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database ready");

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);
    if api_keys.is_empty() {
        tracing::warn!("API_KEYS is empty, every dashboard request will be rejected");
    } else {
        tracing::info!(keys = api_keys.len(), "Loaded gateway API keys");
    }

    let state = AppState::new(Arc::new(PgRepository::new(db.pool().clone())));

    let app = routes::router(state, api_keys).merge(
        SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;

    tracing::info!("Listening on http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
