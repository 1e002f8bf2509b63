use anyhow::Context;
use storage::Database;
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod auth;
mod config;
mod error;
mod features;
mod middleware;
mod registry;
mod routes;
mod state;

use auth::jwt::JwtConfig;
use config::Config;
use features::{auth as auth_api, exercises, workouts};
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth_api::handlers::sign_up,
        auth_api::handlers::sign_in,
        auth_api::handlers::me,
        exercises::handlers::list_exercises,
        exercises::handlers::get_exercise,
        workouts::handlers::create_draft,
        workouts::handlers::get_draft,
        workouts::handlers::discard_draft,
        workouts::handlers::add_exercise,
        workouts::handlers::remove_exercise,
        workouts::handlers::update_exercise,
        workouts::handlers::start_workout,
        workouts::handlers::get_active_session,
        workouts::handlers::update_set,
        workouts::handlers::complete_set,
        workouts::handlers::skip_rest,
        workouts::handlers::next_exercise,
        workouts::handlers::prev_exercise,
        workouts::handlers::finish_workout,
        workouts::handlers::list_sessions,
        workouts::handlers::get_session,
    ),
    components(
        schemas(
            storage::dto::auth::SignUpRequest,
            storage::dto::auth::SignInRequest,
            storage::dto::auth::AuthResponse,
            storage::dto::exercise::ExerciseResponse,
            storage::dto::workout::CreateDraftRequest,
            storage::dto::workout::DraftResponse,
            storage::dto::workout::AddExerciseRequest,
            storage::dto::workout::UpdatePlanFieldRequest,
            storage::dto::workout::FieldValue,
            storage::dto::workout::StartWorkoutRequest,
            storage::dto::workout::StartWorkoutResponse,
            storage::dto::workout::UpdateSetRequest,
            storage::dto::workout::FinishWorkoutRequest,
            storage::dto::workout::ActiveSessionResponse,
            storage::dto::workout::FinishWorkoutResponse,
            storage::dto::workout::SessionDetailResponse,
            storage::dto::common::PaginationMeta,
            storage::models::Identity,
            storage::models::PlanField,
            storage::models::PlannedExercise,
            storage::models::SessionPlan,
            storage::models::SetProgress,
            storage::models::SetLog,
            storage::models::WorkoutSession,
            storage::services::runner::ExerciseProgress,
        )
    ),
    tags(
        (name = "auth", description = "Sign-up, sign-in and current user"),
        (name = "exercises", description = "Exercise library"),
        (name = "workouts", description = "Workout planning, running sessions and history"),
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
                        .bearer_format("JWT")
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

    tracing::info!("Starting Load It API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

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
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let jwt = JwtConfig::new(config.jwt_secret.clone(), config.jwt_expiry_mins);
    let state = AppState::new(db, jwt);

    let app = routes::router(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    let bind_address = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", bind_address))?;

    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui/", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
