use std::time::Duration;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::features::{auth, exercises, workouts};
use crate::state::AppState;

const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/auth", auth::routes::routes(&state))
        .nest("/exercises", exercises::routes::routes())
        .nest("/workouts", workouts::routes::routes(&state));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(CORS_MAX_AGE);

    Router::new()
        .nest("/api", api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
