use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use super::handlers::{
    add_exercise, complete_set, create_draft, discard_draft, finish_workout, get_active_session,
    get_draft, get_session, list_sessions, next_exercise, prev_exercise, remove_exercise,
    skip_rest, start_workout, update_exercise, update_set,
};
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/drafts", post(create_draft))
        .route("/drafts/:id", get(get_draft).delete(discard_draft))
        .route("/drafts/:id/exercises", post(add_exercise))
        .route(
            "/drafts/:id/exercises/:index",
            delete(remove_exercise).patch(update_exercise),
        )
        .route("/drafts/:id/start", post(start_workout))
        .route("/active/:session_id", get(get_active_session))
        .route("/active/:session_id/sets/:set_index", put(update_set))
        .route("/active/:session_id/sets/:set_index/complete", post(complete_set))
        .route("/active/:session_id/rest/skip", post(skip_rest))
        .route("/active/:session_id/next", post(next_exercise))
        .route("/active/:session_id/prev", post(prev_exercise))
        .route("/active/:session_id/finish", post(finish_workout))
        .route("/sessions", get(list_sessions))
        .route("/sessions/:id", get(get_session))
        .route_layer(middleware::from_fn_with_state(state.jwt.clone(), require_auth))
}
