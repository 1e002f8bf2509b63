use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        workout::{
            ActiveSessionResponse, AddExerciseRequest, CreateDraftRequest, DraftResponse,
            FinishWorkoutRequest, FinishWorkoutResponse, SessionDetailResponse,
            StartWorkoutRequest, StartWorkoutResponse, UpdatePlanFieldRequest, UpdateSetRequest,
        },
    },
    models::{Identity, WorkoutSession},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;
use crate::registry::WorkoutRegistry;

use super::services;

#[utoipa::path(
    post,
    path = "/api/workouts/drafts",
    request_body = CreateDraftRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Empty draft created", body = DraftResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "workouts"
)]
pub async fn create_draft(
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    body: Option<Json<CreateDraftRequest>>,
) -> Result<Response, WebError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    req.validate()?;

    let draft = services::create_draft(&registry, identity, req.name).await;

    Ok((StatusCode::CREATED, Json(draft)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/workouts/drafts/{id}",
    params(
        ("id" = Uuid, Path, description = "Draft id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Draft found", body = DraftResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Draft not found")
    ),
    tag = "workouts"
)]
pub async fn get_draft(
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let draft = services::get_draft(&registry, identity.user_id, id).await?;

    Ok(Json(draft).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/workouts/drafts/{id}",
    params(
        ("id" = Uuid, Path, description = "Draft id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 204, description = "Draft discarded"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Draft not found")
    ),
    tag = "workouts"
)]
pub async fn discard_draft(
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    services::discard_draft(&registry, identity.user_id, id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts/drafts/{id}/exercises",
    params(
        ("id" = Uuid, Path, description = "Draft id")
    ),
    request_body = AddExerciseRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Exercise appended with suggested targets", body = DraftResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Draft or exercise not found")
    ),
    tag = "workouts"
)]
pub async fn add_exercise(
    State(db): State<Database>,
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    Json(req): Json<AddExerciseRequest>,
) -> Result<Response, WebError> {
    let draft =
        services::add_exercise(&db, &registry, identity.user_id, id, req.exercise_id).await?;

    Ok(Json(draft).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/workouts/drafts/{id}/exercises/{index}",
    params(
        ("id" = Uuid, Path, description = "Draft id"),
        ("index" = usize, Path, description = "Position of the exercise in the plan")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Exercise removed", body = DraftResponse),
        (status = 400, description = "Index out of range"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Draft not found")
    ),
    tag = "workouts"
)]
pub async fn remove_exercise(
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    Path((id, index)): Path<(Uuid, usize)>,
) -> Result<Response, WebError> {
    let draft = services::remove_exercise(&registry, identity.user_id, id, index).await?;

    Ok(Json(draft).into_response())
}

#[utoipa::path(
    patch,
    path = "/api/workouts/drafts/{id}/exercises/{index}",
    params(
        ("id" = Uuid, Path, description = "Draft id"),
        ("index" = usize, Path, description = "Position of the exercise in the plan")
    ),
    request_body = UpdatePlanFieldRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Target updated, invalid input coerced", body = DraftResponse),
        (status = 400, description = "Index out of range"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Draft not found")
    ),
    tag = "workouts"
)]
pub async fn update_exercise(
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    Path((id, index)): Path<(Uuid, usize)>,
    Json(req): Json<UpdatePlanFieldRequest>,
) -> Result<Response, WebError> {
    let draft = services::update_exercise_field(
        &registry,
        identity.user_id,
        id,
        index,
        req.field,
        &req.value.as_raw(),
    )
    .await?;

    Ok(Json(draft).into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts/drafts/{id}/start",
    params(
        ("id" = Uuid, Path, description = "Draft id")
    ),
    request_body = StartWorkoutRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Session opened", body = StartWorkoutResponse),
        (status = 400, description = "Empty plan or invalid body weight"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Draft not found"),
        (status = 500, description = "Could not save workout")
    ),
    tag = "workouts"
)]
pub async fn start_workout(
    State(db): State<Database>,
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
    body: Option<Json<StartWorkoutRequest>>,
) -> Result<Response, WebError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    req.validate()?;

    let started =
        services::start_workout(&db, &registry, identity.user_id, id, req.body_weight).await?;

    Ok((StatusCode::CREATED, Json(started)).into_response())
}

#[utoipa::path(
    get,
    path = "/api/workouts/active/{session_id}",
    params(
        ("session_id" = Uuid, Path, description = "Workout session id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Current state of the session", body = ActiveSessionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No running session with this id")
    ),
    tag = "workouts"
)]
pub async fn get_active_session(
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let state = services::active_session(&registry, identity.user_id, session_id).await?;

    Ok(Json(state).into_response())
}

#[utoipa::path(
    put,
    path = "/api/workouts/active/{session_id}/sets/{set_index}",
    params(
        ("session_id" = Uuid, Path, description = "Workout session id"),
        ("set_index" = usize, Path, description = "Set position within the current exercise")
    ),
    request_body = UpdateSetRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Set updated", body = ActiveSessionResponse),
        (status = 400, description = "Invalid set or values"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No running session with this id")
    ),
    tag = "workouts"
)]
pub async fn update_set(
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    Path((session_id, set_index)): Path<(Uuid, usize)>,
    Json(req): Json<UpdateSetRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let state = services::update_set(
        &registry,
        identity.user_id,
        session_id,
        set_index,
        req.reps,
        req.weight,
    )
    .await?;

    Ok(Json(state).into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts/active/{session_id}/sets/{set_index}/complete",
    params(
        ("session_id" = Uuid, Path, description = "Workout session id"),
        ("set_index" = usize, Path, description = "Set position within the current exercise")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Set completed, rest started if configured", body = ActiveSessionResponse),
        (status = 400, description = "Weight missing or set already completed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No running session with this id")
    ),
    tag = "workouts"
)]
pub async fn complete_set(
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    Path((session_id, set_index)): Path<(Uuid, usize)>,
) -> Result<Response, WebError> {
    let state =
        services::complete_set(&registry, identity.user_id, session_id, set_index).await?;

    Ok(Json(state).into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts/active/{session_id}/rest/skip",
    params(
        ("session_id" = Uuid, Path, description = "Workout session id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Rest cancelled", body = ActiveSessionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No running session with this id")
    ),
    tag = "workouts"
)]
pub async fn skip_rest(
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let state = services::skip_rest(&registry, identity.user_id, session_id).await?;

    Ok(Json(state).into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts/active/{session_id}/next",
    params(
        ("session_id" = Uuid, Path, description = "Workout session id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Moved to the next exercise, if any", body = ActiveSessionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No running session with this id")
    ),
    tag = "workouts"
)]
pub async fn next_exercise(
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let state = services::next_exercise(&registry, identity.user_id, session_id).await?;

    Ok(Json(state).into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts/active/{session_id}/prev",
    params(
        ("session_id" = Uuid, Path, description = "Workout session id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Moved to the previous exercise, if any", body = ActiveSessionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No running session with this id")
    ),
    tag = "workouts"
)]
pub async fn prev_exercise(
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    Path(session_id): Path<Uuid>,
) -> Result<Response, WebError> {
    let state = services::prev_exercise(&registry, identity.user_id, session_id).await?;

    Ok(Json(state).into_response())
}

#[utoipa::path(
    post,
    path = "/api/workouts/active/{session_id}/finish",
    params(
        ("session_id" = Uuid, Path, description = "Workout session id")
    ),
    request_body = FinishWorkoutRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Workout saved", body = FinishWorkoutResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No running session with this id"),
        (status = 409, description = "No completed sets, confirmation required"),
        (status = 500, description = "Could not save workout")
    ),
    tag = "workouts"
)]
pub async fn finish_workout(
    State(db): State<Database>,
    State(registry): State<WorkoutRegistry>,
    Extension(identity): Extension<Identity>,
    Path(session_id): Path<Uuid>,
    body: Option<Json<FinishWorkoutRequest>>,
) -> Result<Response, WebError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();

    let summary = services::finish_workout(
        &db,
        &registry,
        identity.user_id,
        session_id,
        req.confirm_empty,
    )
    .await?;

    Ok(Json(summary).into_response())
}

#[utoipa::path(
    get,
    path = "/api/workouts/sessions",
    params(PaginationParams),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Sessions of the signed-in user, newest first", body = PaginatedResponse<WorkoutSession>),
        (status = 400, description = "Invalid pagination parameters"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "workouts"
)]
pub async fn list_sessions(
    State(db): State<Database>,
    Extension(identity): Extension<Identity>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, WebError> {
    params.validate()?;

    let sessions = services::list_sessions(db.pool(), identity.user_id, &params).await?;

    Ok(Json(sessions).into_response())
}

#[utoipa::path(
    get,
    path = "/api/workouts/sessions/{id}",
    params(
        ("id" = Uuid, Path, description = "Workout session id")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Session with its set logs", body = SessionDetailResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Session not found")
    ),
    tag = "workouts"
)]
pub async fn get_session(
    State(db): State<Database>,
    Extension(identity): Extension<Identity>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let detail = services::session_detail(db.pool(), identity.user_id, id).await?;

    Ok(Json(detail).into_response())
}
