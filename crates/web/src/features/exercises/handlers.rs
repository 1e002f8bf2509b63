use axum::{
    Json,
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::exercise::{ExerciseQuery, ExerciseResponse},
};
use uuid::Uuid;
use validator::Validate;

use crate::error::WebError;

use super::services;

#[utoipa::path(
    get,
    path = "/api/exercises",
    params(ExerciseQuery),
    responses(
        (status = 200, description = "Exercises matching the filters", body = Vec<ExerciseResponse>),
        (status = 400, description = "Unknown category")
    ),
    tag = "exercises"
)]
pub async fn list_exercises(
    State(db): State<Database>,
    Query(query): Query<ExerciseQuery>,
) -> Result<Response, WebError> {
    query.validate()?;

    let exercises = services::list_exercises(
        &db,
        query.search.as_deref(),
        query.category.as_deref(),
    )
    .await?;

    let response: Vec<ExerciseResponse> =
        exercises.into_iter().map(ExerciseResponse::from).collect();

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/exercises/{id}",
    params(
        ("id" = Uuid, Path, description = "Exercise id")
    ),
    responses(
        (status = 200, description = "Exercise found", body = ExerciseResponse),
        (status = 404, description = "Exercise not found")
    ),
    tag = "exercises"
)]
pub async fn get_exercise(
    State(db): State<Database>,
    Path(id): Path<Uuid>,
) -> Result<Response, WebError> {
    let exercise = services::get_exercise(&db, id).await?;

    Ok(Json(ExerciseResponse::from(exercise)).into_response())
}
