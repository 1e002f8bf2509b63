use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use storage::{
    Database,
    dto::auth::{AuthResponse, SignInRequest, SignUpRequest},
    models::Identity,
};
use validator::Validate;

use crate::auth::{jwt::JwtConfig, provider::DatabaseAuthProvider};
use crate::error::WebError;

use super::services;

#[utoipa::path(
    post,
    path = "/api/auth/sign-up",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Email or username already taken")
    ),
    tag = "auth"
)]
pub async fn sign_up(
    State(db): State<Database>,
    State(jwt): State<JwtConfig>,
    Json(req): Json<SignUpRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let provider = DatabaseAuthProvider::new(db);
    let response = services::sign_up(&provider, &jwt, &req).await?;

    Ok((StatusCode::CREATED, Json(response)).into_response())
}

#[utoipa::path(
    post,
    path = "/api/auth/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = AuthResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid email or password")
    ),
    tag = "auth"
)]
pub async fn sign_in(
    State(db): State<Database>,
    State(jwt): State<JwtConfig>,
    Json(req): Json<SignInRequest>,
) -> Result<Response, WebError> {
    req.validate()?;

    let provider = DatabaseAuthProvider::new(db);
    let response = services::sign_in(&provider, &jwt, &req).await?;

    Ok(Json(response).into_response())
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Signed-in user", body = Identity),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth"
)]
pub async fn me(
    State(db): State<Database>,
    Extension(identity): Extension<Identity>,
) -> Result<Response, WebError> {
    let provider = DatabaseAuthProvider::new(db);
    let identity = services::current_identity(&provider, identity.user_id).await?;

    Ok(Json(identity).into_response())
}
