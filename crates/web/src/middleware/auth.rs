//! Bearer token check for protected routes.
//!
//! On success the caller's [`Identity`] is stored in the request extensions,
//! where handlers pick it up with `Extension<Identity>`.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use storage::models::Identity;

use crate::auth::jwt::{JwtConfig, validate_token};
use crate::error::WebError;

pub async fn require_auth(
    State(jwt): State<JwtConfig>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(WebError::Unauthorized)?;

    let claims = validate_token(token, &jwt).map_err(|e| {
        tracing::warn!("Rejected access token: {}", e);
        WebError::Unauthorized
    })?;

    request.extensions_mut().insert(Identity::from(claims));

    Ok(next.run(request).await)
}
