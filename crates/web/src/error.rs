use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use storage::error::{StorageError, WorkoutError};
use validator::ValidationErrors;

use crate::auth::provider::AuthError;

/// Web layer errors
#[derive(Debug)]
pub enum WebError {
    Storage(StorageError),
    Workout(WorkoutError),
    Auth(AuthError),
    Validation(ValidationErrors),
    Unauthorized,
    NotFound,
    InternalServerError(String),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::Workout(e) => write!(f, "Workout error: {}", e),
            Self::Auth(e) => write!(f, "Auth error: {}", e),
            Self::Validation(e) => write!(f, "Validation error: {}", e),
            Self::Unauthorized => write!(f, "Unauthorized"),
            Self::NotFound => write!(f, "Resource not found"),
            Self::InternalServerError(msg) => write!(f, "Internal server error: {}", msg),
        }
    }
}

impl WebError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Storage(e) => storage_status(e),
            Self::Workout(WorkoutError::Validation(_)) => StatusCode::BAD_REQUEST,
            Self::Workout(WorkoutError::ConfirmationRequired) => StatusCode::CONFLICT,
            Self::Workout(WorkoutError::SessionClosed) => StatusCode::CONFLICT,
            Self::Workout(WorkoutError::Persistence(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Auth(AuthError::InvalidCredentials) => StatusCode::UNAUTHORIZED,
            Self::Auth(AuthError::Storage(e)) => storage_status(e),
            Self::Auth(AuthError::Hashing(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn storage_status(error: &StorageError) -> StatusCode {
    match error {
        StorageError::NotFound => StatusCode::NOT_FOUND,
        StorageError::ConstraintViolation(_) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn storage_body(error: &StorageError) -> serde_json::Value {
    match error {
        StorageError::NotFound => json!({
            "error": "Resource not found"
        }),
        StorageError::ConstraintViolation(msg) => json!({
            "error": msg
        }),
        e => {
            tracing::error!("Storage error: {:?}", e);
            json!({
                "error": "An internal error occurred"
            })
        }
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        let body = match &self {
            Self::Storage(e) => storage_body(e),
            Self::Workout(WorkoutError::ConfirmationRequired) => {
                json!({
                    "error": WorkoutError::ConfirmationRequired.to_string(),
                    "confirmation_required": true
                })
            }
            Self::Workout(WorkoutError::Persistence(e)) => {
                tracing::error!("Workout persistence error: {:?}", e);
                json!({
                    "error": "Could not save workout. Please try again"
                })
            }
            Self::Workout(e) => {
                json!({
                    "error": e.to_string()
                })
            }
            Self::Auth(AuthError::Storage(e)) => storage_body(e),
            Self::Auth(AuthError::InvalidCredentials) => {
                json!({
                    "error": AuthError::InvalidCredentials.to_string()
                })
            }
            Self::Auth(e) => {
                tracing::error!("Auth error: {}", e);
                json!({
                    "error": "An internal error occurred"
                })
            }
            Self::Validation(errors) => {
                let field_errors: Vec<String> = errors
                    .field_errors()
                    .iter()
                    .flat_map(|(field, errors)| {
                        errors.iter().map(move |e| {
                            format!(
                                "{}: {}",
                                field,
                                e.message
                                    .as_ref()
                                    .map(|m| m.to_string())
                                    .unwrap_or_else(|| e.code.to_string())
                            )
                        })
                    })
                    .collect();

                json!({
                    "error": "Validation failed",
                    "details": field_errors
                })
            }
            Self::Unauthorized => {
                json!({
                    "error": "Unauthorized"
                })
            }
            Self::NotFound => {
                json!({
                    "error": "Resource not found"
                })
            }
            Self::InternalServerError(msg) => {
                tracing::error!("Internal server error: {}", msg);
                json!({
                    "error": "An internal error occurred"
                })
            }
        };

        (status_code, Json(body)).into_response()
    }
}

impl From<StorageError> for WebError {
    fn from(error: StorageError) -> Self {
        Self::Storage(error)
    }
}

impl From<WorkoutError> for WebError {
    fn from(error: WorkoutError) -> Self {
        Self::Workout(error)
    }
}

impl From<AuthError> for WebError {
    fn from(error: AuthError) -> Self {
        Self::Auth(error)
    }
}

impl From<ValidationErrors> for WebError {
    fn from(error: ValidationErrors) -> Self {
        Self::Validation(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::error::ValidationFailure;

    #[test]
    fn test_workout_errors_map_to_status() {
        let cases = [
            (
                WebError::from(WorkoutError::from(ValidationFailure::EmptyPlan)),
                StatusCode::BAD_REQUEST,
            ),
            (
                WebError::from(WorkoutError::ConfirmationRequired),
                StatusCode::CONFLICT,
            ),
            (
                WebError::from(WorkoutError::SessionClosed),
                StatusCode::CONFLICT,
            ),
            (
                WebError::from(WorkoutError::Persistence(StorageError::Backend(
                    "down".to_string(),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_auth_errors_map_to_status() {
        assert_eq!(
            WebError::from(AuthError::InvalidCredentials)
                .into_response()
                .status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            WebError::from(AuthError::Storage(StorageError::ConstraintViolation(
                "taken".to_string()
            )))
            .into_response()
            .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            WebError::from(AuthError::Storage(StorageError::NotFound))
                .into_response()
                .status(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn test_storage_errors_map_to_status() {
        assert_eq!(
            WebError::from(StorageError::NotFound).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            WebError::from(StorageError::Backend("down".to_string()))
                .into_response()
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
