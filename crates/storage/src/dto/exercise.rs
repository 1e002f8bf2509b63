use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::{EXERCISE_CATEGORIES, Exercise};

/// Query parameters for browsing the exercise library
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct ExerciseQuery {
    /// Case-insensitive substring of the exercise name
    #[validate(length(max = 100))]
    pub search: Option<String>,

    /// Category, or `all`
    #[validate(custom(function = "validate_category"))]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExerciseResponse {
    pub exercise_id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub muscle_groups: Vec<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

fn validate_category(category: &str) -> Result<(), validator::ValidationError> {
    if category == "all" || EXERCISE_CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_category"))
    }
}

impl From<Exercise> for ExerciseResponse {
    fn from(exercise: Exercise) -> Self {
        Self {
            exercise_id: exercise.exercise_id,
            name: exercise.name,
            category: exercise.category,
            description: exercise.description,
            muscle_groups: exercise.muscle_groups,
            is_default: exercise.is_default,
            created_at: exercise.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_validation() {
        let query = ExerciseQuery {
            search: None,
            category: Some("legs".to_string()),
        };
        assert!(query.validate().is_ok());

        let query = ExerciseQuery {
            search: None,
            category: Some("all".to_string()),
        };
        assert!(query.validate().is_ok());

        let query = ExerciseQuery {
            search: None,
            category: Some("yoga".to_string()),
        };
        assert!(query.validate().is_err());
    }
}
