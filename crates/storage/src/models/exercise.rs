use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

pub const EXERCISE_CATEGORIES: &[&str] =
    &["chest", "back", "legs", "shoulders", "arms", "core", "cardio"];

/// Entry of the exercise library. Read-only to the workout flow.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Exercise {
    pub exercise_id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub muscle_groups: Vec<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Exercise {
    /// Case-insensitive name search combined with a category filter.
    /// A category of `"all"` matches every exercise.
    pub fn matches(&self, search: Option<&str>, category: Option<&str>) -> bool {
        let matches_search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .is_none_or(|s| self.name.to_lowercase().contains(&s.to_lowercase()));
        let matches_category = category
            .filter(|c| *c != "all")
            .is_none_or(|c| self.category == c);

        matches_search && matches_category
    }
}
