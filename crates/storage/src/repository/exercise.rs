use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::Exercise;

pub struct ExerciseRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ExerciseRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Search by name (case-insensitive substring) and optional category
    pub async fn search(&self, search: Option<&str>, category: Option<&str>) -> Result<Vec<Exercise>> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s.replace('%', "\\%").replace('_', "\\_")));
        let category = category.filter(|c| *c != "all");

        let exercises = sqlx::query_as::<_, Exercise>(
            r#"
            SELECT exercise_id, name, category, description, muscle_groups, is_default, created_at
            FROM exercises
            WHERE ($1::text IS NULL OR name ILIKE $1)
              AND ($2::text IS NULL OR category = $2)
            ORDER BY name
            "#,
        )
        .bind(pattern)
        .bind(category)
        .fetch_all(self.pool)
        .await?;

        Ok(exercises)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Exercise> {
        sqlx::query_as::<_, Exercise>(
            r#"
            SELECT exercise_id, name, category, description, muscle_groups, is_default, created_at
            FROM exercises
            WHERE exercise_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }
}
