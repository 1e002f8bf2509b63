use sqlx::PgPool;
use uuid::Uuid;

use super::set_log::SetLogRepository;
use crate::error::{Result, StorageError};
use crate::models::{NewSetLog, NewWorkoutSession, SessionClose, WorkoutSession};

pub struct WorkoutSessionRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> WorkoutSessionRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an open session
    pub async fn create(&self, session: &NewWorkoutSession) -> Result<WorkoutSession> {
        let created = sqlx::query_as::<_, WorkoutSession>(
            r#"
            INSERT INTO workout_sessions (user_id, name, started_at, body_weight)
            VALUES ($1, $2, $3, $4)
            RETURNING session_id, user_id, name, started_at, ended_at,
                      duration_minutes, body_weight, notes, created_at
            "#,
        )
        .bind(session.user_id)
        .bind(&session.name)
        .bind(session.started_at)
        .bind(session.body_weight)
        .fetch_one(self.pool)
        .await?;

        Ok(created)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<WorkoutSession> {
        sqlx::query_as::<_, WorkoutSession>(
            r#"
            SELECT session_id, user_id, name, started_at, ended_at,
                   duration_minutes, body_weight, notes, created_at
            FROM workout_sessions
            WHERE session_id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)
    }

    /// Sessions of a user, newest first
    pub async fn list_for_user(&self, user_id: Uuid, limit: u32, offset: u32) -> Result<Vec<WorkoutSession>> {
        let sessions = sqlx::query_as::<_, WorkoutSession>(
            r#"
            SELECT session_id, user_id, name, started_at, ended_at,
                   duration_minutes, body_weight, notes, created_at
            FROM workout_sessions
            WHERE user_id = $1
            ORDER BY started_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(i64::from(limit))
        .bind(i64::from(offset))
        .fetch_all(self.pool)
        .await?;

        Ok(sessions)
    }

    pub async fn count_for_user(&self, user_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM workout_sessions WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Close the session and write its set logs in one transaction.
    ///
    /// Fails with `ConstraintViolation` if the session is already closed;
    /// nothing is written in that case or on any insert failure.
    pub async fn finish(&self, close: &SessionClose, logs: &[NewSetLog]) -> Result<WorkoutSession> {
        let mut tx = self.pool.begin().await?;

        let closed = sqlx::query_as::<_, WorkoutSession>(
            r#"
            UPDATE workout_sessions
            SET ended_at = $2,
                duration_minutes = $3
            WHERE session_id = $1 AND ended_at IS NULL
            RETURNING session_id, user_id, name, started_at, ended_at,
                      duration_minutes, body_weight, notes, created_at
            "#,
        )
        .bind(close.session_id)
        .bind(close.ended_at)
        .bind(close.duration_minutes)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(closed) = closed else {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM workout_sessions WHERE session_id = $1)",
            )
            .bind(close.session_id)
            .fetch_one(&mut *tx)
            .await?;

            return Err(if exists {
                StorageError::ConstraintViolation("Workout session is already closed".to_string())
            } else {
                StorageError::NotFound
            });
        };

        for log in logs {
            SetLogRepository::insert_in(&mut tx, log).await?;
        }

        tx.commit().await?;

        Ok(closed)
    }
}
