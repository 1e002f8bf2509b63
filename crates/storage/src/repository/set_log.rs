use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{NewSetLog, SetLog};

pub struct SetLogRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SetLogRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Most recent set the user logged for an exercise
    pub async fn latest_for_exercise(&self, user_id: Uuid, exercise_id: Uuid) -> Result<Option<SetLog>> {
        let log = sqlx::query_as::<_, SetLog>(
            r#"
            SELECT sl.set_log_id, sl.session_id, sl.exercise_id, sl.set_number, sl.reps,
                   sl.weight, sl.rest_seconds, sl.rpe, sl.created_at
            FROM set_logs sl
            JOIN workout_sessions ws ON ws.session_id = sl.session_id
            WHERE ws.user_id = $1 AND sl.exercise_id = $2
            ORDER BY sl.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(exercise_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(log)
    }

    pub async fn list_for_session(&self, session_id: Uuid) -> Result<Vec<SetLog>> {
        let logs = sqlx::query_as::<_, SetLog>(
            r#"
            SELECT set_log_id, session_id, exercise_id, set_number, reps,
                   weight, rest_seconds, rpe, created_at
            FROM set_logs
            WHERE session_id = $1
            ORDER BY created_at, set_number
            "#,
        )
        .bind(session_id)
        .fetch_all(self.pool)
        .await?;

        Ok(logs)
    }

    /// Insert a set log inside an open transaction
    pub async fn insert_in(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        log: &NewSetLog,
    ) -> Result<SetLog> {
        let inserted = sqlx::query_as::<_, SetLog>(
            r#"
            INSERT INTO set_logs (session_id, exercise_id, set_number, reps, weight, rest_seconds)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING set_log_id, session_id, exercise_id, set_number, reps,
                      weight, rest_seconds, rpe, created_at
            "#,
        )
        .bind(log.session_id)
        .bind(log.exercise_id)
        .bind(log.set_number)
        .bind(log.reps)
        .bind(log.weight)
        .bind(log.rest_seconds)
        .fetch_one(&mut **tx)
        .await?;

        Ok(inserted)
    }
}
