use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// A workout session record.
///
/// Open while `ended_at` is `None`. Closed exactly once, never reopened.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkoutSession {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub name: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub body_weight: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl WorkoutSession {
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct NewWorkoutSession {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub started_at: DateTime<Utc>,
    pub body_weight: Option<Decimal>,
}

/// Patch applied when a session is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionClose {
    pub session_id: Uuid,
    pub ended_at: DateTime<Utc>,
    pub duration_minutes: i32,
}
