//! The data store the workout flow reads from and writes to.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Exercise, NewSetLog, NewWorkoutSession, SessionClose, SetLog, WorkoutSession};

mod memory;
mod postgres;

pub use memory::MemoryStore;

#[async_trait]
pub trait WorkoutStore: Send + Sync {
    /// Library entries whose name contains `search` (any case) in `category`.
    /// A category of `"all"` disables that filter.
    async fn search_exercises(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Exercise>>;

    async fn find_exercise(&self, exercise_id: Uuid) -> Result<Exercise>;

    /// Most recent set log of `user_id` for `exercise_id`, newest first, limit 1.
    async fn latest_set_log(&self, user_id: Uuid, exercise_id: Uuid) -> Result<Option<SetLog>>;

    /// Insert an open session (`ended_at` absent).
    async fn open_session(&self, session: NewWorkoutSession) -> Result<WorkoutSession>;

    /// Close an open session and persist its set logs atomically.
    async fn finish_session(&self, close: SessionClose, logs: Vec<NewSetLog>) -> Result<WorkoutSession>;
}
