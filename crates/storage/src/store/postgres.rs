use async_trait::async_trait;
use uuid::Uuid;

use super::WorkoutStore;
use crate::Database;
use crate::error::Result;
use crate::models::{Exercise, NewSetLog, NewWorkoutSession, SessionClose, SetLog, WorkoutSession};
use crate::repository::{
    exercise::ExerciseRepository, set_log::SetLogRepository,
    workout_session::WorkoutSessionRepository,
};

#[async_trait]
impl WorkoutStore for Database {
    async fn search_exercises(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Exercise>> {
        ExerciseRepository::new(self.pool())
            .search(search, category)
            .await
    }

    async fn find_exercise(&self, exercise_id: Uuid) -> Result<Exercise> {
        ExerciseRepository::new(self.pool()).find_by_id(exercise_id).await
    }

    async fn latest_set_log(&self, user_id: Uuid, exercise_id: Uuid) -> Result<Option<SetLog>> {
        SetLogRepository::new(self.pool())
            .latest_for_exercise(user_id, exercise_id)
            .await
    }

    async fn open_session(&self, session: NewWorkoutSession) -> Result<WorkoutSession> {
        WorkoutSessionRepository::new(self.pool()).create(&session).await
    }

    async fn finish_session(&self, close: SessionClose, logs: Vec<NewSetLog>) -> Result<WorkoutSession> {
        WorkoutSessionRepository::new(self.pool())
            .finish(&close, &logs)
            .await
    }
}
