//! Builds a workout plan and opens the session record.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::progression;
use crate::error::{ValidationFailure, WorkoutError, WorkoutResult};
use crate::models::{
    check_weight, Exercise, Identity, NewWorkoutSession, PlanField, PlannedExercise, SessionPlan,
    WorkoutSession,
};
use crate::store::WorkoutStore;

/// A freshly opened session and the plan it will run.
#[derive(Debug, Clone)]
pub struct StartedWorkout {
    pub session: WorkoutSession,
    pub plan: SessionPlan,
}

#[derive(Debug, Clone)]
pub struct WorkoutComposer {
    identity: Identity,
    name: Option<String>,
    exercises: Vec<PlannedExercise>,
}

impl WorkoutComposer {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            name: None,
            exercises: Vec::new(),
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
    }

    pub fn exercises(&self) -> &[PlannedExercise] {
        &self.exercises
    }

    /// Appends an exercise, seeding targets from the user's last logged set.
    ///
    /// A failed history lookup falls back to the defaults and is only logged.
    pub async fn add_exercise<S>(&mut self, store: &S, exercise: &Exercise) -> &PlannedExercise
    where
        S: WorkoutStore + ?Sized,
    {
        let last_log = match store
            .latest_set_log(self.identity.user_id, exercise.exercise_id)
            .await
        {
            Ok(log) => log,
            Err(e) => {
                tracing::warn!(
                    exercise_id = %exercise.exercise_id,
                    user_id = %self.identity.user_id,
                    "Set history lookup failed, using defaults: {}",
                    e
                );
                None
            }
        };

        let progression = progression::from_last_log(last_log.as_ref());

        let mut planned = PlannedExercise::new(exercise.exercise_id, exercise.name.clone());
        planned.target_reps = progression.target_reps;
        planned.last_weight = progression.last_weight;
        planned.suggested_weight = progression.suggested_weight;

        let index = self.exercises.len();
        self.exercises.push(planned);
        &self.exercises[index]
    }

    pub fn remove_exercise(&mut self, index: usize) -> WorkoutResult<PlannedExercise> {
        self.check_index(index)?;
        Ok(self.exercises.remove(index))
    }

    /// Applies raw input to one numeric target, see [`PlanField::coerce`].
    pub fn update_field(
        &mut self,
        index: usize,
        field: PlanField,
        raw_value: &str,
    ) -> WorkoutResult<&PlannedExercise> {
        self.check_index(index)?;
        let planned = &mut self.exercises[index];
        planned.set_field(field, raw_value);
        Ok(planned)
    }

    pub async fn start_workout<S>(
        &mut self,
        store: &S,
        body_weight: Option<Decimal>,
    ) -> WorkoutResult<StartedWorkout>
    where
        S: WorkoutStore + ?Sized,
    {
        self.start_workout_at(store, body_weight, Utc::now()).await
    }

    /// Opens the session and hands the plan over, leaving the composer empty.
    ///
    /// Nothing is written for an empty plan. On a store failure the plan is kept.
    pub async fn start_workout_at<S>(
        &mut self,
        store: &S,
        body_weight: Option<Decimal>,
        now: DateTime<Utc>,
    ) -> WorkoutResult<StartedWorkout>
    where
        S: WorkoutStore + ?Sized,
    {
        if self.exercises.is_empty() {
            return Err(ValidationFailure::EmptyPlan.into());
        }
        if let Some(weight) = body_weight {
            if weight <= Decimal::ZERO {
                return Err(ValidationFailure::InvalidBodyWeight.into());
            }
            check_weight(weight)?;
        }

        let session = store
            .open_session(NewWorkoutSession {
                user_id: self.identity.user_id,
                name: self.name.clone(),
                started_at: now,
                body_weight,
            })
            .await
            .map_err(WorkoutError::Persistence)?;

        tracing::info!(
            session_id = %session.session_id,
            user_id = %self.identity.user_id,
            exercises = self.exercises.len(),
            "Workout session opened"
        );

        self.name = None;
        let plan = SessionPlan::new(std::mem::take(&mut self.exercises));

        Ok(StartedWorkout { session, plan })
    }

    fn check_index(&self, index: usize) -> WorkoutResult<()> {
        if index >= self.exercises.len() {
            return Err(ValidationFailure::ExerciseIndexOutOfRange {
                index,
                len: self.exercises.len(),
            }
            .into());
        }
        Ok(())
    }
}
