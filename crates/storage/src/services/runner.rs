//! Runs an opened workout session: set entry, rest countdown and finish.
//!
//! The runner exclusively owns the in-memory progress of one session. Sets
//! move one way from open to completed, and the session is closed at most
//! once; after a successful finish every mutation fails with
//! [`WorkoutError::SessionClosed`].

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{ValidationFailure, WorkoutError, WorkoutResult};
use crate::models::{
    check_weight, Identity, NewSetLog, PlannedExercise, SessionClose, SessionPlan, SetProgress,
    WorkoutSession,
};
use crate::store::WorkoutStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestState {
    Viewing,
    Resting {
        time_left: u32,
        last_tick_at: DateTime<Utc>,
    },
}

/// One planned exercise together with its set progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ExerciseProgress {
    pub exercise: PlannedExercise,
    pub sets: Vec<SetProgress>,
    /// Index of the next set to do; equals `sets.len()` once all are done.
    pub current_set: usize,
}

impl ExerciseProgress {
    fn new(exercise: PlannedExercise) -> Self {
        let sets = exercise.initial_sets();
        Self {
            exercise,
            sets,
            current_set: 0,
        }
    }

    pub fn completed_sets(&self) -> usize {
        self.sets.iter().filter(|s| s.completed).count()
    }
}

/// Outcome of a successful `complete_set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetCompletion {
    pub set_number: u16,
    /// Rest started after this set, if any.
    pub rest_seconds: Option<u32>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WorkoutSummary {
    pub session: WorkoutSession,
    pub duration_minutes: i32,
    pub completed_sets: usize,
    pub total_volume: Decimal,
}

#[derive(Debug, Clone)]
pub struct SessionRunner {
    identity: Identity,
    session: WorkoutSession,
    exercises: Vec<ExerciseProgress>,
    current_exercise_index: usize,
    rest: RestState,
    closed: bool,
}

impl SessionRunner {
    pub fn new(identity: Identity, session: WorkoutSession, plan: SessionPlan) -> WorkoutResult<Self> {
        if session.user_id != identity.user_id {
            return Err(ValidationFailure::ForeignSession.into());
        }
        if !session.is_open() {
            return Err(WorkoutError::SessionClosed);
        }
        if plan.is_empty() {
            return Err(ValidationFailure::EmptySession.into());
        }

        Ok(Self {
            identity,
            session,
            exercises: plan.into_inner().into_iter().map(ExerciseProgress::new).collect(),
            current_exercise_index: 0,
            rest: RestState::Viewing,
            closed: false,
        })
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn session(&self) -> &WorkoutSession {
        &self.session
    }

    pub fn exercises(&self) -> &[ExerciseProgress] {
        &self.exercises
    }

    pub fn current_exercise_index(&self) -> usize {
        self.current_exercise_index
    }

    pub fn current_exercise(&self) -> &ExerciseProgress {
        &self.exercises[self.current_exercise_index]
    }

    pub fn rest_state(&self) -> RestState {
        self.rest
    }

    pub fn is_resting(&self) -> bool {
        matches!(self.rest, RestState::Resting { .. })
    }

    pub fn rest_time_left(&self) -> u32 {
        match self.rest {
            RestState::Resting { time_left, .. } => time_left,
            RestState::Viewing => 0,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn completed_sets(&self) -> usize {
        self.exercises.iter().map(ExerciseProgress::completed_sets).sum()
    }

    pub fn total_sets(&self) -> usize {
        self.exercises.iter().map(|e| e.sets.len()).sum()
    }

    /// Edits reps and weight of an open set of the current exercise.
    pub fn update_set(&mut self, set_index: usize, reps: u32, weight: Decimal) -> WorkoutResult<&SetProgress> {
        self.ensure_open()?;
        check_weight(weight)?;

        let set = self.current_set_mut(set_index)?;
        if set.completed {
            return Err(ValidationFailure::SetAlreadyCompleted {
                set_number: set.set_number,
            }
            .into());
        }

        set.reps = reps;
        set.weight = weight;
        Ok(set)
    }

    pub fn complete_set(&mut self, set_index: usize) -> WorkoutResult<SetCompletion> {
        self.complete_set_at(set_index, Utc::now())
    }

    /// Marks a set of the current exercise completed.
    ///
    /// Rejected without any state change when the weight is zero. Rest starts
    /// only when the exercise has a rest period and this was not its last set.
    pub fn complete_set_at(&mut self, set_index: usize, now: DateTime<Utc>) -> WorkoutResult<SetCompletion> {
        self.ensure_open()?;

        let set = self.current_set_mut(set_index)?;
        if set.completed {
            return Err(ValidationFailure::SetAlreadyCompleted {
                set_number: set.set_number,
            }
            .into());
        }
        if set.weight.is_zero() {
            return Err(ValidationFailure::ZeroWeight {
                set_number: set.set_number,
            }
            .into());
        }

        set.completed = true;
        let set_number = set.set_number;

        let progress = &mut self.exercises[self.current_exercise_index];
        progress.current_set = set_index + 1;
        let rest_seconds = progress.exercise.rest_seconds;
        let is_last_set = set_index + 1 >= progress.sets.len();

        tracing::debug!(
            session_id = %self.session.session_id,
            exercise_id = %progress.exercise.exercise_id(),
            set_number,
            "Set completed"
        );

        self.rest = if rest_seconds > 0 && !is_last_set {
            RestState::Resting {
                time_left: rest_seconds,
                last_tick_at: now,
            }
        } else {
            RestState::Viewing
        };

        Ok(SetCompletion {
            set_number,
            rest_seconds: self.is_resting().then_some(rest_seconds),
        })
    }

    /// Advances the rest countdown by one second. Returns the seconds left.
    pub fn tick(&mut self) -> u32 {
        if let RestState::Resting {
            time_left,
            last_tick_at,
        } = self.rest
        {
            let time_left = time_left.saturating_sub(1);
            self.rest = if time_left == 0 {
                RestState::Viewing
            } else {
                RestState::Resting {
                    time_left,
                    last_tick_at: last_tick_at + Duration::seconds(1),
                }
            };
        }
        self.rest_time_left()
    }

    /// Applies every whole second elapsed since the last tick.
    pub fn catch_up(&mut self, now: DateTime<Utc>) -> u32 {
        if let RestState::Resting {
            time_left,
            last_tick_at,
        } = self.rest
        {
            let elapsed = (now - last_tick_at).num_seconds().max(0);
            let ticks = u32::try_from(elapsed).unwrap_or(u32::MAX).min(time_left);
            for _ in 0..ticks {
                self.tick();
            }
        }
        self.rest_time_left()
    }

    pub fn skip_rest(&mut self) {
        self.rest = RestState::Viewing;
    }

    /// Moves to the next exercise. Returns false at the last one.
    pub fn next_exercise(&mut self) -> WorkoutResult<bool> {
        self.ensure_open()?;
        self.skip_rest();
        if self.current_exercise_index + 1 < self.exercises.len() {
            self.current_exercise_index += 1;
            return Ok(true);
        }
        Ok(false)
    }

    /// Moves to the previous exercise. Returns false at the first one.
    pub fn prev_exercise(&mut self) -> WorkoutResult<bool> {
        self.ensure_open()?;
        self.skip_rest();
        if self.current_exercise_index > 0 {
            self.current_exercise_index -= 1;
            return Ok(true);
        }
        Ok(false)
    }

    pub async fn finish_workout<S>(&mut self, store: &S, confirm_empty: bool) -> WorkoutResult<WorkoutSummary>
    where
        S: WorkoutStore + ?Sized,
    {
        self.finish_workout_at(store, confirm_empty, Utc::now()).await
    }

    /// Closes the session and persists every completed set in one write.
    ///
    /// With no completed sets the caller must pass `confirm_empty`. A store
    /// failure leaves the runner untouched so the finish can be retried.
    pub async fn finish_workout_at<S>(
        &mut self,
        store: &S,
        confirm_empty: bool,
        now: DateTime<Utc>,
    ) -> WorkoutResult<WorkoutSummary>
    where
        S: WorkoutStore + ?Sized,
    {
        self.ensure_open()?;

        let logs = self.completed_logs();
        if logs.is_empty() && !confirm_empty {
            return Err(WorkoutError::ConfirmationRequired);
        }

        let duration_minutes = rounded_minutes(self.session.started_at, now);
        let completed_sets = logs.len();
        let total_volume = self
            .exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter(|s| s.completed)
            .map(SetProgress::volume)
            .sum::<Decimal>();

        let close = SessionClose {
            session_id: self.session.session_id,
            ended_at: now,
            duration_minutes,
        };

        let session = store.finish_session(close, logs).await.map_err(|e| {
            tracing::error!(
                session_id = %self.session.session_id,
                "Failed to save workout: {}",
                e
            );
            WorkoutError::Persistence(e)
        })?;

        tracing::info!(
            session_id = %session.session_id,
            user_id = %self.identity.user_id,
            duration_minutes,
            completed_sets,
            "Workout finished"
        );

        self.session = session.clone();
        self.rest = RestState::Viewing;
        self.closed = true;

        Ok(WorkoutSummary {
            session,
            duration_minutes,
            completed_sets,
            total_volume,
        })
    }

    fn completed_logs(&self) -> Vec<NewSetLog> {
        self.exercises
            .iter()
            .flat_map(|progress| {
                progress
                    .sets
                    .iter()
                    .filter(|s| s.completed)
                    .map(move |set| NewSetLog {
                        session_id: self.session.session_id,
                        exercise_id: progress.exercise.exercise_id(),
                        set_number: i16::try_from(set.set_number).unwrap_or(i16::MAX),
                        reps: i32::try_from(set.reps).unwrap_or(i32::MAX),
                        weight: set.weight,
                        rest_seconds: i32::try_from(progress.exercise.rest_seconds)
                            .unwrap_or(i32::MAX),
                    })
            })
            .collect()
    }

    fn current_set_mut(&mut self, set_index: usize) -> WorkoutResult<&mut SetProgress> {
        let sets = &mut self.exercises[self.current_exercise_index].sets;
        let len = sets.len();
        sets.get_mut(set_index)
            .ok_or_else(|| ValidationFailure::SetIndexOutOfRange { index: set_index, len }.into())
    }

    fn ensure_open(&self) -> WorkoutResult<()> {
        if self.closed {
            return Err(WorkoutError::SessionClosed);
        }
        Ok(())
    }
}

/// Whole minutes between two instants, halves rounded up, never negative.
pub fn rounded_minutes(started_at: DateTime<Utc>, ended_at: DateTime<Utc>) -> i32 {
    let millis = (ended_at - started_at).num_milliseconds().max(0);
    i32::try_from((millis + 30_000) / 60_000).unwrap_or(i32::MAX)
}
