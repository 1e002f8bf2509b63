use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::WorkoutStore;
use crate::error::{Result, StorageError};
use crate::models::{Exercise, NewSetLog, NewWorkoutSession, SessionClose, SetLog, WorkoutSession};

/// In-process store with switchable failures, used by tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    fail_lookups: AtomicBool,
    fail_writes: AtomicBool,
    write_calls: AtomicUsize,
}

#[derive(Debug, Default)]
struct MemoryState {
    exercises: Vec<Exercise>,
    sessions: Vec<WorkoutSession>,
    set_logs: Vec<SetLog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exercises(exercises: Vec<Exercise>) -> Self {
        let store = Self::default();
        store.state().exercises = exercises;
        store
    }

    fn state(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Makes every read fail with a backend error until reset.
    pub fn set_fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Makes every write fail with a backend error until reset.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of write calls attempted, including failed ones.
    pub fn write_calls(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn sessions(&self) -> Vec<WorkoutSession> {
        self.state().sessions.clone()
    }

    pub fn set_logs(&self) -> Vec<SetLog> {
        self.state().set_logs.clone()
    }

    /// Seeds history: a closed session for `user_id` holding one set log.
    pub fn seed_set_log(&self, user_id: Uuid, exercise_id: Uuid, reps: i32, weight: rust_decimal::Decimal) {
        let now = Utc::now();
        let session_id = Uuid::new_v4();
        let mut state = self.state();

        state.sessions.push(WorkoutSession {
            session_id,
            user_id,
            name: None,
            started_at: now,
            ended_at: Some(now),
            duration_minutes: Some(0),
            body_weight: None,
            notes: None,
            created_at: now,
        });
        state.set_logs.push(SetLog {
            set_log_id: Uuid::new_v4(),
            session_id,
            exercise_id,
            set_number: 1,
            reps,
            weight,
            rest_seconds: 0,
            rpe: None,
            created_at: now,
        });
    }

    fn check_lookup(&self) -> Result<()> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("lookup unavailable".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<()> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Backend("write unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl WorkoutStore for MemoryStore {
    async fn search_exercises(
        &self,
        search: Option<&str>,
        category: Option<&str>,
    ) -> Result<Vec<Exercise>> {
        self.check_lookup()?;
        let mut exercises: Vec<Exercise> = self
            .state()
            .exercises
            .iter()
            .filter(|e| e.matches(search, category))
            .cloned()
            .collect();
        exercises.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(exercises)
    }

    async fn find_exercise(&self, exercise_id: Uuid) -> Result<Exercise> {
        self.check_lookup()?;
        self.state()
            .exercises
            .iter()
            .find(|e| e.exercise_id == exercise_id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }

    async fn latest_set_log(&self, user_id: Uuid, exercise_id: Uuid) -> Result<Option<SetLog>> {
        self.check_lookup()?;
        let state = self.state();

        // Later pushes win ties on created_at.
        let latest = state
            .set_logs
            .iter()
            .enumerate()
            .filter(|(_, log)| log.exercise_id == exercise_id)
            .filter(|(_, log)| {
                state
                    .sessions
                    .iter()
                    .any(|s| s.session_id == log.session_id && s.user_id == user_id)
            })
            .max_by_key(|(idx, log)| (log.created_at, *idx))
            .map(|(_, log)| log.clone());

        Ok(latest)
    }

    async fn open_session(&self, session: NewWorkoutSession) -> Result<WorkoutSession> {
        self.check_write()?;
        let created = WorkoutSession {
            session_id: Uuid::new_v4(),
            user_id: session.user_id,
            name: session.name,
            started_at: session.started_at,
            ended_at: None,
            duration_minutes: None,
            body_weight: session.body_weight,
            notes: None,
            created_at: Utc::now(),
        };
        self.state().sessions.push(created.clone());
        Ok(created)
    }

    async fn finish_session(&self, close: SessionClose, logs: Vec<NewSetLog>) -> Result<WorkoutSession> {
        self.check_write()?;
        let mut state = self.state();

        let session = state
            .sessions
            .iter_mut()
            .find(|s| s.session_id == close.session_id)
            .ok_or(StorageError::NotFound)?;

        if !session.is_open() {
            return Err(StorageError::ConstraintViolation(
                "Workout session is already closed".to_string(),
            ));
        }

        session.ended_at = Some(close.ended_at);
        session.duration_minutes = Some(close.duration_minutes);
        let closed = session.clone();

        let now = Utc::now();
        state.set_logs.extend(logs.into_iter().map(|log| SetLog {
            set_log_id: Uuid::new_v4(),
            session_id: log.session_id,
            exercise_id: log.exercise_id,
            set_number: log.set_number,
            reps: log.reps,
            weight: log.weight,
            rest_seconds: log.rest_seconds,
            rpe: None,
            created_at: now,
        }));

        Ok(closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal::Decimal;

    fn exercise(name: &str, category: &str) -> Exercise {
        Exercise {
            exercise_id: Uuid::new_v4(),
            name: name.to_string(),
            category: category.to_string(),
            description: None,
            muscle_groups: Vec::new(),
            is_default: true,
            created_at: Utc::now(),
        }
    }

    fn library() -> MemoryStore {
        MemoryStore::with_exercises(vec![
            exercise("Squat", "legs"),
            exercise("Bench Press", "chest"),
            exercise("Incline Bench Press", "chest"),
            exercise("Overhead Press", "shoulders"),
        ])
    }

    #[tokio::test]
    async fn test_search_by_name_and_category() {
        let store = library();

        let found = store.search_exercises(Some("bench"), None).await.unwrap();
        let names: Vec<&str> = found.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, ["Bench Press", "Incline Bench Press"]);

        let found = store.search_exercises(Some("press"), Some("shoulders")).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Overhead Press");
    }

    #[tokio::test]
    async fn test_all_category_and_blank_search_match_everything() {
        let store = library();

        let found = store.search_exercises(Some("  "), Some("all")).await.unwrap();

        assert_eq!(found.len(), 4);
        assert_eq!(found[0].name, "Bench Press");
    }

    #[tokio::test]
    async fn test_finish_closes_once() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let session = store
            .open_session(NewWorkoutSession {
                user_id: Uuid::new_v4(),
                name: None,
                started_at: now,
                body_weight: None,
            })
            .await
            .unwrap();
        let close = SessionClose {
            session_id: session.session_id,
            ended_at: now,
            duration_minutes: 0,
        };
        let log = NewSetLog {
            session_id: session.session_id,
            exercise_id: Uuid::new_v4(),
            set_number: 1,
            reps: 5,
            weight: Decimal::new(100, 0),
            rest_seconds: 90,
        };

        let closed = store.finish_session(close.clone(), vec![log]).await.unwrap();
        assert!(!closed.is_open());
        assert_eq!(store.set_logs().len(), 1);

        let again = store.finish_session(close, Vec::new()).await;
        assert_matches!(again, Err(StorageError::ConstraintViolation(_)));
        assert_eq!(store.write_calls(), 3);
    }
}
