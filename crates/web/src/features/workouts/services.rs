//! Drafts, running sessions and history of the signed-in user.
//!
//! Draft and runner logic lives in the storage crate; these functions look
//! entries up in the [`WorkoutRegistry`] and move plans between them.

use rust_decimal::Decimal;
use sqlx::PgPool;
use storage::{
    WorkoutStore,
    dto::{
        common::{PaginatedResponse, PaginationParams},
        workout::{
            ActiveSessionResponse, DraftResponse, FinishWorkoutResponse, SessionDetailResponse,
            StartWorkoutResponse,
        },
    },
    models::{Identity, PlanField, WorkoutSession},
    repository::{set_log::SetLogRepository, workout_session::WorkoutSessionRepository},
    services::runner::SessionRunner,
};
use uuid::Uuid;

use crate::error::WebError;
use crate::registry::WorkoutRegistry;

pub async fn create_draft(
    registry: &WorkoutRegistry,
    identity: Identity,
    name: Option<String>,
) -> DraftResponse {
    let (draft_id, draft) = registry.create_draft(identity, name).await;
    let composer = draft.lock().await;
    DraftResponse::new(draft_id, &composer)
}

pub async fn get_draft(
    registry: &WorkoutRegistry,
    user_id: Uuid,
    draft_id: Uuid,
) -> Result<DraftResponse, WebError> {
    let draft = registry.draft(draft_id, user_id).await.ok_or(WebError::NotFound)?;
    let composer = draft.lock().await;
    Ok(DraftResponse::new(draft_id, &composer))
}

pub async fn discard_draft(
    registry: &WorkoutRegistry,
    user_id: Uuid,
    draft_id: Uuid,
) -> Result<(), WebError> {
    if registry.discard_draft(draft_id, user_id).await {
        Ok(())
    } else {
        Err(WebError::NotFound)
    }
}

pub async fn add_exercise<S>(
    store: &S,
    registry: &WorkoutRegistry,
    user_id: Uuid,
    draft_id: Uuid,
    exercise_id: Uuid,
) -> Result<DraftResponse, WebError>
where
    S: WorkoutStore + ?Sized,
{
    let draft = registry.draft(draft_id, user_id).await.ok_or(WebError::NotFound)?;
    let exercise = store.find_exercise(exercise_id).await?;

    let mut composer = draft.lock().await;
    composer.add_exercise(store, &exercise).await;

    Ok(DraftResponse::new(draft_id, &composer))
}

pub async fn remove_exercise(
    registry: &WorkoutRegistry,
    user_id: Uuid,
    draft_id: Uuid,
    index: usize,
) -> Result<DraftResponse, WebError> {
    let draft = registry.draft(draft_id, user_id).await.ok_or(WebError::NotFound)?;
    let mut composer = draft.lock().await;
    composer.remove_exercise(index)?;

    Ok(DraftResponse::new(draft_id, &composer))
}

pub async fn update_exercise_field(
    registry: &WorkoutRegistry,
    user_id: Uuid,
    draft_id: Uuid,
    index: usize,
    field: PlanField,
    raw_value: &str,
) -> Result<DraftResponse, WebError> {
    let draft = registry.draft(draft_id, user_id).await.ok_or(WebError::NotFound)?;
    let mut composer = draft.lock().await;
    composer.update_field(index, field, raw_value)?;

    Ok(DraftResponse::new(draft_id, &composer))
}

/// Open the session for a draft and move its plan into a runner.
///
/// The draft is removed only once the session exists.
pub async fn start_workout<S>(
    store: &S,
    registry: &WorkoutRegistry,
    user_id: Uuid,
    draft_id: Uuid,
    body_weight: Option<Decimal>,
) -> Result<StartWorkoutResponse, WebError>
where
    S: WorkoutStore + ?Sized,
{
    let draft = registry.draft(draft_id, user_id).await.ok_or(WebError::NotFound)?;

    let (identity, started) = {
        let mut composer = draft.lock().await;
        let started = composer.start_workout(store, body_weight).await?;
        (composer.identity().clone(), started)
    };

    let response = StartWorkoutResponse {
        session: started.session.clone(),
        plan: started.plan.clone(),
    };

    let runner = SessionRunner::new(identity, started.session, started.plan)?;
    registry.activate(runner).await;
    registry.discard_draft(draft_id, user_id).await;

    Ok(response)
}

/// Apply `action` to a running session after catching up its rest timer.
async fn with_runner<T, F>(
    registry: &WorkoutRegistry,
    user_id: Uuid,
    session_id: Uuid,
    action: F,
) -> Result<T, WebError>
where
    F: FnOnce(&mut SessionRunner) -> Result<T, WebError>,
{
    let runner = registry
        .active(session_id, user_id)
        .await
        .ok_or(WebError::NotFound)?;
    let mut runner = runner.lock().await;
    runner.catch_up(chrono::Utc::now());
    action(&mut runner)
}

pub async fn active_session(
    registry: &WorkoutRegistry,
    user_id: Uuid,
    session_id: Uuid,
) -> Result<ActiveSessionResponse, WebError> {
    with_runner(registry, user_id, session_id, |runner| {
        Ok(ActiveSessionResponse::from(&*runner))
    })
    .await
}

pub async fn update_set(
    registry: &WorkoutRegistry,
    user_id: Uuid,
    session_id: Uuid,
    set_index: usize,
    reps: u32,
    weight: Decimal,
) -> Result<ActiveSessionResponse, WebError> {
    with_runner(registry, user_id, session_id, |runner| {
        runner.update_set(set_index, reps, weight)?;
        Ok(ActiveSessionResponse::from(&*runner))
    })
    .await
}

pub async fn complete_set(
    registry: &WorkoutRegistry,
    user_id: Uuid,
    session_id: Uuid,
    set_index: usize,
) -> Result<ActiveSessionResponse, WebError> {
    with_runner(registry, user_id, session_id, |runner| {
        runner.complete_set(set_index)?;
        Ok(ActiveSessionResponse::from(&*runner))
    })
    .await
}

pub async fn skip_rest(
    registry: &WorkoutRegistry,
    user_id: Uuid,
    session_id: Uuid,
) -> Result<ActiveSessionResponse, WebError> {
    with_runner(registry, user_id, session_id, |runner| {
        runner.skip_rest();
        Ok(ActiveSessionResponse::from(&*runner))
    })
    .await
}

pub async fn next_exercise(
    registry: &WorkoutRegistry,
    user_id: Uuid,
    session_id: Uuid,
) -> Result<ActiveSessionResponse, WebError> {
    with_runner(registry, user_id, session_id, |runner| {
        runner.next_exercise()?;
        Ok(ActiveSessionResponse::from(&*runner))
    })
    .await
}

pub async fn prev_exercise(
    registry: &WorkoutRegistry,
    user_id: Uuid,
    session_id: Uuid,
) -> Result<ActiveSessionResponse, WebError> {
    with_runner(registry, user_id, session_id, |runner| {
        runner.prev_exercise()?;
        Ok(ActiveSessionResponse::from(&*runner))
    })
    .await
}

/// Close the session and drop the runner from the registry.
///
/// On failure the runner stays registered so the finish can be repeated.
pub async fn finish_workout<S>(
    store: &S,
    registry: &WorkoutRegistry,
    user_id: Uuid,
    session_id: Uuid,
    confirm_empty: bool,
) -> Result<FinishWorkoutResponse, WebError>
where
    S: WorkoutStore + ?Sized,
{
    let runner = registry
        .active(session_id, user_id)
        .await
        .ok_or(WebError::NotFound)?;

    let summary = {
        let mut runner = runner.lock().await;
        runner.catch_up(chrono::Utc::now());
        runner.finish_workout(store, confirm_empty).await?
    };

    registry.release(session_id, user_id).await;

    Ok(FinishWorkoutResponse::from(summary))
}

/// Most recent sessions of the user first
pub async fn list_sessions(
    pool: &PgPool,
    user_id: Uuid,
    params: &PaginationParams,
) -> storage::error::Result<PaginatedResponse<WorkoutSession>> {
    let repo = WorkoutSessionRepository::new(pool);

    let sessions = repo
        .list_for_user(user_id, params.limit(), params.offset())
        .await?;
    let total = repo.count_for_user(user_id).await?;

    Ok(PaginatedResponse::new(
        sessions,
        params.page,
        params.page_size,
        total,
    ))
}

pub async fn session_detail(
    pool: &PgPool,
    user_id: Uuid,
    session_id: Uuid,
) -> Result<SessionDetailResponse, WebError> {
    let session = WorkoutSessionRepository::new(pool)
        .find_by_id(session_id)
        .await?;
    if session.user_id != user_id {
        return Err(WebError::NotFound);
    }

    let set_logs = SetLogRepository::new(pool)
        .list_for_session(session_id)
        .await?;

    Ok(SessionDetailResponse { session, set_logs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use storage::{
        MemoryStore, WorkoutError,
        error::ValidationFailure,
        models::Exercise,
    };

    fn identity() -> Identity {
        Identity {
            user_id: Uuid::new_v4(),
            email: "can@example.com".to_string(),
            username: "can".to_string(),
            full_name: "Can Yildiz".to_string(),
        }
    }

    fn bench_press() -> Exercise {
        Exercise {
            exercise_id: Uuid::new_v4(),
            name: "Bench Press".to_string(),
            category: "chest".to_string(),
            description: None,
            muscle_groups: vec!["chest".to_string(), "triceps".to_string()],
            is_default: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_draft_to_finished_workout() {
        let bench = bench_press();
        let store = MemoryStore::with_exercises(vec![bench.clone()]);
        let registry = WorkoutRegistry::new();
        let identity = identity();
        let user_id = identity.user_id;

        let draft = create_draft(&registry, identity, Some("Push".to_string())).await;
        let draft = add_exercise(&store, &registry, user_id, draft.draft_id, bench.exercise_id)
            .await
            .unwrap();
        assert_eq!(draft.exercises.len(), 1);

        let draft = update_exercise_field(
            &registry,
            user_id,
            draft.draft_id,
            0,
            PlanField::TargetSets,
            "2",
        )
        .await
        .unwrap();
        assert_eq!(draft.exercises[0].target_sets, 2);

        let started = start_workout(&store, &registry, user_id, draft.draft_id, None)
            .await
            .unwrap();
        let session_id = started.session.session_id;
        assert_matches!(
            get_draft(&registry, user_id, draft.draft_id).await,
            Err(WebError::NotFound)
        );

        update_set(&registry, user_id, session_id, 0, 8, Decimal::new(60, 0))
            .await
            .unwrap();
        let state = complete_set(&registry, user_id, session_id, 0).await.unwrap();
        assert!(state.is_resting);
        assert_eq!(state.completed_sets, 1);
        assert_eq!(state.total_sets, 2);

        let state = skip_rest(&registry, user_id, session_id).await.unwrap();
        assert!(!state.is_resting);

        let summary = finish_workout(&store, &registry, user_id, session_id, false)
            .await
            .unwrap();
        assert_eq!(summary.completed_sets, 1);
        assert_eq!(summary.total_volume, Decimal::new(480, 0));
        assert_eq!(store.set_logs().len(), 1);
        assert_matches!(
            active_session(&registry, user_id, session_id).await,
            Err(WebError::NotFound)
        );
    }

    #[tokio::test]
    async fn test_other_user_cannot_touch_session() {
        let bench = bench_press();
        let store = MemoryStore::with_exercises(vec![bench.clone()]);
        let registry = WorkoutRegistry::new();
        let identity = identity();
        let user_id = identity.user_id;

        let draft = create_draft(&registry, identity, None).await;
        add_exercise(&store, &registry, user_id, draft.draft_id, bench.exercise_id)
            .await
            .unwrap();
        let started = start_workout(&store, &registry, user_id, draft.draft_id, None)
            .await
            .unwrap();

        let result = complete_set(&registry, Uuid::new_v4(), started.session.session_id, 0).await;
        assert_matches!(result, Err(WebError::NotFound));
    }

    #[tokio::test]
    async fn test_failed_finish_keeps_runner_registered() {
        let bench = bench_press();
        let store = MemoryStore::with_exercises(vec![bench.clone()]);
        let registry = WorkoutRegistry::new();
        let identity = identity();
        let user_id = identity.user_id;

        let draft = create_draft(&registry, identity, None).await;
        add_exercise(&store, &registry, user_id, draft.draft_id, bench.exercise_id)
            .await
            .unwrap();
        let session_id = start_workout(&store, &registry, user_id, draft.draft_id, None)
            .await
            .unwrap()
            .session
            .session_id;

        let result = finish_workout(&store, &registry, user_id, session_id, false).await;
        assert_matches!(result, Err(WebError::Workout(WorkoutError::ConfirmationRequired)));

        store.set_fail_writes(true);
        let result = finish_workout(&store, &registry, user_id, session_id, true).await;
        assert_matches!(result, Err(WebError::Workout(WorkoutError::Persistence(_))));

        store.set_fail_writes(false);
        let summary = finish_workout(&store, &registry, user_id, session_id, true)
            .await
            .unwrap();
        assert_eq!(summary.completed_sets, 0);
    }

    #[tokio::test]
    async fn test_start_empty_draft_is_rejected() {
        let store = MemoryStore::new();
        let registry = WorkoutRegistry::new();
        let identity = identity();
        let user_id = identity.user_id;

        let draft = create_draft(&registry, identity, None).await;
        let result = start_workout(&store, &registry, user_id, draft.draft_id, None).await;

        assert_matches!(
            result,
            Err(WebError::Workout(WorkoutError::Validation(ValidationFailure::EmptyPlan)))
        );
        assert!(get_draft(&registry, user_id, draft.draft_id).await.is_ok());
    }
}
