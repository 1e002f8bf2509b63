//! Runs against a real PostgreSQL database. Set `DATABASE_URL` and run with
//! `cargo test -p storage -- --ignored`.

use assert_matches::assert_matches;
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use storage::StorageError;
use storage::models::{NewSetLog, NewUser, NewWorkoutSession, SessionClose, WorkoutSession};
use storage::repository::exercise::ExerciseRepository;
use storage::repository::set_log::SetLogRepository;
use storage::repository::user::UserRepository;
use storage::repository::workout_session::WorkoutSessionRepository;
use uuid::Uuid;

async fn open_session(pool: &PgPool) -> (WorkoutSession, Uuid) {
    let user = UserRepository::new(pool)
        .create(&NewUser {
            email: "mira@example.com".to_string(),
            username: "mira".to_string(),
            full_name: "Mira Kovac".to_string(),
            password_hash: "not-a-real-hash".to_string(),
        })
        .await
        .unwrap();

    let bench = ExerciseRepository::new(pool)
        .search(Some("Bench Press"), None)
        .await
        .unwrap()
        .into_iter()
        .next()
        .unwrap();

    let session = WorkoutSessionRepository::new(pool)
        .create(&NewWorkoutSession {
            user_id: user.user_id,
            name: Some("Push".to_string()),
            started_at: Utc::now() - Duration::minutes(40),
            body_weight: Some(Decimal::new(805, 1)),
        })
        .await
        .unwrap();

    (session, bench.exercise_id)
}

fn log(session_id: Uuid, exercise_id: Uuid, set_number: i16, weight: Decimal) -> NewSetLog {
    NewSetLog {
        session_id,
        exercise_id,
        set_number,
        reps: 8,
        weight,
        rest_seconds: 90,
    }
}

fn close(session: &WorkoutSession) -> SessionClose {
    SessionClose {
        session_id: session.session_id,
        ended_at: Utc::now(),
        duration_minutes: 40,
    }
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_finish_writes_logs_and_closes_session(pool: PgPool) {
    let (session, exercise_id) = open_session(&pool).await;
    let repository = WorkoutSessionRepository::new(&pool);

    let closed = repository
        .finish(
            &close(&session),
            &[
                log(session.session_id, exercise_id, 1, Decimal::new(600, 1)),
                log(session.session_id, exercise_id, 2, Decimal::new(625, 1)),
            ],
        )
        .await
        .unwrap();

    assert!(!closed.is_open());
    assert_eq!(closed.duration_minutes, Some(40));

    let mut logs = SetLogRepository::new(&pool)
        .list_for_session(session.session_id)
        .await
        .unwrap();
    logs.sort_by_key(|l| l.set_number);
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].set_number, 1);
    assert_eq!(logs[0].weight, Decimal::new(600, 1));
    assert_eq!(logs[1].set_number, 2);
    assert_eq!(logs[1].weight, Decimal::new(625, 1));
    assert!(logs.iter().all(|l| l.exercise_id == exercise_id && l.reps == 8));
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_failed_log_insert_leaves_session_open(pool: PgPool) {
    let (session, exercise_id) = open_session(&pool).await;
    let repository = WorkoutSessionRepository::new(&pool);

    // The second row breaks the weight check after the first one went in.
    let result = repository
        .finish(
            &close(&session),
            &[
                log(session.session_id, exercise_id, 1, Decimal::new(600, 1)),
                log(session.session_id, exercise_id, 2, Decimal::ZERO),
            ],
        )
        .await;
    assert_matches!(result, Err(StorageError::Database(_)));

    let reloaded = repository.find_by_id(session.session_id).await.unwrap();
    assert!(reloaded.is_open());
    assert_eq!(reloaded.duration_minutes, None);

    let logs = SetLogRepository::new(&pool)
        .list_for_session(session.session_id)
        .await
        .unwrap();
    assert!(logs.is_empty());

    // The same session can still be finished.
    repository
        .finish(
            &close(&session),
            &[log(session.session_id, exercise_id, 1, Decimal::new(600, 1))],
        )
        .await
        .unwrap();
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_duplicate_set_number_rolls_back(pool: PgPool) {
    let (session, exercise_id) = open_session(&pool).await;
    let repository = WorkoutSessionRepository::new(&pool);

    let err = repository
        .finish(
            &close(&session),
            &[
                log(session.session_id, exercise_id, 1, Decimal::new(600, 1)),
                log(session.session_id, exercise_id, 1, Decimal::new(625, 1)),
            ],
        )
        .await
        .unwrap_err();
    assert!(err.is_unique_violation());

    assert!(repository.find_by_id(session.session_id).await.unwrap().is_open());
    assert!(SetLogRepository::new(&pool)
        .list_for_session(session.session_id)
        .await
        .unwrap()
        .is_empty());
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_second_finish_is_a_constraint_violation(pool: PgPool) {
    let (session, exercise_id) = open_session(&pool).await;
    let repository = WorkoutSessionRepository::new(&pool);
    let logs = [log(session.session_id, exercise_id, 1, Decimal::new(600, 1))];

    repository.finish(&close(&session), &logs).await.unwrap();
    let again = repository.finish(&close(&session), &logs).await;

    assert_matches!(again, Err(StorageError::ConstraintViolation(_)));
    let stored = SetLogRepository::new(&pool)
        .list_for_session(session.session_id)
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[sqlx::test]
#[ignore = "requires DATABASE_URL"]
async fn test_finish_unknown_session_is_not_found(pool: PgPool) {
    let result = WorkoutSessionRepository::new(&pool)
        .finish(
            &SessionClose {
                session_id: Uuid::new_v4(),
                ended_at: Utc::now(),
                duration_minutes: 1,
            },
            &[],
        )
        .await;

    assert_matches!(result, Err(StorageError::NotFound));
}
