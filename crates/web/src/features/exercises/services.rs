use storage::{WorkoutStore, error::Result, models::Exercise};
use uuid::Uuid;

/// Search the exercise library by name and category
pub async fn list_exercises<S>(
    store: &S,
    search: Option<&str>,
    category: Option<&str>,
) -> Result<Vec<Exercise>>
where
    S: WorkoutStore + ?Sized,
{
    store.search_exercises(search, category).await
}

pub async fn get_exercise<S>(store: &S, id: Uuid) -> Result<Exercise>
where
    S: WorkoutStore + ?Sized,
{
    store.find_exercise(id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Utc;
    use storage::{MemoryStore, StorageError};

    fn deadlift() -> Exercise {
        Exercise {
            exercise_id: Uuid::new_v4(),
            name: "Deadlift".to_string(),
            category: "back".to_string(),
            description: Some("Barbell pull from the floor".to_string()),
            muscle_groups: vec!["back".to_string(), "legs".to_string()],
            is_default: true,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_get_exercise_by_id() {
        let exercise = deadlift();
        let store = MemoryStore::with_exercises(vec![exercise.clone()]);

        let found = get_exercise(&store, exercise.exercise_id).await.unwrap();
        assert_eq!(found.name, "Deadlift");

        let missing = get_exercise(&store, Uuid::new_v4()).await;
        assert_matches!(missing, Err(StorageError::NotFound));
    }

    #[tokio::test]
    async fn test_category_filter() {
        let store = MemoryStore::with_exercises(vec![deadlift()]);

        assert_eq!(list_exercises(&store, None, Some("back")).await.unwrap().len(), 1);
        assert!(list_exercises(&store, None, Some("legs")).await.unwrap().is_empty());
    }
}
