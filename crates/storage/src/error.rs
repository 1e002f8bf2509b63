use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }
}

/// Input the user can fix and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("Add at least one exercise before starting the workout")]
    EmptyPlan,

    #[error("Enter a weight before completing set {set_number}")]
    ZeroWeight { set_number: u16 },

    #[error("Weight cannot be negative")]
    NegativeWeight,

    #[error("Weight can have at most 2 decimal places")]
    WeightPrecision,

    #[error("Weight must be at most 9999.99")]
    WeightTooLarge,

    #[error("Body weight must be positive")]
    InvalidBodyWeight,

    #[error("Exercise index {index} is out of range (plan has {len} exercises)")]
    ExerciseIndexOutOfRange { index: usize, len: usize },

    #[error("Set index {index} is out of range (exercise has {len} sets)")]
    SetIndexOutOfRange { index: usize, len: usize },

    #[error("Set {set_number} is already completed")]
    SetAlreadyCompleted { set_number: u16 },

    #[error("Workout session belongs to another user")]
    ForeignSession,

    #[error("Workout session has no exercises")]
    EmptySession,
}

#[derive(Debug, Error)]
pub enum WorkoutError {
    #[error("{0}")]
    Validation(#[from] ValidationFailure),

    #[error("No sets were completed. Confirm to finish the workout anyway")]
    ConfirmationRequired,

    #[error("Could not save workout: {0}")]
    Persistence(#[source] StorageError),

    #[error("Workout session is already closed")]
    SessionClosed,
}

pub type WorkoutResult<T> = std::result::Result<T, WorkoutError>;
