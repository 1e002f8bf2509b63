use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::{check_weight, PlanField, PlannedExercise, SessionPlan, SetLog, WorkoutSession};
use crate::services::composer::WorkoutComposer;
use crate::services::runner::{ExerciseProgress, SessionRunner, WorkoutSummary};

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateDraftRequest {
    #[validate(length(max = 255))]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DraftResponse {
    pub draft_id: Uuid,
    pub name: Option<String>,
    pub exercises: Vec<PlannedExercise>,
}

impl DraftResponse {
    pub fn new(draft_id: Uuid, composer: &WorkoutComposer) -> Self {
        Self {
            draft_id,
            name: composer.name().map(str::to_string),
            exercises: composer.exercises().to_vec(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AddExerciseRequest {
    pub exercise_id: Uuid,
}

/// Raw value typed by the user; numbers and text are both accepted.
#[derive(Debug, Clone, PartialEq, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum FieldValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_raw(&self) -> String {
        match self {
            Self::Integer(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Text(v) => v.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdatePlanFieldRequest {
    pub field: PlanField,
    pub value: FieldValue,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct StartWorkoutRequest {
    #[validate(custom(function = "validate_body_weight"))]
    pub body_weight: Option<Decimal>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StartWorkoutResponse {
    pub session: WorkoutSession,
    pub plan: SessionPlan,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpdateSetRequest {
    #[validate(range(max = 1000, message = "Reps must be at most 1000"))]
    pub reps: u32,

    #[validate(custom(function = "validate_set_weight"))]
    pub weight: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct FinishWorkoutRequest {
    /// Required when no set was completed
    #[serde(default)]
    pub confirm_empty: bool,
}

/// Snapshot of a running session
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActiveSessionResponse {
    pub session: WorkoutSession,
    pub exercises: Vec<ExerciseProgress>,
    pub current_exercise_index: usize,
    pub is_resting: bool,
    pub rest_time_left: u32,
    pub completed_sets: usize,
    pub total_sets: usize,
}

impl From<&SessionRunner> for ActiveSessionResponse {
    fn from(runner: &SessionRunner) -> Self {
        Self {
            session: runner.session().clone(),
            exercises: runner.exercises().to_vec(),
            current_exercise_index: runner.current_exercise_index(),
            is_resting: runner.is_resting(),
            rest_time_left: runner.rest_time_left(),
            completed_sets: runner.completed_sets(),
            total_sets: runner.total_sets(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct FinishWorkoutResponse {
    pub session_id: Uuid,
    pub duration_minutes: i32,
    pub completed_sets: usize,
    pub total_volume: Decimal,
}

impl From<WorkoutSummary> for FinishWorkoutResponse {
    fn from(summary: WorkoutSummary) -> Self {
        Self {
            session_id: summary.session.session_id,
            duration_minutes: summary.duration_minutes,
            completed_sets: summary.completed_sets,
            total_volume: summary.total_volume,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionDetailResponse {
    pub session: WorkoutSession,
    pub set_logs: Vec<SetLog>,
}

const MAX_WEIGHT_KG: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

fn validate_body_weight(weight: &Decimal) -> Result<(), validator::ValidationError> {
    if *weight > Decimal::ZERO && *weight <= MAX_WEIGHT_KG && check_weight(*weight).is_ok() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_body_weight"))
    }
}

fn validate_set_weight(weight: &Decimal) -> Result<(), validator::ValidationError> {
    if *weight <= MAX_WEIGHT_KG && check_weight(*weight).is_ok() {
        Ok(())
    } else {
        Err(validator::ValidationError::new("invalid_weight"))
    }
}
