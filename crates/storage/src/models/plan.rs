use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_TARGET_SETS: u16 = 3;
pub const DEFAULT_TARGET_REPS: u32 = 10;
pub const DEFAULT_REST_SECONDS: u32 = 90;

/// One exercise of a workout plan, with its targets.
///
/// `exercise_id` and `exercise_name` are fixed when the entry is created;
/// only the numeric targets change afterwards, through [`PlanField`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlannedExercise {
    exercise_id: Uuid,
    exercise_name: String,
    pub target_sets: u16,
    pub target_reps: u32,
    pub rest_seconds: u32,
    pub last_weight: Option<Decimal>,
    pub suggested_weight: Option<Decimal>,
}

impl PlannedExercise {
    /// Entry with default targets and no weight suggestion.
    pub fn new(exercise_id: Uuid, exercise_name: impl Into<String>) -> Self {
        Self {
            exercise_id,
            exercise_name: exercise_name.into(),
            target_sets: DEFAULT_TARGET_SETS,
            target_reps: DEFAULT_TARGET_REPS,
            rest_seconds: DEFAULT_REST_SECONDS,
            last_weight: None,
            suggested_weight: None,
        }
    }

    pub fn exercise_id(&self) -> Uuid {
        self.exercise_id
    }

    pub fn exercise_name(&self) -> &str {
        &self.exercise_name
    }

    /// Applies raw user input to one editable field. Returns the stored value.
    pub fn set_field(&mut self, field: PlanField, raw: &str) -> u32 {
        let value = field.coerce(raw);
        match field {
            PlanField::TargetSets => self.target_sets = value as u16,
            PlanField::TargetReps => self.target_reps = value,
            PlanField::RestSeconds => self.rest_seconds = value,
        }
        value
    }

    /// Fresh set list for the runner, one entry per target set. Weights start
    /// empty so every set needs an explicit entry before completion.
    pub fn initial_sets(&self) -> Vec<SetProgress> {
        (1..=self.target_sets)
            .map(|set_number| SetProgress {
                set_number,
                reps: self.target_reps,
                weight: Decimal::ZERO,
                completed: false,
            })
            .collect()
    }
}

/// Numeric fields of a [`PlannedExercise`] editable before the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlanField {
    TargetSets,
    TargetReps,
    RestSeconds,
}

impl PlanField {
    pub fn floor(self) -> u32 {
        match self {
            Self::TargetSets | Self::TargetReps => 1,
            Self::RestSeconds => 0,
        }
    }

    pub fn ceiling(self) -> u32 {
        match self {
            Self::TargetSets => 20,
            Self::TargetReps => 100,
            Self::RestSeconds => 600,
        }
    }

    /// Parses raw input, coercing empty or invalid text to the floor and
    /// clamping into `[floor, ceiling]`.
    pub fn coerce(self, raw: &str) -> u32 {
        let parsed = raw
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| raw.trim().parse::<f64>().ok().map(|v| v.trunc() as i64));

        match parsed {
            Some(v) => v.clamp(self.floor() as i64, self.ceiling() as i64) as u32,
            None => self.floor(),
        }
    }
}

/// Ordered workout plan, handed from the composer to the runner by value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct SessionPlan(Vec<PlannedExercise>);

impl SessionPlan {
    pub fn new(exercises: Vec<PlannedExercise>) -> Self {
        Self(exercises)
    }

    pub fn exercises(&self) -> &[PlannedExercise] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> Vec<PlannedExercise> {
        self.0
    }
}

/// Progress of one set inside a running session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SetProgress {
    pub set_number: u16,
    pub reps: u32,
    pub weight: Decimal,
    pub completed: bool,
}

impl SetProgress {
    pub fn volume(&self) -> Decimal {
        Decimal::from(self.reps) * self.weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_empty_uses_floor() {
        assert_eq!(PlanField::TargetSets.coerce(""), 1);
        assert_eq!(PlanField::TargetReps.coerce("   "), 1);
        assert_eq!(PlanField::RestSeconds.coerce(""), 0);
    }

    #[test]
    fn test_coerce_invalid_and_negative() {
        assert_eq!(PlanField::TargetReps.coerce("ten"), 1);
        assert_eq!(PlanField::TargetSets.coerce("-4"), 1);
        assert_eq!(PlanField::RestSeconds.coerce("-30"), 0);
    }

    #[test]
    fn test_coerce_clamps_to_ceiling() {
        assert_eq!(PlanField::TargetSets.coerce("99"), 20);
        assert_eq!(PlanField::RestSeconds.coerce("3600"), 600);
    }

    #[test]
    fn test_coerce_truncates_decimals() {
        assert_eq!(PlanField::TargetReps.coerce("8.7"), 8);
        assert_eq!(PlanField::RestSeconds.coerce(" 120 "), 120);
    }

    #[test]
    fn test_initial_sets_follow_targets() {
        let mut planned = PlannedExercise::new(Uuid::new_v4(), "Bench Press");
        planned.target_sets = 4;
        planned.target_reps = 6;
        planned.suggested_weight = Some(Decimal::new(625, 1));

        let sets = planned.initial_sets();
        assert_eq!(sets.len(), 4);
        assert_eq!(sets[0].set_number, 1);
        assert_eq!(sets[3].set_number, 4);
        assert!(sets.iter().all(|s| s.reps == 6 && !s.completed));
        assert!(sets.iter().all(|s| s.weight.is_zero()));
    }

    #[test]
    fn test_default_targets() {
        let planned = PlannedExercise::new(Uuid::new_v4(), "Deadlift");
        assert_eq!(planned.initial_sets().len(), DEFAULT_TARGET_SETS as usize);
        assert_eq!(planned.target_reps, DEFAULT_TARGET_REPS);
        assert_eq!(planned.rest_seconds, DEFAULT_REST_SECONDS);
        assert!(planned.suggested_weight.is_none());
    }
}
