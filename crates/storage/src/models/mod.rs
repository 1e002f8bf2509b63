mod exercise;
mod plan;
mod set_log;
mod user;
mod workout_session;

pub use exercise::{EXERCISE_CATEGORIES, Exercise};
pub use plan::{
    DEFAULT_REST_SECONDS, DEFAULT_TARGET_REPS, DEFAULT_TARGET_SETS, PlanField, PlannedExercise,
    SessionPlan, SetProgress,
};
pub use set_log::{MAX_STORED_WEIGHT, NewSetLog, SetLog, WEIGHT_SCALE, check_weight};
pub use user::{Identity, NewUser, User};
pub use workout_session::{NewWorkoutSession, SessionClose, WorkoutSession};
