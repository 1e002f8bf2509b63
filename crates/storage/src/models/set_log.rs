use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ValidationFailure;

/// Decimal places kept by the `NUMERIC(6, 2)` weight columns.
pub const WEIGHT_SCALE: u32 = 2;

/// Largest value a `NUMERIC(6, 2)` weight column holds.
pub const MAX_STORED_WEIGHT: Decimal = Decimal::from_parts(999_999, 0, 0, false, WEIGHT_SCALE);

/// Accepts a weight only if the database stores it exactly as entered.
///
/// Trailing zeros do not count towards the scale, so `42.500` passes.
pub fn check_weight(weight: Decimal) -> Result<(), ValidationFailure> {
    if weight.is_sign_negative() && !weight.is_zero() {
        return Err(ValidationFailure::NegativeWeight);
    }
    if weight.normalize().scale() > WEIGHT_SCALE {
        return Err(ValidationFailure::WeightPrecision);
    }
    if weight > MAX_STORED_WEIGHT {
        return Err(ValidationFailure::WeightTooLarge);
    }
    Ok(())
}

/// Durable record of one completed set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct SetLog {
    pub set_log_id: Uuid,
    pub session_id: Uuid,
    pub exercise_id: Uuid,
    pub set_number: i16,
    pub reps: i32,
    pub weight: Decimal,
    pub rest_seconds: i32,
    pub rpe: Option<i16>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSetLog {
    pub session_id: Uuid,
    pub exercise_id: Uuid,
    pub set_number: i16,
    pub reps: i32,
    pub weight: Decimal,
    pub rest_seconds: i32,
}
