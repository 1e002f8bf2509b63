//! Progressive-overload suggestion derived from the last logged set.

use rust_decimal::Decimal;

use crate::models::{DEFAULT_TARGET_REPS, SetLog};

/// Load added on top of the last logged weight: 2.5 kg.
pub const WEIGHT_INCREMENT: Decimal = Decimal::from_parts(25, 0, 0, false, 1);

/// Starting point for a planned exercise, read from the user's history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progression {
    pub last_weight: Option<Decimal>,
    pub suggested_weight: Option<Decimal>,
    pub target_reps: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            last_weight: None,
            suggested_weight: None,
            target_reps: DEFAULT_TARGET_REPS,
        }
    }
}

/// `last_weight + 2.5` for a positive weight, nothing otherwise.
pub fn suggest_weight(last_weight: Decimal) -> Option<Decimal> {
    (last_weight > Decimal::ZERO).then(|| last_weight + WEIGHT_INCREMENT)
}

pub fn from_last_log(last_log: Option<&SetLog>) -> Progression {
    let Some(log) = last_log else {
        return Progression::default();
    };

    let target_reps = u32::try_from(log.reps)
        .ok()
        .filter(|reps| *reps > 0)
        .unwrap_or(DEFAULT_TARGET_REPS);

    Progression {
        last_weight: Some(log.weight),
        suggested_weight: suggest_weight(log.weight),
        target_reps,
    }
}
