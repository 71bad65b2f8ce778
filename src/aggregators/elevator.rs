//! Elevator hours per (operator, crew) — harvesters only

use super::base::{sum_by_operator, BaseRollup};
use crate::types::ElevatorHoursRecord;

/// Absolute elevator-active hours per operator.
pub fn compute(rollups: &[BaseRollup]) -> Vec<ElevatorHoursRecord> {
    sum_by_operator(rollups, |r| r.elevator_h)
        .into_iter()
        .map(|((operator, front), hours)| ElevatorHoursRecord {
            operator,
            front,
            hours,
        })
        .collect()
}
