//! Missing-timesheet ratio per (operator, crew) — grain carts only

use super::base::{sum_by_operator, BaseRollup};
use crate::types::{MetricValue, MissingTimesheetRecord};

/// Ratio of engine-on hours flagged with the missing-timesheet operation
/// code over total engine-on hours.
pub fn compute(rollups: &[BaseRollup]) -> Vec<MissingTimesheetRecord> {
    let flagged = sum_by_operator(rollups, |r| r.missing_timesheet_h);
    let engine_on = sum_by_operator(rollups, |r| r.engine_on_h);

    engine_on
        .into_iter()
        .map(|((operator, front), engine_on_h)| {
            let flagged_h = flagged
                .get(&(operator.clone(), front.clone()))
                .copied()
                .unwrap_or(0.0);
            MissingTimesheetRecord {
                operator,
                front,
                ratio: MetricValue::ratio(flagged_h, engine_on_h),
            }
        })
        .collect()
}
