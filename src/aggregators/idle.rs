//! Idle-engine ratio per (operator, crew)

use super::base::{sum_by_operator, BaseRollup};
use crate::types::{IdleEngineRecord, MetricValue};

/// Idle ratio = idle-with-engine-on hours / engine-on hours. The raw
/// numerator and denominator are exposed alongside the ratio — downstream
/// consumers chart the absolute hours too.
pub fn compute(rollups: &[BaseRollup]) -> Vec<IdleEngineRecord> {
    let idle = sum_by_operator(rollups, |r| r.idle_h);
    let engine_on = sum_by_operator(rollups, |r| r.engine_on_h);

    engine_on
        .into_iter()
        .map(|((operator, front), engine_on_h)| {
            let idle_h = idle
                .get(&(operator.clone(), front.clone()))
                .copied()
                .unwrap_or(0.0);
            IdleEngineRecord {
                operator,
                front,
                ratio: MetricValue::ratio(idle_h, engine_on_h),
                engine_on_h,
                idle_h,
            }
        })
        .collect()
}
