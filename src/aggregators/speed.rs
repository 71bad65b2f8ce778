//! Time-weighted average speed per (operator, crew)

use crate::config::EngineTuning;
use crate::types::{round2, AverageSpeedRecord, TimeSlice};
use std::collections::BTreeMap;

/// Average ground speed over productive and displacement records.
///
/// Weighted by slice duration; operators whose slices carry no usable
/// movement records report zero rather than disappearing.
pub fn compute(slices: &[&TimeSlice], tuning: &EngineTuning) -> Vec<AverageSpeedRecord> {
    #[derive(Default)]
    struct Acc {
        weighted: f64,
        weight: f64,
        plain_sum: f64,
        plain_count: usize,
    }

    let mut all_operators: BTreeMap<(String, String), Acc> = BTreeMap::new();

    for slice in slices {
        let key = (slice.operator.clone(), slice.front.clone());
        let acc = all_operators.entry(key).or_default();

        let moving = slice.operation_group == tuning.productive_group
            || slice.state == "DESLOCAMENTO"
            || (slice.speed > 0.0 && slice.state != "PARADO");
        if !moving {
            continue;
        }
        acc.weighted += slice.speed * slice.duration_h;
        acc.weight += slice.duration_h;
        acc.plain_sum += slice.speed;
        acc.plain_count += 1;
    }

    all_operators
        .into_iter()
        .map(|((operator, front), acc)| {
            let speed = if acc.weight > 0.0 {
                acc.weighted / acc.weight
            } else if acc.plain_count > 0 {
                acc.plain_sum / acc.plain_count as f64
            } else {
                0.0
            };
            AverageSpeedRecord {
                operator,
                front,
                speed: round2(speed),
            }
        })
        .collect()
}
