//! GPS / auto-pilot usage per (operator, crew)
//!
//! Carts carry a precomputed GPS-hours marker (auto-pilot + moving +
//! productive) measured against productive hours. Harvesters measure
//! auto-pilot-while-moving time against hours spent in the working
//! states, straight from the slices.

use super::base::{sum_by_operator, BaseRollup};
use crate::config::EngineTuning;
use crate::types::{round4, EquipmentClass, GpsUsageRecord, MetricValue, TimeSlice};
use std::collections::BTreeMap;

pub fn compute(
    rollups: &[BaseRollup],
    slices: &[&TimeSlice],
    class: EquipmentClass,
    tuning: &EngineTuning,
) -> Vec<GpsUsageRecord> {
    match class {
        EquipmentClass::GrainCart => cart_usage(rollups),
        EquipmentClass::Harvester => harvester_usage(slices, tuning),
    }
}

fn cart_usage(rollups: &[BaseRollup]) -> Vec<GpsUsageRecord> {
    let gps = sum_by_operator(rollups, |r| r.gps_h);
    let productive = sum_by_operator(rollups, |r| r.productive_h);

    productive
        .into_iter()
        .map(|((operator, front), productive_h)| {
            let gps_h = gps
                .get(&(operator.clone(), front.clone()))
                .copied()
                .unwrap_or(0.0);
            GpsUsageRecord {
                operator,
                front,
                ratio: MetricValue::ratio_capped(gps_h, productive_h),
            }
        })
        .collect()
}

fn harvester_usage(slices: &[&TimeSlice], tuning: &EngineTuning) -> Vec<GpsUsageRecord> {
    // (working hours, gps-active hours) per (operator, front)
    let mut sums: BTreeMap<(String, String), (f64, f64)> = BTreeMap::new();

    for slice in slices {
        let working = tuning.working_states.iter().any(|s| *s == slice.state);
        if !working {
            continue;
        }
        let entry = sums
            .entry((slice.operator.clone(), slice.front.clone()))
            .or_default();
        entry.0 += slice.duration_h;
        if slice.autopilot && slice.speed > 0.0 {
            entry.1 += slice.duration_h;
        }
    }

    sums.into_iter()
        .map(|((operator, front), (working_h, active_h))| GpsUsageRecord {
            operator,
            front,
            ratio: MetricValue::ratio_capped(round4(active_h), round4(working_h)),
        })
        .collect()
}
