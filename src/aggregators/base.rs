//! Per-(equipment, crew, operator) rollup
//!
//! The shared accumulation table every per-operator formula reads
//! (the legacy pipeline's "Base Calculo" sheet). Sums are held at
//! 4-decimal precision; presentation rounding happens at assembly.

use crate::types::{round4, TimeSlice};
use serde::Serialize;
use std::collections::BTreeMap;

/// Accumulated hours for one (equipment, crew, operator) combination
#[derive(Debug, Clone, Default, Serialize)]
pub struct BaseRollup {
    pub equipment: String,
    pub front: String,
    pub operator: String,
    pub total_h: f64,
    pub productive_h: f64,
    pub engine_on_h: f64,
    pub idle_h: f64,
    pub elevator_h: f64,
    pub rtk_h: f64,
    pub gps_h: f64,
    pub missing_timesheet_h: f64,
}

/// Build rollups from reconciled slices.
///
/// Callers pass slices already filtered for valid operators and excluded
/// equipment; this function only accumulates. Output order is
/// deterministic (sorted by key).
pub fn build_rollups(slices: &[&TimeSlice]) -> Vec<BaseRollup> {
    let mut table: BTreeMap<(String, String, String), BaseRollup> = BTreeMap::new();

    for slice in slices {
        let key = (
            slice.equipment.clone(),
            slice.front.clone(),
            slice.operator.clone(),
        );
        let entry = table.entry(key).or_insert_with(|| BaseRollup {
            equipment: slice.equipment.clone(),
            front: slice.front.clone(),
            operator: slice.operator.clone(),
            ..Default::default()
        });

        entry.total_h += slice.duration_h;
        entry.productive_h += slice.productive_h;
        entry.engine_on_h += slice.engine_on_h();
        entry.idle_h += slice.idle_h();
        entry.elevator_h += slice.elevator_h();
        entry.rtk_h += slice.rtk_h();
        entry.gps_h += slice.gps_h;
        entry.missing_timesheet_h += slice.missing_timesheet_h();
    }

    table
        .into_values()
        .map(|mut rollup| {
            rollup.total_h = round4(rollup.total_h);
            rollup.productive_h = round4(rollup.productive_h);
            rollup.engine_on_h = round4(rollup.engine_on_h);
            rollup.idle_h = round4(rollup.idle_h);
            rollup.elevator_h = round4(rollup.elevator_h);
            rollup.rtk_h = round4(rollup.rtk_h);
            rollup.gps_h = round4(rollup.gps_h);
            rollup.missing_timesheet_h = round4(rollup.missing_timesheet_h);
            rollup
        })
        .collect()
}

/// Sum a rollup field per (operator, front), preserving 4-decimal
/// precision. The common grouping step of the per-operator aggregators.
pub fn sum_by_operator<F>(rollups: &[BaseRollup], field: F) -> BTreeMap<(String, String), f64>
where
    F: Fn(&BaseRollup) -> f64,
{
    let mut sums: BTreeMap<(String, String), f64> = BTreeMap::new();
    for rollup in rollups {
        *sums
            .entry((rollup.operator.clone(), rollup.front.clone()))
            .or_default() += field(rollup);
    }
    for value in sums.values_mut() {
        *value = round4(*value);
    }
    sums
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(equipment: &str, operator: &str, duration: f64, engine_on: bool) -> TimeSlice {
        TimeSlice {
            equipment: equipment.to_string(),
            front: "Frente 1".to_string(),
            operator: operator.to_string(),
            duration_h: duration,
            engine_on,
            ..Default::default()
        }
    }

    #[test]
    fn test_rollup_accumulates_per_combination() {
        let slices = vec![
            slice("7041", "450 - Jose", 0.1, true),
            slice("7041", "450 - Jose", 0.2, false),
            slice("7042", "450 - Jose", 0.3, true),
        ];
        let refs: Vec<&TimeSlice> = slices.iter().collect();
        let rollups = build_rollups(&refs);

        assert_eq!(rollups.len(), 2);
        let first = &rollups[0];
        assert_eq!(first.equipment, "7041");
        assert!((first.total_h - 0.3).abs() < 1e-9);
        assert!((first.engine_on_h - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_sum_by_operator_merges_equipment() {
        let slices = vec![
            slice("7041", "450 - Jose", 0.1, true),
            slice("7042", "450 - Jose", 0.3, true),
        ];
        let refs: Vec<&TimeSlice> = slices.iter().collect();
        let rollups = build_rollups(&refs);
        let sums = sum_by_operator(&rollups, |r| r.total_h);
        assert_eq!(sums.len(), 1);
        let total = sums[&("450 - Jose".to_string(), "Frente 1".to_string())];
        assert!((total - 0.4).abs() < 1e-9);
    }
}
