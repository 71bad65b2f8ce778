//! Energy efficiency per (operator, crew)
//!
//! The definition differs by equipment class and both variants are kept
//! deliberately distinct: harvesters measure elevator-active hours
//! against engine-on hours, carts measure productive hours against total
//! hours. Both are capped at 100% — sensor noise can push the numerator
//! past its denominator and must not surface as >100%.

use super::base::{sum_by_operator, BaseRollup};
use crate::types::{EfficiencyRecord, EquipmentClass, MetricValue};

pub fn compute(rollups: &[BaseRollup], class: EquipmentClass) -> Vec<EfficiencyRecord> {
    let (numerators, denominators) = match class {
        EquipmentClass::Harvester => (
            sum_by_operator(rollups, |r| r.elevator_h),
            sum_by_operator(rollups, |r| r.engine_on_h),
        ),
        EquipmentClass::GrainCart => (
            sum_by_operator(rollups, |r| r.productive_h),
            sum_by_operator(rollups, |r| r.total_h),
        ),
    };

    numerators
        .into_iter()
        .map(|((operator, front), numerator)| {
            let denominator = denominators
                .get(&(operator.clone(), front.clone()))
                .copied()
                .unwrap_or(0.0);
            EfficiencyRecord {
                operator,
                front,
                efficiency: MetricValue::ratio_capped(numerator, denominator),
            }
        })
        .collect()
}
