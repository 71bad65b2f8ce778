//! Metric Aggregators
//!
//! One aggregator per performance indicator, all consuming normalized,
//! segmented, reconciled time slices. Per-operator aggregators exclude
//! placeholder operator rows; the daily-hours reconciliation deliberately
//! does not. Equipment ids blacklisted in the calculation-rule registry
//! are dropped before any aggregation.

mod availability;
mod base;
mod elevator;
mod energy;
mod gps;
mod hours;
mod idle;
mod speed;
mod timesheet;

pub use base::{build_rollups, sum_by_operator, BaseRollup};

use crate::config::{ClassRules, EngineConfig, EngineTuning};
use crate::operators::is_valid_token;
use crate::types::{
    AvailabilityRecord, AverageSpeedRecord, EfficiencyRecord, ElevatorHoursRecord,
    EquipmentClass, EquipmentHoursRecord, GpsUsageRecord, IdleEngineRecord,
    MissingTimesheetRecord, TimeSlice,
};
use tracing::debug;

/// Output of a full aggregation pass over one batch of slices
#[derive(Debug, Clone, Default)]
pub struct MetricSet {
    pub availability: Vec<AvailabilityRecord>,
    pub efficiency: Vec<EfficiencyRecord>,
    pub idle: Vec<IdleEngineRecord>,
    pub gps: Vec<GpsUsageRecord>,
    pub elevator: Vec<ElevatorHoursRecord>,
    pub missing_timesheet: Vec<MissingTimesheetRecord>,
    pub speed: Vec<AverageSpeedRecord>,
    pub hours: Vec<EquipmentHoursRecord>,
}

/// Aggregation entry point for one equipment class
pub struct Aggregator {
    class: EquipmentClass,
    tuning: EngineTuning,
    rules: ClassRules,
}

impl Aggregator {
    pub fn new(class: EquipmentClass, config: &EngineConfig) -> Self {
        Self {
            class,
            tuning: config.engine.clone(),
            rules: config.calc_rules.for_class(class).clone(),
        }
    }

    /// Run every applicable aggregator over a batch of reconciled slices.
    pub fn aggregate(&self, slices: &[TimeSlice]) -> MetricSet {
        // Blacklisted equipment disappears from every metric
        let kept: Vec<&TimeSlice> = slices
            .iter()
            .filter(|s| !self.rules.equipment_excluded(&s.equipment))
            .collect();

        // Per-operator metrics additionally exclude placeholder operators
        let attributed: Vec<&TimeSlice> = kept
            .iter()
            .copied()
            .filter(|s| is_valid_token(&s.operator))
            .collect();

        debug!(
            class = %self.class,
            slices = slices.len(),
            kept = kept.len(),
            attributed = attributed.len(),
            "Aggregating batch"
        );

        let rollups = build_rollups(&attributed);

        MetricSet {
            availability: availability::compute(&attributed, &self.tuning),
            efficiency: energy::compute(&rollups, self.class),
            idle: idle::compute(&rollups),
            gps: gps::compute(&rollups, &attributed, self.class, &self.tuning),
            elevator: match self.class {
                EquipmentClass::Harvester => elevator::compute(&rollups),
                EquipmentClass::GrainCart => Vec::new(),
            },
            missing_timesheet: match self.class {
                EquipmentClass::GrainCart => timesheet::compute(&rollups),
                EquipmentClass::Harvester => Vec::new(),
            },
            speed: speed::compute(&attributed, &self.tuning),
            // Completeness check runs over the unattributed batch
            hours: hours::compute(&kept),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(equipment: &str, operator: &str, duration: f64) -> TimeSlice {
        TimeSlice {
            equipment: equipment.to_string(),
            front: "Frente 1".to_string(),
            operator: operator.to_string(),
            duration_h: duration,
            productive_h: duration,
            operation_group: "Produtiva".to_string(),
            engine_on: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_placeholder_excluded_from_metrics_but_not_hours() {
        let config = EngineConfig::default();
        let aggregator = Aggregator::new(EquipmentClass::GrainCart, &config);
        let slices = vec![
            slice("6127", "777 - Maria", 0.4),
            slice("6127", "9999 - TROCA DE TURNO", 0.1),
        ];
        let set = aggregator.aggregate(&slices);

        assert_eq!(set.efficiency.len(), 1);
        assert_eq!(set.efficiency[0].operator, "777 - Maria");
        // Hours reconciliation counts the placeholder row too
        assert_eq!(set.hours.len(), 1);
        assert!((set.hours[0].recorded_h - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_excluded_equipment_dropped_everywhere() {
        let mut config = EngineConfig::default();
        config.calc_rules.tr.excluded_equipment.push("6127".to_string());
        let aggregator = Aggregator::new(EquipmentClass::GrainCart, &config);
        let slices = vec![
            slice("6127", "777 - Maria", 0.4),
            slice("6200", "777 - Maria", 0.2),
        ];
        let set = aggregator.aggregate(&slices);
        assert_eq!(set.availability.len(), 1);
        assert_eq!(set.availability[0].equipment, "6200");
        assert_eq!(set.hours.len(), 1);
    }

    #[test]
    fn test_class_specific_sections() {
        let config = EngineConfig::default();
        let slices = vec![slice("7041", "450 - Jose", 0.4)];

        let harvester_set = Aggregator::new(EquipmentClass::Harvester, &config).aggregate(&slices);
        assert!(harvester_set.missing_timesheet.is_empty());

        let cart_set = Aggregator::new(EquipmentClass::GrainCart, &config).aggregate(&slices);
        assert!(cart_set.elevator.is_empty());
        assert_eq!(cart_set.missing_timesheet.len(), 1);
    }
}
