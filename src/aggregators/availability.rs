//! Mechanical availability per equipment

use crate::config::EngineTuning;
use crate::types::{round4, AvailabilityRecord, MetricValue, TimeSlice};
use std::collections::BTreeMap;

/// Availability = (total hours − maintenance-group hours) / total hours.
///
/// Grouped per equipment; slices from the shift-change placeholder are
/// already filtered out upstream.
pub fn compute(slices: &[&TimeSlice], tuning: &EngineTuning) -> Vec<AvailabilityRecord> {
    let mut totals: BTreeMap<String, (f64, f64)> = BTreeMap::new();

    for slice in slices {
        let entry = totals.entry(slice.equipment.clone()).or_default();
        entry.0 += slice.duration_h;
        if slice.operation_group == tuning.maintenance_group {
            entry.1 += slice.duration_h;
        }
    }

    totals
        .into_iter()
        .map(|(equipment, (total, maintenance))| {
            let total = round4(total);
            let maintenance = round4(maintenance);
            AvailabilityRecord {
                equipment,
                availability: MetricValue::ratio(total - maintenance, total),
                total_h: total,
                maintenance_h: maintenance,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slice(equipment: &str, duration: f64, group: &str) -> TimeSlice {
        TimeSlice {
            equipment: equipment.to_string(),
            operation_group: group.to_string(),
            duration_h: duration,
            ..Default::default()
        }
    }

    #[test]
    fn test_availability_excludes_maintenance() {
        let slices = vec![
            slice("7041", 8.0, "Produtiva"),
            slice("7041", 2.0, "Manutenção"),
        ];
        let refs: Vec<&TimeSlice> = slices.iter().collect();
        let records = compute(&refs, &EngineTuning::default());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].availability.value, 0.8);
        assert_eq!(records[0].total_h, 10.0);
        assert_eq!(records[0].maintenance_h, 2.0);
    }

    #[test]
    fn test_zero_hours_yields_zero_ratio() {
        let slices = vec![slice("7041", 0.0, "Produtiva")];
        let refs: Vec<&TimeSlice> = slices.iter().collect();
        let records = compute(&refs, &EngineTuning::default());
        assert_eq!(records[0].availability.value, 0.0);
    }
}
