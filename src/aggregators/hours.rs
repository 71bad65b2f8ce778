//! Daily-hours reconciliation per equipment
//!
//! Compares the recorded hours of each equipment against the 24-hour
//! expectation, per calendar day. This is a data-completeness check, not
//! a performance metric: unlike every other aggregator it applies NO
//! operator filtering — placeholder rows still represent recorded time.

use crate::config::defaults::EXPECTED_DAY_HOURS;
use crate::types::{round2, DailyHours, EquipmentHoursRecord, TimeSlice};
use std::collections::BTreeMap;

pub fn compute(slices: &[&TimeSlice]) -> Vec<EquipmentHoursRecord> {
    // equipment → (total, date → hours)
    let mut table: BTreeMap<String, (f64, BTreeMap<chrono::NaiveDate, f64>)> = BTreeMap::new();

    for slice in slices {
        let entry = table.entry(slice.equipment.clone()).or_default();
        entry.0 += slice.duration_h;
        if let Some(date) = slice.date {
            *entry.1.entry(date).or_default() += slice.duration_h;
        }
    }

    table
        .into_iter()
        .map(|(equipment, (total, by_day))| {
            let daily: Vec<DailyHours> = by_day
                .into_iter()
                .map(|(date, hours)| {
                    let recorded_h = round2(hours);
                    DailyHours {
                        date,
                        recorded_h,
                        shortfall_h: round2((EXPECTED_DAY_HOURS - recorded_h).max(0.0)),
                    }
                })
                .collect();

            let recorded_h = round2(total);
            let shortfall_24h = if daily.is_empty() {
                round2((EXPECTED_DAY_HOURS - recorded_h).max(0.0))
            } else {
                round2(daily.iter().map(|d| d.shortfall_h).sum())
            };

            EquipmentHoursRecord {
                equipment,
                recorded_h,
                shortfall_24h,
                daily,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn slice(equipment: &str, day: u32, duration: f64, operator: &str) -> TimeSlice {
        TimeSlice {
            equipment: equipment.to_string(),
            operator: operator.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 5, day),
            duration_h: duration,
            ..Default::default()
        }
    }

    #[test]
    fn test_daily_shortfall() {
        let slices = vec![
            slice("7041", 10, 20.0, "450 - Jose"),
            slice("7041", 10, 1.5, "450 - Jose"),
        ];
        let refs: Vec<&TimeSlice> = slices.iter().collect();
        let records = compute(&refs);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].recorded_h, 21.5);
        assert_eq!(records[0].daily.len(), 1);
        assert_eq!(records[0].daily[0].shortfall_h, 2.5);
        assert_eq!(records[0].shortfall_24h, 2.5);
    }

    #[test]
    fn test_multi_day_shortfalls_accumulate() {
        let slices = vec![
            slice("7041", 10, 24.0, "450 - Jose"),
            slice("7041", 11, 18.0, "450 - Jose"),
        ];
        let refs: Vec<&TimeSlice> = slices.iter().collect();
        let records = compute(&refs);
        assert_eq!(records[0].daily.len(), 2);
        assert_eq!(records[0].shortfall_24h, 6.0);
    }

    #[test]
    fn test_placeholder_operator_hours_still_count() {
        // No operator filtering here — shift-change rows are recorded time
        let slices = vec![
            slice("7041", 10, 23.0, "450 - Jose"),
            slice("7041", 10, 1.0, "9999 - TROCA DE TURNO"),
        ];
        let refs: Vec<&TimeSlice> = slices.iter().collect();
        let records = compute(&refs);
        assert_eq!(records[0].recorded_h, 24.0);
        assert_eq!(records[0].shortfall_24h, 0.0);
    }
}
