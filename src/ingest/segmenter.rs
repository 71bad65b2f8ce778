//! Time Segmenter
//!
//! Computes the elapsed duration between consecutive readings of the same
//! equipment and tags each interval with its productivity classification
//! and marker flags. Anomalous gaps are clamped: a negative difference
//! (first record of a series, clock irregularities) and any gap longer
//! than the configured maximum are both zero — sensor dropouts and shift
//! boundaries must not inflate totals.

use crate::config::{ClassRules, EngineTuning};
use crate::types::{round4, EquipmentClass, TelemetryRecord, TimeSlice};
use chrono::NaiveDateTime;

/// Time Segmenter: ordered records → tagged time slices
pub struct TimeSegmenter {
    class: EquipmentClass,
    tuning: EngineTuning,
    rules: ClassRules,
}

impl TimeSegmenter {
    pub fn new(class: EquipmentClass, tuning: EngineTuning, rules: ClassRules) -> Self {
        Self {
            class,
            tuning,
            rules,
        }
    }

    /// Derive time slices from a batch of normalized records.
    ///
    /// Records are sorted by (equipment, date, time); each record
    /// contributes exactly one outgoing slice — the diff to the next
    /// reading of the same equipment. The last reading of every series
    /// has no following reading and yields a zero-duration slice, which
    /// keeps its marker flags available to count-based consumers without
    /// adding hours.
    pub fn segment(&self, records: &[TelemetryRecord]) -> Vec<TimeSlice> {
        let mut ordered: Vec<&TelemetryRecord> = records.iter().collect();
        ordered.sort_by(|a, b| {
            a.equipment
                .cmp(&b.equipment)
                .then(a.date.cmp(&b.date))
                .then(a.time.cmp(&b.time))
        });

        let mut slices = Vec::with_capacity(ordered.len());
        for (i, record) in ordered.iter().enumerate() {
            let next = ordered.get(i + 1).filter(|n| n.equipment == record.equipment);
            let duration_h = match next {
                Some(next) => self.clamped_duration(record, next),
                None => 0.0,
            };
            slices.push(self.build_slice(record, duration_h));
        }
        slices
    }

    /// Hours between two adjacent readings, clamped to `[0, max_slice_hours]`.
    fn clamped_duration(&self, current: &TelemetryRecord, next: &TelemetryRecord) -> f64 {
        let (Some(start), Some(end)) = (stamp(current), stamp(next)) else {
            return 0.0;
        };
        let seconds = (end - start).num_seconds() as f64;
        let hours = seconds / 3600.0;
        if hours < 0.0 || hours > self.tuning.max_slice_hours {
            0.0
        } else {
            round4(hours)
        }
    }

    fn build_slice(&self, record: &TelemetryRecord, duration_h: f64) -> TimeSlice {
        let productive = record.operation_group == self.tuning.productive_group;

        let idle_engine = record.engine_on
            && record.speed == 0.0
            && record.engine_rpm >= self.tuning.idle_rpm_minimum
            && self
                .rules
                .idle_eligible(&record.operation, &record.operation_group);

        let elevator = record.elevator_on && record.cutting_pressure > self.tuning.cutting_pressure_min;
        let rtk_assist = record.rtk && record.field_cruiser;

        let gps_h = if self.class == EquipmentClass::GrainCart
            && record.rtk
            && record.speed > 0.0
            && productive
        {
            duration_h
        } else {
            0.0
        };

        let missing_timesheet = record.engine_on && self.is_missing_timesheet(record);

        TimeSlice {
            equipment: record.equipment.clone(),
            front: record.front_group.clone(),
            front_code: record.front_code.clone(),
            operator: record.operator.clone(),
            date: record.date,
            duration_h,
            productive_h: if productive { duration_h } else { 0.0 },
            operation_group: record.operation_group.clone(),
            state: record.state.clone(),
            engine_on: record.engine_on,
            idle_engine,
            elevator,
            rtk_assist,
            autopilot: record.rtk,
            gps_h,
            missing_timesheet,
            speed: record.speed,
        }
    }

    /// A reading counts as missing-timesheet time when its operation code
    /// matches exactly, by string prefix, or when the free-text operation
    /// description carries the marker.
    fn is_missing_timesheet(&self, record: &TelemetryRecord) -> bool {
        let code = record.operation_code.trim().trim_end_matches(".0");
        code == self.tuning.missing_timesheet_code
            || code.starts_with(&self.tuning.missing_timesheet_code)
            || record
                .operation
                .to_uppercase()
                .contains(&self.tuning.missing_timesheet_text)
    }
}

fn stamp(record: &TelemetryRecord) -> Option<NaiveDateTime> {
    match (record.date, record.time) {
        (Some(date), Some(time)) => Some(date.and_time(time)),
        // Date column missing entirely: fall back to time-of-day ordering
        (None, Some(time)) => chrono::NaiveDate::from_ymd_opt(1970, 1, 1).map(|d| d.and_time(time)),
        _ => None,
    }
}
