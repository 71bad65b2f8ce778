//! Time slices: elapsed-duration intervals between consecutive readings

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One interval between two temporally-adjacent readings of the same
/// equipment.
///
/// Derived by the segmenter; carries the duration plus every boolean
/// marker the aggregators need, so downstream stages never re-read the
/// raw records. Invariant: `0.0 <= duration_h <= 0.5` (anomalous gaps are
/// clamped to zero at segmentation time).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TimeSlice {
    /// Equipment/fleet id
    pub equipment: String,
    /// Crew/front group label
    pub front: String,
    /// Operator-typed front code of the opening record
    pub front_code: String,
    /// Operator token (reconciled to the canonical id before aggregation)
    pub operator: String,
    /// Calendar date the interval started on
    pub date: Option<NaiveDate>,
    /// Elapsed hours to the next reading, 4-decimal precision
    pub duration_h: f64,
    /// Hours counted as productive (duration iff productive group)
    pub productive_h: f64,
    /// Operation group of the opening record (availability uses this)
    pub operation_group: String,
    /// Free-text state of the opening record (harvester GPS usage uses this)
    pub state: String,
    /// Engine running during the slice
    pub engine_on: bool,
    /// Stationary with engine above minimum RPM
    pub idle_engine: bool,
    /// Harvester: elevator running under cutting pressure
    pub elevator: bool,
    /// Harvester: RTK assist active (auto-pilot + field cruiser)
    pub rtk_assist: bool,
    /// Raw auto-pilot flag of the opening record
    pub autopilot: bool,
    /// Grain cart: GPS-active hours (duration when auto-pilot + moving + productive)
    pub gps_h: f64,
    /// Grain cart: reading carries the missing-timesheet operation code
    pub missing_timesheet: bool,
    /// Ground speed of the opening record (average-speed aggregation)
    pub speed: f64,
}

impl TimeSlice {
    /// Whether this slice belongs to a crew/front selection (same
    /// matching variants as [`crate::types::TelemetryRecord::matches_front`])
    pub fn matches_front(&self, front: &str) -> bool {
        let group = self.front.to_lowercase();
        let needle = front.to_lowercase();
        group.contains(&format!("frente {needle}"))
            || group.contains(&format!("frente{needle}"))
            || group == needle
            || self.front_code.eq_ignore_ascii_case(front)
    }

    /// Idle-with-engine-on hours contributed by this slice
    pub fn idle_h(&self) -> f64 {
        if self.idle_engine {
            self.duration_h
        } else {
            0.0
        }
    }

    /// Engine-on hours contributed by this slice
    pub fn engine_on_h(&self) -> f64 {
        if self.engine_on {
            self.duration_h
        } else {
            0.0
        }
    }

    /// Elevator hours contributed by this slice
    pub fn elevator_h(&self) -> f64 {
        if self.elevator {
            self.duration_h
        } else {
            0.0
        }
    }

    /// RTK-assist hours contributed by this slice
    pub fn rtk_h(&self) -> f64 {
        if self.rtk_assist {
            self.duration_h
        } else {
            0.0
        }
    }

    /// Missing-timesheet hours contributed by this slice
    pub fn missing_timesheet_h(&self) -> f64 {
        if self.missing_timesheet {
            self.duration_h
        } else {
            0.0
        }
    }
}
