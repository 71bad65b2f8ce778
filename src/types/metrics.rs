//! Metric record types and scale-aware values
//!
//! Every ratio travels through the pipeline as a decimal fraction in
//! `[0, 1]` and is converted to a percentage exactly once, at report
//! assembly. The conversion is made structurally idempotent by carrying
//! the scale state on the value itself instead of re-deriving it from the
//! magnitude (re-derivation is how the legacy pipeline double-scaled).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ============================================================================
// Scale-Aware Metric Value
// ============================================================================

/// Scale a metric value is currently expressed in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ValueScale {
    /// Decimal fraction, 0.0–1.0
    #[default]
    Fraction,
    /// Presentation percentage, 0.0–100.0
    Percent,
}

/// A ratio value tagged with its scale state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct MetricValue {
    pub value: f64,
    pub scale: ValueScale,
}

impl MetricValue {
    /// Build a fraction-scaled ratio from numerator/denominator.
    ///
    /// Returns a zero fraction when the denominator is not positive —
    /// ratios are always displayable, never NaN/None.
    pub fn ratio(numerator: f64, denominator: f64) -> Self {
        let value = if denominator > 0.0 {
            round4(numerator / denominator)
        } else {
            0.0
        };
        Self {
            value,
            scale: ValueScale::Fraction,
        }
    }

    /// Build a fraction-scaled ratio capped at 1.0.
    ///
    /// Measurement noise can push elevator/GPS hours past their
    /// denominators; the cap keeps those from surfacing as >100%.
    pub fn ratio_capped(numerator: f64, denominator: f64) -> Self {
        let mut v = Self::ratio(numerator, denominator);
        v.value = v.value.min(1.0);
        v
    }

    /// Convert to presentation percentage. Idempotent: a value already in
    /// percent scale is returned unchanged.
    pub fn into_percent(self) -> Self {
        match self.scale {
            ValueScale::Fraction => Self {
                value: round2(self.value * 100.0),
                scale: ValueScale::Percent,
            },
            ValueScale::Percent => self,
        }
    }

    /// The value as a fraction regardless of current scale
    pub fn as_fraction(&self) -> f64 {
        match self.scale {
            ValueScale::Fraction => self.value,
            ValueScale::Percent => self.value / 100.0,
        }
    }
}

/// Round to 4 decimal places — the precision every intermediate sum is
/// held at. Presentation rounding happens only at assembly.
pub fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

/// Round to 2 decimal places (presentation precision)
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ============================================================================
// Per-Metric Record Rows
// ============================================================================

/// Mechanical availability per equipment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub equipment: String,
    pub availability: MetricValue,
    pub total_h: f64,
    pub maintenance_h: f64,
}

/// Energy efficiency per (operator, crew)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencyRecord {
    pub operator: String,
    pub front: String,
    pub efficiency: MetricValue,
}

/// Idle-engine ratio per (operator, crew), with the absolute hours both
/// sides of the ratio — downstream consumers chart the raw hours too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdleEngineRecord {
    pub operator: String,
    pub front: String,
    pub ratio: MetricValue,
    pub engine_on_h: f64,
    pub idle_h: f64,
}

/// GPS / auto-pilot usage per (operator, crew)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpsUsageRecord {
    pub operator: String,
    pub front: String,
    pub ratio: MetricValue,
}

/// Elevator hours per (operator, crew) — harvesters only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElevatorHoursRecord {
    pub operator: String,
    pub front: String,
    pub hours: f64,
}

/// Missing-timesheet ratio per (operator, crew) — grain carts only
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingTimesheetRecord {
    pub operator: String,
    pub front: String,
    pub ratio: MetricValue,
}

/// Time-weighted average speed per (operator, crew)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AverageSpeedRecord {
    pub operator: String,
    pub front: String,
    pub speed: f64,
}

/// One (identity, value) row lifted from a classified workbook sheet —
/// the TDH / diesel / impurity auxiliaries arrive this way instead of
/// being computed from telemetry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SheetMetricRecord {
    pub id: String,
    pub value: f64,
}

/// Hours recorded for one equipment on one calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyHours {
    pub date: NaiveDate,
    pub recorded_h: f64,
    pub shortfall_h: f64,
}

/// Daily-hours reconciliation per equipment: recorded hours versus the
/// 24-hour expectation. Data-completeness check, not a performance
/// metric — computed without any operator filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentHoursRecord {
    pub equipment: String,
    pub recorded_h: f64,
    pub shortfall_24h: f64,
    pub daily: Vec<DailyHours>,
}
