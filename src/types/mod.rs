//! Core data model: telemetry records, time slices, metric rows, reports

mod metrics;
mod record;
mod report;
mod slice;

pub use metrics::{
    round2, round4, AvailabilityRecord, AverageSpeedRecord, DailyHours, EfficiencyRecord,
    ElevatorHoursRecord, EquipmentHoursRecord, GpsUsageRecord, IdleEngineRecord, MetricValue,
    MissingTimesheetRecord, SheetMetricRecord, ValueScale,
};
pub use record::{EquipmentClass, TelemetryRecord};
pub use report::{OperationalReport, ReportMeta};
pub use slice::TimeSlice;
