//! Assembled report types

use super::metrics::{
    AvailabilityRecord, AverageSpeedRecord, EfficiencyRecord, ElevatorHoursRecord,
    EquipmentHoursRecord, GpsUsageRecord, IdleEngineRecord, MissingTimesheetRecord,
    SheetMetricRecord,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Run metadata attached to every assembled report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMeta {
    /// Report type key, e.g. "colheita_diario"
    pub report_type: String,
    /// Report date (or range start), ISO format
    pub date: String,
    /// Range end for weekly reports
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_end: Option<String>,
    /// Crew/front identifier
    pub front: String,
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Optional equipment-id filter applied to the run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equipment_filter: Option<Vec<String>>,
}

/// Structured report: metadata, configured targets, one section per
/// metric kind. Consumers serialize this to JSON (API responses) or to a
/// styled spreadsheet — both outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationalReport {
    pub meta: ReportMeta,
    /// Target values per metric ("metas"), presentation scale
    pub metas: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub disponibilidade_mecanica: Vec<AvailabilityRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub eficiencia_energetica: Vec<EfficiencyRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub motor_ocioso: Vec<IdleEngineRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hora_elevador: Vec<ElevatorHoursRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub uso_gps: Vec<GpsUsageRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub falta_apontamento: Vec<MissingTimesheetRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_velocidade: Vec<AverageSpeedRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub horas_por_frota: Vec<EquipmentHoursRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tdh: Vec<SheetMetricRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diesel: Vec<SheetMetricRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub impureza_vegetal: Vec<SheetMetricRecord>,
}
