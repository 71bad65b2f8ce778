//! Telemetry record types: one row per machine reading
//!
//! Records come from the fleet monitoring export (`;`-delimited text with
//! Portuguese column names). The normalizer guarantees the canonical field
//! set; columns absent from the source file arrive as `None`/defaults and
//! unknown columns are preserved in `extras`.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// Equipment Class
// ============================================================================

/// Class of agricultural equipment the telemetry file describes.
///
/// Selects which aggregator formulas and excluded-operation lists apply.
/// Replaces the near-duplicate per-class processing modules of the legacy
/// pipeline with a single parameterised path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum EquipmentClass {
    /// Sugarcane harvester ("colhedora") — carries elevator/cutting implements
    #[default]
    Harvester,
    /// Grain/infield transfer cart ("transbordo")
    GrainCart,
}

impl EquipmentClass {
    /// Get display name for reports
    pub fn display_name(&self) -> &'static str {
        match self {
            EquipmentClass::Harvester => "Colhedora",
            EquipmentClass::GrainCart => "Transbordo",
        }
    }

    /// Get short code used by the calculation-rule registry
    pub fn short_code(&self) -> &'static str {
        match self {
            EquipmentClass::Harvester => "CD",
            EquipmentClass::GrainCart => "TR",
        }
    }

    /// Parse from string (for CLI/config)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cd" | "colhedora" | "harvester" => Some(EquipmentClass::Harvester),
            "tr" | "transbordo" | "cart" | "graincart" => Some(EquipmentClass::GrainCart),
            _ => None,
        }
    }
}

impl std::fmt::Display for EquipmentClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

// ============================================================================
// Telemetry Record
// ============================================================================

/// One machine reading after normalization.
///
/// Immutable once produced by the normalizer; the segmenter derives
/// [`crate::types::TimeSlice`]s from consecutive readings of the same
/// equipment without mutating the records themselves.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TelemetryRecord {
    /// Equipment/fleet id ("Equipamento")
    pub equipment: String,
    /// Crew/front group the equipment operates within ("Grupo Equipamento/Frente")
    pub front_group: String,
    /// Operator-typed front code ("Codigo Frente (digitada)")
    pub front_code: String,
    /// Operator token, `"<id> - <name>"` or plain ("Operador")
    pub operator: String,
    /// Calendar date of the reading ("Data")
    pub date: Option<NaiveDate>,
    /// Time of day of the reading ("Hora")
    pub time: Option<NaiveTime>,
    /// Free-text operational state ("Estado", e.g. "TRABALHANDO")
    pub state: String,
    /// Secondary state channel ("Estado Operacional")
    pub operational_state: String,
    /// Operation description ("Operacao", e.g. "7290 - COLHEITA CANA MECANIZADA")
    pub operation: String,
    /// Numeric operation code as text ("Codigo da Operacao")
    pub operation_code: String,
    /// Productivity grouping of the operation ("Grupo Operacao", e.g. "Produtiva")
    pub operation_group: String,
    /// Engine running flag ("Motor Ligado")
    pub engine_on: bool,
    /// Engine RPM ("RPM Motor")
    pub engine_rpm: f64,
    /// Ground speed in km/h ("Velocidade")
    pub speed: f64,
    /// Auto-pilot / RTK steering flag ("RTK (Piloto Automatico)")
    pub rtk: bool,
    /// Harvester elevator belt running ("Esteira Ligada")
    pub elevator_on: bool,
    /// Harvester base-cut pressure ("Pressao de Corte")
    pub cutting_pressure: f64,
    /// Field Cruiser assist flag (harvester only)
    pub field_cruiser: bool,
    /// Generic implement flag ("Implemento Ligado")
    pub implement_on: bool,
    /// Engine hour meter ("Horimetro")
    pub horimeter: Option<f64>,
    /// Columns outside the canonical set, preserved verbatim
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

impl TelemetryRecord {
    /// Whether this record matches a crew/front selection.
    ///
    /// The front appears in the data either embedded in the group label
    /// ("Frente 3 - Alexandrita"), concatenated ("Frente3"), or as the
    /// literal crew code in the group or typed-code column.
    pub fn matches_front(&self, front: &str) -> bool {
        let group = self.front_group.to_lowercase();
        let needle = front.to_lowercase();
        group.contains(&format!("frente {needle}"))
            || group.contains(&format!("frente{needle}"))
            || group == needle
            || self.front_code.eq_ignore_ascii_case(front)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equipment_class_codes() {
        assert_eq!(EquipmentClass::Harvester.short_code(), "CD");
        assert_eq!(EquipmentClass::GrainCart.short_code(), "TR");
        assert_eq!(EquipmentClass::from_str("transbordo"), Some(EquipmentClass::GrainCart));
        assert_eq!(EquipmentClass::from_str("CD"), Some(EquipmentClass::Harvester));
        assert_eq!(EquipmentClass::from_str("planter"), None);
    }

    #[test]
    fn test_matches_front_variants() {
        let rec = TelemetryRecord {
            front_group: "Frente 3 - Alexandrita".to_string(),
            front_code: "3".to_string(),
            ..Default::default()
        };
        assert!(rec.matches_front("3"));
        assert!(!rec.matches_front("4"));

        let concat = TelemetryRecord {
            front_group: "Frente4".to_string(),
            ..Default::default()
        };
        assert!(concat.matches_front("4"));

        let by_code = TelemetryRecord {
            front_group: "Colhedoras Zirleno".to_string(),
            front_code: "frente2".to_string(),
            ..Default::default()
        };
        assert!(by_code.matches_front("Frente2"));
    }
}
