//! Spreadsheet sheet classification
//!
//! Weekly reports arrive as multi-sheet workbooks whose sheet names and
//! column layouts drift between sources. This module maps each sheet to a
//! canonical metric type through a prioritized rule table and extracts
//! its (id, value) rows. Spreadsheet *parsing* is an external
//! collaborator — input here is already tabular (name, headers, rows).

mod classifier;
mod table;

pub use classifier::SheetClassifier;
pub use table::{convert_cell, SheetRow, SheetTable};

use serde::{Deserialize, Serialize};

// ============================================================================
// Canonical Metric Types
// ============================================================================

/// Canonical metric type a sheet can represent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    MechanicalAvailability,
    EnergyEfficiency,
    ElevatorHours,
    IdleEngine,
    GpsUsage,
    MissingTimesheet,
    Tdh,
    Diesel,
    Impurity,
    AverageSpeed,
}

impl MetricKind {
    /// Registry/report slug for this metric
    pub fn slug(&self) -> &'static str {
        match self {
            MetricKind::MechanicalAvailability => "disponibilidade_mecanica",
            MetricKind::EnergyEfficiency => "eficiencia_energetica",
            MetricKind::ElevatorHours => "hora_elevador",
            MetricKind::IdleEngine => "motor_ocioso",
            MetricKind::GpsUsage => "uso_gps",
            MetricKind::MissingTimesheet => "falta_apontamento",
            MetricKind::Tdh => "tdh",
            MetricKind::Diesel => "diesel",
            MetricKind::Impurity => "impureza_vegetal",
            MetricKind::AverageSpeed => "media_velocidade",
        }
    }

    /// Parse a registry slug
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "disponibilidade_mecanica" => Some(MetricKind::MechanicalAvailability),
            "eficiencia_energetica" => Some(MetricKind::EnergyEfficiency),
            "hora_elevador" => Some(MetricKind::ElevatorHours),
            "motor_ocioso" => Some(MetricKind::IdleEngine),
            "uso_gps" => Some(MetricKind::GpsUsage),
            "falta_apontamento" => Some(MetricKind::MissingTimesheet),
            "tdh" => Some(MetricKind::Tdh),
            "diesel" => Some(MetricKind::Diesel),
            "impureza_vegetal" | "impureza" => Some(MetricKind::Impurity),
            "media_velocidade" => Some(MetricKind::AverageSpeed),
            _ => None,
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}

// ============================================================================
// Workbook Extraction
// ============================================================================

/// Result of classifying and extracting a whole workbook
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkbookExtract {
    /// Extracted rows per classified metric type
    pub sections: std::collections::BTreeMap<MetricKind, Vec<SheetRow>>,
    /// Sheet names no rule matched — skipped, surfaced, never guessed
    pub unclassified: Vec<String>,
}

impl WorkbookExtract {
    /// Rows for a metric kind, empty when the workbook had no such sheet
    pub fn rows(&self, kind: MetricKind) -> &[SheetRow] {
        self.sections.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }
}
