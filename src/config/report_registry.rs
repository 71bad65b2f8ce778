//! Report-type registry
//!
//! Maps each report type to its expected spreadsheet sheet names, the
//! (id-column, value-column, value-kind) tuple per metric, and the target
//! values ("metas") surfaced next to the computed indicators. Defaults
//! reproduce the production registry; a TOML file can override any entry.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How a sheet's value column is interpreted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// Ratio cell: 1.0 means 100%, values in (0, 1) are fractions
    #[default]
    #[serde(rename = "porcentagem")]
    Percentage,
    /// Absolute hours
    #[serde(rename = "horas")]
    Hours,
    /// Plain numeric value (TDH, diesel l/ha, impurity kg/t)
    #[serde(rename = "decimal")]
    Decimal,
}

/// Expected (id, value) column pair for one metric type
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ColumnSpec {
    /// Identity column name ("Frota" or "Operador")
    pub id: String,
    /// Value column name ("Disponibilidade", "Porcentagem", "Horas", ...)
    pub value: String,
    /// Value interpretation
    #[serde(default)]
    pub kind: ValueKind,
}

impl ColumnSpec {
    fn new(id: &str, value: &str, kind: ValueKind) -> Self {
        Self {
            id: id.to_string(),
            value: value.to_string(),
            kind,
        }
    }
}

/// Configuration for one report type
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportTypeConfig {
    /// Human-readable name ("Colheita - Diário")
    pub name: String,
    /// Expected sheet names, in workbook order
    #[serde(default)]
    pub sheets: Vec<String>,
    /// Metric slug → expected column pair
    #[serde(default)]
    pub columns: BTreeMap<String, ColumnSpec>,
    /// Metric slug → target value (presentation scale)
    #[serde(default)]
    pub metas: BTreeMap<String, f64>,
}

/// Registry of all configured report types
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRegistry {
    #[serde(default)]
    pub types: BTreeMap<String, ReportTypeConfig>,
}

impl ReportRegistry {
    /// Config for a report type, if registered
    pub fn get(&self, report_type: &str) -> Option<&ReportTypeConfig> {
        self.types.get(report_type)
    }

    /// Target value for a metric under a report type, falling back to the
    /// hard-coded defaults when the registry has no entry.
    pub fn meta_for(&self, report_type: &str, metric_slug: &str) -> Option<f64> {
        if let Some(cfg) = self.types.get(report_type) {
            if let Some(v) = cfg.metas.get(metric_slug) {
                return Some(*v);
            }
        }
        default_metas(report_type).get(metric_slug).copied()
    }
}

impl Default for ReportRegistry {
    fn default() -> Self {
        let mut types = BTreeMap::new();

        for (key, name) in [
            ("colheita_diario", "Colheita - Diário"),
            ("colheita_semanal", "Colheita - Semanal"),
        ] {
            types.insert(
                key.to_string(),
                ReportTypeConfig {
                    name: name.to_string(),
                    sheets: vec![
                        "1_Disponibilidade Mecânica".to_string(),
                        "2_Eficiência Energética".to_string(),
                        "3_Hora Elevador".to_string(),
                        "4_Motor Ocioso".to_string(),
                        "5_Uso GPS".to_string(),
                    ],
                    columns: harvester_columns(),
                    metas: default_metas(key),
                },
            );
        }

        for (key, name) in [
            ("transbordo_diario", "Transbordo - Diário"),
            ("transbordo_semanal", "Transbordo - Semanal"),
        ] {
            types.insert(
                key.to_string(),
                ReportTypeConfig {
                    name: name.to_string(),
                    sheets: vec![
                        "1_Disponibilidade Mecânica".to_string(),
                        "2_Eficiência Energética".to_string(),
                        "3_Motor Ocioso".to_string(),
                        "4_Falta de Apontamento".to_string(),
                        "5_Uso GPS".to_string(),
                    ],
                    columns: cart_columns(),
                    metas: default_metas(key),
                },
            );
        }

        Self { types }
    }
}

fn harvester_columns() -> BTreeMap<String, ColumnSpec> {
    let mut columns = BTreeMap::new();
    columns.insert(
        "disponibilidade_mecanica".to_string(),
        ColumnSpec::new("Frota", "Disponibilidade", ValueKind::Percentage),
    );
    columns.insert(
        "eficiencia_energetica".to_string(),
        ColumnSpec::new("Operador", "Eficiência", ValueKind::Percentage),
    );
    columns.insert(
        "hora_elevador".to_string(),
        ColumnSpec::new("Operador", "Horas", ValueKind::Hours),
    );
    columns.insert(
        "motor_ocioso".to_string(),
        ColumnSpec::new("Operador", "Porcentagem", ValueKind::Percentage),
    );
    columns.insert(
        "uso_gps".to_string(),
        ColumnSpec::new("Operador", "Porcentagem", ValueKind::Percentage),
    );
    // Weekly agronomic/fuel sheets share the pipeline with simpler formulas
    columns.insert(
        "tdh".to_string(),
        ColumnSpec::new("Frota", "TDH", ValueKind::Decimal),
    );
    columns.insert(
        "diesel".to_string(),
        ColumnSpec::new("Frota", "Diesel", ValueKind::Decimal),
    );
    columns.insert(
        "impureza_vegetal".to_string(),
        ColumnSpec::new("Frota", "Impureza", ValueKind::Decimal),
    );
    columns
}

fn cart_columns() -> BTreeMap<String, ColumnSpec> {
    let mut columns = BTreeMap::new();
    columns.insert(
        "disponibilidade_mecanica".to_string(),
        ColumnSpec::new("Frota", "Disponibilidade", ValueKind::Percentage),
    );
    columns.insert(
        "eficiencia_energetica".to_string(),
        ColumnSpec::new("Operador", "Eficiência", ValueKind::Percentage),
    );
    columns.insert(
        "motor_ocioso".to_string(),
        ColumnSpec::new("Operador", "Porcentagem", ValueKind::Percentage),
    );
    columns.insert(
        "falta_apontamento".to_string(),
        ColumnSpec::new("Operador", "Porcentagem", ValueKind::Percentage),
    );
    columns.insert(
        "uso_gps".to_string(),
        ColumnSpec::new("Operador", "Porcentagem", ValueKind::Percentage),
    );
    columns
}

/// Hard-coded fallback targets per report type (presentation scale).
pub fn default_metas(report_type: &str) -> BTreeMap<String, f64> {
    let mut metas = BTreeMap::new();
    if report_type.contains("colheita") {
        metas.insert("disponibilidade_mecanica".to_string(), 90.0);
        metas.insert("eficiencia_energetica".to_string(), 70.0);
        metas.insert("motor_ocioso".to_string(), 4.0);
        metas.insert("hora_elevador".to_string(), 5.0);
        metas.insert("uso_gps".to_string(), 90.0);
    } else if report_type.contains("transbordo") {
        metas.insert("disponibilidade_mecanica".to_string(), 90.0);
        metas.insert("eficiencia_energetica".to_string(), 65.0);
        metas.insert("motor_ocioso".to_string(), 6.0);
        metas.insert("falta_apontamento".to_string(), 10.0);
        metas.insert("uso_gps".to_string(), 90.0);
    }
    metas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_four_types() {
        let registry = ReportRegistry::default();
        assert!(registry.get("colheita_diario").is_some());
        assert!(registry.get("colheita_semanal").is_some());
        assert!(registry.get("transbordo_diario").is_some());
        assert!(registry.get("transbordo_semanal").is_some());
        assert!(registry.get("drones_diario").is_none());
    }

    #[test]
    fn test_meta_fallback_to_defaults() {
        let registry = ReportRegistry {
            types: BTreeMap::new(),
        };
        assert_eq!(registry.meta_for("transbordo_diario", "motor_ocioso"), Some(6.0));
        assert_eq!(registry.meta_for("colheita_diario", "motor_ocioso"), Some(4.0));
        assert_eq!(registry.meta_for("colheita_diario", "nope"), None);
    }

    #[test]
    fn test_configured_meta_wins_over_default() {
        let mut registry = ReportRegistry::default();
        registry
            .types
            .get_mut("colheita_diario")
            .unwrap()
            .metas
            .insert("uso_gps".to_string(), 95.0);
        assert_eq!(registry.meta_for("colheita_diario", "uso_gps"), Some(95.0));
    }

    #[test]
    fn test_cart_sheets_include_falta_apontamento() {
        let registry = ReportRegistry::default();
        let cart = registry.get("transbordo_diario").unwrap();
        assert!(cart
            .sheets
            .iter()
            .any(|s| s.contains("Falta de Apontamento")));
        assert!(cart.columns.contains_key("falta_apontamento"));
    }
}
