//! Report Assembler
//!
//! Merges aggregator outputs with run metadata and configured targets
//! into one structured report, then applies the single presentation pass:
//! every ratio still in fraction scale becomes a percentage, hours round
//! to 2 decimals. The pass is idempotent — the scale marker on each value
//! guards against the double-scaling failure mode.

use crate::aggregators::MetricSet;
use crate::config::{default_metas, ReportRegistry};
use crate::sheets::{MetricKind, WorkbookExtract};
use crate::types::{round2, OperationalReport, ReportMeta, SheetMetricRecord};
use chrono::Utc;
use std::collections::BTreeMap;

/// Report Assembler for a configured report-type registry
pub struct ReportAssembler {
    registry: ReportRegistry,
}

impl ReportAssembler {
    pub fn new(registry: ReportRegistry) -> Self {
        Self { registry }
    }

    /// Build the metadata block for a run.
    pub fn meta(
        &self,
        report_type: &str,
        date: &str,
        date_end: Option<&str>,
        front: &str,
        equipment_filter: Option<Vec<String>>,
    ) -> ReportMeta {
        ReportMeta {
            report_type: report_type.to_string(),
            date: date.to_string(),
            date_end: date_end.map(|d| d.to_string()),
            front: front.to_string(),
            generated_at: Utc::now(),
            equipment_filter,
        }
    }

    /// Merge metrics and targets into a presentation-ready report.
    pub fn assemble(&self, meta: ReportMeta, metrics: MetricSet) -> OperationalReport {
        let metas = self.targets_for(&meta.report_type);

        let mut report = OperationalReport {
            meta,
            metas,
            disponibilidade_mecanica: metrics.availability,
            eficiencia_energetica: metrics.efficiency,
            motor_ocioso: metrics.idle,
            hora_elevador: metrics.elevator,
            uso_gps: metrics.gps,
            falta_apontamento: metrics.missing_timesheet,
            media_velocidade: metrics.speed,
            horas_por_frota: metrics.hours,
            tdh: Vec::new(),
            diesel: Vec::new(),
            impureza_vegetal: Vec::new(),
        };
        scale_for_presentation(&mut report);
        report
    }

    /// Attach auxiliary sections lifted from a classified workbook
    /// (TDH, diesel, vegetal impurity). Sheet values arrive already in
    /// presentation scale.
    pub fn attach_workbook(&self, report: &mut OperationalReport, extract: &WorkbookExtract) {
        let lift = |kind: MetricKind| -> Vec<SheetMetricRecord> {
            extract
                .rows(kind)
                .iter()
                .map(|row| SheetMetricRecord {
                    id: row.id.clone(),
                    value: row.value,
                })
                .collect()
        };
        report.tdh = lift(MetricKind::Tdh);
        report.diesel = lift(MetricKind::Diesel);
        report.impureza_vegetal = lift(MetricKind::Impurity);
    }

    /// Targets for a report type: hard-coded defaults overlaid with any
    /// configured values.
    fn targets_for(&self, report_type: &str) -> BTreeMap<String, f64> {
        let mut metas = default_metas(report_type);
        if let Some(cfg) = self.registry.get(report_type) {
            for (slug, value) in &cfg.metas {
                metas.insert(slug.clone(), *value);
            }
        }
        metas
    }
}

/// The presentation pass. Runs exactly once per value by construction:
/// fraction-scaled values convert, already-converted values pass through.
pub fn scale_for_presentation(report: &mut OperationalReport) {
    for record in &mut report.disponibilidade_mecanica {
        record.availability = record.availability.into_percent();
        record.total_h = round2(record.total_h);
        record.maintenance_h = round2(record.maintenance_h);
    }
    for record in &mut report.eficiencia_energetica {
        record.efficiency = record.efficiency.into_percent();
    }
    for record in &mut report.motor_ocioso {
        record.ratio = record.ratio.into_percent();
        record.engine_on_h = round2(record.engine_on_h);
        record.idle_h = round2(record.idle_h);
    }
    for record in &mut report.hora_elevador {
        record.hours = round2(record.hours);
    }
    for record in &mut report.uso_gps {
        record.ratio = record.ratio.into_percent();
    }
    for record in &mut report.falta_apontamento {
        record.ratio = record.ratio.into_percent();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EfficiencyRecord, IdleEngineRecord, MetricValue, ValueScale};

    fn assembler() -> ReportAssembler {
        ReportAssembler::new(ReportRegistry::default())
    }

    fn sample_metrics() -> MetricSet {
        MetricSet {
            efficiency: vec![EfficiencyRecord {
                operator: "450 - Jose".to_string(),
                front: "1".to_string(),
                efficiency: MetricValue::ratio(3.0, 4.0),
            }],
            idle: vec![IdleEngineRecord {
                operator: "450 - Jose".to_string(),
                front: "1".to_string(),
                ratio: MetricValue::ratio(1.0, 8.0),
                engine_on_h: 8.0,
                idle_h: 1.0,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_assemble_scales_to_percent() {
        let a = assembler();
        let meta = a.meta("colheita_diario", "2025-05-10", None, "1", None);
        let report = a.assemble(meta, sample_metrics());

        assert_eq!(report.eficiencia_energetica[0].efficiency.value, 75.0);
        assert_eq!(
            report.eficiencia_energetica[0].efficiency.scale,
            ValueScale::Percent
        );
        assert_eq!(report.motor_ocioso[0].ratio.value, 12.5);
    }

    #[test]
    fn test_presentation_pass_is_idempotent() {
        let a = assembler();
        let meta = a.meta("colheita_diario", "2025-05-10", None, "1", None);
        let mut report = a.assemble(meta, sample_metrics());

        let before = serde_json::to_string(&report).unwrap();
        scale_for_presentation(&mut report);
        let after = serde_json::to_string(&report).unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_metas_defaults_per_report_type() {
        let a = assembler();
        let meta = a.meta("transbordo_diario", "2025-05-10", None, "2", None);
        let report = a.assemble(meta, MetricSet::default());

        assert_eq!(report.metas.get("eficiencia_energetica"), Some(&65.0));
        assert_eq!(report.metas.get("falta_apontamento"), Some(&10.0));
        assert_eq!(report.metas.get("hora_elevador"), None);
    }

    #[test]
    fn test_attach_workbook_sections() {
        use crate::sheets::{SheetClassifier, SheetTable};

        let registry = ReportRegistry::default();
        let classifier = SheetClassifier::new(
            registry.get("colheita_semanal").cloned().unwrap(),
        );
        let sheets = vec![SheetTable {
            name: "TDH".to_string(),
            headers: vec!["Frota".to_string(), "TDH".to_string()],
            rows: vec![vec!["7041".to_string(), "0.0124".to_string()]],
        }];
        let extract = classifier.extract_workbook(&sheets);

        let a = ReportAssembler::new(registry);
        let meta = a.meta("colheita_semanal", "2025-05-05", Some("2025-05-11"), "1", None);
        let mut report = a.assemble(meta, MetricSet::default());
        a.attach_workbook(&mut report, &extract);

        assert_eq!(report.tdh.len(), 1);
        assert_eq!(report.tdh[0].id, "7041");
        assert_eq!(report.tdh[0].value, 0.0124);
        assert!(report.diesel.is_empty());
    }

    #[test]
    fn test_configured_target_overrides_default() {
        let mut registry = ReportRegistry::default();
        if let Some(cfg) = registry.types.get_mut("colheita_diario") {
            cfg.metas.insert("uso_gps".to_string(), 95.0);
        }
        let a = ReportAssembler::new(registry);
        let meta = a.meta("colheita_diario", "2025-05-10", None, "1", None);
        let report = a.assemble(meta, MetricSet::default());
        assert_eq!(report.metas.get("uso_gps"), Some(&95.0));
    }
}
