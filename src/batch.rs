//! Batch report generation
//!
//! One uploaded pair of telemetry files (harvester + cart) fans out into
//! every (crew × report-type) combination. The batch is a linear task
//! with a mutable progress counter exposed for external polling; a
//! failing combination never aborts the others — only a batch with no
//! usable input at all is fatal.

use crate::aggregators::Aggregator;
use crate::config::EngineConfig;
use crate::ingest::{RecordNormalizer, TimeSegmenter};
use crate::operators::Reconciler;
use crate::report::ReportAssembler;
use crate::types::{EquipmentClass, OperationalReport, TimeSlice};
use anyhow::{bail, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

// ============================================================================
// Request & Status Types
// ============================================================================

/// Inputs for one batch run
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    /// Harvester telemetry export, used by "colheita" report types
    pub harvester_file: Option<PathBuf>,
    /// Grain-cart telemetry export, used by "transbordo" report types
    pub cart_file: Option<PathBuf>,
    /// Selected crews/fronts
    pub fronts: Vec<String>,
    /// Selected report types (e.g. "colheita_diario")
    pub report_types: Vec<String>,
    /// Report date, ISO format
    pub date: String,
    /// Range end for weekly reports
    pub date_end: Option<String>,
}

/// Lifecycle state of a batch task
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BatchState {
    Processing,
    Completed,
    Error,
}

/// Outcome of one (crew, report-type) combination
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportOutcome {
    Success,
    /// Required input file was not provided
    Skipped,
    Error,
}

/// Per-combination status entry
#[derive(Debug, Clone, Serialize)]
pub struct ReportStatus {
    pub name: String,
    pub report_type: String,
    pub front: String,
    pub outcome: ReportOutcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Pollable status of a batch task
#[derive(Debug, Clone, Serialize)]
pub struct BatchStatus {
    pub state: BatchState,
    /// Completed / total, as integer percent
    pub progress: u8,
    pub total_reports: usize,
    pub completed_reports: usize,
    pub reports: Vec<ReportStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchStatus {
    fn new(total: usize) -> Self {
        Self {
            state: BatchState::Processing,
            progress: 0,
            total_reports: total,
            completed_reports: 0,
            reports: Vec::new(),
            error: None,
        }
    }
}

// ============================================================================
// Batch Runner
// ============================================================================

/// Normalized + segmented + reconciled data for one input file
struct PreparedData {
    class: EquipmentClass,
    slices: Vec<TimeSlice>,
}

/// Runs batches and tracks their status for polling
pub struct BatchRunner {
    config: Arc<EngineConfig>,
    status: Arc<RwLock<HashMap<String, BatchStatus>>>,
}

impl BatchRunner {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config: Arc::new(config),
            status: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Current status of a task, if known
    pub async fn task_status(&self, task_id: &str) -> Option<BatchStatus> {
        self.status.read().await.get(task_id).cloned()
    }

    /// Process one batch: every (crew × report-type) combination from the
    /// provided files. Returns the generated reports keyed
    /// `"<type>_<front>"`.
    pub async fn process_files(
        &self,
        task_id: &str,
        request: BatchRequest,
    ) -> Result<Vec<(String, OperationalReport)>> {
        let total = request.fronts.len() * request.report_types.len();
        self.status
            .write()
            .await
            .insert(task_id.to_string(), BatchStatus::new(total));

        match self.run_inner(task_id, request).await {
            Ok(reports) => {
                let mut status_map = self.status.write().await;
                if let Some(status) = status_map.get_mut(task_id) {
                    status.state = BatchState::Completed;
                    status.progress = 100;
                }
                Ok(reports)
            }
            Err(e) => {
                let mut status_map = self.status.write().await;
                if let Some(status) = status_map.get_mut(task_id) {
                    status.state = BatchState::Error;
                    status.error = Some(e.to_string());
                }
                Err(e)
            }
        }
    }

    async fn run_inner(
        &self,
        task_id: &str,
        request: BatchRequest,
    ) -> Result<Vec<(String, OperationalReport)>> {
        if request.harvester_file.is_none() && request.cart_file.is_none() {
            bail!("At least one input file (harvester or cart) must be provided");
        }
        if request.fronts.is_empty() {
            bail!("Select at least one front");
        }
        if request.report_types.is_empty() {
            bail!("Select at least one report type");
        }
        if request.date.trim().is_empty() {
            bail!("A report date is required");
        }

        info!(
            task_id,
            fronts = request.fronts.len(),
            report_types = request.report_types.len(),
            "Starting batch processing"
        );

        let harvester = self.prepare(request.harvester_file.as_deref(), EquipmentClass::Harvester);
        let cart = self.prepare(request.cart_file.as_deref(), EquipmentClass::GrainCart);

        // A file that was provided but unreadable leaves its data slot
        // empty; only a batch with no usable data at all is fatal.
        if harvester.is_none() && cart.is_none() {
            bail!("No usable input file — all provided files failed to read");
        }

        let assembler = ReportAssembler::new(self.config.reports.clone());
        let mut reports = Vec::new();
        let mut completed = 0usize;
        let total = request.fronts.len() * request.report_types.len();

        for front in &request.fronts {
            for report_type in &request.report_types {
                let needs_harvester = report_type.contains("colheita");
                let needs_cart = report_type.contains("transbordo");

                let data = if needs_harvester {
                    harvester.as_ref()
                } else if needs_cart {
                    cart.as_ref()
                } else {
                    None
                };

                let name = format!(
                    "Relatório {} Frente {front}",
                    report_type.replace('_', " ")
                );

                let entry = match data {
                    None => {
                        warn!(%report_type, %front, "Input file for combination not available — skipping");
                        ReportStatus {
                            name,
                            report_type: report_type.clone(),
                            front: front.clone(),
                            outcome: ReportOutcome::Skipped,
                            error: None,
                        }
                    }
                    Some(data) => {
                        match self.generate(&assembler, data, front, report_type, &request) {
                            Ok(report) => {
                                reports.push((format!("{report_type}_{front}"), report));
                                ReportStatus {
                                    name,
                                    report_type: report_type.clone(),
                                    front: front.clone(),
                                    outcome: ReportOutcome::Success,
                                    error: None,
                                }
                            }
                            Err(e) => {
                                error!(%report_type, %front, error = %e, "Combination failed");
                                ReportStatus {
                                    name,
                                    report_type: report_type.clone(),
                                    front: front.clone(),
                                    outcome: ReportOutcome::Error,
                                    error: Some(e.to_string()),
                                }
                            }
                        }
                    }
                };

                completed += 1;
                let mut status_map = self.status.write().await;
                if let Some(status) = status_map.get_mut(task_id) {
                    status.completed_reports = completed;
                    status.progress = ((completed * 100) / total.max(1)) as u8;
                    status.reports.push(entry);
                }
            }
        }

        info!(task_id, generated = reports.len(), "Batch processing finished");
        Ok(reports)
    }

    /// Normalize, segment and reconcile one input file. Read failures are
    /// logged and yield `None` — the combinations needing this file will
    /// be skipped.
    fn prepare(&self, path: Option<&std::path::Path>, class: EquipmentClass) -> Option<PreparedData> {
        let path = path?;
        let normalizer = RecordNormalizer::new(class);
        let records = match normalizer.normalize_file(path) {
            Ok(records) => records,
            Err(e) => {
                error!(path = %path.display(), error = %e, "Input file unusable");
                return None;
            }
        };

        let segmenter = TimeSegmenter::new(
            class,
            self.config.engine.clone(),
            self.config.calc_rules.for_class(class).clone(),
        );
        let mut slices = segmenter.segment(&records);

        let reconciler = Reconciler::build(
            &self.config.operators,
            records.iter().map(|r| r.operator.as_str()),
        );
        reconciler.apply(&mut slices);

        Some(PreparedData { class, slices })
    }

    /// Generate one report: filter to the crew, aggregate, assemble.
    fn generate(
        &self,
        assembler: &ReportAssembler,
        data: &PreparedData,
        front: &str,
        report_type: &str,
        request: &BatchRequest,
    ) -> Result<OperationalReport> {
        let filtered: Vec<TimeSlice> = data
            .slices
            .iter()
            .filter(|s| s.matches_front(front))
            .cloned()
            .collect();

        if filtered.is_empty() {
            warn!(front, report_type, "No rows for front — report will be empty");
        }

        let aggregator = Aggregator::new(data.class, &self.config);
        let metrics = aggregator.aggregate(&filtered);

        let meta = assembler.meta(
            report_type,
            &request.date,
            request.date_end.as_deref(),
            front,
            None,
        );
        Ok(assembler.assemble(meta, metrics))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_validation_rejects_empty_request() {
        let runner = BatchRunner::new(EngineConfig::default());
        let err = runner
            .process_files("t1", BatchRequest::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("input file"));

        let status = runner.task_status("t1").await.unwrap();
        assert_eq!(status.state, BatchState::Error);
    }

    #[tokio::test]
    async fn test_unknown_task_has_no_status() {
        let runner = BatchRunner::new(EngineConfig::default());
        assert!(runner.task_status("missing").await.is_none());
    }
}
