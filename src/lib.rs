//! Safra Engine: Agricultural Fleet Telemetry Intelligence
//!
//! Batch aggregation engine that turns raw machinery telemetry exports
//! into per-operator and per-equipment performance indicators.
//!
//! ## Pipeline
//!
//! - **Ingest**: encoding-tolerant parsing and record normalization
//! - **Segmentation**: time-difference computation and state tagging
//! - **Sheets**: heuristic schema classification for workbook inputs
//! - **Operators**: identity reconciliation and duplicate-id merging
//! - **Aggregators**: one aggregator per performance indicator
//! - **Report**: assembly with targets and presentation scaling

pub mod aggregators;
pub mod batch;
pub mod config;
pub mod ingest;
pub mod operators;
pub mod report;
pub mod sheets;
pub mod types;

// Re-export engine configuration
pub use config::EngineConfig;

// Re-export commonly used types
pub use types::{
    EquipmentClass, MetricValue, OperationalReport, ReportMeta, TelemetryRecord, TimeSlice,
    ValueScale,
};

// Re-export pipeline stages
pub use aggregators::{Aggregator, MetricSet};
pub use batch::{BatchRequest, BatchRunner, BatchState, BatchStatus};
pub use ingest::{IngestError, RecordNormalizer, TimeSegmenter};
pub use operators::Reconciler;
pub use report::ReportAssembler;
pub use sheets::{MetricKind, SheetClassifier, SheetTable};
