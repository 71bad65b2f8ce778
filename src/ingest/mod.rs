//! Ingestion: decoding, record normalization, time segmentation
//!
//! The batch path is: raw bytes → [`decode`] fallback chain →
//! [`RecordNormalizer`] → [`TimeSegmenter`] → reconciled slices for the
//! aggregators.

pub mod decode;
mod normalizer;
mod segmenter;

pub use normalizer::{columns, parse_bool_like, parse_number, RecordNormalizer};
pub use segmenter::TimeSegmenter;

use std::path::PathBuf;
use thiserror::Error;

/// Ingestion errors
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Could not read {} with any attempted encoding ({attempted})", path.display())]
    UnreadableFile { path: PathBuf, attempted: String },

    #[error("File {} is missing required columns: {}", path.display(), columns.join(", "))]
    MissingColumns {
        path: PathBuf,
        columns: Vec<String>,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
