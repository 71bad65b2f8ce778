//! Report assembly: metadata, targets, presentation scaling

mod assembler;

pub use assembler::{scale_for_presentation, ReportAssembler};
