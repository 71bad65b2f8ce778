//! Engine-wide default constants.
//!
//! Centralises the magic numbers of the aggregation pipeline. Grouped by
//! subsystem for easy discovery; every value is overridable through
//! [`crate::config::EngineConfig`].

// ============================================================================
// Time Segmentation
// ============================================================================

/// Maximum believable gap between two readings of the same equipment
/// (hours). Larger gaps are sensor dropouts or shift boundaries and are
/// clamped to zero so they never inflate totals.
pub const MAX_SLICE_HOURS: f64 = 0.5;

/// Minimum engine RPM for a stationary reading to count as
/// idle-with-engine-on.
pub const IDLE_RPM_MINIMUM: f64 = 300.0;

/// Minimum base-cut pressure for the harvester elevator to count as
/// actively working.
pub const CUTTING_PRESSURE_MIN: f64 = 400.0;

// ============================================================================
// Productivity Classification
// ============================================================================

/// Operation group counted as productive time.
pub const PRODUCTIVE_GROUP: &str = "Produtiva";

/// Operation group counted as maintenance downtime.
pub const MAINTENANCE_GROUP: &str = "Manutenção";

/// Discrete states counted as "working" for harvester GPS usage.
pub const WORKING_STATES: [&str; 2] = ["TRABALHANDO", "COLHEITA"];

// ============================================================================
// Missing Timesheet ("falta de apontamento")
// ============================================================================

/// Operation code flagging engine-on time with no recognized operation.
pub const MISSING_TIMESHEET_CODE: &str = "8340";

/// Free-text marker for the same condition in the operation description.
pub const MISSING_TIMESHEET_TEXT: &str = "FALTA DE APONTAMENTO";

// ============================================================================
// Operator Identity
// ============================================================================

/// Placeholder operator token recorded at shift changes. Any token
/// containing it is excluded from per-operator aggregation.
pub const SHIFT_CHANGE_TOKEN: &str = "TROCA DE TURNO";

/// Placeholder name for readings with no operator logged in.
pub const NO_OPERATOR_TOKEN: &str = "SEM OPERADOR";

/// Probable-duplicate operator ids are exactly this many digits long...
pub const DUPLICATE_ID_LEN: usize = 7;

/// ...and start with this prefix (badge re-issue series).
pub const DUPLICATE_ID_PREFIX: &str = "133";

// ============================================================================
// Daily Hours Reconciliation
// ============================================================================

/// Expected recorded hours per equipment per calendar day.
pub const EXPECTED_DAY_HOURS: f64 = 24.0;
