//! Engine Configuration Module
//!
//! Provides the aggregation engine's configuration loaded from TOML,
//! replacing hardcoded thresholds and registries with operator-tunable
//! values.
//!
//! ## Loading Order
//!
//! 1. `SAFRA_CONFIG` environment variable (path to TOML file)
//! 2. `safra_config.toml` in the current working directory
//! 3. Built-in defaults (matching the original hardcoded values)
//!
//! There is deliberately no global cached instance: the config value is
//! passed explicitly into each component at construction, which keeps
//! unit tests deterministic and re-runs side-effect free.

mod calc_rules;
pub mod defaults;
mod report_registry;

pub use calc_rules::{CalcRuleRegistry, ClassRules};
pub use report_registry::{default_metas, ColumnSpec, ReportRegistry, ReportTypeConfig, ValueKind};

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an aggregation run.
///
/// Load with [`EngineConfig::load`], or construct in tests with
/// `EngineConfig::default()`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EngineConfig {
    /// Segmentation and classification thresholds
    #[serde(default)]
    pub engine: EngineTuning,

    /// Report-type registry: expected sheets, column tuples, targets
    #[serde(default)]
    pub reports: ReportRegistry,

    /// Calculation rules: per-class exclusion lists
    #[serde(default)]
    pub calc_rules: CalcRuleRegistry,

    /// Manual operator-alias substitutions
    #[serde(default)]
    pub operators: OperatorAliasRegistry,
}

impl EngineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$SAFRA_CONFIG` environment variable
    /// 2. `./safra_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("SAFRA_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded engine config from SAFRA_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from SAFRA_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "SAFRA_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("safra_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded engine config from ./safra_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./safra_config.toml, using defaults");
                }
            }
        }

        info!("No safra_config.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

// ============================================================================
// Engine Tuning
// ============================================================================

/// Segmentation and state-classification thresholds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    /// Gaps above this many hours are clamped to zero
    pub max_slice_hours: f64,
    /// Minimum RPM for idle-with-engine-on
    pub idle_rpm_minimum: f64,
    /// Minimum cutting pressure for the elevator marker
    pub cutting_pressure_min: f64,
    /// Operation group counted as productive
    pub productive_group: String,
    /// Operation group counted as maintenance
    pub maintenance_group: String,
    /// States counted as "working" for harvester GPS usage
    pub working_states: Vec<String>,
    /// Operation code flagging missing-timesheet time
    pub missing_timesheet_code: String,
    /// Free-text missing-timesheet marker
    pub missing_timesheet_text: String,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            max_slice_hours: defaults::MAX_SLICE_HOURS,
            idle_rpm_minimum: defaults::IDLE_RPM_MINIMUM,
            cutting_pressure_min: defaults::CUTTING_PRESSURE_MIN,
            productive_group: defaults::PRODUCTIVE_GROUP.to_string(),
            maintenance_group: defaults::MAINTENANCE_GROUP.to_string(),
            working_states: defaults::WORKING_STATES
                .iter()
                .map(|s| s.to_string())
                .collect(),
            missing_timesheet_code: defaults::MISSING_TIMESHEET_CODE.to_string(),
            missing_timesheet_text: defaults::MISSING_TIMESHEET_TEXT.to_string(),
        }
    }
}

// ============================================================================
// Operator Alias Registry
// ============================================================================

/// One manual operator substitution: every occurrence of `source` is
/// replaced with `target` before aggregation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AliasEntry {
    pub source: String,
    pub target: String,
}

/// Manual operator-alias registry. Entries here take precedence over the
/// automatic duplicate-id heuristic when both map the same alias.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct OperatorAliasRegistry {
    #[serde(default)]
    pub substitutions: Vec<AliasEntry>,
}
