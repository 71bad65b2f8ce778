//! Calculation-rule registry
//!
//! Per-equipment-class exclusion lists: operations and operation groups
//! that must not count toward idle-engine time, and equipment ids to drop
//! from aggregation entirely.

use crate::types::EquipmentClass;
use serde::{Deserialize, Serialize};

/// Exclusion rules for one equipment class
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ClassRules {
    /// Operation descriptions excluded from idle-engine computation
    #[serde(default)]
    pub idle_excluded_operations: Vec<String>,
    /// Operation groups excluded from idle-engine computation
    #[serde(default)]
    pub idle_excluded_groups: Vec<String>,
    /// Equipment ids dropped from every aggregation
    #[serde(default)]
    pub excluded_equipment: Vec<String>,
}

impl ClassRules {
    /// Whether a reading participates in idle-engine computation
    pub fn idle_eligible(&self, operation: &str, operation_group: &str) -> bool {
        !self.idle_excluded_operations.iter().any(|o| o == operation)
            && !self.idle_excluded_groups.iter().any(|g| g == operation_group)
    }

    /// Whether an equipment id is excluded from aggregation
    pub fn equipment_excluded(&self, equipment: &str) -> bool {
        // Exports sometimes carry float-formatted ids ("7041.0")
        let trimmed = equipment.trim_end_matches(".0");
        self.excluded_equipment
            .iter()
            .any(|e| e == equipment || e.trim_end_matches(".0") == trimmed)
    }
}

/// Calculation rules for both equipment classes
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CalcRuleRegistry {
    /// Harvester ("CD") rules
    #[serde(default)]
    pub cd: ClassRules,
    /// Grain cart ("TR") rules
    #[serde(default)]
    pub tr: ClassRules,
}

impl CalcRuleRegistry {
    /// Rules for the given equipment class
    pub fn for_class(&self, class: EquipmentClass) -> &ClassRules {
        match class {
            EquipmentClass::Harvester => &self.cd,
            EquipmentClass::GrainCart => &self.tr,
        }
    }
}
