//! Operator Identity Reconciliation
//!
//! Operator tokens arrive as `"<id> - <name>"`. Some ids are placeholders
//! (shift change, nobody logged in) and are excluded from per-operator
//! aggregation; some operators appear under two ids because the
//! monitoring terminal re-issued a badge in the 133xxxx series. This
//! module splits tokens, filters invalid ids and builds the alias →
//! canonical reconciliation map (manual registry entries win over the
//! automatic heuristic). All aggregation downstream operates on canonical
//! ids only.

use crate::config::defaults::{
    DUPLICATE_ID_LEN, DUPLICATE_ID_PREFIX, NO_OPERATOR_TOKEN, SHIFT_CHANGE_TOKEN,
};
use crate::config::OperatorAliasRegistry;
use crate::types::TimeSlice;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info};

// ============================================================================
// Token Parsing & Validity
// ============================================================================

/// Operator id and display name split from a raw token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorIdentity {
    pub id: String,
    pub name: String,
}

/// Split an operator token on the first `" - "` separator. Tokens
/// without the separator act as both id and name.
pub fn split_token(token: &str) -> OperatorIdentity {
    match token.split_once(" - ") {
        Some((id, name)) => OperatorIdentity {
            id: id.trim().to_string(),
            name: name.trim().to_string(),
        },
        None => OperatorIdentity {
            id: token.trim().to_string(),
            name: token.trim().to_string(),
        },
    }
}

/// Whether a token denotes a real operator. Invalid tokens are excluded
/// from every aggregation except the daily-hours reconciliation.
pub fn is_valid_token(token: &str) -> bool {
    let upper = token.trim().to_uppercase();
    if upper.contains(SHIFT_CHANGE_TOKEN) || upper.contains(NO_OPERATOR_TOKEN) {
        return false;
    }
    let id = split_token(token).id;
    !matches!(id.as_str(), "" | "0" | "0-0" | "-")
}

// ============================================================================
// Reconciliation Map
// ============================================================================

/// One detected duplicate, for reporting
#[derive(Debug, Clone, Serialize)]
pub struct DuplicateEntry {
    pub alias: String,
    pub canonical: String,
    pub name: String,
}

/// Alias → canonical token map
#[derive(Debug, Clone, Default)]
pub struct Reconciler {
    map: HashMap<String, String>,
    duplicates: Vec<DuplicateEntry>,
}

impl Reconciler {
    /// Build the reconciliation map from the manual registry plus the
    /// automatic same-name duplicate heuristic. Manual entries take
    /// precedence when both map the same alias.
    pub fn build<'a>(
        registry: &OperatorAliasRegistry,
        tokens: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let (mut map, duplicates) = detect_duplicates(tokens);

        for entry in &registry.substitutions {
            map.insert(entry.source.clone(), entry.target.clone());
        }

        // Collapse chains (alias → alias → canonical) so application is
        // a single idempotent lookup
        let keys: Vec<String> = map.keys().cloned().collect();
        for key in keys {
            let mut target = map[&key].clone();
            let mut hops = 0;
            while let Some(next) = map.get(&target) {
                if *next == target || hops > 10 {
                    break;
                }
                target = next.clone();
                hops += 1;
            }
            map.insert(key, target);
        }

        if !map.is_empty() {
            info!(substitutions = map.len(), "Operator reconciliation map built");
        }

        Self { map, duplicates }
    }

    /// Canonical token for a raw token (identity when not aliased)
    pub fn resolve<'a>(&'a self, token: &'a str) -> &'a str {
        self.map.get(token).map(String::as_str).unwrap_or(token)
    }

    /// Rewrite every slice's operator to its canonical token.
    pub fn apply(&self, slices: &mut [TimeSlice]) {
        if self.map.is_empty() {
            return;
        }
        let mut rewritten = 0usize;
        for slice in slices.iter_mut() {
            if let Some(canonical) = self.map.get(&slice.operator) {
                slice.operator = canonical.clone();
                rewritten += 1;
            }
        }
        debug!(rewritten, "Operator aliases applied");
    }

    /// Duplicates found by the automatic heuristic, for reporting
    pub fn duplicates(&self) -> &[DuplicateEntry] {
        &self.duplicates
    }
}

/// Detect probable duplicate operator ids: an id of exactly 7 digits
/// starting `"133"` whose display name also appears under a shorter id is
/// an alias of the shortest such id.
fn detect_duplicates<'a>(
    tokens: impl IntoIterator<Item = &'a str>,
) -> (HashMap<String, String>, Vec<DuplicateEntry>) {
    let mut by_name: HashMap<String, Vec<OperatorIdentity>> = HashMap::new();
    let mut seen: std::collections::HashSet<&str> = std::collections::HashSet::new();
    for token in tokens {
        if !seen.insert(token) {
            continue;
        }
        if !token.contains(" - ") {
            continue;
        }
        let identity = split_token(token);
        by_name.entry(identity.name.clone()).or_default().push(identity);
    }

    let mut map = HashMap::new();
    let mut duplicates = Vec::new();

    for (name, identities) in by_name {
        if identities.len() < 2 {
            continue;
        }
        let (long, short): (Vec<_>, Vec<_>) =
            identities.iter().partition(|op| is_reissued_id(&op.id));
        if long.is_empty() || short.is_empty() {
            continue;
        }
        let Some(canonical) = short.iter().min_by_key(|op| op.id.len()) else {
            continue;
        };
        let canonical_token = format!("{} - {}", canonical.id, name);
        for alias in long {
            let alias_token = format!("{} - {}", alias.id, name);
            map.insert(alias_token.clone(), canonical_token.clone());
            duplicates.push(DuplicateEntry {
                alias: alias_token,
                canonical: canonical_token.clone(),
                name: name.clone(),
            });
        }
    }

    (map, duplicates)
}

/// Badge re-issue series: exactly 7 digits, starting 133
fn is_reissued_id(id: &str) -> bool {
    id.len() == DUPLICATE_ID_LEN
        && id.starts_with(DUPLICATE_ID_PREFIX)
        && id.chars().all(|c| c.is_ascii_digit())
}
