//! Schema Classifier
//!
//! Maps a sheet's display name and column set to a canonical metric
//! type. Resolution is an ordered rule table — first match wins, and the
//! order is load-bearing:
//!
//! 1. Sheet-name lexicon match (accent-folded, case-insensitive)
//! 2. Numbered-prefix convention (`"<n>_<label>"` — strip and retry 1)
//! 3. Column-signature match against the configured (id, value) tuples
//! 4. Column-only fallback on a few distinguishing column pairs
//!
//! A sheet no rule matches is skipped and reported as unclassified —
//! never silently aggregated under a wrong type.

use super::{MetricKind, SheetTable, WorkbookExtract};
use crate::config::ReportTypeConfig;
use regex::Regex;
use tracing::{debug, warn};

/// Name-lexicon entries, in priority order. Matching is prefix-based on
/// the folded sheet name, so `"Disponibilidade Mecânica"` hits
/// `"disponibilidade"`.
const NAME_LEXICON: [(&str, MetricKind); 10] = [
    ("disponibilidade", MetricKind::MechanicalAvailability),
    ("eficiencia", MetricKind::EnergyEfficiency),
    ("hora elevador", MetricKind::ElevatorHours),
    ("motor ocioso", MetricKind::IdleEngine),
    ("uso gps", MetricKind::GpsUsage),
    ("falta de apontamento", MetricKind::MissingTimesheet),
    ("tdh", MetricKind::Tdh),
    ("diesel", MetricKind::Diesel),
    ("impureza", MetricKind::Impurity),
    ("media velocidade", MetricKind::AverageSpeed),
];

/// Column-only fallback pairs: (id column, value column, metric)
const COLUMN_FALLBACK: [(&str, &str, MetricKind); 4] = [
    ("Frota", "TDH", MetricKind::Tdh),
    ("Frota", "Diesel", MetricKind::Diesel),
    ("Frota", "Impureza", MetricKind::Impurity),
    ("Frota", "Disponibilidade", MetricKind::MechanicalAvailability),
];

/// Schema Classifier for one report type's sheet conventions
pub struct SheetClassifier {
    config: ReportTypeConfig,
    numbered_prefix: Regex,
}

impl SheetClassifier {
    pub fn new(config: ReportTypeConfig) -> Self {
        Self {
            config,
            // Sheets are conventionally named "<n>_<label>"
            #[allow(clippy::unwrap_used)]
            numbered_prefix: Regex::new(r"^\d+_").unwrap(),
        }
    }

    /// Classify one sheet by name and column set. `None` means no rule
    /// matched and the sheet must be skipped.
    pub fn classify(&self, sheet_name: &str, headers: &[String]) -> Option<MetricKind> {
        let folded = fold(sheet_name);

        // Rule 1: name lexicon
        if let Some(kind) = lexicon_match(&folded) {
            debug!(sheet = sheet_name, metric = %kind, rule = "name", "Sheet classified");
            return Some(kind);
        }

        // Rule 2: numbered-prefix convention
        let stripped = self.numbered_prefix.replace(&folded, "");
        if stripped != folded {
            if let Some(kind) = lexicon_match(&stripped) {
                debug!(sheet = sheet_name, metric = %kind, rule = "prefix", "Sheet classified");
                return Some(kind);
            }
        }

        // Rule 3: configured column signature
        for (slug, spec) in &self.config.columns {
            if has_column(headers, &spec.id) && has_column(headers, &spec.value) {
                if let Some(kind) = MetricKind::from_slug(slug) {
                    debug!(sheet = sheet_name, metric = %kind, rule = "columns", "Sheet classified");
                    return Some(kind);
                }
            }
        }

        // Rule 4: column-only fallback
        for (id, value, kind) in COLUMN_FALLBACK {
            if has_column(headers, id) && has_column(headers, value) {
                debug!(sheet = sheet_name, metric = %kind, rule = "fallback", "Sheet classified");
                return Some(kind);
            }
        }

        None
    }

    /// Classify every sheet of a workbook and extract its rows.
    pub fn extract_workbook(&self, sheets: &[SheetTable]) -> WorkbookExtract {
        let mut extract = WorkbookExtract::default();
        for sheet in sheets {
            match self.classify(&sheet.name, &sheet.headers) {
                Some(kind) => {
                    let rows = match self.config.columns.get(kind.slug()) {
                        Some(spec) => sheet.extract(spec),
                        // Classified by name but no configured columns for
                        // this report type: nothing to extract
                        None => Vec::new(),
                    };
                    extract.sections.entry(kind).or_default().extend(rows);
                }
                None => {
                    warn!(sheet = %sheet.name, "Sheet not classified — skipping");
                    extract.unclassified.push(sheet.name.clone());
                }
            }
        }
        extract
    }
}

fn lexicon_match(folded_name: &str) -> Option<MetricKind> {
    NAME_LEXICON
        .iter()
        .find(|(term, _)| folded_name.starts_with(term))
        .map(|(_, kind)| *kind)
}

fn has_column(headers: &[String], name: &str) -> bool {
    headers
        .iter()
        .any(|h| h.trim() == name || h.trim().eq_ignore_ascii_case(name))
}

/// Lowercase and strip the Portuguese diacritics seen in sheet names.
fn fold(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'á' | 'â' | 'ã' | 'à' => 'a',
            'é' | 'ê' => 'e',
            'í' => 'i',
            'ó' | 'ô' | 'õ' => 'o',
            'ú' => 'u',
            'ç' => 'c',
            _ => c,
        })
        .collect()
}
