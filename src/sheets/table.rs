//! Sheet tables and cell-value conversion

use crate::config::{ColumnSpec, ValueKind};
use serde::{Deserialize, Serialize};

/// One sheet of a workbook, already parsed to text cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetTable {
    /// Display name of the sheet (e.g. `"5_Uso GPS"`)
    pub name: String,
    /// Header row, in sheet order
    pub headers: Vec<String>,
    /// Data rows, one `Vec` of cells per row
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Index of a column by name, tolerating common case variants
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.trim() == name)
            .or_else(|| {
                self.headers
                    .iter()
                    .position(|h| h.trim().eq_ignore_ascii_case(name))
            })
    }

    /// Extract (id, value) rows according to a column spec.
    ///
    /// Rows whose value cell does not parse are skipped — an unreadable
    /// cell excludes that row from the metric, it never fails the sheet.
    pub fn extract(&self, spec: &ColumnSpec) -> Vec<SheetRow> {
        let (Some(id_idx), Some(value_idx)) =
            (self.column_index(&spec.id), self.column_index(&spec.value))
        else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for row in &self.rows {
            let id = row.get(id_idx).map(|s| s.trim()).unwrap_or("");
            if id.is_empty() {
                continue;
            }
            let raw = row.get(value_idx).map(|s| s.as_str()).unwrap_or("");
            let Some(value) = convert_cell(raw, spec.kind) else {
                continue;
            };
            out.push(SheetRow {
                id: id.to_string(),
                value,
            });
        }
        out
    }
}

/// One extracted (identity, value) pair
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SheetRow {
    pub id: String,
    pub value: f64,
}

/// Convert a raw cell according to its value kind.
///
/// Percentage cells follow the storage convention of the source
/// workbooks: exactly `1.0` means 100%; a value strictly between 0 and 1
/// was stored as a fraction and is multiplied by 100; anything else is
/// already a percentage and passes through. Unparseable cells yield
/// `None` (the row is skipped).
pub fn convert_cell(raw: &str, kind: ValueKind) -> Option<f64> {
    let value = crate::ingest::parse_number(raw)?;
    match kind {
        ValueKind::Percentage => {
            if value == 1.0 {
                Some(100.0)
            } else if value > 0.0 && value < 1.0 {
                Some(value * 100.0)
            } else {
                Some(value)
            }
        }
        ValueKind::Hours | ValueKind::Decimal => Some(value),
    }
}
