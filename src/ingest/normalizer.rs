//! Record Normalizer
//!
//! Turns a raw `;`-delimited telemetry export into typed
//! [`TelemetryRecord`]s: tries the encoding fallback chain, trims column
//! names, splits the combined `Data/Hora` column, coerces boolean-like
//! text (`LIGADO`/`DESLIGADO`, `VERDADEIRO`/`FALSO`) and guarantees the
//! canonical column set — absent columns become defaults, unknown columns
//! are preserved in `extras`. Zero-row (header-only) files are valid and
//! yield an empty, correctly shaped batch.

use super::decode::{self, Encoding};
use super::IngestError;
use crate::types::{EquipmentClass, TelemetryRecord};
use chrono::{NaiveDate, NaiveTime};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// Canonical column names of the fleet-monitoring export
pub mod columns {
    pub const DATE: &str = "Data";
    pub const TIME: &str = "Hora";
    pub const DATETIME: &str = "Data/Hora";
    pub const EQUIPMENT: &str = "Equipamento";
    pub const FRONT_GROUP: &str = "Grupo Equipamento/Frente";
    pub const FRONT_CODE: &str = "Codigo Frente (digitada)";
    pub const OPERATOR: &str = "Operador";
    pub const STATE: &str = "Estado";
    pub const OPERATIONAL_STATE: &str = "Estado Operacional";
    pub const OPERATION: &str = "Operacao";
    pub const OPERATION_CODE: &str = "Codigo da Operacao";
    pub const OPERATION_GROUP: &str = "Grupo Operacao";
    pub const ENGINE_ON: &str = "Motor Ligado";
    pub const ENGINE_RPM: &str = "RPM Motor";
    pub const SPEED: &str = "Velocidade";
    pub const RTK: &str = "RTK (Piloto Automatico)";
    pub const ELEVATOR: &str = "Esteira Ligada";
    pub const CUTTING_PRESSURE: &str = "Pressao de Corte";
    pub const FIELD_CRUISER: &str = "Field Cruiser";
    pub const IMPLEMENT: &str = "Implemento Ligado";
    pub const HORIMETER: &str = "Horimetro";

    /// Every typed column the normalizer recognises. Headers outside this
    /// list land in `TelemetryRecord::extras`.
    pub const KNOWN: [&str; 21] = [
        DATE,
        TIME,
        DATETIME,
        EQUIPMENT,
        FRONT_GROUP,
        FRONT_CODE,
        OPERATOR,
        STATE,
        OPERATIONAL_STATE,
        OPERATION,
        OPERATION_CODE,
        OPERATION_GROUP,
        ENGINE_ON,
        ENGINE_RPM,
        SPEED,
        RTK,
        ELEVATOR,
        CUTTING_PRESSURE,
        FIELD_CRUISER,
        IMPLEMENT,
        HORIMETER,
    ];
}

/// Parsed-but-untyped delimited table
struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

/// Record Normalizer: raw bytes → typed telemetry records
pub struct RecordNormalizer {
    class: EquipmentClass,
}

impl RecordNormalizer {
    pub fn new(class: EquipmentClass) -> Self {
        Self { class }
    }

    /// Equipment class this normalizer was built for
    pub fn class(&self) -> EquipmentClass {
        self.class
    }

    /// Read and normalize a telemetry file from disk.
    pub fn normalize_file(&self, path: &Path) -> Result<Vec<TelemetryRecord>, IngestError> {
        let bytes = std::fs::read(path).map_err(|source| IngestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.normalize_bytes(&bytes, path)
    }

    /// Normalize raw file bytes, walking the encoding fallback chain.
    ///
    /// The first encoding that both decodes and parses as `;`-delimited
    /// text wins. Exhausting the chain is an error naming every attempted
    /// encoding.
    pub fn normalize_bytes(
        &self,
        bytes: &[u8],
        source: &Path,
    ) -> Result<Vec<TelemetryRecord>, IngestError> {
        for encoding in Encoding::CHAIN {
            let Some(text) = decode::decode(bytes, encoding) else {
                warn!(
                    path = %source.display(),
                    encoding = encoding.label(),
                    "Decode failed, trying next encoding"
                );
                continue;
            };
            match parse_table(&text) {
                Ok(table) => {
                    info!(
                        path = %source.display(),
                        encoding = encoding.label(),
                        rows = table.rows.len(),
                        "Telemetry file read"
                    );
                    return self.normalize_table(table, source);
                }
                Err(e) => {
                    warn!(
                        path = %source.display(),
                        encoding = encoding.label(),
                        error = %e,
                        "Parse failed, trying next encoding"
                    );
                }
            }
        }

        let attempted = Encoding::CHAIN
            .iter()
            .map(|e| e.label())
            .collect::<Vec<_>>()
            .join(", ");
        Err(IngestError::UnreadableFile {
            path: source.to_path_buf(),
            attempted,
        })
    }

    fn normalize_table(
        &self,
        table: RawTable,
        source: &Path,
    ) -> Result<Vec<TelemetryRecord>, IngestError> {
        let index: HashMap<&str, usize> = table
            .headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.as_str(), i))
            .collect();

        // Header-only files propagate as empty-but-shaped, not as errors
        if table.rows.is_empty() {
            info!(path = %source.display(), "File contains headers only — empty batch");
            return Ok(Vec::new());
        }

        let has_time = index.contains_key(columns::TIME) || index.contains_key(columns::DATETIME);
        let mut missing: Vec<String> = [columns::EQUIPMENT, columns::OPERATOR, columns::OPERATION_GROUP]
            .iter()
            .filter(|c| !index.contains_key(**c))
            .map(|c| c.to_string())
            .collect();
        if !has_time {
            missing.push(columns::TIME.to_string());
        }
        if !missing.is_empty() {
            return Err(IngestError::MissingColumns {
                path: source.to_path_buf(),
                columns: missing,
            });
        }

        let extra_headers: Vec<(usize, &String)> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(_, h)| !columns::KNOWN.contains(&h.as_str()))
            .collect();

        fn cell<'a>(index: &HashMap<&str, usize>, row: &'a [String], name: &str) -> &'a str {
            index
                .get(name)
                .and_then(|&i| row.get(i))
                .map(|s| s.trim())
                .unwrap_or("")
        }

        let mut records = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            // Combined date/time column splits into separate fields
            let (date_text, time_text) = if index.contains_key(columns::DATETIME) {
                let combined = cell(&index, row, columns::DATETIME);
                match combined.split_once(' ') {
                    Some((d, t)) => (d.to_string(), t.to_string()),
                    None => (combined.to_string(), String::new()),
                }
            } else {
                (
                    cell(&index, row, columns::DATE).to_string(),
                    cell(&index, row, columns::TIME).to_string(),
                )
            };

            let mut record = TelemetryRecord {
                equipment: cell(&index, row, columns::EQUIPMENT).to_string(),
                front_group: cell(&index, row, columns::FRONT_GROUP).to_string(),
                front_code: cell(&index, row, columns::FRONT_CODE).to_string(),
                operator: cell(&index, row, columns::OPERATOR).to_string(),
                date: parse_date(&date_text),
                time: parse_time(&time_text),
                state: cell(&index, row, columns::STATE).to_string(),
                operational_state: cell(&index, row, columns::OPERATIONAL_STATE).to_string(),
                operation: cell(&index, row, columns::OPERATION).to_string(),
                operation_code: cell(&index, row, columns::OPERATION_CODE).to_string(),
                operation_group: cell(&index, row, columns::OPERATION_GROUP).to_string(),
                engine_on: parse_bool_like(cell(&index, row, columns::ENGINE_ON)).unwrap_or(false),
                engine_rpm: parse_number(cell(&index, row, columns::ENGINE_RPM)).unwrap_or(0.0),
                speed: parse_number(cell(&index, row, columns::SPEED)).unwrap_or(0.0),
                rtk: parse_bool_like(cell(&index, row, columns::RTK)).unwrap_or(false),
                elevator_on: parse_bool_like(cell(&index, row, columns::ELEVATOR)).unwrap_or(false),
                cutting_pressure: parse_number(cell(&index, row, columns::CUTTING_PRESSURE)).unwrap_or(0.0),
                field_cruiser: parse_bool_like(cell(&index, row, columns::FIELD_CRUISER)).unwrap_or(false),
                implement_on: parse_bool_like(cell(&index, row, columns::IMPLEMENT)).unwrap_or(false),
                horimeter: parse_number(cell(&index, row, columns::HORIMETER)),
                ..Default::default()
            };

            for (idx, header) in &extra_headers {
                if let Some(value) = row.get(*idx) {
                    record
                        .extras
                        .insert((*header).clone(), value.trim().to_string());
                }
            }

            records.push(record);
        }

        Ok(records)
    }
}

/// Parse `;`-delimited text into headers + rows. Column names are
/// whitespace-trimmed; short rows are padded by lookup, long rows keep
/// their extra fields.
fn parse_table(text: &str) -> Result<RawTable, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut headers: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<String>> = Vec::new();

    for (i, result) in reader.records().enumerate() {
        let record = result?;
        if i == 0 {
            headers = record.iter().map(|f| f.trim().to_string()).collect();
        } else {
            rows.push(record.iter().map(|f| f.to_string()).collect());
        }
    }

    Ok(RawTable { headers, rows })
}

/// Parse a numeric cell, accepting the pt-BR decimal comma.
pub fn parse_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    t.parse::<f64>()
        .ok()
        .or_else(|| t.replace(',', ".").parse::<f64>().ok())
}

/// Coerce boolean-like text to a flag. Accepts the platform's
/// `LIGADO`/`DESLIGADO` and `VERDADEIRO`/`FALSO` vocabularies plus
/// numeric 0/1.
pub fn parse_bool_like(s: &str) -> Option<bool> {
    match s.trim().to_uppercase().as_str() {
        "LIGADO" | "VERDADEIRO" | "TRUE" | "SIM" => Some(true),
        "DESLIGADO" | "FALSO" | "FALSE" | "NAO" | "NÃO" => Some(false),
        other => parse_number(other).map(|v| v != 0.0),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(t, "%d/%m/%Y")
        .or_else(|_| NaiveDate::parse_from_str(t, "%Y-%m-%d"))
        .ok()
}

fn parse_time(s: &str) -> Option<NaiveTime> {
    let t = s.trim();
    if t.is_empty() {
        return None;
    }
    NaiveTime::parse_from_str(t, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .ok()
}
