//! CSV ingest and schema validation.
//!
//! This module turns the biweekly case-count CSV into an immutable
//! `CaseTable`.
//!
//! Design goals:
//! - **Strict schema** for the three required columns (fail before reading rows)
//! - **Strict numbers**: a cases cell that is not a number aborts the load
//! - **No date checks**: `Day` is kept as text and validated per selection
//! - **Separation of concerns**: no filtering or series logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use tracing::{debug, info};

use crate::domain::{CaseRecord, CaseTable, TableSchema};
use crate::error::LoadError;

/// Load the case table from a CSV file on disk.
pub fn load_table(path: &Path, schema: &TableSchema) -> Result<CaseTable, LoadError> {
    let file = File::open(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut table = load_table_from_reader(file, schema)?;
    table.source = Some(path.to_path_buf());

    info!(
        source = %path.display(),
        rows = table.len(),
        "loaded case table"
    );
    Ok(table)
}

/// Load the case table from any reader (used for files and in-memory data).
pub fn load_table_from_reader<R: Read>(reader: R, schema: &TableSchema) -> Result<CaseTable, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let columns = resolve_columns(&headers, schema)?;
    debug!(?columns, header_len = headers.len(), "resolved schema columns");

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result?;
        // The header occupies line 1, so data rows start at line 2.
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(idx as u64 + 2);
        records.push(parse_row(&record, &columns, schema, line)?);
    }

    Ok(CaseTable {
        source: None,
        schema: schema.clone(),
        records,
    })
}

/// Positions of the schema columns within a CSV record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnIndex {
    entity: usize,
    day: usize,
    biweekly_cases: usize,
}

fn resolve_columns(headers: &StringRecord, schema: &TableSchema) -> Result<ColumnIndex, LoadError> {
    let header_map = build_header_map(headers);

    let missing: Vec<String> = schema
        .columns()
        .iter()
        .filter(|name| !header_map.contains_key(**name))
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::Schema { missing });
    }

    // All three are present, checked above.
    Ok(ColumnIndex {
        entity: header_map[schema.entity.as_str()],
        day: header_map[schema.day.as_str()],
        biweekly_cases: header_map[schema.biweekly_cases.as_str()],
    })
}

fn build_header_map(headers: &StringRecord) -> HashMap<&str, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins if a header is repeated.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> &str {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    name.trim_start_matches('\u{feff}').trim()
}

fn parse_row(
    record: &StringRecord,
    columns: &ColumnIndex,
    schema: &TableSchema,
    line: u64,
) -> Result<CaseRecord, LoadError> {
    let entity = required_field(record, columns.entity, &schema.entity, line)?.to_string();
    let day = required_field(record, columns.day, &schema.day, line)?.to_string();

    let raw_cases = required_field(record, columns.biweekly_cases, &schema.biweekly_cases, line)?;
    let biweekly_cases = parse_cases(raw_cases).ok_or_else(|| LoadError::MalformedValue {
        line,
        column: schema.biweekly_cases.clone(),
        value: raw_cases.to_string(),
    })?;

    Ok(CaseRecord {
        entity,
        day,
        biweekly_cases,
    })
}

/// A short row (allowed by the flexible reader) has no cell for this column.
fn required_field<'r>(
    record: &'r StringRecord,
    idx: usize,
    column: &str,
    line: u64,
) -> Result<&'r str, LoadError> {
    record.get(idx).ok_or_else(|| LoadError::MalformedValue {
        line,
        column: column.to_string(),
        value: String::new(),
    })
}

fn parse_cases(s: &str) -> Option<f64> {
    let v = s.parse::<f64>().ok()?;
    if v.is_finite() { Some(v) } else { None }
}
