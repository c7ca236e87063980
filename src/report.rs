//! Processing log and JSON report sidecar.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use chrono::Local;
use indexmap::IndexMap;
use log::info;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{
    data::Value,
    error::{NormalizeError, NormalizeResult},
    table::{StorageType, Table},
};

/// Maximum number of output rows echoed in the report.
pub const SAMPLE_ROWS: usize = 3;

/// Ordered, append-only record of the steps a run performed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessingLog {
    entries: Vec<String>,
}

impl ProcessingLog {
    pub fn record(&mut self, entry: impl Into<String>) {
        self.entries.push(entry.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<String> {
        self.entries
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub input_file: String,
    pub output_file: String,
    pub processing_timestamp: String,
    pub rows_processed: usize,
    pub columns_processed: usize,
    pub column_names: Vec<String>,
    pub processing_log: Vec<String>,
    pub data_types: IndexMap<String, StorageType>,
    pub sample_data: Vec<IndexMap<String, JsonValue>>,
}

impl Report {
    pub fn build(input: &Path, output: &Path, table: &Table, log: ProcessingLog) -> Self {
        let column_names = table.column_names();
        let data_types = table
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.storage_type()))
            .collect();
        let sample_data = table
            .rows
            .iter()
            .take(SAMPLE_ROWS)
            .map(|row| {
                column_names
                    .iter()
                    .cloned()
                    .zip(row.iter().map(cell_to_json))
                    .collect()
            })
            .collect();
        Self {
            input_file: input.display().to_string(),
            output_file: output.display().to_string(),
            processing_timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            rows_processed: table.row_count(),
            columns_processed: table.column_count(),
            column_names,
            processing_log: log.into_entries(),
            data_types,
            sample_data,
        }
    }

    pub fn save(&self, path: &Path) -> NormalizeResult<()> {
        let file = File::create(path).map_err(|source| NormalizeError::io(path, source))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .map_err(|err| NormalizeError::io(path, err.into()))?;
        writer
            .flush()
            .map_err(|source| NormalizeError::io(path, source))?;
        info!("Generated processing report: {}", path.display());
        Ok(())
    }
}

/// `out/clean.csv` reports to `out/clean_report.json`.
pub fn report_path_for(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    output.with_file_name(format!("{stem}_report.json"))
}

fn cell_to_json(cell: &Value) -> JsonValue {
    match cell {
        Value::Empty => JsonValue::Null,
        Value::Number(d) if d.scale() == 0 => d
            .to_i64()
            .map(JsonValue::from)
            .unwrap_or_else(|| JsonValue::String(d.to_string())),
        Value::Number(d) => d
            .to_string()
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(d.to_string())),
        other => JsonValue::String(other.as_display()),
    }
}
