//! In-memory table model shared by every pipeline stage.
//!
//! A [`Table`] owns its [`Column`] descriptors and positional rows. Each row
//! holds exactly one [`Value`] per column, in column order; stages rewrite
//! cells and drop rows in place but never reorder or add columns.

use serde::Serialize;

use crate::{classify::Classification, data::Value};

/// How a column's cells are represented once normalization has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    Numeric,
    Timestamp,
    Text,
}

impl From<Classification> for StorageType {
    fn from(classification: Classification) -> Self {
        match classification {
            Classification::DateLike => StorageType::Timestamp,
            Classification::NumericLike => StorageType::Numeric,
            Classification::Textual => StorageType::Text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Header exactly as read from the input.
    pub original: String,
    /// Normalized, unique identifier; equals `original` until renamed.
    pub name: String,
    classification: Option<Classification>,
    storage: Option<StorageType>,
}

impl Column {
    pub fn new(original: impl Into<String>) -> Self {
        let original = original.into();
        Self {
            name: original.clone(),
            original,
            classification: None,
            storage: None,
        }
    }

    pub fn classification(&self) -> Option<Classification> {
        self.classification
    }

    /// Records the classification. The first call wins; later calls are ignored.
    pub fn classify(&mut self, classification: Classification) -> Classification {
        *self.classification.get_or_insert(classification)
    }

    /// Overrides the storage type implied by the classification.
    pub fn store_as(&mut self, storage: StorageType) {
        self.storage = Some(storage);
    }

    /// Explicit storage if set, else the one implied by the classification;
    /// unclassified columns are text.
    pub fn storage_type(&self) -> StorageType {
        self.storage
            .or_else(|| self.classification.map(StorageType::from))
            .unwrap_or(StorageType::Text)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<Column>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Builds a table from raw headers and raw rows. Rows must already match the
    /// header width.
    pub fn from_raw(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let columns = headers.into_iter().map(Column::new).collect();
        let rows = rows
            .into_iter()
            .map(|row| row.iter().map(|cell| Value::from_raw(cell)).collect())
            .collect();
        Self { columns, rows }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }

    /// Iterates the cells of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }

    /// First `limit` non-empty raw values of a column.
    pub fn sample(&self, index: usize, limit: usize) -> Vec<&str> {
        self.column_values(index)
            .filter_map(Value::raw)
            .filter(|value| !value.trim().is_empty())
            .take(limit)
            .collect()
    }

    /// Rewrites every cell of one column.
    pub fn map_column(&mut self, index: usize, mut f: impl FnMut(Value) -> Value) {
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(index) {
                let current = std::mem::replace(cell, Value::Empty);
                *cell = f(current);
            }
        }
    }

    /// Cells of a row rendered for CSV output.
    pub fn display_row(row: &[Value]) -> Vec<String> {
        row.iter().map(Value::as_display).collect()
    }
}
