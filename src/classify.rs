//! Column type classification.
//!
//! A column is inspected once: its header is checked for date keywords and
//! the first [`SAMPLE_SIZE`] non-empty values are checked against the date
//! patterns, then against the decorated-number pattern. Only the sample is
//! examined, so a column whose early rows look numeric but later rows do not
//! is still classified numeric; the normalizers then clear what fails.

use std::{fmt, sync::LazyLock};

use log::{debug, info};
use regex::Regex;
use serde::Serialize;

use crate::{
    data::{Value, looks_plain_number, parse_decimal},
    table::{StorageType, Table},
};

/// Number of non-empty values sampled per column.
pub const SAMPLE_SIZE: usize = 10;

const DATE_KEYWORDS: &[&str] = &["date", "fecha", "time", "hora", "created", "updated"];

static DATE_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"\d{4}-\d{2}-\d{2}",
        r"\d{2}/\d{2}/\d{4}",
        r"\d{2}-\d{2}-\d{4}",
        r"\d{1,2}/\d{1,2}/\d{2,4}",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid date pattern"))
    .collect()
});

static NUMERIC_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[$€£]?[\d,]+\.?\d*$").expect("valid numeric pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Classification {
    DateLike,
    NumericLike,
    Textual,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::DateLike => "date",
            Classification::NumericLike => "numeric",
            Classification::Textual => "text",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn has_date_keyword(name: &str) -> bool {
    let lowered = name.to_lowercase();
    DATE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword))
}

pub fn looks_like_date(value: &str) -> bool {
    let trimmed = value.trim();
    DATE_PATTERNS.iter().any(|pattern| pattern.is_match(trimmed))
}

pub fn looks_numeric(value: &str) -> bool {
    NUMERIC_PATTERN.is_match(value.trim())
}

/// Classifies a column from its name and a sample of its non-empty values.
pub fn classify_column<S: AsRef<str>>(name: &str, sample: &[S]) -> Classification {
    if has_date_keyword(name) || sample.iter().any(|v| looks_like_date(v.as_ref())) {
        Classification::DateLike
    } else if sample.iter().any(|v| looks_numeric(v.as_ref())) {
        Classification::NumericLike
    } else {
        Classification::Textual
    }
}

/// True when the column has at least one value and every non-blank value is
/// an undecorated number in range, such as `-5` or `1e3`.
fn holds_only_plain_numbers(table: &Table, index: usize) -> bool {
    let mut values = table
        .column_values(index)
        .filter_map(Value::raw)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .peekable();
    values.peek().is_some()
        && values.all(|value| looks_plain_number(value) && parse_decimal(value).is_some())
}

/// Classifies every column of the table, in column order. A textual column
/// whose values are all plain numbers keeps its classification but is
/// stored as numeric.
pub fn classify_table(table: &mut Table) -> Vec<Classification> {
    let mut classifications = Vec::with_capacity(table.column_count());
    for idx in 0..table.column_count() {
        let decided = {
            let sample = table.sample(idx, SAMPLE_SIZE);
            classify_column(&table.columns[idx].name, &sample)
        };
        let plain_numeric = holds_only_plain_numbers(table, idx);
        let column = &mut table.columns[idx];
        let classification = column.classify(decided);
        debug!("Column '{}' classified as {}", column.name, classification);
        if classification == Classification::Textual && plain_numeric {
            debug!("Column '{}' stored as numeric", column.name);
            column.store_as(StorageType::Numeric);
        }
        classifications.push(classification);
    }
    let date_columns = table
        .columns
        .iter()
        .filter(|c| c.classification() == Some(Classification::DateLike))
        .map(|c| c.name.as_str())
        .collect::<Vec<_>>();
    info!("Detected date columns: {date_columns:?}");
    classifications
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_keyword_in_name_wins_without_samples() {
        let empty: [&str; 0] = [];
        assert_eq!(classify_column("Order Date", &empty), Classification::DateLike);
        assert_eq!(classify_column("fecha_alta", &["x"]), Classification::DateLike);
        assert_eq!(classify_column("CreatedBy", &["42"]), Classification::DateLike);
    }

    #[test]
    fn date_patterns_in_samples_trigger_date_like() {
        assert_eq!(classify_column("when", &["03/15/2023"]), Classification::DateLike);
        assert_eq!(classify_column("when", &["2023-03-15"]), Classification::DateLike);
        assert_eq!(classify_column("when", &["15-03-2023"]), Classification::DateLike);
        assert_eq!(classify_column("when", &["1/2/23"]), Classification::DateLike);
        assert_eq!(
            classify_column("when", &["n/a", "shipped 2023-03-15"]),
            Classification::DateLike
        );
    }

    #[test]
    fn decorated_numbers_trigger_numeric_like() {
        assert_eq!(classify_column("Price", &["$1,234.56"]), Classification::NumericLike);
        assert_eq!(classify_column("qty", &["abc", "12"]), Classification::NumericLike);
        assert_eq!(classify_column("amount", &["€5."]), Classification::NumericLike);
        assert_eq!(classify_column("score", &[" 7 "]), Classification::NumericLike);
    }

    #[test]
    fn unmatched_samples_are_textual() {
        assert_eq!(classify_column("name", &["Alice", "Bob"]), Classification::Textual);
        assert_eq!(classify_column("delta", &["-5", "1e3"]), Classification::Textual);
        assert_eq!(classify_column("code", &["US$5"]), Classification::Textual);
    }

    #[test]
    fn classify_table_samples_only_leading_values() {
        let mut rows = vec![vec!["alpha".to_string()]; SAMPLE_SIZE];
        rows.push(vec!["99".to_string()]);
        let mut table = Table::from_raw(vec!["label".into()], rows);
        let classes = classify_table(&mut table);
        assert_eq!(classes, vec![Classification::Textual]);
    }

    #[test]
    fn signed_number_columns_stay_textual_but_store_numeric() {
        let mut table = Table::from_raw(
            vec!["balance".into(), "name".into(), "mixed".into()],
            vec![
                vec!["-5".into(), "a".into(), "-1".into()],
                vec!["".into(), "b".into(), "x".into()],
                vec!["1e3".into(), "c".into(), "".into()],
            ],
        );
        let classes = classify_table(&mut table);
        assert_eq!(classes, vec![Classification::Textual; 3]);
        assert_eq!(table.columns[0].storage_type(), StorageType::Numeric);
        assert_eq!(table.columns[1].storage_type(), StorageType::Text);
        assert_eq!(table.columns[2].storage_type(), StorageType::Text);
    }

    #[test]
    fn classify_table_skips_empty_cells_when_sampling() {
        let mut rows = vec![vec![String::new()]; SAMPLE_SIZE + 5];
        rows.push(vec!["$10".to_string()]);
        let mut table = Table::from_raw(vec!["cost".into()], rows);
        let classes = classify_table(&mut table);
        assert_eq!(classes, vec![Classification::NumericLike]);
        assert_eq!(
            table.columns[0].classification(),
            Some(Classification::NumericLike)
        );
    }
}
