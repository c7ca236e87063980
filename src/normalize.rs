//! Per-column value normalization.
//!
//! Date columns are rewritten to [`Value::Timestamp`] and numeric columns to
//! [`Value::Number`]. A cell that cannot be parsed becomes [`Value::Empty`]
//! and is later filled by the missing-value resolver; normalization never
//! aborts a column.

use chrono::NaiveDateTime;
use log::{debug, info, warn};
use rust_decimal::Decimal;

use crate::{
    classify::Classification,
    data::{
        CellOutcome, Value, looks_plain_number, parse_decimal, parse_timestamp,
        strip_numeric_decoration,
    },
    report::ProcessingLog,
    table::{StorageType, Table},
};

/// Counts of what happened to the non-empty cells of one column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnOutcome {
    pub parsed: usize,
    pub failed: usize,
}

pub fn timestamp_outcome(cell: &Value) -> CellOutcome<NaiveDateTime> {
    match cell {
        Value::Raw(raw) if raw.trim().is_empty() => CellOutcome::Missing,
        Value::Raw(raw) => CellOutcome::from_option(parse_timestamp(raw)),
        Value::Timestamp(ts) => CellOutcome::Parsed(*ts),
        _ => CellOutcome::Missing,
    }
}

pub fn number_outcome(cell: &Value) -> CellOutcome<Decimal> {
    match cell {
        Value::Raw(raw) if raw.trim().is_empty() => CellOutcome::Missing,
        Value::Raw(raw) => {
            let parsed = parse_decimal(raw);
            if parsed.is_none() && looks_plain_number(&strip_numeric_decoration(raw)) {
                warn!("Value {raw:?} is outside the supported numeric range and was cleared");
            }
            CellOutcome::from_option(parsed)
        }
        Value::Number(d) => CellOutcome::Parsed(*d),
        _ => CellOutcome::Missing,
    }
}

fn rewrite_column<T>(
    table: &mut Table,
    index: usize,
    parse: impl Fn(&Value) -> CellOutcome<T>,
    wrap: impl Fn(T) -> Value,
) -> ColumnOutcome {
    let mut outcome = ColumnOutcome::default();
    let name = table.columns[index].name.clone();
    table.map_column(index, |cell| match parse(&cell) {
        CellOutcome::Parsed(value) => {
            outcome.parsed += 1;
            wrap(value)
        }
        CellOutcome::Failed => {
            outcome.failed += 1;
            debug!("Cleared unparseable value {:?} in column '{name}'", cell.as_display());
            Value::Empty
        }
        CellOutcome::Missing => Value::Empty,
    });
    outcome
}

/// Rewrites one date column to canonical timestamps.
pub fn normalize_date_column(
    table: &mut Table,
    index: usize,
    log: &mut ProcessingLog,
) -> ColumnOutcome {
    let outcome = rewrite_column(table, index, timestamp_outcome, Value::Timestamp);
    let name = &table.columns[index].name;
    info!("Normalized date column: {name}");
    if outcome.failed > 0 {
        log.record(format!(
            "Normalized date column: {name} ({} unparseable value(s) cleared)",
            outcome.failed
        ));
    } else {
        log.record(format!("Normalized date column: {name}"));
    }
    outcome
}

/// Rewrites one numeric column, stripping currency symbols and grouping commas.
pub fn normalize_numeric_column(
    table: &mut Table,
    index: usize,
    log: &mut ProcessingLog,
) -> ColumnOutcome {
    let outcome = rewrite_column(table, index, number_outcome, Value::Number);
    let name = &table.columns[index].name;
    info!("Converted column {name} to numeric");
    if outcome.failed > 0 {
        log.record(format!(
            "Converted column {name} to numeric ({} unparseable value(s) cleared)",
            outcome.failed
        ));
    } else {
        log.record(format!("Converted column {name} to numeric"));
    }
    outcome
}

/// Converts a text column whose values are all plain numbers. These columns
/// already hold numbers, so nothing is added to the processing log.
pub fn convert_plain_numeric_column(table: &mut Table, index: usize) -> ColumnOutcome {
    let outcome = rewrite_column(table, index, number_outcome, Value::Number);
    debug!(
        "Stored plain numeric column {} as numbers",
        table.columns[index].name
    );
    outcome
}

/// Normalizes every date column, then every numeric column, in column order.
/// Text columns with numeric storage are converted last.
pub fn normalize_columns(table: &mut Table, log: &mut ProcessingLog) {
    let by_class = |table: &Table, wanted: Classification| {
        table
            .columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.classification() == Some(wanted))
            .map(|(idx, _)| idx)
            .collect::<Vec<_>>()
    };
    for idx in by_class(table, Classification::DateLike) {
        normalize_date_column(table, idx, log);
    }
    for idx in by_class(table, Classification::NumericLike) {
        normalize_numeric_column(table, idx, log);
    }
    let plain_numeric = by_class(table, Classification::Textual)
        .into_iter()
        .filter(|idx| table.columns[*idx].storage_type() == StorageType::Numeric)
        .collect::<Vec<_>>();
    for idx in plain_numeric {
        convert_plain_numeric_column(table, idx);
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::classify::classify_table;

    fn table(header: &str, values: &[&str]) -> Table {
        Table::from_raw(
            vec![header.to_string()],
            values.iter().map(|v| vec![v.to_string()]).collect(),
        )
    }

    #[test]
    fn date_column_degrades_per_cell() {
        let mut t = table("order_date", &["03/15/2023", "garbage", "", "2023-01-02 08:15:00"]);
        let mut log = ProcessingLog::default();
        let outcome = normalize_date_column(&mut t, 0, &mut log);
        assert_eq!(outcome, ColumnOutcome { parsed: 2, failed: 1 });
        let rendered = t.column_values(0).map(Value::as_display).collect::<Vec<_>>();
        assert_eq!(
            rendered,
            vec!["2023-03-15 00:00:00", "", "", "2023-01-02 08:15:00"]
        );
        assert_eq!(
            log.entries(),
            ["Normalized date column: order_date (1 unparseable value(s) cleared)"]
        );
    }

    #[test]
    fn numeric_column_strips_decoration() {
        let mut t = table("price", &["$1,234.56", "€10", "n/a", "call us"]);
        let mut log = ProcessingLog::default();
        let outcome = normalize_numeric_column(&mut t, 0, &mut log);
        assert_eq!(outcome, ColumnOutcome { parsed: 2, failed: 1 });
        assert_eq!(
            t.rows[0][0],
            Value::Number(Decimal::from_str("1234.56").unwrap())
        );
        assert_eq!(t.rows[1][0], Value::Number(Decimal::from(10)));
        assert_eq!(t.rows[2][0], Value::Empty);
        assert_eq!(t.rows[3][0], Value::Empty);
    }

    #[test]
    fn whitespace_cells_are_missing_not_failed() {
        let mut t = table("price", &["  ", "3"]);
        let outcome = normalize_numeric_column(&mut t, 0, &mut ProcessingLog::default());
        assert_eq!(outcome, ColumnOutcome { parsed: 1, failed: 0 });
        assert_eq!(t.rows[0][0], Value::Empty);
    }

    #[test]
    fn out_of_range_numbers_fail_and_are_cleared() {
        let huge = Value::Raw("$99999999999999999999999999999999".into());
        assert!(number_outcome(&huge).is_failed());
    }

    #[test]
    fn plain_numeric_text_columns_become_numbers_silently() {
        let mut t = Table::from_raw(
            vec!["balance".into(), "name".into()],
            vec![
                vec!["-5".into(), "a".into()],
                vec!["".into(), "b".into()],
                vec!["-10.5".into(), "c".into()],
            ],
        );
        classify_table(&mut t);
        let mut log = ProcessingLog::default();
        normalize_columns(&mut t, &mut log);
        assert_eq!(t.rows[0][0], Value::Number(Decimal::from(-5)));
        assert_eq!(t.rows[1][0], Value::Empty);
        assert_eq!(
            t.rows[2][0],
            Value::Number(Decimal::from_str("-10.5").unwrap())
        );
        assert_eq!(t.rows[0][1], Value::Raw("a".into()));
        assert!(log.entries().is_empty());
    }

    #[test]
    fn normalize_columns_runs_dates_before_numbers() {
        let mut t = Table::from_raw(
            vec!["when".into(), "amount".into(), "label".into()],
            vec![
                vec!["2024-02-29".into(), "1,000".into(), "12".into()],
                vec!["02/03/2024".into(), "5.5".into(), "abc".into()],
            ],
        );
        classify_table(&mut t);
        let mut log = ProcessingLog::default();
        normalize_columns(&mut t, &mut log);
        assert_eq!(t.rows[0][0].as_display(), "2024-02-29 00:00:00");
        assert_eq!(t.rows[1][0].as_display(), "2024-02-03 00:00:00");
        assert_eq!(t.rows[0][1], Value::Number(Decimal::from(1000)));
        assert_eq!(t.rows[1][1].as_display(), "5.5");
        assert_eq!(
            log.entries(),
            [
                "Normalized date column: when",
                "Converted column amount to numeric",
                "Converted column label to numeric (1 unparseable value(s) cleared)",
            ]
        );
    }
}
