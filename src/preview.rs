//! The `probe` command: show how a file's columns would be named and
//! classified, rendered as an aligned text table.

use std::borrow::Cow;
use std::fmt::Write as _;

use anyhow::{Context, Result};
use log::info;

use crate::{
    classify::{self, SAMPLE_SIZE},
    cli::ProbeArgs,
    columns, io_utils,
    report::ProcessingLog,
    table::Table,
};

pub fn execute(args: &ProbeArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let loaded = io_utils::load_table(&args.input, delimiter)
        .with_context(|| format!("Loading input from {:?}", args.input))?;
    let mut table = loaded.table;
    let rows = probe_rows(&mut table);
    let headers = ["#", "header", "name", "type", "sample"]
        .iter()
        .map(|h| h.to_string())
        .collect::<Vec<_>>();
    print!("{}", render_table(&headers, &rows));
    info!(
        "Probed {} column(s) across {} row(s) decoded as {}",
        table.column_count(),
        table.row_count(),
        loaded.encoding
    );
    Ok(())
}

/// Names and classifies the columns of `table`, returning one display row per
/// column: position, original header, normalized name, type, first sample.
pub fn probe_rows(table: &mut Table) -> Vec<Vec<String>> {
    columns::standardize_column_names(table, &mut ProcessingLog::default());
    classify::classify_table(table);
    (0..table.column_count())
        .map(|idx| {
            let first = table
                .sample(idx, SAMPLE_SIZE)
                .first()
                .map(|s| s.to_string())
                .unwrap_or_default();
            let column = &table.columns[idx];
            vec![
                (idx + 1).to_string(),
                column.original.clone(),
                column.name.clone(),
                column
                    .classification()
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
                first,
            ]
        })
        .collect()
}

/// Renders `rows` below a header line and a dashed rule. Cells are
/// left-aligned to the widest value in their column, two spaces apart.
pub fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let widths = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .filter_map(|row| row.get(idx))
                .map(|cell| cell.chars().count())
                .fold(header.chars().count().max(1), usize::max)
        })
        .collect::<Vec<_>>();
    let rule_widths = widths.iter().map(|w| (*w).max(3)).collect::<Vec<_>>();
    let rule = rule_widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();

    let mut output = String::new();
    let lines = [(headers, &widths), (rule.as_slice(), &rule_widths)]
        .into_iter()
        .chain(rows.iter().map(|row| (row.as_slice(), &widths)));
    for (cells, widths) in lines {
        let _ = writeln!(output, "{}", aligned_line(cells, widths));
    }
    output
}

fn aligned_line(cells: &[String], widths: &[usize]) -> String {
    let padded = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", single_line(cell), width = *width))
        .collect::<Vec<_>>();
    padded.join("  ").trim_end().to_string()
}

fn single_line(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io_utils::parse_table;

    #[test]
    fn probe_rows_report_names_and_types() {
        let mut table = parse_table(
            "Order Date,Price,Notes\n,\"$5.00\",first\n01/02/2024,7,\n",
            b',',
        )
        .unwrap();
        let rows = probe_rows(&mut table);
        assert_eq!(
            rows,
            vec![
                vec!["1", "Order Date", "order_date", "date", "01/02/2024"],
                vec!["2", "Price", "price", "numeric", "$5.00"],
                vec!["3", "Notes", "notes", "text", "first"],
            ]
        );
    }

    #[test]
    fn render_table_aligns_columns() {
        let headers = vec!["id".to_string(), "name".to_string()];
        let rows = vec![
            vec!["1".to_string(), "Zoë".to_string()],
            vec!["22".to_string(), "a\tb".to_string()],
        ];
        let rendered = render_table(&headers, &rows);
        assert_eq!(rendered, "id  name\n---  ----\n1   Zoë\n22  a b\n");
    }
}
