//! The `process` command: load, normalize, write output and report.
//!
//! [`normalize_table`] runs the in-memory stages in their fixed order:
//! column naming, classification, date then numeric normalization,
//! missing-value filling and deduplication. Every stage appends to the
//! [`ProcessingLog`] it is handed; nothing is logged globally except through
//! the `log` facade.

use anyhow::{Context, Result};
use log::info;

use crate::{
    classify, columns,
    cli::ProcessArgs,
    config::FillConfig,
    dedup, io_utils, missing, normalize,
    report::{ProcessingLog, Report, report_path_for},
    table::Table,
};

/// Row and column counts before and after a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub input_rows: usize,
    pub output_rows: usize,
    pub columns: usize,
    pub duplicates_removed: usize,
}

pub fn normalize_table(
    table: &mut Table,
    config: &FillConfig,
    log: &mut ProcessingLog,
) -> RunSummary {
    let input_rows = table.row_count();
    columns::standardize_column_names(table, log);
    classify::classify_table(table);
    normalize::normalize_columns(table, log);
    missing::handle_missing_values(table, config, log);
    let duplicates_removed = dedup::remove_duplicates(table, log);
    RunSummary {
        input_rows,
        output_rows: table.row_count(),
        columns: table.column_count(),
        duplicates_removed,
    }
}

pub fn execute(args: &ProcessArgs) -> Result<()> {
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let output_delimiter =
        io_utils::resolve_output_delimiter(&args.output, args.output_delimiter, delimiter);
    info!(
        "Processing '{}' -> '{}' (delimiter '{}', output '{}')",
        args.input.display(),
        args.output.display(),
        crate::printable_delimiter(delimiter),
        crate::printable_delimiter(output_delimiter)
    );

    let config = match &args.config {
        Some(path) => {
            FillConfig::load(path).with_context(|| format!("Loading config from {path:?}"))?
        }
        None => FillConfig::default(),
    };

    let loaded = io_utils::load_table(&args.input, delimiter)
        .with_context(|| format!("Loading input from {:?}", args.input))?;
    let mut table = loaded.table;
    let mut log = ProcessingLog::default();
    log.record(format!(
        "Loaded CSV with {} encoding - {} rows, {} columns",
        loaded.encoding,
        table.row_count(),
        table.column_count()
    ));

    let summary = normalize_table(&mut table, &config, &mut log);

    io_utils::write_table(&table, &args.output, output_delimiter)
        .with_context(|| format!("Writing output to {:?}", args.output))?;
    info!("Saved processed CSV to: {}", args.output.display());

    let report_path = report_path_for(&args.output);
    Report::build(&args.input, &args.output, &table, log)
        .save(&report_path)
        .with_context(|| format!("Writing report to {report_path:?}"))?;

    info!(
        "Normalized {} row(s) into {} row(s) across {} column(s)",
        summary.input_rows, summary.output_rows, summary.columns
    );
    println!(
        "SUCCESS: Processed {} -> {}",
        args.input.display(),
        args.output.display()
    );
    Ok(())
}
