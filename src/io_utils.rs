//! I/O utilities for loading and writing delimited files.
//!
//! All file I/O in csv-normalize flows through this module. It provides:
//!
//! - **Delimiter resolution**: extension-based auto-detection (`.csv` → comma,
//!   `.tsv` → tab) with manual override support.
//! - **Encoding fallback**: the input is decoded with each of
//!   [`CANDIDATE_ENCODINGS`] in turn via `encoding_rs`; the first one that
//!   decodes without error is used. A file can decode cleanly under the wrong
//!   encoding, so the chosen label is reported rather than trusted.
//! - **Writing**: output is always UTF-8 with minimal quoting.

use std::{
    fs::{self, File},
    io::{BufWriter, Read, Write},
    path::Path,
};

use csv::QuoteStyle;
use encoding_rs::Encoding;
use log::{debug, info};

use crate::{
    error::{NormalizeError, NormalizeResult},
    table::Table,
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

/// Encodings tried in order when loading input, as (reported name, WHATWG label).
pub const CANDIDATE_ENCODINGS: &[(&str, &str)] = &[
    ("utf-8", "utf-8"),
    ("latin-1", "latin1"),
    ("iso-8859-1", "iso-8859-1"),
    ("windows-1252", "windows-1252"),
];

/// A decoded input file together with the encoding label that decoded it.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub encoding: &'static str,
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_output_delimiter(path: &Path, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delim) = provided {
        return delim;
    }
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        Some(ext) if ext.eq_ignore_ascii_case("csv") => DEFAULT_CSV_DELIMITER,
        _ => fallback,
    }
}

pub fn open_csv_reader<R>(reader: R, delimiter: u8) -> csv::Reader<R>
where
    R: Read,
{
    let mut builder = csv::ReaderBuilder::new();
    builder
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(true);
    builder.from_reader(reader)
}

/// Decodes `bytes` strictly, stripping a byte-order mark that matches the encoding.
pub fn decode_bytes(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (text, had_errors) = encoding.decode_with_bom_removal(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

/// Tries each candidate encoding in order and returns the first clean decode.
pub fn decode_with_fallback(
    path: &Path,
    bytes: &[u8],
) -> NormalizeResult<(String, &'static str)> {
    for &(label, whatwg) in CANDIDATE_ENCODINGS {
        let Some(encoding) = Encoding::for_label(whatwg.as_bytes()) else {
            debug!("Skipping unknown encoding label '{whatwg}'");
            continue;
        };
        match decode_bytes(bytes, encoding) {
            Some(text) => {
                info!("Successfully loaded {} with {label} encoding", path.display());
                return Ok((text, label));
            }
            None => debug!("Decoding {} as {label} failed", path.display()),
        }
    }
    Err(NormalizeError::Undecodable {
        path: path.to_path_buf(),
        attempted: CANDIDATE_ENCODINGS.iter().map(|(label, _)| *label).collect(),
    })
}

/// Parses decoded text into a raw table. Input without a header row is
/// rejected. Short rows are padded with empty cells; rows wider than the
/// header are rejected.
pub fn parse_table(text: &str, delimiter: u8) -> NormalizeResult<Table> {
    let mut reader = open_csv_reader(text.as_bytes(), delimiter);
    let headers = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if headers.is_empty() {
        return Err(NormalizeError::NoHeader);
    }
    let width = headers.len();
    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() > width {
            return Err(NormalizeError::RaggedRow {
                row: idx + 2,
                found: record.len(),
                expected: width,
            });
        }
        let mut row = record.iter().map(str::to_string).collect::<Vec<_>>();
        if row.len() < width {
            debug!("Padding row {} from {} to {width} field(s)", idx + 2, row.len());
            row.resize(width, String::new());
        }
        rows.push(row);
    }
    Ok(Table::from_raw(headers, rows))
}

/// Reads, decodes and parses the input file.
pub fn load_table(path: &Path, delimiter: u8) -> NormalizeResult<LoadedTable> {
    let bytes = fs::read(path).map_err(|source| NormalizeError::io(path, source))?;
    let (text, encoding) = decode_with_fallback(path, &bytes)?;
    let table = parse_table(&text, delimiter)?;
    info!("Shape: ({}, {})", table.row_count(), table.column_count());
    Ok(LoadedTable { table, encoding })
}

pub fn open_csv_writer(path: &Path, delimiter: u8) -> NormalizeResult<csv::Writer<Box<dyn Write>>> {
    let file = File::create(path).map_err(|source| NormalizeError::io(path, source))?;
    let writer: Box<dyn Write> = Box::new(BufWriter::new(file));
    let mut builder = csv::WriterBuilder::new();
    builder
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true);
    Ok(builder.from_writer(writer))
}

/// Writes the normalized header and every row as UTF-8.
pub fn write_table(table: &Table, path: &Path, delimiter: u8) -> NormalizeResult<()> {
    let mut writer = open_csv_writer(path, delimiter)?;
    writer.write_record(table.columns.iter().map(|c| c.name.as_str()))?;
    for row in &table.rows {
        writer.write_record(Table::display_row(row))?;
    }
    writer
        .flush()
        .map_err(|source| NormalizeError::io(path, source))?;
    Ok(())
}
