//! Column header normalization.
//!
//! Headers are lowercased, stripped of everything but alphanumerics,
//! underscores and whitespace, and whitespace runs become a single `_`.
//! Collisions receive `_2`, `_3`, ... suffixes in first-seen order.

use std::collections::HashSet;

use log::info;

use crate::{report::ProcessingLog, table::Table};

/// Normalizes one header. Idempotent: a normalized name maps to itself.
pub fn normalize_column_name(name: &str) -> String {
    let lowered = name.to_lowercase();
    let kept = lowered
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect::<String>();
    kept.split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .trim_matches('_')
        .to_string()
}

/// Normalizes a full header row, guaranteeing unique, non-empty names.
pub fn normalize_headers<S: AsRef<str>>(headers: &[S]) -> Vec<String> {
    let mut used = HashSet::with_capacity(headers.len());
    let mut names = Vec::with_capacity(headers.len());
    for (idx, header) in headers.iter().enumerate() {
        let mut base = normalize_column_name(header.as_ref());
        if base.is_empty() {
            base = format!("field_{idx}");
        }
        let name = if used.contains(&base) {
            (2usize..)
                .map(|n| format!("{base}_{n}"))
                .find(|candidate| !used.contains(candidate))
                .unwrap_or_default()
        } else {
            base
        };
        used.insert(name.clone());
        names.push(name);
    }
    names
}

pub fn standardize_column_names(table: &mut Table, log: &mut ProcessingLog) {
    let originals = table
        .columns
        .iter()
        .map(|c| c.original.clone())
        .collect::<Vec<_>>();
    let names = normalize_headers(&originals);
    for (column, name) in table.columns.iter_mut().zip(names) {
        column.name = name;
    }
    info!("Standardized column names: {:?}", table.column_names());
    log.record("Standardized column names");
}
