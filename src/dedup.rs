use itertools::Itertools;
use log::info;

use crate::{report::ProcessingLog, table::Table};

/// Drops rows equal to an earlier row in every column, keeping first
/// occurrences in their original order. Returns the number of rows removed.
pub fn remove_duplicates(table: &mut Table, log: &mut ProcessingLog) -> usize {
    let initial = table.row_count();
    table.rows = std::mem::take(&mut table.rows).into_iter().unique().collect();
    let removed = initial - table.row_count();
    if removed > 0 {
        info!("Removed {removed} duplicate rows");
        log.record(format!("Removed {removed} duplicate rows"));
    }
    removed
}
