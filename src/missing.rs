use log::info;

use crate::{
    config::FillConfig,
    data::Value,
    report::ProcessingLog,
    table::{StorageType, Table},
};

/// Fills every remaining empty cell. Numeric columns take `numeric_fill`; all
/// other columns, including date columns whose values failed to parse, take
/// `text_fill`. Untouched raw cells become text.
pub fn handle_missing_values(table: &mut Table, config: &FillConfig, log: &mut ProcessingLog) {
    let mut filled = 0usize;
    for idx in 0..table.column_count() {
        let storage = table.columns[idx].storage_type();
        table.map_column(idx, |cell| match cell {
            Value::Empty => {
                filled += 1;
                match storage {
                    StorageType::Numeric => Value::Number(config.numeric_fill),
                    StorageType::Timestamp | StorageType::Text => {
                        Value::Text(config.text_fill.clone())
                    }
                }
            }
            Value::Raw(raw) => Value::Text(raw),
            other => other,
        });
    }
    info!("Handled missing values ({filled} cell(s) filled)");
    log.record("Handled missing values");
}
