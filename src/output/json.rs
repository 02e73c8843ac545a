use serde_json::Value;

use crate::output::export::ExportTable;

/// Array of row objects keyed by column name; null cells are kept so every
/// row carries the full column set.
pub(crate) fn render_json(export: &ExportTable) -> String {
    let rows: Vec<Value> = export
        .rows
        .iter()
        .map(|row| {
            let object: serde_json::Map<String, Value> = export
                .columns
                .iter()
                .cloned()
                .zip(row.iter().cloned())
                .collect();
            Value::Object(object)
        })
        .collect();
    serde_json::to_string_pretty(&rows).unwrap_or_else(|_| "[]".to_string())
}
