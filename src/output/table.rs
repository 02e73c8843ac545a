use comfy_table::{
    Cell, ContentArrangement, Table, modifiers::UTF8_SOLID_INNER_BORDERS, presets::UTF8_FULL,
};
use serde_json::Value;

use crate::output::export::ExportTable;

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => format_number(n.as_f64().unwrap_or(0.0)),
        other => other.to_string(),
    }
}

/// Integers render without a decimal point; everything else keeps two places.
fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value:.2}")
    }
}

pub(crate) fn render_table(export: &ExportTable) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(export.columns.iter().map(|c| Cell::new(c)));
    for row in &export.rows {
        table.add_row(row.iter().map(|v| Cell::new(cell_text(v))));
    }
    table.to_string()
}
