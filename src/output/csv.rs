use std::fmt::Write;

use serde_json::Value;

use crate::output::export::ExportTable;

fn csv_escape(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn csv_cell(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => csv_escape(s),
        Value::Number(n) => n.to_string(),
        other => csv_escape(&other.to_string()),
    }
}

pub(crate) fn render_csv(export: &ExportTable) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        export
            .columns
            .iter()
            .map(|c| csv_escape(c))
            .collect::<Vec<_>>()
            .join(",")
    );
    for row in &export.rows {
        let _ = writeln!(
            out,
            "{}",
            row.iter().map(csv_cell).collect::<Vec<_>>().join(",")
        );
    }
    out
}
