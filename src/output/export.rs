//! Tabular projections of the dataset
//!
//! Three export shapes, all built from read accessors only: a wide
//! per-country "parameters" table (scalar records), a long "all" table (one
//! row per value), and a wide time-indexed "timeseries" table sorted by
//! parsed timestamp.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::consts::COLUMN_SEPARATOR;
use crate::model::Dataset;
use crate::parse::time::parse_sortable;

/// A column-ordered table with JSON-typed cells (`Null` marks missing).
pub(crate) struct ExportTable {
    pub(crate) columns: Vec<String>,
    pub(crate) rows: Vec<Vec<Value>>,
}

fn number(value: &Option<f64>) -> Value {
    match value {
        Some(v) if v.is_finite() => serde_json::json!(v),
        _ => Value::Null,
    }
}

/// One row per country; one column per scalar record, named
/// `CATEGORY:attribute` (with the value key appended when a scalar record
/// carries several entries). Time series are excluded.
pub(crate) fn export_parameters(dataset: &Dataset) -> ExportTable {
    let mut columns: Vec<String> = vec!["country".to_string()];
    let mut seen: BTreeSet<String> = BTreeSet::new();

    for record in dataset.as_map().values() {
        for (category, group) in record {
            for (attribute, attr) in group {
                if attr.is_time_series() {
                    continue;
                }
                for key in attr.values.keys() {
                    let column = scalar_column(category.as_str(), attribute, key, attr.values.len());
                    if seen.insert(column.clone()) {
                        columns.push(column);
                    }
                }
            }
        }
    }

    let rows = dataset
        .as_map()
        .iter()
        .map(|(country, record)| {
            let mut row = vec![Value::Null; columns.len()];
            row[0] = Value::String(country.clone());
            for (category, group) in record {
                for (attribute, attr) in group {
                    if attr.is_time_series() {
                        continue;
                    }
                    for (key, value) in &attr.values {
                        let column = scalar_column(category.as_str(), attribute, key, attr.values.len());
                        if let Some(index) = columns.iter().position(|c| *c == column) {
                            row[index] = number(value);
                        }
                    }
                }
            }
            row
        })
        .collect();

    ExportTable { columns, rows }
}

fn scalar_column(category: &str, attribute: &str, key: &str, entries: usize) -> String {
    if entries > 1 {
        [category, attribute, key].join(COLUMN_SEPARATOR)
    } else {
        [category, attribute].join(COLUMN_SEPARATOR)
    }
}

/// Long form: one row per stored value, metadata included.
pub(crate) fn export_all(dataset: &Dataset) -> ExportTable {
    let columns = [
        "country",
        "category",
        "attribute",
        "name",
        "source",
        "unit",
        "frequency",
        "series_type",
        "key",
        "value",
    ]
    .map(String::from)
    .to_vec();

    let mut rows = Vec::new();
    for (country, record) in dataset.as_map() {
        for (category, group) in record {
            for (attribute, attr) in group {
                for (key, value) in &attr.values {
                    rows.push(vec![
                        Value::String(country.clone()),
                        Value::String(category.to_string()),
                        Value::String(attribute.clone()),
                        Value::String(attr.name.clone()),
                        Value::String(attr.source.clone()),
                        Value::String(attr.unit.clone()),
                        attr.frequency
                            .map(|f| Value::String(f.to_string()))
                            .unwrap_or(Value::Null),
                        attr.series_type
                            .map(|t| Value::String(t.to_string()))
                            .unwrap_or(Value::Null),
                        Value::String(key.clone()),
                        number(value),
                    ]);
                }
            }
        }
    }

    ExportTable {
        columns,
        rows,
    }
}

/// Wide time-indexed form: one row per (timestamp, country), one column per
/// time-series attribute, rows sorted by parsed timestamp.
pub(crate) fn export_timeseries(dataset: &Dataset) -> ExportTable {
    let mut columns: Vec<String> = vec!["country".to_string(), "timestamp".to_string()];
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut timestamps: BTreeSet<String> = BTreeSet::new();

    for record in dataset.as_map().values() {
        for (category, group) in record {
            for (attribute, attr) in group {
                if !attr.is_time_series() {
                    continue;
                }
                let column = [category.as_str(), attribute.as_str()].join(COLUMN_SEPARATOR);
                if seen.insert(column.clone()) {
                    columns.push(column);
                }
                timestamps.extend(attr.values.keys().cloned());
            }
        }
    }

    let mut sorted: Vec<String> = timestamps.into_iter().collect();
    sorted.sort_by_key(|t| parse_sortable(t));

    let mut rows = Vec::new();
    for timestamp in &sorted {
        for (country, record) in dataset.as_map() {
            let mut row = vec![Value::Null; columns.len()];
            row[0] = Value::String(country.clone());
            row[1] = Value::String(timestamp.clone());
            for (category, group) in record {
                for (attribute, attr) in group {
                    if !attr.is_time_series() {
                        continue;
                    }
                    let Some(value) = attr.values.get(timestamp) else {
                        continue;
                    };
                    let column = [category.as_str(), attribute.as_str()].join(COLUMN_SEPARATOR);
                    if let Some(index) = columns.iter().position(|c| *c == column) {
                        row[index] = number(value);
                    }
                }
            }
            rows.push(row);
        }
    }

    ExportTable { columns, rows }
}
