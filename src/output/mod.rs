mod csv;
mod export;
mod json;
mod table;

pub(crate) use csv::render_csv;
pub(crate) use export::{ExportTable, export_all, export_parameters, export_timeseries};
pub(crate) use json::render_json;
pub(crate) use table::render_table;
