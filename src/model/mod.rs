//! Dataset model: types, operations and persistence

pub(crate) mod dataset;
pub(crate) mod io;
pub(crate) mod types;

pub(crate) use dataset::Dataset;
pub(crate) use types::{Category, Frequency};
