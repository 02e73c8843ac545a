//! Heuristic key parsers shared by the model, resamplers and estimator

pub(crate) mod age;
pub(crate) mod time;
