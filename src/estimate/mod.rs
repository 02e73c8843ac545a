//! Derived-statistics estimators

pub(crate) mod excess;

pub(crate) use excess::ExcessMortality;
