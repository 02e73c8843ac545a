//! Frequency and age-group resampling engines

pub(crate) mod age;
pub(crate) mod frequency;

pub(crate) use age::{AgeGranularity, AgeResampler};
pub(crate) use frequency::Resampler;
