//! Age-group resampling
//!
//! Re-buckets age/sex-stratified attribute groups into one of three fixed
//! granularity schemes. Stratified counts are additive by construction, so
//! overlapping source brackets are summed element-wise into each scheme
//! bucket regardless of the attribute's declared series type.

use std::str::FromStr;

use crate::consts::TOTAL_POPULATION_KEY;
use crate::error::DataError;
use crate::model::types::{AttributeGroup, AttributeRecord, ValueSeries, is_present};
use crate::parse::age::{AgeRange, parse_age_group, parse_sex};

/// Target age-bucket scheme, coarse to fine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum AgeGranularity {
    Low,
    Medium,
    High,
}

impl AgeGranularity {
    pub(crate) fn buckets(self) -> &'static [AgeRange] {
        const LOW: &[AgeRange] = &[AgeRange::new(None, None)];
        const MEDIUM: &[AgeRange] = &[
            AgeRange::new(None, Some(14)),
            AgeRange::new(Some(15), Some(64)),
            AgeRange::new(Some(65), None),
        ];
        const HIGH: &[AgeRange] = &[
            AgeRange::new(None, Some(14)),
            AgeRange::new(Some(15), Some(64)),
            AgeRange::new(Some(65), Some(74)),
            AgeRange::new(Some(75), Some(84)),
            AgeRange::new(Some(85), None),
        ];
        match self {
            AgeGranularity::Low => LOW,
            AgeGranularity::Medium => MEDIUM,
            AgeGranularity::High => HIGH,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            AgeGranularity::Low => "LOW",
            AgeGranularity::Medium => "MEDIUM",
            AgeGranularity::High => "HIGH",
        }
    }
}

impl std::fmt::Display for AgeGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgeGranularity {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "LOW" => Ok(AgeGranularity::Low),
            "MEDIUM" => Ok(AgeGranularity::Medium),
            "HIGH" => Ok(AgeGranularity::High),
            _ => Err(DataError::InvalidGranularity {
                input: s.to_string(),
            }),
        }
    }
}

/// Display label for a scheme bucket: `Total`, `-14`, `15-64`, `65+`.
pub(crate) fn bucket_label(range: &AgeRange) -> String {
    match (range.min, range.max) {
        (None, None) => "Total".to_string(),
        (None, Some(max)) => format!("-{max}"),
        (Some(min), None) => format!("{min}+"),
        (Some(min), Some(max)) => format!("{min}-{max}"),
    }
}

pub(crate) struct AgeResampler {
    granularity: AgeGranularity,
}

impl AgeResampler {
    pub(crate) fn new(granularity: AgeGranularity) -> Self {
        AgeResampler { granularity }
    }

    /// Re-buckets `group` into the configured scheme. Attributes with no
    /// parseable age are dropped, except the total-population marker which
    /// is carried through as `Total_Total` at LOW granularity.
    pub(crate) fn resample(&self, group: &AttributeGroup) -> AttributeGroup {
        let mut resampled = AttributeGroup::new();

        for (key, record) in group {
            if self.granularity == AgeGranularity::Low && key == TOTAL_POPULATION_KEY {
                let label = "Total_Total".to_string();
                let mut carried = record.clone();
                carried.name = label.clone();
                resampled.insert(label, carried);
            }

            let Some(age) = parse_age_group(key) else {
                continue;
            };
            let sex = parse_sex(key);

            for bucket in self.granularity.buckets() {
                if !bucket.overlaps(&age) {
                    continue;
                }
                let label = format!("{}_{}", bucket_label(bucket), sex);
                match resampled.get_mut(&label) {
                    Some(existing) => {
                        existing.values = add_series(&existing.values, &record.values);
                    }
                    None => {
                        let mut assigned = record.clone();
                        assigned.name = label.clone();
                        resampled.insert(label, assigned);
                    }
                }
            }
        }

        resampled
    }
}

/// Element-wise sum over the union of time keys; a key missing on either
/// side, or an explicit missing marker, yields a missing result for that key.
fn add_series(a: &ValueSeries, b: &ValueSeries) -> ValueSeries {
    let mut out = ValueSeries::new();
    for key in a.keys().chain(b.keys()) {
        let sum = match (a.get(key), b.get(key)) {
            (Some(x), Some(y)) if is_present(x) && is_present(y) => {
                Some(x.unwrap_or(0.0) + y.unwrap_or(0.0))
            }
            _ => None,
        };
        out.insert(key.clone(), sum);
    }
    out
}
