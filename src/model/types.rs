//! Dataset model types
//!
//! The dataset is a four-level nested map: country → category → attribute
//! key → record. Field names on the wire mirror the serialized shape emitted
//! by the source adapters (`ATTR_NAME`, `SOURCE`, `VALUE`, ...), so fragments
//! produced by any adapter deserialize directly into these types.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DataError;

/// Closed set of data categories a country record may carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum Category {
    Indicators,
    Demographic,
    Scores,
    Covid,
    Mortality,
    Mobility,
}

impl Category {
    pub(crate) const ALL: [Category; 6] = [
        Category::Indicators,
        Category::Demographic,
        Category::Scores,
        Category::Covid,
        Category::Mortality,
        Category::Mobility,
    ];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Category::Indicators => "INDICATORS",
            Category::Demographic => "DEMOGRAPHIC",
            Category::Scores => "SCORES",
            Category::Covid => "COVID",
            Category::Mortality => "MORTALITY",
            Category::Mobility => "MOBILITY",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DataError::InvalidCategory {
                input: s.to_string(),
            })
    }
}

/// Calendar granularity of a time series. Variant order is coarse→fine so
/// the derived `Ord` decides resampling direction. `Undefined` tags series
/// whose native grid is unknown; they are carried but never resampled.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum Frequency {
    Yearly,
    Monthly,
    Weekly,
    Daily,
    Undefined,
}

impl Frequency {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            Frequency::Yearly => "YEARLY",
            Frequency::Monthly => "MONTHLY",
            Frequency::Weekly => "WEEKLY",
            Frequency::Daily => "DAILY",
            Frequency::Undefined => "UNDEFINED",
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            "YEARLY" => Ok(Frequency::Yearly),
            _ => Err(DataError::InvalidFrequency {
                input: s.to_string(),
            }),
        }
    }
}

/// Aggregation semantics of a time series: NEW values add over sub-periods,
/// TOTAL is a cumulative counter, CURRENT is an instantaneous reading.
/// `NA` occurs in source data for series that must never be resampled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub(crate) enum SeriesType {
    New,
    Total,
    Current,
    #[serde(rename = "NA")]
    NotApplicable,
}

impl SeriesType {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SeriesType::New => "NEW",
            SeriesType::Total => "TOTAL",
            SeriesType::Current => "CURRENT",
            SeriesType::NotApplicable => "NA",
        }
    }
}

impl fmt::Display for SeriesType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Time-key → value map; `None` is the explicit missing marker and survives
/// serialization as JSON null.
pub(crate) type ValueSeries = BTreeMap<String, Option<f64>>;

/// One named metric. Presence of `frequency` is the discriminator: with it
/// the record is a time series, without it a scalar/parameter record whose
/// `values` typically hold one entry keyed by the year it pertains to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct AttributeRecord {
    #[serde(rename = "ATTR_NAME")]
    pub(crate) name: String,
    #[serde(rename = "SOURCE")]
    pub(crate) source: String,
    #[serde(rename = "UNIT", default)]
    pub(crate) unit: String,
    #[serde(rename = "FREQUENCY", default, skip_serializing_if = "Option::is_none")]
    pub(crate) frequency: Option<Frequency>,
    #[serde(
        rename = "SERIES_TYPE",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub(crate) series_type: Option<SeriesType>,
    #[serde(rename = "VALUE", default)]
    pub(crate) values: ValueSeries,
}

impl AttributeRecord {
    pub(crate) fn is_time_series(&self) -> bool {
        self.frequency.is_some()
    }

    /// True when the record holds no entries or any explicit missing marker.
    pub(crate) fn has_missing_values(&self) -> bool {
        self.values.is_empty() || self.values.values().any(|v| !is_present(v))
    }
}

pub(crate) fn is_present(value: &Option<f64>) -> bool {
    matches!(value, Some(v) if v.is_finite())
}

pub(crate) type AttributeGroup = BTreeMap<String, AttributeRecord>;
pub(crate) type CountryRecord = BTreeMap<Category, AttributeGroup>;
