/// Canonical time-key formats emitted per frequency.
pub(crate) const DAILY_KEY_FORMAT: &str = "%d-%m-%Y";
pub(crate) const WEEKLY_KEY_FORMAT: &str = "%GW%V";
pub(crate) const MONTHLY_KEY_FORMAT: &str = "%m-%Y";
pub(crate) const YEARLY_KEY_FORMAT: &str = "%Y";

/// Last year allowed in an excess-mortality baseline window by default.
/// Later years are pandemic-affected and would contaminate the baseline.
pub(crate) const DEFAULT_BASELINE_CUTOFF_YEAR: i32 = 2019;

/// Attribute key some sources use for an unstratified total-population count.
pub(crate) const TOTAL_POPULATION_KEY: &str = "population";

/// Prefixes of derived excess-mortality attribute keys.
pub(crate) const EXCESS_ABS_PREFIX: &str = "ExcessAbs_";
pub(crate) const EXCESS_PSCORE_PREFIX: &str = "ExcessPScore_";

/// Unit attached to derived excess-mortality records.
pub(crate) const COUNT_UNIT: &str = "Number";

/// Separator used for compound column names in exports ("CATEGORY:attribute").
pub(crate) const COLUMN_SEPARATOR: &str = ":";
