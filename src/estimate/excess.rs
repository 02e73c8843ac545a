//! Excess-mortality baseline estimation
//!
//! For each mortality series, builds a rolling five-year historical baseline
//! per calendar sub-period and derives an absolute excess series and a
//! percentage p-score series, written back as new attributes. The baseline
//! window is capped so pandemic-period mortality never contaminates it.

use chrono::{Datelike, Duration, NaiveDate};
use log::warn;

use crate::consts::{COUNT_UNIT, EXCESS_ABS_PREFIX, EXCESS_PSCORE_PREFIX};
use crate::model::types::{
    AttributeGroup, AttributeRecord, Frequency, SeriesType, ValueSeries, is_present,
};
use crate::parse::time::{TimeInterval, TimeKey, parse_time_key};

/// Calendar position of a time key within its year; baseline matching pairs
/// target entries with historical entries in the same sub-period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubPeriod {
    MonthDay(u32, u32),
    Week(u32),
    Month(u32),
    Year,
}

pub(crate) struct ExcessMortality {
    baseline_cutoff_year: i32,
}

impl ExcessMortality {
    pub(crate) fn new(baseline_cutoff_year: i32) -> Self {
        ExcessMortality {
            baseline_cutoff_year,
        }
    }

    /// Derives `ExcessAbs_<key>` and `ExcessPScore_<key>` records for every
    /// mortality time series in `group`, over `interval`. Existing records
    /// are never removed; previously derived excess series are not re-derived.
    pub(crate) fn estimate(&self, group: &mut AttributeGroup, interval: &TimeInterval) {
        let sources: Vec<(String, AttributeRecord)> = group
            .iter()
            .filter(|(key, record)| {
                !is_derived_key(key)
                    && record.is_time_series()
                    && record.frequency != Some(Frequency::Undefined)
            })
            .map(|(key, record)| (key.clone(), record.clone()))
            .collect();

        for (key, record) in sources {
            let Some(frequency) = record.frequency else {
                continue;
            };
            let Some((abs_values, pscore_values)) =
                self.derive(&key, &record, frequency, interval)
            else {
                continue;
            };

            let source = format!("Computed using {}", record.source);
            group.insert(
                format!("{EXCESS_ABS_PREFIX}{key}"),
                derived_record(
                    format!("{EXCESS_ABS_PREFIX}{key}"),
                    &source,
                    frequency,
                    SeriesType::New,
                    abs_values,
                ),
            );
            group.insert(
                format!("{EXCESS_PSCORE_PREFIX}{key}"),
                derived_record(
                    format!("{EXCESS_PSCORE_PREFIX}{key}"),
                    &source,
                    frequency,
                    SeriesType::Current,
                    pscore_values,
                ),
            );
        }
    }

    /// Computes the two derived series for one source record, or `None` when
    /// no period could be estimated.
    fn derive(
        &self,
        key: &str,
        record: &AttributeRecord,
        frequency: Frequency,
        interval: &TimeInterval,
    ) -> Option<(ValueSeries, ValueSeries)> {
        let start_year = interval.lo().year();
        let end_year = (interval.hi() - Duration::days(1)).year();

        let history_window = TimeInterval::closed(
            NaiveDate::from_ymd_opt(start_year - 5, 1, 1)?,
            NaiveDate::from_ymd_opt(end_year - 1, 12, 31)?,
        );
        let history = present_entries(&record.values, &history_window);
        let targets = present_entries(&record.values, interval);

        let mut abs_values = ValueSeries::new();
        let mut pscore_values = ValueSeries::new();

        for target_year in start_year..=end_year {
            let baseline_end = (target_year - 1).min(self.baseline_cutoff_year);
            let baseline_years = (baseline_end - 4)..=baseline_end;

            let baseline: Vec<&Entry> = history
                .iter()
                .filter(|entry| baseline_years.contains(&entry.year))
                .collect();
            if baseline.len() < minimum_depth(frequency) {
                warn!(
                    "{key}: not enough mortality history before {target_year} \
                     (have {} points); skipping",
                    baseline.len()
                );
                continue;
            }

            for target in targets.iter().filter(|entry| entry.year == target_year) {
                let target_period = sub_period(&target.time, frequency);
                let expected = mean(
                    baseline
                        .iter()
                        .filter(|entry| sub_period(&entry.time, frequency) == target_period)
                        .map(|entry| entry.value),
                );

                let (abs, pscore) = match expected {
                    Some(expected) => {
                        let abs = target.value - expected;
                        let pscore = (target.value - expected) / expected * 100.0;
                        (Some(abs), Some(pscore).filter(|v| v.is_finite()))
                    }
                    None => (None, None),
                };
                abs_values.insert(target.label.clone(), abs);
                pscore_values.insert(target.label.clone(), pscore);
            }
        }

        if abs_values.is_empty() {
            None
        } else {
            Some((abs_values, pscore_values))
        }
    }
}

struct Entry {
    label: String,
    time: TimeKey,
    year: i32,
    value: f64,
}

/// Parseable, non-missing entries overlapping `interval`. An entry belongs
/// to the year its period ends in.
fn present_entries(series: &ValueSeries, interval: &TimeInterval) -> Vec<Entry> {
    let mut entries: Vec<Entry> = series
        .iter()
        .filter(|(_, value)| is_present(value))
        .filter_map(|(label, value)| {
            let time = parse_time_key(label)?;
            if !time.matches(interval) {
                return None;
            }
            let year = (time.hi() - Duration::days(1)).year();
            Some(Entry {
                label: label.clone(),
                time,
                year,
                value: value.unwrap_or(0.0),
            })
        })
        .collect();
    entries.sort_by_key(|entry| entry.time.lo());
    entries
}

fn sub_period(time: &TimeKey, frequency: Frequency) -> SubPeriod {
    let start = time.lo();
    match frequency {
        Frequency::Daily => SubPeriod::MonthDay(start.month(), start.day()),
        Frequency::Weekly => SubPeriod::Week(start.iso_week().week()),
        Frequency::Monthly => SubPeriod::Month(start.month()),
        Frequency::Yearly | Frequency::Undefined => SubPeriod::Year,
    }
}

fn minimum_depth(frequency: Frequency) -> usize {
    match frequency {
        Frequency::Daily => 2 * 365,
        Frequency::Weekly => 2 * 52,
        Frequency::Monthly => 2 * 12,
        Frequency::Yearly | Frequency::Undefined => 2,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    (count > 0).then(|| sum / count as f64)
}

fn is_derived_key(key: &str) -> bool {
    key.starts_with(EXCESS_ABS_PREFIX) || key.starts_with(EXCESS_PSCORE_PREFIX)
}

fn derived_record(
    name: String,
    source: &str,
    frequency: Frequency,
    series_type: SeriesType,
    values: ValueSeries,
) -> AttributeRecord {
    AttributeRecord {
        name,
        source: source.to_string(),
        unit: COUNT_UNIT.to_string(),
        frequency: Some(frequency),
        series_type: Some(series_type),
        values,
    }
}
