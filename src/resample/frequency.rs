//! Frequency resampling engine
//!
//! Converts one time series from its native calendar grid to a target grid,
//! honoring the series' aggregation semantics: NEW values are additive over
//! sub-periods, TOTAL is a cumulative counter, CURRENT is an instantaneous
//! reading. Coarsening (undersampling) refuses to aggregate buckets whose
//! source coverage is shorter than the bucket itself; refining (oversampling)
//! spreads values by integer-truncated per-day rates.

use chrono::{Datelike, Duration, NaiveDate};

use crate::consts::{
    DAILY_KEY_FORMAT, MONTHLY_KEY_FORMAT, WEEKLY_KEY_FORMAT, YEARLY_KEY_FORMAT,
};
use crate::error::DataError;
use crate::model::types::{Frequency, SeriesType, ValueSeries, is_present};
use crate::parse::time::{TimeInterval, TimeKey, parse_time_key};

/// One half-open target bucket `[start, end)` and its canonical time key.
#[derive(Debug, Clone)]
struct Bucket {
    start: NaiveDate,
    end: NaiveDate,
    label: String,
}

impl Bucket {
    fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    fn overlaps(&self, key: &TimeKey) -> bool {
        key.lo() < self.end && self.start < key.hi()
    }

    /// Days shared between this bucket and a source key.
    fn overlap_days(&self, key: &TimeKey) -> i64 {
        let candidates = [
            (self.end - key.lo()).num_days(),
            (key.hi() - self.start).num_days(),
            self.days(),
        ];
        candidates.into_iter().min().unwrap_or(0)
    }
}

/// Resamples series onto a fixed target grid spanning one time interval.
pub(crate) struct Resampler {
    frequency: Frequency,
    grid: Vec<Bucket>,
}

impl Resampler {
    /// Precomputes the target grid. Bucket starts are floored to the period
    /// boundary containing the interval start, so partially covered edge
    /// buckets exist on the grid and get marked missing by undersampling.
    pub(crate) fn new(interval: &TimeInterval, frequency: Frequency) -> Result<Self, DataError> {
        if frequency == Frequency::Undefined {
            return Err(DataError::InvalidFrequency {
                input: frequency.to_string(),
            });
        }
        let mut grid = Vec::new();
        let hi = interval.hi();
        let mut cursor = floor_to_period(interval.lo(), frequency);
        while cursor < hi {
            let next = step(cursor, frequency);
            grid.push(Bucket {
                start: cursor,
                end: next,
                label: label_for(cursor, frequency),
            });
            cursor = next;
        }
        Ok(Resampler { frequency, grid })
    }

    /// Resamples `series` from `current` frequency onto the target grid.
    /// Same-or-finer sources are undersampled (coarsened or regrouped),
    /// coarser ones oversampled. Unknown frequency/series-type tags are
    /// programmer errors and fail fast; missing data never does.
    pub(crate) fn resample(
        &self,
        series: &ValueSeries,
        current: Frequency,
        series_type: SeriesType,
    ) -> Result<ValueSeries, DataError> {
        if current == Frequency::Undefined {
            return Err(DataError::InvalidFrequency {
                input: current.to_string(),
            });
        }
        if series_type == SeriesType::NotApplicable {
            return Err(DataError::InvalidSeriesType {
                input: series_type.to_string(),
            });
        }

        let entries = parsed_entries(series);
        if current >= self.frequency {
            Ok(self.undersample(&entries, series_type))
        } else {
            Ok(self.oversample(&entries, series_type))
        }
    }

    fn undersample(&self, entries: &[(TimeKey, Option<f64>)], series_type: SeriesType) -> ValueSeries {
        let mut out = self.empty_grid();

        for bucket in &self.grid {
            let matches: Vec<&(TimeKey, Option<f64>)> = entries
                .iter()
                .filter(|(key, _)| bucket.overlaps(key))
                .collect();
            let (Some(first), Some(last)) = (matches.first(), matches.last()) else {
                continue;
            };

            // Insufficient source coverage means missing data inside the
            // bucket; never average partial windows silently.
            let covered_days = (last.0.hi() - first.0.lo()).num_days();
            if bucket.days() > covered_days {
                continue;
            }

            let value = match series_type {
                SeriesType::New => sum_values(&matches),
                SeriesType::Total => last.1.filter(|v| v.is_finite()),
                SeriesType::Current => mean_values(&matches),
                SeriesType::NotApplicable => unreachable!("rejected by resample"),
            };
            out.insert(bucket.label.clone(), value);
        }

        out
    }

    fn oversample(&self, entries: &[(TimeKey, Option<f64>)], series_type: SeriesType) -> ValueSeries {
        let mut slots: Vec<Option<f64>> = vec![None; self.grid.len()];

        for (index, (key, value)) in entries.iter().enumerate() {
            let overlapping: Vec<usize> = self
                .grid
                .iter()
                .enumerate()
                .filter(|(_, bucket)| bucket.overlaps(key))
                .map(|(i, _)| i)
                .collect();
            if overlapping.is_empty() {
                continue;
            }

            match series_type {
                SeriesType::Current => {
                    // Broadcast, not interpolation: every covered bucket gets
                    // the source reading verbatim.
                    for i in overlapping {
                        slots[i] = *value;
                    }
                }
                SeriesType::New => {
                    let Some(total) = value.filter(|v| v.is_finite()) else {
                        continue;
                    };
                    let source_days = (key.hi() - key.lo()).num_days().max(1);
                    let per_day = (total / source_days as f64).trunc();
                    for i in overlapping {
                        let add = per_day * self.grid[i].overlap_days(key) as f64;
                        let existing = slots[i].filter(|v| v.is_finite()).unwrap_or(0.0);
                        slots[i] = Some(existing + add);
                    }
                }
                SeriesType::Total => {
                    let Some(total) = value.filter(|v| v.is_finite()) else {
                        continue;
                    };
                    let last_total = index
                        .checked_sub(1)
                        .and_then(|p| entries[p].1.filter(|v| v.is_finite()))
                        .unwrap_or(0.0);
                    let source_days = (key.hi() - key.lo()).num_days().max(1);
                    let per_day = ((total - last_total) / source_days as f64).trunc();

                    // Running cumulative sum seeded by the carried-forward
                    // total, so buckets before any new increment keep it.
                    let mut running = 0.0;
                    for i in overlapping {
                        running += per_day * self.grid[i].overlap_days(key) as f64;
                        let base = slots[i].filter(|v| v.is_finite()).unwrap_or(last_total);
                        slots[i] = Some(running + base);
                    }
                }
                SeriesType::NotApplicable => unreachable!("rejected by resample"),
            }
        }

        self.grid
            .iter()
            .zip(slots)
            .map(|(bucket, slot)| (bucket.label.clone(), slot))
            .collect()
    }

    fn empty_grid(&self) -> ValueSeries {
        self.grid
            .iter()
            .map(|bucket| (bucket.label.clone(), None))
            .collect()
    }
}

fn parsed_entries(series: &ValueSeries) -> Vec<(TimeKey, Option<f64>)> {
    let mut entries: Vec<(TimeKey, Option<f64>)> = series
        .iter()
        .filter_map(|(key, value)| parse_time_key(key).map(|t| (t, *value)))
        .collect();
    entries.sort_by_key(|(key, _)| key.lo());
    entries
}

fn sum_values(matches: &[&(TimeKey, Option<f64>)]) -> Option<f64> {
    let mut sum = 0.0;
    for (_, value) in matches {
        if !is_present(value) {
            return None;
        }
        sum += value.unwrap_or(0.0);
    }
    Some(sum)
}

fn mean_values(matches: &[&(TimeKey, Option<f64>)]) -> Option<f64> {
    sum_values(matches).map(|sum| sum / matches.len() as f64)
}

fn floor_to_period(date: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency {
        Frequency::Daily => date,
        Frequency::Weekly => {
            date - Duration::days(date.weekday().num_days_from_monday() as i64)
        }
        Frequency::Monthly => date.with_day(1).unwrap_or(date),
        Frequency::Yearly => NaiveDate::from_ymd_opt(date.year(), 1, 1).unwrap_or(date),
        Frequency::Undefined => date,
    }
}

fn step(date: NaiveDate, frequency: Frequency) -> NaiveDate {
    match frequency {
        Frequency::Daily => date + Duration::days(1),
        Frequency::Weekly => date + Duration::days(7),
        Frequency::Monthly => {
            let (year, month) = if date.month() == 12 {
                (date.year() + 1, 1)
            } else {
                (date.year(), date.month() + 1)
            };
            NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
        }
        Frequency::Yearly => NaiveDate::from_ymd_opt(date.year() + 1, 1, 1).unwrap_or(date),
        Frequency::Undefined => date,
    }
}

fn label_for(start: NaiveDate, frequency: Frequency) -> String {
    let format = match frequency {
        Frequency::Daily => DAILY_KEY_FORMAT,
        Frequency::Weekly => WEEKLY_KEY_FORMAT,
        Frequency::Monthly => MONTHLY_KEY_FORMAT,
        Frequency::Yearly | Frequency::Undefined => YEARLY_KEY_FORMAT,
    };
    start.format(format).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series(entries: &[(&str, Option<f64>)]) -> ValueSeries {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), *v))
            .collect::<BTreeMap<_, _>>()
    }

    fn resampler(start: NaiveDate, end: NaiveDate, frequency: Frequency) -> Resampler {
        Resampler::new(&TimeInterval::closed(start, end), frequency).unwrap()
    }

    #[test]
    fn grid_floors_to_period_boundary() {
        let r = resampler(d(2020, 3, 4), d(2020, 3, 20), Frequency::Weekly);
        // Wednesday 2020-03-04 floors to Monday 2020-03-02 (ISO week 10).
        assert_eq!(r.grid[0].start, d(2020, 3, 2));
        assert_eq!(r.grid[0].label, "2020W10");
        assert_eq!(r.grid.len(), 3);
    }

    #[test]
    fn grid_labels_per_frequency() {
        let daily = resampler(d(2020, 1, 1), d(2020, 1, 2), Frequency::Daily);
        assert_eq!(daily.grid[0].label, "01-01-2020");
        let monthly = resampler(d(2020, 1, 15), d(2020, 2, 15), Frequency::Monthly);
        assert_eq!(monthly.grid[0].label, "01-2020");
        let yearly = resampler(d(2020, 6, 1), d(2021, 6, 1), Frequency::Yearly);
        assert_eq!(yearly.grid[0].label, "2020");
    }

    #[test]
    fn undersample_new_daily_to_weekly_preserves_sum() {
        // Two complete ISO weeks of daily counts, 2020W10 and 2020W11.
        let mut entries = Vec::new();
        let mut expected_total = 0.0;
        for offset in 0..14 {
            let date = d(2020, 3, 2) + Duration::days(offset);
            let value = (offset + 1) as f64;
            expected_total += value;
            entries.push((date.format("%d-%m-%Y").to_string(), Some(value)));
        }
        let source: ValueSeries = entries.into_iter().collect();

        let r = resampler(d(2020, 3, 2), d(2020, 3, 15), Frequency::Weekly);
        let out = r
            .resample(&source, Frequency::Daily, SeriesType::New)
            .unwrap();

        let weekly_total: f64 = out.values().flatten().sum();
        assert_eq!(weekly_total, expected_total);
        assert_eq!(out["2020W10"], Some(28.0));
        assert_eq!(out["2020W11"], Some(77.0));
    }

    #[test]
    fn undersample_marks_uncovered_buckets_missing() {
        // Weekly data covering only March; resampling Feb-Apr to monthly
        // must leave February and April missing, not interpolated.
        let source = series(&[
            ("2020W10", Some(10.0)),
            ("2020W11", Some(10.0)),
            ("2020W12", Some(10.0)),
            ("2020W13", Some(10.0)),
            ("2020W14", Some(10.0)),
        ]);
        let r = resampler(d(2020, 2, 1), d(2020, 4, 30), Frequency::Monthly);
        let out = r
            .resample(&source, Frequency::Weekly, SeriesType::New)
            .unwrap();
        assert_eq!(out["02-2020"], None);
        assert_eq!(out["03-2020"], Some(50.0));
        assert_eq!(out["04-2020"], None);
    }

    #[test]
    fn undersample_partial_coverage_is_missing() {
        // Only half of March present.
        let source = series(&[("2020W10", Some(10.0)), ("2020W11", Some(10.0))]);
        let r = resampler(d(2020, 3, 1), d(2020, 3, 31), Frequency::Monthly);
        let out = r
            .resample(&source, Frequency::Weekly, SeriesType::New)
            .unwrap();
        assert_eq!(out["03-2020"], None);
    }

    #[test]
    fn undersample_total_takes_last_value() {
        let mut entries = Vec::new();
        for offset in 0..7 {
            let date = d(2020, 3, 2) + Duration::days(offset);
            entries.push((date.format("%d-%m-%Y").to_string(), Some(100.0 + offset as f64)));
        }
        let source: ValueSeries = entries.into_iter().collect();
        let r = resampler(d(2020, 3, 2), d(2020, 3, 8), Frequency::Weekly);
        let out = r
            .resample(&source, Frequency::Daily, SeriesType::Total)
            .unwrap();
        assert_eq!(out["2020W10"], Some(106.0));
    }

    #[test]
    fn undersample_current_takes_mean() {
        let mut entries = Vec::new();
        for offset in 0..7 {
            let date = d(2020, 3, 2) + Duration::days(offset);
            entries.push((date.format("%d-%m-%Y").to_string(), Some(10.0)));
        }
        let source: ValueSeries = entries.into_iter().collect();
        let r = resampler(d(2020, 3, 2), d(2020, 3, 8), Frequency::Weekly);
        let out = r
            .resample(&source, Frequency::Daily, SeriesType::Current)
            .unwrap();
        assert_eq!(out["2020W10"], Some(10.0));
    }

    #[test]
    fn undersample_missing_source_value_poisons_bucket() {
        let mut entries = Vec::new();
        for offset in 0..7 {
            let date = d(2020, 3, 2) + Duration::days(offset);
            let value = if offset == 3 { None } else { Some(1.0) };
            entries.push((date.format("%d-%m-%Y").to_string(), value));
        }
        let source: ValueSeries = entries.into_iter().collect();
        let r = resampler(d(2020, 3, 2), d(2020, 3, 8), Frequency::Weekly);
        let out = r
            .resample(&source, Frequency::Daily, SeriesType::New)
            .unwrap();
        assert_eq!(out["2020W10"], None);
    }

    #[test]
    fn oversample_current_broadcasts() {
        let source = series(&[("2020", Some(42.0))]);
        let r = resampler(d(2020, 1, 1), d(2020, 12, 31), Frequency::Monthly);
        let out = r
            .resample(&source, Frequency::Yearly, SeriesType::Current)
            .unwrap();
        assert_eq!(out.len(), 12);
        assert!(out.values().all(|v| *v == Some(42.0)));
    }

    #[test]
    fn oversample_new_spreads_by_truncated_rate() {
        // 70 over a 7-day week: rate 10/day, each day gets 10.
        let source = series(&[("2020W10", Some(70.0))]);
        let r = resampler(d(2020, 3, 2), d(2020, 3, 8), Frequency::Daily);
        let out = r
            .resample(&source, Frequency::Weekly, SeriesType::New)
            .unwrap();
        assert_eq!(out.len(), 7);
        assert!(out.values().all(|v| *v == Some(10.0)));
    }

    #[test]
    fn oversample_new_truncates_per_day_rate() {
        // 69 over 7 days: trunc(69/7) = 9 per day, totals 63 not 69.
        let source = series(&[("2020W10", Some(69.0))]);
        let r = resampler(d(2020, 3, 2), d(2020, 3, 8), Frequency::Daily);
        let out = r
            .resample(&source, Frequency::Weekly, SeriesType::New)
            .unwrap();
        let total: f64 = out.values().flatten().sum();
        assert_eq!(total, 63.0);
    }

    #[test]
    fn oversample_new_accumulates_buckets_touched_twice() {
        // The week Feb 24 - Mar 1 (2020W09) straddles two monthly source
        // entries; both must contribute to that weekly bucket.
        let source = series(&[("02-2020", Some(290.0)), ("03-2020", Some(310.0))]);
        let r = resampler(d(2020, 2, 24), d(2020, 3, 1), Frequency::Weekly);
        let out = r
            .resample(&source, Frequency::Monthly, SeriesType::New)
            .unwrap();
        // February rate trunc(290/29) = 10 over 6 days, March rate
        // trunc(310/31) = 10 over 1 day.
        assert_eq!(out["2020W09"], Some(70.0));
    }

    #[test]
    fn oversample_new_skips_missing_values() {
        let source = series(&[("2020W10", None), ("2020W11", Some(7.0))]);
        let r = resampler(d(2020, 3, 2), d(2020, 3, 15), Frequency::Daily);
        let out = r
            .resample(&source, Frequency::Weekly, SeriesType::New)
            .unwrap();
        assert_eq!(out["02-03-2020"], None);
        assert_eq!(out["09-03-2020"], Some(1.0));
    }

    #[test]
    fn oversample_total_carries_cumulative_forward() {
        // Cumulative counter: 70 by end of W10, 140 by end of W11.
        let source = series(&[("2020W10", Some(70.0)), ("2020W11", Some(140.0))]);
        let r = resampler(d(2020, 3, 2), d(2020, 3, 15), Frequency::Daily);
        let out = r
            .resample(&source, Frequency::Weekly, SeriesType::Total)
            .unwrap();
        // First week ramps 10..70, second continues 80..140.
        assert_eq!(out["02-03-2020"], Some(10.0));
        assert_eq!(out["08-03-2020"], Some(70.0));
        assert_eq!(out["09-03-2020"], Some(80.0));
        assert_eq!(out["15-03-2020"], Some(140.0));
    }

    #[test]
    fn same_frequency_regroups_onto_canonical_labels() {
        let source = series(&[("2020W10", Some(5.0))]);
        let r = resampler(d(2020, 3, 2), d(2020, 3, 8), Frequency::Weekly);
        let out = r
            .resample(&source, Frequency::Weekly, SeriesType::New)
            .unwrap();
        assert_eq!(out["2020W10"], Some(5.0));
    }

    #[test]
    fn not_applicable_series_type_fails_fast() {
        let r = resampler(d(2020, 1, 1), d(2020, 12, 31), Frequency::Weekly);
        let err = r
            .resample(&series(&[]), Frequency::Daily, SeriesType::NotApplicable)
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidSeriesType { .. }));
    }

    #[test]
    fn undefined_frequency_fails_fast() {
        assert!(Resampler::new(
            &TimeInterval::closed(d(2020, 1, 1), d(2020, 12, 31)),
            Frequency::Undefined
        )
        .is_err());

        let r = resampler(d(2020, 1, 1), d(2020, 12, 31), Frequency::Weekly);
        let err = r
            .resample(&series(&[]), Frequency::Undefined, SeriesType::New)
            .unwrap_err();
        assert!(matches!(err, DataError::InvalidFrequency { .. }));
    }
}
