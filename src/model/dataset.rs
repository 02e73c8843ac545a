//! Dataset operations
//!
//! The four-level country map is owned exclusively by `Dataset` and mutated
//! only through the operations here. Filters mutate in place and return the
//! same handle for chaining; after every filtering mutation the structure is
//! pruned bottom-up so no empty attribute, category or country branch stays
//! reachable. An empty dataset makes every operation a logged no-op.

use std::collections::BTreeMap;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::error::DataError;
use crate::estimate::ExcessMortality;
use crate::model::types::{Category, CountryRecord, Frequency};
use crate::parse::age::{AgeRange, parse_age_group};
use crate::parse::time::{TimeInterval, parse_time_key};
use crate::resample::{AgeGranularity, AgeResampler, Resampler};

#[derive(Debug)]
pub(crate) struct Dataset {
    countries: BTreeMap<String, CountryRecord>,
    age_granularity: Option<AgeGranularity>,
}

impl Dataset {
    pub(crate) fn from_map(countries: BTreeMap<String, CountryRecord>) -> Self {
        Dataset {
            countries,
            age_granularity: None,
        }
    }

    pub(crate) fn as_map(&self) -> &BTreeMap<String, CountryRecord> {
        &self.countries
    }

    pub(crate) fn into_map(self) -> BTreeMap<String, CountryRecord> {
        self.countries
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Merges one per-source fragment in. The first writer wins per
    /// attribute key; later conflicts are logged and dropped.
    pub(crate) fn merge(&mut self, fragment: BTreeMap<String, CountryRecord>) {
        for (country, record) in fragment {
            let target = self.countries.entry(country.clone()).or_default();
            for (category, group) in record {
                let target_group = target.entry(category).or_default();
                for (key, attribute) in group {
                    if target_group.contains_key(&key) {
                        debug!("{country}/{category}/{key}: duplicate attribute in fragment, keeping first");
                    } else {
                        target_group.insert(key, attribute);
                    }
                }
            }
        }
    }

    // READ ACCESSORS

    /// Union-covering interval over every time series: earliest start to
    /// latest end, open/closed flags taken from whichever record produced
    /// the extreme bound. `None` on an empty or series-free dataset.
    pub(crate) fn get_interval(&self) -> Option<TimeInterval> {
        if self.warn_if_empty() {
            return None;
        }

        let mut best: Option<TimeInterval> = None;
        for record in self.time_series_records() {
            for key in record.values.keys() {
                let Some(parsed) = parse_time_key(key) else {
                    continue;
                };
                let candidate = match parsed {
                    crate::parse::time::TimeKey::Point(d) => TimeInterval::closed(d, d),
                    crate::parse::time::TimeKey::Span(i) => i,
                };
                let merged = match best {
                    None => candidate,
                    Some(current) => {
                        let (start, open_start) = if candidate.lo() < current.lo() {
                            (candidate.start, candidate.open_start)
                        } else {
                            (current.start, current.open_start)
                        };
                        let (end, open_end) = if candidate.hi() > current.hi() {
                            (candidate.end, candidate.open_end)
                        } else {
                            (current.end, current.open_end)
                        };
                        TimeInterval {
                            start,
                            end,
                            open_start,
                            open_end,
                        }
                    }
                };
                best = Some(merged);
            }
        }
        best
    }

    pub(crate) fn get_countries(&self) -> Vec<&str> {
        self.countries.keys().map(String::as_str).collect()
    }

    pub(crate) fn get_categories(&self) -> Vec<(&str, Category)> {
        self.countries
            .iter()
            .flat_map(|(country, record)| {
                record.keys().map(move |category| (country.as_str(), *category))
            })
            .collect()
    }

    pub(crate) fn get_attributes(&self) -> Vec<(&str, Category, &str)> {
        self.countries
            .iter()
            .flat_map(|(country, record)| {
                record.iter().flat_map(move |(category, group)| {
                    group
                        .keys()
                        .map(move |key| (country.as_str(), *category, key.as_str()))
                })
            })
            .collect()
    }

    // FILTERS

    pub(crate) fn filter_countries(&mut self, keep: &[String]) -> &mut Self {
        if self.warn_if_empty() {
            return self;
        }
        let mut erased = Vec::new();
        self.countries.retain(|country, _| {
            let kept = keep.iter().any(|k| k == country);
            if !kept {
                erased.push(country.clone());
            }
            kept
        });
        debug!("{erased:?} countries erased from the dataset");
        info!("{} countries erased from the dataset", erased.len());
        self
    }

    pub(crate) fn filter_categories(&mut self, keep: &[Category]) -> &mut Self {
        if self.warn_if_empty() {
            return self;
        }
        for record in self.countries.values_mut() {
            record.retain(|category, _| keep.contains(category));
        }
        self.prune_empty()
    }

    pub(crate) fn filter_attributes(&mut self, keep: &[(Category, String)]) -> &mut Self {
        if self.warn_if_empty() {
            return self;
        }
        for record in self.countries.values_mut() {
            for (category, group) in record.iter_mut() {
                group.retain(|key, _| {
                    keep.iter().any(|(cat, attr)| cat == category && attr == key)
                });
            }
        }
        self.prune_empty()
    }

    /// Keeps only time-series entries whose parsed key falls within (point)
    /// or overlaps (span) `interval`; unparseable keys are dropped. Scalar
    /// records pass through untouched.
    pub(crate) fn filter_time_interval(&mut self, interval: &TimeInterval) -> &mut Self {
        if self.warn_if_empty() {
            return self;
        }
        for record in self.countries.values_mut() {
            for group in record.values_mut() {
                for attribute in group.values_mut().filter(|a| a.is_time_series()) {
                    attribute.values.retain(|key, _| {
                        parse_time_key(key).is_some_and(|t| t.matches(interval))
                    });
                }
            }
        }
        self.prune_empty()
    }

    /// Drops attributes whose parsed age range does not overlap `range`.
    /// Attributes with no parseable age are kept unconditionally.
    pub(crate) fn filter_age_group(&mut self, range: &AgeRange) -> &mut Self {
        if self.warn_if_empty() {
            return self;
        }
        for record in self.countries.values_mut() {
            for group in record.values_mut() {
                group.retain(|key, _| {
                    parse_age_group(key).is_none_or(|parsed| parsed.overlaps(range))
                });
            }
        }
        self.prune_empty()
    }

    /// Drops a country unless every requested (category, attribute) pair is
    /// present and free of missing values.
    pub(crate) fn filter_countries_with_missing_values_on_attributes(
        &mut self,
        attributes: &[(Category, String)],
    ) -> &mut Self {
        if self.warn_if_empty() {
            return self;
        }
        self.countries.retain(|country, record| {
            let complete = attributes.iter().all(|(category, attr)| {
                record
                    .get(category)
                    .and_then(|group| group.get(attr))
                    .is_some_and(|a| !a.has_missing_values())
            });
            if !complete {
                warn!(
                    "{country} has been erased as it contained missing values \
                     on at least one of the selected attributes"
                );
            }
            complete
        });
        self
    }

    /// Drops countries missing (absent or holding missing values) more than
    /// `threshold` of the union of all known (category, attribute) pairs.
    pub(crate) fn filter_countries_missing_value_attributes_below(
        &mut self,
        threshold: usize,
    ) -> &mut Self {
        if self.warn_if_empty() {
            return self;
        }
        let all_attrs = self.known_attribute_pairs();
        self.countries.retain(|country, record| {
            let missing = all_attrs
                .iter()
                .filter(|(category, attr)| {
                    !record
                        .get(category)
                        .and_then(|group| group.get(attr))
                        .is_some_and(|a| !a.has_missing_values())
                })
                .count();
            if missing > threshold {
                warn!("{country} has been erased as it contained more than {threshold} missing attributes");
                false
            } else {
                true
            }
        });
        self
    }

    /// Drops every (category, attribute) pair for which more than `threshold`
    /// countries are missing it or hold missing values in it.
    pub(crate) fn filter_attributes_with_countries_nan_below(
        &mut self,
        threshold: usize,
    ) -> &mut Self {
        if self.warn_if_empty() {
            return self;
        }
        let to_remove: Vec<(Category, String)> = self
            .known_attribute_pairs()
            .into_iter()
            .filter(|(category, attr)| {
                let missing_countries = self
                    .countries
                    .values()
                    .filter(|record| {
                        !record
                            .get(category)
                            .and_then(|group| group.get(attr))
                            .is_some_and(|a| !a.has_missing_values())
                    })
                    .count();
                missing_countries > threshold
            })
            .collect();
        debug!(
            "Removing {} attributes for having more than {threshold} countries with missing values",
            to_remove.len()
        );
        for record in self.countries.values_mut() {
            for (category, attr) in &to_remove {
                if let Some(group) = record.get_mut(category) {
                    group.remove(attr);
                }
            }
        }
        self.prune_empty()
    }

    // RESAMPLERS

    /// Resamples every time series onto `frequency` over the dataset's
    /// covering interval and rewrites the records' frequency tags. Series
    /// tagged UNDEFINED are carried untouched. Countries are independent,
    /// so they are processed in parallel.
    pub(crate) fn resample(&mut self, frequency: Frequency) -> Result<&mut Self, DataError> {
        if self.warn_if_empty() {
            return Ok(self);
        }
        let Some(interval) = self.get_interval() else {
            warn!("No time series with parseable keys; skipping resampling");
            return Ok(self);
        };
        let resampler = Resampler::new(&interval, frequency)?;

        self.countries
            .par_iter_mut()
            .try_for_each(|(_, record)| -> Result<(), DataError> {
                for group in record.values_mut() {
                    for (key, attribute) in group.iter_mut() {
                        let Some(current) = attribute.frequency else {
                            continue;
                        };
                        if current == Frequency::Undefined {
                            continue;
                        }
                        let series_type = attribute.series_type.ok_or_else(|| {
                            DataError::MissingSeriesType {
                                attribute: key.clone(),
                            }
                        })?;
                        attribute.values =
                            resampler.resample(&attribute.values, current, series_type)?;
                        attribute.frequency = Some(frequency);
                    }
                }
                Ok(())
            })?;
        Ok(self)
    }

    /// Re-buckets DEMOGRAPHIC and MORTALITY attributes into `granularity`.
    /// Granularity only ever coarsens: once bucketed, the original strata are
    /// gone, so refining is refused with a warning.
    pub(crate) fn resample_age_groups(&mut self, granularity: AgeGranularity) -> &mut Self {
        if self.warn_if_empty() {
            return self;
        }
        if self.age_granularity == Some(granularity) {
            return self;
        }
        if let Some(current) = self.age_granularity {
            if granularity > current {
                warn!(
                    "Cannot increase age-group granularity (current: {current}, requested: {granularity}); reload the dataset to redo this operation"
                );
                return self;
            }
        }

        let resampler = AgeResampler::new(granularity);
        for record in self.countries.values_mut() {
            for category in [Category::Demographic, Category::Mortality] {
                if let Some(group) = record.get_mut(&category) {
                    *group = resampler.resample(group);
                }
            }
        }
        self.age_granularity = Some(granularity);
        self.prune_empty()
    }

    // ESTIMATORS

    /// Derives excess-mortality series for every country over `interval`,
    /// after age-resampling to `granularity`. Countries without a MORTALITY
    /// category are skipped with a warning, not failed.
    pub(crate) fn add_excess_mortality(
        &mut self,
        granularity: AgeGranularity,
        interval: &TimeInterval,
        baseline_cutoff_year: i32,
    ) -> &mut Self {
        if self.warn_if_empty() {
            return self;
        }
        self.resample_age_groups(granularity);

        let estimator = ExcessMortality::new(baseline_cutoff_year);
        for (country, record) in self.countries.iter_mut() {
            match record.get_mut(&Category::Mortality) {
                Some(group) => estimator.estimate(group, interval),
                None => warn!(
                    "Not possible to compute excess mortality for {country}: missing MORTALITY category"
                ),
            }
        }
        self
    }

    // HELPERS

    fn warn_if_empty(&self) -> bool {
        if self.countries.is_empty() {
            warn!("Dataset is empty; load data and redo this operation");
            true
        } else {
            false
        }
    }

    fn known_attribute_pairs(&self) -> Vec<(Category, String)> {
        let mut pairs: Vec<(Category, String)> = self
            .countries
            .values()
            .flat_map(|record| {
                record.iter().flat_map(|(category, group)| {
                    group.keys().map(|key| (*category, key.clone()))
                })
            })
            .collect();
        pairs.sort();
        pairs.dedup();
        pairs
    }

    fn time_series_records(&self) -> impl Iterator<Item = &crate::model::types::AttributeRecord> {
        self.countries
            .values()
            .flat_map(|record| record.values())
            .flat_map(|group| group.values())
            .filter(|attribute| attribute.is_time_series())
    }

    /// Bottom-up removal of structurally empty branches, one diagnostic per
    /// pruned branch.
    fn prune_empty(&mut self) -> &mut Self {
        for (country, record) in self.countries.iter_mut() {
            let mut emptied = Vec::new();
            for (category, group) in record.iter_mut() {
                group.retain(|_, attribute| !attribute.values.is_empty());
                if group.is_empty() {
                    emptied.push(*category);
                }
            }
            for category in &emptied {
                record.remove(category);
            }
            if !emptied.is_empty() && !record.is_empty() {
                let names: Vec<&str> = emptied.iter().map(|c| c.as_str()).collect();
                warn!("{country} no longer has {} data", names.join(", "));
            }
        }
        self.countries.retain(|country, record| {
            if record.is_empty() {
                warn!("{country} has been erased as it no longer had data");
                false
            } else {
                true
            }
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::{AttributeGroup, AttributeRecord, SeriesType, ValueSeries};
    use chrono::NaiveDate;

    fn time_series(
        name: &str,
        frequency: Frequency,
        series_type: SeriesType,
        entries: &[(&str, Option<f64>)],
    ) -> AttributeRecord {
        AttributeRecord {
            name: name.to_string(),
            source: "test".to_string(),
            unit: "Number".to_string(),
            frequency: Some(frequency),
            series_type: Some(series_type),
            values: entries.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        }
    }

    fn scalar(name: &str, value: Option<f64>) -> AttributeRecord {
        AttributeRecord {
            name: name.to_string(),
            source: "test".to_string(),
            unit: "Number".to_string(),
            frequency: None,
            series_type: None,
            values: ValueSeries::from([("2020".to_string(), value)]),
        }
    }

    fn country(entries: Vec<(Category, Vec<(&str, AttributeRecord)>)>) -> CountryRecord {
        entries
            .into_iter()
            .map(|(category, attrs)| {
                let group: AttributeGroup = attrs
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect();
                (category, group)
            })
            .collect()
    }

    fn sample() -> Dataset {
        let deaths = time_series(
            "deaths",
            Frequency::Weekly,
            SeriesType::New,
            &[("2020W10", Some(57.0)), ("2020W11", Some(61.0))],
        );
        let cases = time_series(
            "new_cases",
            Frequency::Daily,
            SeriesType::New,
            &[("02-03-2020", Some(5.0)), ("03-03-2020", Some(8.0))],
        );
        let mut countries = BTreeMap::new();
        countries.insert(
            "Portugal".to_string(),
            country(vec![
                (Category::Mortality, vec![("d65_74_Males", deaths.clone())]),
                (Category::Covid, vec![("new_cases", cases.clone())]),
                (Category::Demographic, vec![("population", scalar("population", Some(10_000.0)))]),
            ]),
        );
        countries.insert(
            "Spain".to_string(),
            country(vec![
                (Category::Mortality, vec![("d65_74_Males", deaths)]),
                (Category::Covid, vec![("new_cases", cases)]),
            ]),
        );
        Dataset::from_map(countries)
    }

    #[test]
    fn filter_countries_is_a_projection() {
        let mut dataset = sample();
        let original = dataset.as_map()["Portugal"].clone();
        dataset.filter_countries(&["Portugal".to_string()]);
        assert_eq!(dataset.get_countries(), vec!["Portugal"]);
        assert_eq!(dataset.as_map()["Portugal"], original);
    }

    #[test]
    fn filter_categories_prunes_empty_countries() {
        let mut dataset = sample();
        dataset.filter_categories(&[Category::Demographic]);
        // Spain has no DEMOGRAPHIC data and must disappear entirely.
        assert_eq!(dataset.get_countries(), vec!["Portugal"]);
        let record = &dataset.as_map()["Portugal"];
        assert_eq!(record.len(), 1);
        assert!(record.contains_key(&Category::Demographic));
    }

    #[test]
    fn filter_attributes_matches_category_key_pairs() {
        let mut dataset = sample();
        dataset.filter_attributes(&[(Category::Covid, "new_cases".to_string())]);
        for record in dataset.as_map().values() {
            assert_eq!(record.keys().collect::<Vec<_>>(), vec![&Category::Covid]);
        }
    }

    #[test]
    fn filter_time_interval_keeps_scalars_untouched() {
        let mut dataset = sample();
        let interval = TimeInterval::closed(
            NaiveDate::from_ymd_opt(2020, 3, 2).unwrap(),
            NaiveDate::from_ymd_opt(2020, 3, 8).unwrap(),
        );
        dataset.filter_time_interval(&interval);

        let portugal = &dataset.as_map()["Portugal"];
        // Scalar population record survives despite its key predating the window.
        assert!(portugal[&Category::Demographic].contains_key("population"));
        // The weekly series keeps only the week inside the window.
        let deaths = &portugal[&Category::Mortality]["d65_74_Males"];
        assert_eq!(deaths.values.len(), 1);
        assert!(deaths.values.contains_key("2020W10"));
    }

    #[test]
    fn filter_age_group_keeps_unparseable_keys() {
        let mut dataset = sample();
        dataset.filter_age_group(&AgeRange::new(Some(0), Some(14)));
        let portugal = &dataset.as_map()["Portugal"];
        // d65_74 does not overlap 0-14 and goes; new_cases has no age and stays.
        assert!(!portugal.contains_key(&Category::Mortality));
        assert!(portugal[&Category::Covid].contains_key("new_cases"));
    }

    #[test]
    fn missing_value_country_filter_requires_all_attributes() {
        let mut dataset = sample();
        // Spain lacks DEMOGRAPHIC/population entirely.
        dataset.filter_countries_with_missing_values_on_attributes(&[(
            Category::Demographic,
            "population".to_string(),
        )]);
        assert_eq!(dataset.get_countries(), vec!["Portugal"]);
    }

    #[test]
    fn missing_attribute_count_threshold() {
        let mut dataset = sample();
        // Spain misses one known attribute (population); threshold 0 drops it.
        dataset.filter_countries_missing_value_attributes_below(0);
        assert_eq!(dataset.get_countries(), vec!["Portugal"]);

        let mut lenient = sample();
        lenient.filter_countries_missing_value_attributes_below(1);
        assert_eq!(lenient.get_countries().len(), 2);
    }

    #[test]
    fn nan_attribute_filter_drops_widely_missing_attributes() {
        let mut dataset = sample();
        // population is absent in Spain: 1 missing country > threshold 0.
        dataset.filter_attributes_with_countries_nan_below(0);
        let portugal = &dataset.as_map()["Portugal"];
        assert!(!portugal.contains_key(&Category::Demographic));
        assert!(portugal[&Category::Covid].contains_key("new_cases"));
    }

    #[test]
    fn get_interval_covers_all_series() {
        let dataset = sample();
        let interval = dataset.get_interval().unwrap();
        // Earliest bound comes from the daily series, latest from 2020W11.
        assert_eq!(interval.lo(), NaiveDate::from_ymd_opt(2020, 3, 2).unwrap());
        assert_eq!(interval.hi(), NaiveDate::from_ymd_opt(2020, 3, 16).unwrap());
    }

    #[test]
    fn get_interval_none_on_empty() {
        assert!(Dataset::from_map(BTreeMap::new()).get_interval().is_none());
    }

    #[test]
    fn resample_rewrites_frequency_tags() {
        let mut dataset = sample();
        dataset.resample(Frequency::Weekly).unwrap();
        let cases = &dataset.as_map()["Portugal"][&Category::Covid]["new_cases"];
        assert_eq!(cases.frequency, Some(Frequency::Weekly));
        assert!(cases.values.keys().all(|k| k.contains('W')));
    }

    #[test]
    fn resample_skips_undefined_series() {
        let mut countries = BTreeMap::new();
        let mut undefined = time_series(
            "mystery",
            Frequency::Undefined,
            SeriesType::New,
            &[("sometime", Some(1.0))],
        );
        undefined.frequency = Some(Frequency::Undefined);
        countries.insert(
            "Portugal".to_string(),
            country(vec![(Category::Indicators, vec![("mystery", undefined)])]),
        );
        let mut dataset = Dataset::from_map(countries);
        // No parseable series means no covering interval; the call is a no-op.
        dataset.resample(Frequency::Weekly).unwrap();
        let record = &dataset.as_map()["Portugal"][&Category::Indicators]["mystery"];
        assert_eq!(record.frequency, Some(Frequency::Undefined));
        assert!(record.values.contains_key("sometime"));
    }

    #[test]
    fn resample_without_parseable_keys_leaves_series_untouched() {
        let mut countries = BTreeMap::new();
        countries.insert(
            "Portugal".to_string(),
            country(vec![(
                Category::Covid,
                vec![(
                    "new_cases",
                    time_series(
                        "new_cases",
                        Frequency::Daily,
                        SeriesType::New,
                        &[("sometime", Some(3.0))],
                    ),
                )],
            )]),
        );
        let mut dataset = Dataset::from_map(countries);
        let before = dataset.as_map().clone();
        dataset.resample(Frequency::Weekly).unwrap();
        assert_eq!(dataset.as_map(), &before);
    }

    #[test]
    fn age_granularity_never_refines() {
        let mut dataset = sample();
        dataset.resample_age_groups(AgeGranularity::Low);
        let before = dataset.as_map().clone();
        dataset.resample_age_groups(AgeGranularity::High);
        assert_eq!(dataset.as_map(), &before);
    }

    #[test]
    fn age_resampling_rebuckets_mortality() {
        let mut dataset = sample();
        dataset.resample_age_groups(AgeGranularity::Medium);
        let portugal = &dataset.as_map()["Portugal"];
        assert!(portugal[&Category::Mortality].contains_key("65+_Males"));
        // COVID is not an age-bucketed category and is untouched.
        assert!(portugal[&Category::Covid].contains_key("new_cases"));
    }

    #[test]
    fn excess_mortality_skips_countries_without_mortality() {
        let mut countries = BTreeMap::new();
        countries.insert(
            "Andorra".to_string(),
            country(vec![(
                Category::Covid,
                vec![(
                    "new_cases",
                    time_series(
                        "new_cases",
                        Frequency::Daily,
                        SeriesType::New,
                        &[("02-03-2020", Some(5.0))],
                    ),
                )],
            )]),
        );
        let mut dataset = Dataset::from_map(countries);
        let before = dataset.as_map().clone();
        let interval = TimeInterval::closed(
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2020, 12, 31).unwrap(),
        );
        dataset.add_excess_mortality(AgeGranularity::Low, &interval, 2019);
        assert_eq!(dataset.as_map(), &before);
    }

    #[test]
    fn empty_dataset_operations_are_noops() {
        let mut dataset = Dataset::from_map(BTreeMap::new());
        dataset
            .filter_countries(&["Portugal".to_string()])
            .filter_age_group(&AgeRange::new(None, None))
            .resample_age_groups(AgeGranularity::Low);
        assert!(dataset.resample(Frequency::Weekly).is_ok());
        assert!(dataset.is_empty());
    }

    #[test]
    fn merge_first_writer_wins() {
        let mut dataset = Dataset::from_map(BTreeMap::new());
        let first = BTreeMap::from([(
            "Portugal".to_string(),
            country(vec![(
                Category::Demographic,
                vec![("population", scalar("population", Some(1.0)))],
            )]),
        )]);
        let second = BTreeMap::from([(
            "Portugal".to_string(),
            country(vec![(
                Category::Demographic,
                vec![
                    ("population", scalar("population", Some(2.0))),
                    ("density", scalar("density", Some(3.0))),
                ],
            )]),
        )]);
        dataset.merge(first);
        dataset.merge(second);
        let group = &dataset.as_map()["Portugal"][&Category::Demographic];
        assert_eq!(group["population"].values["2020"], Some(1.0));
        assert_eq!(group["density"].values["2020"], Some(3.0));
    }

    #[test]
    fn pruning_removes_all_empty_branches() {
        let mut countries = BTreeMap::new();
        let mut emptied = time_series("deaths", Frequency::Weekly, SeriesType::New, &[]);
        emptied.values.clear();
        countries.insert(
            "Portugal".to_string(),
            country(vec![(Category::Mortality, vec![("d65_74", emptied)])]),
        );
        let mut dataset = Dataset::from_map(countries);
        dataset.filter_age_group(&AgeRange::new(None, None));
        assert!(dataset.is_empty());
    }
}
