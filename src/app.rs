//! Command execution
//!
//! Applies the global pipeline options in a fixed order (load, filter,
//! resample, estimate, save), then runs the subcommand against the
//! transformed dataset.

use crate::cli::{Cli, Commands, Projection};
use crate::consts::DEFAULT_BASELINE_CUTOFF_YEAR;
use crate::error::DataError;
use crate::model::{Category, Dataset, Frequency};
use crate::model::io::fetch_dataset;
use crate::output::{
    ExportTable, export_all, export_parameters, export_timeseries, render_csv, render_json,
    render_table,
};
use crate::parse::age::parse_age_group;
use crate::parse::time::{TimeInterval, parse_interval};
use crate::resample::AgeGranularity;

pub(crate) fn run(cli: &Cli) -> Result<(), DataError> {
    if let Some(Commands::Fetch { url, out }) = &cli.command {
        fetch_dataset(url, out)?;
        println!("Saved dataset to {}", out.display());
        return Ok(());
    }

    let pattern = cli.dataset.as_deref().ok_or(DataError::MissingDataset)?;
    let mut dataset = Dataset::load_merged(pattern)?;
    apply_pipeline(&mut dataset, cli)?;

    if let Some(path) = &cli.save {
        dataset.to_json_file(path)?;
        println!("Saved dataset to {}", path.display());
    }

    match &cli.command {
        Some(Commands::Export {
            projection,
            json,
            csv,
        }) => {
            if dataset.is_empty() {
                println!("No data found for the specified filters.");
                return Ok(());
            }
            let table = build_projection(&dataset, *projection);
            if *json {
                println!("{}", render_json(&table));
            } else if *csv {
                print!("{}", render_csv(&table));
            } else {
                println!("{}", render_table(&table));
            }
        }
        Some(Commands::Summary) | None => print_summary(&dataset),
        Some(Commands::Fetch { .. }) => unreachable!("handled above"),
    }
    Ok(())
}

fn apply_pipeline(dataset: &mut Dataset, cli: &Cli) -> Result<(), DataError> {
    if let Some(countries) = &cli.countries {
        dataset.filter_countries(countries);
    }
    if let Some(categories) = &cli.categories {
        let parsed: Vec<Category> = categories
            .iter()
            .map(|s| s.parse())
            .collect::<Result<_, _>>()?;
        dataset.filter_categories(&parsed);
    }
    if let Some(attributes) = &cli.attributes {
        let parsed: Vec<(Category, String)> = attributes
            .iter()
            .map(|s| parse_attribute_selector(s))
            .collect::<Result<_, _>>()?;
        dataset.filter_attributes(&parsed);
    }
    if cli.since.is_some() || cli.until.is_some() {
        let interval = bounded_interval(cli.since.as_deref(), cli.until.as_deref())?;
        dataset.filter_time_interval(&interval);
    }
    if let Some(raw) = &cli.age_group {
        let range = parse_age_group(raw).ok_or_else(|| DataError::InvalidAgeGroup {
            input: raw.clone(),
        })?;
        dataset.filter_age_group(&range);
    }
    if let Some(attributes) = &cli.require_complete {
        let parsed: Vec<(Category, String)> = attributes
            .iter()
            .map(|s| parse_attribute_selector(s))
            .collect::<Result<_, _>>()?;
        dataset.filter_countries_with_missing_values_on_attributes(&parsed);
    }
    if let Some(threshold) = cli.max_missing_attributes {
        dataset.filter_countries_missing_value_attributes_below(threshold);
    }
    if let Some(threshold) = cli.max_missing_countries {
        dataset.filter_attributes_with_countries_nan_below(threshold);
    }
    if let Some(frequency) = &cli.resample {
        dataset.resample(frequency.parse::<Frequency>()?)?;
    }
    if let Some(granularity) = &cli.age_granularity {
        dataset.resample_age_groups(granularity.parse::<AgeGranularity>()?);
    }
    if cli.excess {
        // Estimation requires fixed age buckets; default to the finest.
        let granularity = match &cli.age_granularity {
            Some(g) => g.parse::<AgeGranularity>()?,
            None => AgeGranularity::High,
        };
        let interval = bounded_interval(
            Some(cli.excess_since.as_deref().unwrap_or("01-01-2020")),
            Some(cli.excess_until.as_deref().unwrap_or("31-12-2021")),
        )?;
        let cutoff = cli.baseline_cutoff.unwrap_or(DEFAULT_BASELINE_CUTOFF_YEAR);
        dataset.add_excess_mortality(granularity, &interval, cutoff);
    }
    Ok(())
}

/// Builds a closed interval from optional time-key bounds; an absent bound
/// falls back to a wide sentinel year.
fn bounded_interval(since: Option<&str>, until: Option<&str>) -> Result<TimeInterval, DataError> {
    let start = since.unwrap_or("1900");
    let end = until.unwrap_or("2100");
    parse_interval(start, end).ok_or_else(|| DataError::InvalidInterval {
        input: format!("{start}..{end}"),
    })
}

fn parse_attribute_selector(input: &str) -> Result<(Category, String), DataError> {
    let (category, key) = input.split_once(':').ok_or_else(|| DataError::InvalidAttribute {
        input: input.to_string(),
    })?;
    if key.is_empty() {
        return Err(DataError::InvalidAttribute {
            input: input.to_string(),
        });
    }
    Ok((category.parse()?, key.to_string()))
}

fn build_projection(dataset: &Dataset, projection: Projection) -> ExportTable {
    match projection {
        Projection::Parameters => export_parameters(dataset),
        Projection::All => export_all(dataset),
        Projection::Timeseries => export_timeseries(dataset),
    }
}

fn print_summary(dataset: &Dataset) {
    if dataset.is_empty() {
        println!("No data found for the specified filters.");
        return;
    }
    let countries = dataset.get_countries();
    let categories = dataset.get_categories();
    let attributes = dataset.get_attributes();
    println!("Countries:  {}", countries.len());
    println!("Categories: {}", categories.len());
    println!("Attributes: {}", attributes.len());
    match dataset.get_interval() {
        Some(interval) => println!(
            "Interval:   {} .. {}",
            interval.lo().format("%Y-%m-%d"),
            (interval.hi() - chrono::Duration::days(1)).format("%Y-%m-%d")
        ),
        None => println!("Interval:   (no time series)"),
    }
}
