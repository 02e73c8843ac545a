//! CLI argument definitions
//!
//! Global pipeline options and configuration merging logic. The pipeline
//! options apply in a fixed order before the subcommand runs: load, filter,
//! resample, estimate, save.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

use super::commands::Commands;

#[derive(Parser)]
#[command(name = "epirisk")]
#[command(about = "Epidemiological dataset filtering, resampling and excess-mortality estimation", version)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Option<Commands>,

    /// Dataset file, directory of fragments, or glob pattern
    #[arg(short, long, global = true)]
    pub(crate) dataset: Option<String>,

    /// Keep only these countries
    #[arg(long, global = true, value_delimiter = ',', value_name = "COUNTRY")]
    pub(crate) countries: Option<Vec<String>>,

    /// Keep only these categories (INDICATORS, DEMOGRAPHIC, SCORES, COVID, MORTALITY, MOBILITY)
    #[arg(long, global = true, value_delimiter = ',', value_name = "CATEGORY")]
    pub(crate) categories: Option<Vec<String>>,

    /// Keep only these attributes, as CATEGORY:KEY pairs
    #[arg(long, global = true, value_delimiter = ',', value_name = "CATEGORY:KEY")]
    pub(crate) attributes: Option<Vec<String>>,

    /// Keep only data from this time key on (e.g. 2020, 01-2020, 2020W10)
    #[arg(short, long, global = true)]
    pub(crate) since: Option<String>,

    /// Keep only data up to this time key
    #[arg(short, long, global = true)]
    pub(crate) until: Option<String>,

    /// Keep only attributes overlapping this age group (e.g. 15-64, -14, 65+)
    #[arg(long, global = true, value_name = "RANGE")]
    pub(crate) age_group: Option<String>,

    /// Drop countries with missing values on these attributes
    #[arg(long, global = true, value_delimiter = ',', value_name = "CATEGORY:KEY")]
    pub(crate) require_complete: Option<Vec<String>>,

    /// Drop countries missing more than this many known attributes
    #[arg(long, global = true, value_name = "N")]
    pub(crate) max_missing_attributes: Option<usize>,

    /// Drop attributes missing in more than this many countries
    #[arg(long, global = true, value_name = "N")]
    pub(crate) max_missing_countries: Option<usize>,

    /// Resample every time series to this frequency (DAILY, WEEKLY, MONTHLY, YEARLY)
    #[arg(short, long, global = true, value_name = "FREQUENCY")]
    pub(crate) resample: Option<String>,

    /// Re-bucket age-stratified attributes to this granularity (LOW, MEDIUM, HIGH)
    #[arg(short = 'g', long, global = true, value_name = "GRANULARITY")]
    pub(crate) age_granularity: Option<String>,

    /// Derive excess-mortality series
    #[arg(long, global = true)]
    pub(crate) excess: bool,

    /// Start of the excess-mortality target window
    #[arg(long, global = true, value_name = "KEY")]
    pub(crate) excess_since: Option<String>,

    /// End of the excess-mortality target window
    #[arg(long, global = true, value_name = "KEY")]
    pub(crate) excess_until: Option<String>,

    /// Last year allowed into excess-mortality baselines
    #[arg(long, global = true, value_name = "YEAR")]
    pub(crate) baseline_cutoff: Option<i32>,

    /// Write the transformed dataset to this JSON file
    #[arg(long, global = true, value_name = "PATH")]
    pub(crate) save: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub(crate) log_level: Option<String>,
}

impl Cli {
    /// Merge config file values into CLI (CLI args take precedence)
    pub(crate) fn with_config(mut self, config: &Config) -> Self {
        if self.dataset.is_none() {
            self.dataset = config.dataset.clone();
        }
        if self.resample.is_none() {
            self.resample = config.resample.clone();
        }
        if self.age_granularity.is_none() {
            self.age_granularity = config.age_granularity.clone();
        }
        if self.baseline_cutoff.is_none() {
            self.baseline_cutoff = config.baseline_cutoff;
        }
        if self.log_level.is_none() {
            self.log_level = config.log_level.clone();
        }
        self
    }
}
