//! CLI subcommand definitions

use clap::{Subcommand, ValueEnum};
use std::path::PathBuf;

/// Main CLI commands
#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Show dataset counts and covering interval (default)
    Summary,
    /// Export a tabular projection of the dataset
    Export {
        /// Projection shape
        #[arg(value_enum, default_value = "parameters")]
        projection: Projection,
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
        /// Output as CSV
        #[arg(long)]
        csv: bool,
    },
    /// Download a pre-serialized dataset JSON
    Fetch {
        /// Source URL
        #[arg(long)]
        url: String,
        /// Destination file
        #[arg(long, default_value = "dataset.json")]
        out: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Projection {
    /// One row per country, scalar records only
    Parameters,
    /// One row per stored value, metadata included
    All,
    /// One row per (timestamp, country), sorted by parsed timestamp
    Timeseries,
}
