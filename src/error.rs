use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DataError {
    #[error("Unknown frequency \"{input}\" (expected DAILY, WEEKLY, MONTHLY or YEARLY)")]
    InvalidFrequency { input: String },

    #[error("Unknown series type \"{input}\" (expected NEW, TOTAL or CURRENT)")]
    InvalidSeriesType { input: String },

    #[error("Unknown age granularity \"{input}\" (expected LOW, MEDIUM or HIGH)")]
    InvalidGranularity { input: String },

    #[error("Unknown category \"{input}\" (expected INDICATORS, DEMOGRAPHIC, SCORES, COVID, MORTALITY or MOBILITY)")]
    InvalidCategory { input: String },

    #[error("Invalid time interval \"{input}\"")]
    InvalidInterval { input: String },

    #[error("Unrecognized age group \"{input}\" (expected forms like 15-64, -14 or 65+)")]
    InvalidAgeGroup { input: String },

    #[error("Invalid attribute selector \"{input}\" (expected CATEGORY:KEY)")]
    InvalidAttribute { input: String },

    #[error("No dataset specified; pass --dataset or set one in the config file")]
    MissingDataset,

    #[error("Time series \"{attribute}\" has no series type; cannot resample")]
    MissingSeriesType { attribute: String },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse dataset JSON in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("Failed to fetch dataset from {url}: {reason}")]
    Fetch { url: String, reason: String },
}
