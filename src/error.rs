//! Error types for the dataset pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong between a raw indicator file and the final
/// chart list. Any of these abandons the whole figure assembly.
#[derive(Debug, Error)]
pub enum DataError {
    /// The dataset path does not resolve to a file.
    #[error("dataset file not found: '{}'", .path.display())]
    MissingFile { path: PathBuf },

    /// Any other failure while reading a dataset file.
    #[error("IO error for '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A requested column is not in the header row.
    #[error("column '{column}' not found in {dataset}")]
    Schema { column: String, dataset: String },

    /// An allow-listed country has no row in a dataset that needs it.
    #[error("country '{country}' missing from {dataset}")]
    MissingCountry { country: String, dataset: String },

    /// A non-empty cell in a value column is not a number.
    #[error("{dataset}, line {line}, column '{column}': '{value}' is not a number")]
    InvalidValue {
        dataset: String,
        line: u64,
        column: String,
        value: String,
    },

    /// A year label cannot be read as an integer year.
    #[error("year label '{0}' is not an integer")]
    InvalidYearLabel(String),

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, DataError>;
