use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn a source file into a cleaned export table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("file '{}' not found, check the path", .path.display())]
    NotFound { path: PathBuf },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("dataset is missing the '{0}' column")]
    MissingColumn(String),

    #[error("failed to load '{}': {:#}", .path.display(), .cause)]
    Parse { path: PathBuf, cause: anyhow::Error },
}

/// Failure while grouping a table.
#[derive(Debug, Error, PartialEq)]
pub enum AggregateError {
    #[error("cannot group: column '{0}' does not exist")]
    MissingColumn(String),

    #[error("column '{column}' holds a non-numeric value at row {row}")]
    NonNumericMeasure { column: String, row: usize },
}

/// Failure while turning an aggregate into plottable data.
#[derive(Debug, Error, PartialEq)]
pub enum ChartError {
    #[error("no strictly positive values to place on a logarithmic axis")]
    NoPositiveValues,

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config file '{}'", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing config file '{}'", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
