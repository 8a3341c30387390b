//! Error types for dataset loading and query evaluation.

use thiserror::Error;

/// Fatal errors raised while loading the datasets at startup.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("failed to open dataset {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("dataset {path} is missing required column '{column}'")]
    MissingColumn { path: String, column: &'static str },

    #[error("dataset {path}, row {row}: {reason}")]
    InvalidRecord {
        path: String,
        row: usize,
        reason: String,
    },
}

/// Which of the two datasets a query ran out of rows in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Consumption,
    Outage,
}

/// Non-fatal errors produced while answering a single query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("no {0:?} data available for the selected filters")]
    EmptyDataset(Dataset),

    #[error("query is empty")]
    EmptyQuery,

    #[error("query not recognized")]
    Unrecognized,

    #[error("failed to render result: {0}")]
    Render(String),
}
