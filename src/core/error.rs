use thiserror::Error;

/// Errors raised while importing a file or reading the table catalog
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Only .csv files can be uploaded, got '{0}'")]
    UnsupportedExtension(String),

    #[error("The uploaded file has no header row")]
    EmptyInput,

    #[error("Table '{0}' not found")]
    TableNotFound(String),

    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the chart dispatcher
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChartError {
    #[error("Column '{0}' does not exist in the selected table")]
    UnknownColumn(String),

    #[error("Unknown chart type: {0}")]
    UnknownKind(String),
}
