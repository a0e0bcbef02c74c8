/// Bulk transfer failures
///
/// Any of these aborts the whole export or import; for imports the enclosing
/// transaction is rolled back before the error reaches the caller.

use thiserror::Error;

/// Why a single CSV field or row could not be turned into column values
#[derive(Debug, Error)]
pub enum FieldError {
    #[error("invalid identifier {value:?} in column '{column}'")]
    InvalidIdentifier { column: &'static str, value: String },

    #[error("invalid timestamp {value:?} in column '{column}'")]
    InvalidTimestamp { column: &'static str, value: String },

    #[error("missing value for required column '{column}'")]
    MissingColumn { column: &'static str },
}

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Unknown table for file: {0}")]
    UnknownTable(String),

    #[error("uploaded file has no name")]
    MissingFileName,

    #[error("{file} is not valid UTF-8")]
    Encoding { file: String },

    #[error("malformed CSV in {file}: {source}")]
    Csv {
        file: String,
        #[source]
        source: csv::Error,
    },

    /// `row` counts data rows from 1, not counting the header
    #[error("{file}, row {row}: {source}")]
    InvalidRow {
        file: String,
        row: usize,
        #[source]
        source: FieldError,
    },

    #[error("failed to write {file}: {source}")]
    Write {
        file: String,
        #[source]
        source: csv::Error,
    },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
