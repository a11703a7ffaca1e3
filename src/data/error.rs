use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn an input file into a [`CreditDataset`](super::model::CreditDataset).
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("data file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("missing expected column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}, column '{column}': {reason}")]
    MalformedRow {
        row: usize,
        column: &'static str,
        reason: String,
    },

    #[error("malformed {format} input: {reason}")]
    Malformed { format: &'static str, reason: String },
}
