//! Errors raised while reading or parsing a Valgrind log.

use std::num::ParseIntError;
use std::path::PathBuf;

/// Why a log could not be turned into an [`ErrorSummary`](crate::ErrorSummary).
#[derive(Debug, thiserror::Error)]
pub enum SummaryError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Log {} is empty", path.display())]
    EmptyLog { path: PathBuf },

    #[error("No ERROR SUMMARY found in line: {line:?}")]
    MissingMarker { line: String },

    #[error("Invalid error count {value:?}: {source}")]
    InvalidCount {
        value: String,
        #[source]
        source: ParseIntError,
    },
}
