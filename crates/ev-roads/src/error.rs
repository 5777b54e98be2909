//! Road-subsystem error type.

use thiserror::Error;

/// Errors produced by `ev-roads`.
///
/// Per-record problems (bad geometry, unparsable numbers) never surface
/// here: the loaders skip and count those rows.  Only structural problems
/// with a whole input abort a load.
#[derive(Debug, Error)]
pub enum RoadError {
    #[error("{source_name} is missing required column {column:?}")]
    MissingColumn {
        source_name: &'static str,
        column:      &'static str,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RoadResult<T> = Result<T, RoadError>;
