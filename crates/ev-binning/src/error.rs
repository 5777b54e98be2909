use thiserror::Error;

#[derive(Debug, Error)]
pub enum BinError {
    #[error("bin edges must be non-empty, finite, and strictly increasing: {0:?}")]
    InvalidEdges(Vec<f64>),

    #[error("colour palette is empty")]
    EmptyPalette,
}

pub type BinResult<T> = Result<T, BinError>;
