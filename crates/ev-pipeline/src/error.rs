use ev_binning::BinError;
use ev_core::EvError;
use ev_output::OutputError;
use ev_roads::RoadError;
use ev_stations::StationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] EvError),

    #[error("road/sensor input error: {0}")]
    Road(#[from] RoadError),

    #[error("binning error: {0}")]
    Bin(#[from] BinError),

    #[error("station input error: {0}")]
    Station(#[from] StationError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
