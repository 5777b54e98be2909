//! `ev-pipeline`: stage orchestrator for the ev_traffic preparation run.
//!
//! # Stages
//!
//! ```text
//! load roads, sensors, stations
//!   ① Match      RoadVolumeMatcher assigns each road its nearest sensor
//!                  within the acceptance radius (else no volume).
//!   ② Flatten    one row per vertex, sorted by (lat, lon, road, seq);
//!                  optional road-type allow-list via filter_roads.
//!   ③ Bin        median-fill, round, band, colour.
//!   ④ Stations   StationRoadMatcher finds each station's nearest vertex.
//!   ⑤ Merge      vertex rows left-joined with matched stations.
//! write sorted_roads.csv, EV_data_capacity.csv, merged.csv
//! ```
//!
//! Every stage is a pure function of its inputs, so reruns over the same
//! inputs produce identical files.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                              |
//! |------------|-----------------------------------------------------|
//! | `parallel` | Runs stage ① on Rayon's thread pool.                |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ev_core::PipelineConfig;
//! use ev_pipeline::Pipeline;
//!
//! let report = Pipeline::new(PipelineConfig::default())?.run()?;
//! report.log_summary();
//! ```

pub mod error;
pub mod pipeline;
pub mod report;


pub use error::{PipelineError, PipelineResult};
pub use pipeline::{Pipeline, PipelineInputs, road_rows, station_rows};
pub use report::PipelineReport;
