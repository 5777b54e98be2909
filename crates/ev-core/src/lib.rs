//! `ev-core`: foundational types for the `ev_traffic` preparation pipeline.
//!
//! This crate is a dependency of every other `ev-*` crate.  It has no `ev-*`
//! dependencies and only `thiserror`, `serde`, and `serde_json` externally.
//!
//! # What lives here
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`ids`]    | `RoadId`, `SensorId`, `StationId`, `VertexId`             |
//! | [`geo`]    | `GeoPoint`, planar lat/lon distance                       |
//! | [`config`] | `PipelineConfig` and its per-stage sections               |
//! | [`error`]  | `EvError`, `EvResult`                                     |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    BinConfig, MatchConfig, PathConfig, PipelineConfig, RoadSourceConfig, StationConfig,
    StationSearch, YL_OR_BR_7,
};
pub use error::{EvError, EvResult};
pub use geo::GeoPoint;
pub use ids::{RoadId, SensorId, StationId, VertexId};
