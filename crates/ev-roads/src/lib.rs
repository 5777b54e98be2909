//! `ev-roads`: road geometries, traffic sensors, and road ↔ sensor matching.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`road`]    | `RoadSegment`, `RoadAttrs`, WKT geometry parsing, CSV loader |
//! | [`sensor`]  | `SensorPoint`, traffic-count CSV loader                     |
//! | [`matcher`] | `RoadVolumeMatcher` (R-tree over sensors)                   |
//! | [`vertex`]  | `VertexTable` (flattened, lat-sorted), `filter_roads`       |
//! | [`error`]   | `RoadError`, `RoadResult<T>`                                |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Runs [`RoadVolumeMatcher::enrich`] on Rayon's pool.      |

pub mod error;
pub mod matcher;
pub mod road;
pub mod sensor;
pub mod vertex;

#[cfg(test)]
mod tests;

pub use error::{RoadError, RoadResult};
pub use matcher::{MatchStats, RoadVolumeMatcher, SensorMatch};
pub use road::{LoadedRoads, RoadAttrs, RoadSegment, TrafficAssignment, load_roads_csv, load_roads_reader, parse_geometry};
pub use sensor::{LoadedSensors, SensorPoint, load_sensors_csv, load_sensors_reader};
pub use vertex::{VertexRow, VertexTable, filter_roads};
