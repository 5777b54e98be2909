//! `ev-stations`: charging stations and station → road-vertex matching.
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`station`] | `StationRecord`, `PortCounts`, capacity / connector helpers   |
//! | [`loader`]  | `load_stations_csv`, `StationTable`                          |
//! | [`matcher`] | `StationRoadMatcher` (latitude window or exact R-tree)       |
//! | [`error`]   | `StationError`, `StationResult<T>`                           |

pub mod error;
pub mod loader;
pub mod matcher;
pub mod station;


pub use error::{StationError, StationResult};
pub use loader::{StationTable, load_stations_csv, load_stations_reader};
pub use matcher::{StationMatch, StationRoadMatcher};
pub use station::{PortCounts, StationRecord, normalize_connectors, parse_count};
