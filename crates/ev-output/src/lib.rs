//! `ev-output`: persisted tables for the ev_traffic pipeline.
//!
//! | File                   | Row type      | Contents                                  |
//! |------------------------|---------------|-------------------------------------------|
//! | `sorted_roads.csv`     | [`RoadRow`]    | one row per road vertex, lat/lon sorted   |
//! | `EV_data_capacity.csv` | [`StationRow`] | stations with capacity and nearest vertex |
//! | `merged.csv`           | [`MergedRow`]  | vertices left-joined with their stations  |
//!
//! Writers implement [`OutputWriter`]; [`CsvWriter`] is the only backend.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ev_output::{CsvWriter, OutputWriter, merge_rows};
//!
//! let mut w = CsvWriter::new(Path::new("./data"), &station_table.headers)?;
//! w.write_roads(&road_rows)?;
//! w.write_stations(&station_rows)?;
//! w.write_merged(&merge_rows(&road_rows, &station_rows))?;
//! w.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod merge;
pub mod row;
pub mod writer;


pub use self::csv::{CsvWriter, MERGED_FILE, ROADS_FILE, STATIONS_FILE};
pub use error::{OutputError, OutputResult};
pub use merge::merge_rows;
pub use row::{MergedRow, NearestRoad, RoadRow, StationRow};
pub use writer::OutputWriter;
