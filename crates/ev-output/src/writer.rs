//! The `OutputWriter` trait implemented by backend writers.

use crate::{MergedRow, OutputResult, RoadRow, StationRow};

/// Sink for the three pipeline tables.
///
/// The pipeline calls each `write_*` method once, in table order, then
/// [`finish`][Self::finish].
pub trait OutputWriter {
    /// Write the flattened, binned vertex table.
    fn write_roads(&mut self, rows: &[RoadRow]) -> OutputResult<()>;

    /// Write stations with their derived fields and nearest vertex.
    fn write_stations(&mut self, rows: &[StationRow]) -> OutputResult<()>;

    /// Write the vertex/station left join.
    fn write_merged(&mut self, rows: &[MergedRow<'_>]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
