//! Flattened road vertices.
//!
//! # Layout
//!
//! Each enriched road is exploded into one [`VertexRow`] per vertex.  `seq`
//! counts a vertex's position within its road across all parts, so sorting
//! a road's rows by `seq` recovers the drawing order.
//!
//! The table as a whole is sorted by `(lat, lon)`, ties broken by
//! `(road, seq)`, so the order is total and reruns are reproducible.  The
//! latitude sort is what lets station matching binary-search a latitude
//! window instead of scanning every vertex.

use std::ops::Range;

use log::debug;

use ev_core::{GeoPoint, RoadId, VertexId};

use crate::road::{RoadAttrs, RoadSegment};

/// One vertex of one road, carrying its road's attributes and traffic.
#[derive(Clone, Debug, PartialEq)]
pub struct VertexRow {
    pub road:          RoadId,
    /// Position of this vertex within its road.
    pub seq:           u32,
    pub pos:           GeoPoint,
    pub attrs:         RoadAttrs,
    pub volume:        Option<f64>,
    pub demand_factor: Option<f64>,
    pub state:         Option<String>,
}

/// Lat-sorted flattened vertex rows.  Construct with [`VertexTable::from_roads`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VertexTable {
    rows: Vec<VertexRow>,
}

impl VertexTable {
    /// Explode `roads` into vertex rows and sort them.  O(V log V).
    pub fn from_roads(roads: &[RoadSegment]) -> Self {
        let mut rows: Vec<VertexRow> = Vec::with_capacity(roads.iter().map(RoadSegment::vertex_count).sum());
        for road in roads {
            for (seq, pos) in road.vertices().enumerate() {
                rows.push(VertexRow {
                    road:          road.id,
                    seq:           seq as u32,
                    pos,
                    attrs:         road.attrs.clone(),
                    volume:        road.volume(),
                    demand_factor: road.demand_factor(),
                    state:         road.state().map(str::to_owned),
                });
            }
        }
        Self::from_rows(rows)
    }

    /// Sort arbitrary rows into table order.
    pub fn from_rows(mut rows: Vec<VertexRow>) -> Self {
        rows.sort_by(|a, b| {
            a.pos.lat
                .total_cmp(&b.pos.lat)
                .then(a.pos.lon.total_cmp(&b.pos.lon))
                .then(a.road.cmp(&b.road))
                .then(a.seq.cmp(&b.seq))
        });
        debug!("vertex table built with {} rows", rows.len());
        Self { rows }
    }

    pub fn rows(&self) -> &[VertexRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, id: VertexId) -> Option<&VertexRow> {
        self.rows.get(id.index())
    }

    /// Per-row volumes in table order, ready for binning.
    pub fn volumes(&self) -> Vec<Option<f64>> {
        self.rows.iter().map(|r| r.volume).collect()
    }

    /// Row positions whose latitude lies in `[lat - half_width, lat + half_width]`.
    ///
    /// Two binary searches over the sorted latitude column.  The range is
    /// empty when no vertex falls inside the band.
    pub fn lat_window(&self, lat: f64, half_width: f64) -> Range<usize> {
        let lo = lat - half_width;
        let hi = lat + half_width;
        let start = self.rows.partition_point(|r| r.pos.lat < lo);
        let end = self.rows.partition_point(|r| r.pos.lat <= hi);
        start..end.max(start)
    }
}

/// Rows of `base` satisfying `predicate`, as a new table.
///
/// `base` is untouched; the result keeps table order.  Callers hold the
/// filtered table for as long as they need it; nothing is cached.
pub fn filter_roads<P>(base: &VertexTable, predicate: P) -> VertexTable
where
    P: Fn(&VertexRow) -> bool,
{
    VertexTable {
        rows: base.rows.iter().filter(|r| predicate(r)).cloned().collect(),
    }
}
