//! Station → nearest road vertex.
//!
//! # Strategies
//!
//! | Strategy | Candidates                                    | Result            |
//! |----------|-----------------------------------------------|-------------------|
//! | Window   | vertices with `|lat - station.lat| <= w`      | nearest in band   |
//! | Exact    | every vertex, via an R-tree                   | global nearest    |
//!
//! The window strategy binary-searches the lat-sorted [`VertexTable`] for
//! the band bounds and scans only that slice.  It agrees with the exact
//! strategy whenever the true nearest vertex lies inside the band, and
//! reports [`StationMatch::NoMatch`] when the band is empty.
//!
//! Both strategies break distance ties toward the lowest table row, so the
//! result is reproducible.

use log::info;
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use ev_core::{GeoPoint, StationSearch, VertexId};
use ev_roads::VertexTable;

use crate::station::StationRecord;

// ── R-tree vertex entry ───────────────────────────────────────────────────────

#[derive(Clone)]
struct VertexEntry {
    point: [f64; 2], // [lat, lon]
    row:   u32,
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for VertexEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── StationMatch ──────────────────────────────────────────────────────────────

/// Result of matching one station.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum StationMatch {
    Matched { vertex: VertexId, distance: f64 },
    /// No candidate vertex (empty window or empty table).
    NoMatch,
}

impl StationMatch {
    pub fn vertex(&self) -> Option<VertexId> {
        match self {
            StationMatch::Matched { vertex, .. } => Some(*vertex),
            StationMatch::NoMatch => None,
        }
    }

    pub fn distance(&self) -> Option<f64> {
        match self {
            StationMatch::Matched { distance, .. } => Some(*distance),
            StationMatch::NoMatch => None,
        }
    }
}

// ── StationRoadMatcher ────────────────────────────────────────────────────────

enum Strategy {
    Window { half_width: f64 },
    Exact { index: RTree<VertexEntry> },
}

/// Finds the nearest road vertex for stations against one vertex table.
pub struct StationRoadMatcher<'a> {
    table:    &'a VertexTable,
    strategy: Strategy,
}

impl<'a> StationRoadMatcher<'a> {
    pub fn new(table: &'a VertexTable, search: StationSearch) -> Self {
        match search {
            StationSearch::Window { half_width_deg } => Self::windowed(table, half_width_deg),
            StationSearch::Exact => Self::exact(table),
        }
    }

    /// Latitude-window search.  No preprocessing.
    pub fn windowed(table: &'a VertexTable, half_width: f64) -> Self {
        Self { table, strategy: Strategy::Window { half_width } }
    }

    /// Exact search.  Bulk-loads an R-tree over every vertex: O(V log V).
    pub fn exact(table: &'a VertexTable) -> Self {
        let entries: Vec<VertexEntry> = table
            .rows()
            .iter()
            .enumerate()
            .map(|(row, r)| VertexEntry { point: r.pos.to_array(), row: row as u32 })
            .collect();
        Self { table, strategy: Strategy::Exact { index: RTree::bulk_load(entries) } }
    }

    pub fn nearest(&self, pos: GeoPoint) -> StationMatch {
        let best = match &self.strategy {
            Strategy::Window { half_width } => self.nearest_in_window(pos, *half_width),
            Strategy::Exact { index } => nearest_in_index(index, pos),
        };
        match best {
            Some((d2, row)) => StationMatch::Matched { vertex: VertexId(row), distance: d2.sqrt() },
            None => StationMatch::NoMatch,
        }
    }

    /// Match every station, in input order.
    pub fn match_all(&self, stations: &[StationRecord]) -> Vec<StationMatch> {
        let matches: Vec<StationMatch> = stations.iter().map(|s| self.nearest(s.pos)).collect();
        let unmatched = matches.iter().filter(|m| **m == StationMatch::NoMatch).count();
        info!(
            "matched {} of {} stations to road vertices ({} with no candidate)",
            matches.len() - unmatched,
            matches.len(),
            unmatched
        );
        matches
    }

    fn nearest_in_window(&self, pos: GeoPoint, half_width: f64) -> Option<(f64, u32)> {
        let window = self.table.lat_window(pos.lat, half_width);
        let rows = &self.table.rows()[window.clone()];
        let mut best: Option<(f64, u32)> = None;
        for (offset, r) in rows.iter().enumerate() {
            let d2 = r.pos.planar_distance_2(pos);
            // Strict `<` keeps the earliest row on ties.
            if best.is_none_or(|(b, _)| d2 < b) {
                best = Some((d2, (window.start + offset) as u32));
            }
        }
        best
    }
}

fn nearest_in_index(index: &RTree<VertexEntry>, pos: GeoPoint) -> Option<(f64, u32)> {
    let mut iter = index.nearest_neighbor_iter_with_distance_2(&pos.to_array());
    let (first, best_d2) = iter.next()?;
    let mut row = first.row;
    for (entry, d2) in iter {
        if d2 > best_d2 {
            break;
        }
        row = row.min(entry.row);
    }
    Some((best_d2, row))
}
