//! Road → nearest traffic sensor matching.
//!
//! # Semantics
//!
//! For a road with vertices `V` and sensors `S`, the road's sensor distance
//! is `min over v ∈ V, s ∈ S of |v - s|` in raw `(lat, lon)` degrees.  The
//! winning sensor is the one attaining that minimum; among equidistant
//! sensors the lowest [`SensorId`] wins.  Multi-part roads are handled by
//! taking the minimum over the vertices of every part.
//!
//! # Spatial index
//!
//! Sensors are bulk-loaded into an R-tree (via `rstar`).  Each vertex asks
//! for its nearest sensors; all sensors tied at the nearest distance are
//! inspected so the lowest-ID tie-break holds exactly.  The result equals
//! the brute-force all-pairs minimum.

use log::{debug, info};
use rstar::{AABB, PointDistance, RTree, RTreeObject};

use ev_core::{GeoPoint, SensorId};

use crate::road::{RoadSegment, TrafficAssignment};
use crate::sensor::SensorPoint;

// ── R-tree sensor entry ───────────────────────────────────────────────────────

#[derive(Clone)]
struct SensorEntry {
    point: [f64; 2], // [lat, lon]
    id:    SensorId,
    /// Position in the matcher's sensor slice.
    slot:  usize,
}

impl RTreeObject for SensorEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for SensorEntry {
    /// Squared planar distance in lat/lon space.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── Results ───────────────────────────────────────────────────────────────────

/// The nearest sensor to a road, regardless of the acceptance radius.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SensorMatch {
    pub sensor:   SensorId,
    pub distance: f64,
    slot:         usize,
}

/// Outcome counts of one [`RoadVolumeMatcher::enrich`] pass.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchStats {
    /// Roads assigned a sensor's volume.
    pub matched:      usize,
    /// Roads whose nearest sensor lies beyond the acceptance radius.
    pub out_of_range: usize,
    /// Roads with no vertices (or no sensors to match against).
    pub degenerate:   usize,
}

// ── RoadVolumeMatcher ─────────────────────────────────────────────────────────

/// Assigns each road the volume of its nearest sensor within
/// `acceptance_radius`.
pub struct RoadVolumeMatcher<'a> {
    sensors:           &'a [SensorPoint],
    index:             RTree<SensorEntry>,
    acceptance_radius: f64,
}

impl<'a> RoadVolumeMatcher<'a> {
    /// Bulk-load the sensor index.  O(S log S).
    pub fn new(sensors: &'a [SensorPoint], acceptance_radius: f64) -> Self {
        let entries: Vec<SensorEntry> = sensors
            .iter()
            .enumerate()
            .map(|(slot, s)| SensorEntry { point: s.pos.to_array(), id: s.id, slot })
            .collect();
        Self {
            sensors,
            index: RTree::bulk_load(entries),
            acceptance_radius,
        }
    }

    pub fn acceptance_radius(&self) -> f64 {
        self.acceptance_radius
    }

    /// Nearest sensor to any vertex of `road`, ignoring the radius.
    ///
    /// Returns `None` for a road with no vertices or when there are no
    /// sensors.
    pub fn nearest(&self, road: &RoadSegment) -> Option<SensorMatch> {
        let mut best: Option<(f64, SensorId, usize)> = None;
        for v in road.vertices() {
            let Some(candidate) = self.nearest_to_vertex(v) else {
                continue;
            };
            best = match best {
                Some(b) if (b.0, b.1) <= (candidate.0, candidate.1) => Some(b),
                _ => Some(candidate),
            };
        }
        best.map(|(d2, sensor, slot)| SensorMatch { sensor, distance: d2.sqrt(), slot })
    }

    /// The traffic assignment for `road`, or `None` when no sensor lies
    /// within the acceptance radius.
    pub fn assign(&self, road: &RoadSegment) -> Option<TrafficAssignment> {
        let m = self.nearest(road)?;
        if m.distance > self.acceptance_radius {
            return None;
        }
        let sensor = &self.sensors[m.slot];
        Some(TrafficAssignment {
            sensor:        m.sensor,
            distance:      m.distance,
            volume:        sensor.daily_traffic,
            demand_factor: sensor.demand_factor,
            state:         sensor.state.clone(),
        })
    }

    /// Consume `roads` and return them with `traffic` set (or cleared).
    ///
    /// Road order is preserved.  With the `parallel` feature the per-road
    /// work runs on Rayon's pool; the output is identical.
    pub fn enrich(&self, roads: Vec<RoadSegment>) -> (Vec<RoadSegment>, MatchStats) {
        #[cfg(feature = "parallel")]
        let enriched: Vec<RoadSegment> = {
            use rayon::prelude::*;
            roads.into_par_iter().map(|road| self.enrich_one(road)).collect()
        };
        #[cfg(not(feature = "parallel"))]
        let enriched: Vec<RoadSegment> = roads.into_iter().map(|road| self.enrich_one(road)).collect();

        let mut stats = MatchStats::default();
        for road in &enriched {
            if road.traffic.is_some() {
                stats.matched += 1;
            } else if road.is_degenerate() || self.sensors.is_empty() {
                stats.degenerate += 1;
            } else {
                stats.out_of_range += 1;
            }
        }

        info!(
            "matched {} of {} roads to sensors within {} ({} out of range, {} degenerate)",
            stats.matched,
            enriched.len(),
            self.acceptance_radius,
            stats.out_of_range,
            stats.degenerate
        );
        (enriched, stats)
    }

    fn enrich_one(&self, mut road: RoadSegment) -> RoadSegment {
        road.traffic = self.assign(&road);
        if road.is_degenerate() {
            debug!("{} has no vertices; left unmatched", road.id);
        }
        road
    }

    /// `(distance², id, slot)` of the lowest-ID sensor among those nearest
    /// to `v`.
    fn nearest_to_vertex(&self, v: GeoPoint) -> Option<(f64, SensorId, usize)> {
        let mut iter = self.index.nearest_neighbor_iter_with_distance_2(&v.to_array());
        let (first, best_d2) = iter.next()?;
        let mut best = first;
        for (entry, d2) in iter {
            if d2 > best_d2 {
                break;
            }
            if entry.id < best.id {
                best = entry;
            }
        }
        Some((best_d2, best.id, best.slot))
    }
}
