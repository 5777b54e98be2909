//! Per-run counts.

use log::info;

use ev_roads::MatchStats;

/// What one pipeline run read, matched, and wrote.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PipelineReport {
    pub roads_loaded:         usize,
    /// Rows with unusable geometry or fields.
    pub roads_skipped:        usize,
    /// Rows excluded by the continent / sov_a3 / featurecla filters.
    pub roads_filtered:       usize,
    pub sensors_loaded:       usize,
    pub sensors_skipped:      usize,
    pub sensors_other_months: usize,
    pub road_matches:         MatchStats,
    /// Vertices after flattening.
    pub vertices:             usize,
    /// Vertices left after the road-type allow-list.
    pub vertices_kept:        usize,
    /// `(label, vertex count)` per band, in band order.
    pub band_counts:          Vec<(String, usize)>,
    pub stations_loaded:      usize,
    pub stations_skipped:     usize,
    pub stations_matched:     usize,
    pub merged_rows:          usize,
}

impl PipelineReport {
    pub fn stations_unmatched(&self) -> usize {
        self.stations_loaded - self.stations_matched
    }

    pub fn log_summary(&self) {
        info!(
            "roads: {} loaded, {} skipped, {} filtered out",
            self.roads_loaded, self.roads_skipped, self.roads_filtered
        );
        info!(
            "sensors: {} loaded, {} skipped, {} outside the reference month",
            self.sensors_loaded, self.sensors_skipped, self.sensors_other_months
        );
        info!(
            "road volumes: {} matched, {} out of range, {} degenerate",
            self.road_matches.matched, self.road_matches.out_of_range, self.road_matches.degenerate
        );
        info!("vertices: {} flattened, {} kept", self.vertices, self.vertices_kept);
        for (label, count) in &self.band_counts {
            info!("  {label:<18} {count}");
        }
        info!(
            "stations: {} loaded, {} skipped, {} matched, {} no match",
            self.stations_loaded,
            self.stations_skipped,
            self.stations_matched,
            self.stations_unmatched()
        );
        info!("merged rows: {}", self.merged_rows);
    }
}
