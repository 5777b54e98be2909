//! The `Pipeline` struct and its stage sequence.

use std::fs;

use log::{debug, info};

use ev_binning::{BinnedVolume, VolumeBinner};
use ev_core::PipelineConfig;
use ev_output::{CsvWriter, NearestRoad, OutputWriter, RoadRow, StationRow, merge_rows};
use ev_roads::{
    LoadedRoads, LoadedSensors, RoadVolumeMatcher, VertexTable, filter_roads, load_roads_csv,
    load_sensors_csv,
};
use ev_stations::{StationMatch, StationRoadMatcher, StationTable, load_stations_csv};

use crate::{PipelineReport, PipelineResult};

// ── Inputs ────────────────────────────────────────────────────────────────────

/// The three source tables, loaded and parsed.
#[derive(Debug, Default)]
pub struct PipelineInputs {
    pub roads:    LoadedRoads,
    pub sensors:  LoadedSensors,
    pub stations: StationTable,
}

impl PipelineInputs {
    /// Read every source named in `config.paths`.  A missing or unreadable
    /// file aborts; malformed rows are skipped by the loaders.
    pub fn load(config: &PipelineConfig) -> PipelineResult<Self> {
        let paths = &config.paths;
        info!("loading roads from {}", paths.roads.display());
        let roads = load_roads_csv(&paths.roads, &config.roads)?;
        info!("loading sensors from {}", paths.sensors.display());
        let sensors = load_sensors_csv(&paths.sensors, &config.matching)?;
        info!("loading stations from {}", paths.stations.display());
        let stations = load_stations_csv(&paths.stations)?;
        Ok(Self { roads, sensors, stations })
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

/// A validated pipeline configuration, ready to run.
pub struct Pipeline {
    config: PipelineConfig,
    binner: VolumeBinner,
}

impl Pipeline {
    /// Validate `config` and build the stage objects that depend only on it.
    pub fn new(config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        let binner = VolumeBinner::from_config(&config.binning)?;
        Ok(Self { config, binner })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the configured inputs and write CSV output into
    /// `config.paths.output_dir`, creating it if needed.
    pub fn run(&self) -> PipelineResult<PipelineReport> {
        let inputs = PipelineInputs::load(&self.config)?;
        let dir = &self.config.paths.output_dir;
        fs::create_dir_all(dir)?;
        let mut writer = CsvWriter::new(dir, &inputs.stations.headers)?;
        self.run_with(inputs, &mut writer)
    }

    /// Run every stage over `inputs` and hand the tables to `writer`.
    pub fn run_with<W: OutputWriter>(
        &self,
        inputs: PipelineInputs,
        writer: &mut W,
    ) -> PipelineResult<PipelineReport> {
        let PipelineInputs { roads, sensors, stations } = inputs;
        let mut report = PipelineReport {
            roads_loaded:         roads.roads.len(),
            roads_skipped:        roads.skipped,
            roads_filtered:       roads.filtered,
            sensors_loaded:       sensors.sensors.len(),
            sensors_skipped:      sensors.skipped,
            sensors_other_months: sensors.other_months,
            stations_loaded:      stations.stations.len(),
            stations_skipped:     stations.skipped,
            ..PipelineReport::default()
        };

        // ── ① Road → sensor ───────────────────────────────────────────────
        let matcher = RoadVolumeMatcher::new(&sensors.sensors, self.config.matching.acceptance_radius);
        let (enriched, match_stats) = matcher.enrich(roads.roads);
        report.road_matches = match_stats;

        // ── ② Flatten ─────────────────────────────────────────────────────
        let mut table = VertexTable::from_roads(&enriched);
        report.vertices = table.len();
        let allowed = &self.config.roads.road_types;
        if !allowed.is_empty() {
            table = filter_roads(&table, |r| allowed.iter().any(|t| *t == r.attrs.road_type));
            debug!("road-type filter kept {} of {} vertices", table.len(), report.vertices);
        }
        report.vertices_kept = table.len();

        // ── ③ Bin ─────────────────────────────────────────────────────────
        let binned = self.binner.bin(&table.volumes());
        let road_out = road_rows(&table, &binned, &self.binner);
        report.band_counts = self.band_counts(&binned);

        // ── ④ Station → vertex ────────────────────────────────────────────
        let station_matcher = StationRoadMatcher::new(&table, self.config.stations.search);
        let matches = station_matcher.match_all(&stations.stations);
        let station_out = station_rows(&stations, &matches, &road_out);
        report.stations_matched = station_out.iter().filter(|s| s.nearest.is_some()).count();

        // ── ⑤ Merge ───────────────────────────────────────────────────────
        let merged = merge_rows(&road_out, &station_out);
        report.merged_rows = merged.len();

        writer.write_roads(&road_out)?;
        writer.write_stations(&station_out)?;
        writer.write_merged(&merged)?;
        writer.finish()?;

        Ok(report)
    }

    fn band_counts(&self, binned: &[BinnedVolume]) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> =
            self.binner.bands().iter().map(|b| (b.label.clone(), 0)).collect();
        for b in binned {
            counts[b.band].1 += 1;
        }
        counts
    }
}

// ── Row assembly ──────────────────────────────────────────────────────────────

/// Output rows for `table`, parallel to its rows.  `binned` must be the
/// binner's output for `table.volumes()`.
pub fn road_rows(table: &VertexTable, binned: &[BinnedVolume], binner: &VolumeBinner) -> Vec<RoadRow> {
    table
        .rows()
        .iter()
        .zip(binned)
        .map(|(r, b)| RoadRow {
            road_num:  r.road,
            index:     r.seq,
            lat:       r.pos.lat,
            lon:       r.pos.lon,
            road_type: r.attrs.road_type.clone(),
            name:      r.attrs.name.clone(),
            length_km: r.attrs.length_km,
            toll:      r.attrs.toll,
            volume:    b.volume,
            vol_color: binner.bands()[b.band].color.clone(),
        })
        .collect()
}

/// Output rows for every station, in station order.  `matches` is parallel
/// to `stations.stations` and indexes into `roads`.
pub fn station_rows(stations: &StationTable, matches: &[StationMatch], roads: &[RoadRow]) -> Vec<StationRow> {
    stations
        .stations
        .iter()
        .zip(matches)
        .map(|(s, m)| StationRow {
            fields:   stations.output_fields(s),
            capacity: s.capacity_label(),
            ports:    s.port_count(),
            nearest:  match *m {
                StationMatch::Matched { vertex, distance } => roads
                    .get(vertex.index())
                    .map(|road| NearestRoad { road: road.clone(), distance }),
                StationMatch::NoMatch => None,
            },
        })
        .collect()
}
