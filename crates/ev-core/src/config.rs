//! Pipeline configuration.
//!
//! Every section carries `#[serde(default)]`, so a JSON file only needs to
//! name the values it overrides:
//!
//! ```json
//! {
//!   "paths":    { "roads": "data/na_roads.csv" },
//!   "stations": { "search": { "mode": "exact" } }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{EvError, EvResult};

// ── PipelineConfig ────────────────────────────────────────────────────────────

/// Top-level configuration for one batch run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub paths:    PathConfig,
    pub roads:    RoadSourceConfig,
    pub matching: MatchConfig,
    pub stations: StationConfig,
    pub binning:  BinConfig,
}

impl PipelineConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: &Path) -> EvResult<Self> {
        let file = std::fs::File::open(path)?;
        let config: PipelineConfig = serde_json::from_reader(std::io::BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no stage can work with.
    ///
    /// Bin edges and palette are validated by the binner itself.
    pub fn validate(&self) -> EvResult<()> {
        let radius = self.matching.acceptance_radius;
        if !radius.is_finite() || radius < 0.0 {
            return Err(EvError::Config(format!(
                "acceptance_radius must be a finite non-negative number, got {radius}"
            )));
        }
        if let StationSearch::Window { half_width_deg } = self.stations.search {
            if !half_width_deg.is_finite() || half_width_deg <= 0.0 {
                return Err(EvError::Config(format!(
                    "station window half_width_deg must be finite and positive, got {half_width_deg}"
                )));
            }
        }
        Ok(())
    }
}

// ── Sections ──────────────────────────────────────────────────────────────────

/// Input files and the output directory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathConfig {
    /// Road geometries (CSV with a WKT `geometry` column).
    pub roads: PathBuf,
    /// Traffic-count samples.
    pub sensors: PathBuf,
    /// Cleaned EV charging-station export.
    pub stations: PathBuf,
    /// Directory receiving `sorted_roads.csv`, `EV_data_capacity.csv`, `merged.csv`.
    pub output_dir: PathBuf,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            roads:      PathBuf::from("data/roads.csv"),
            sensors:    PathBuf::from("data/2020.csv"),
            stations:   PathBuf::from("data/EVStations_data_cleaned.csv"),
            output_dir: PathBuf::from("data"),
        }
    }
}

/// Row filters applied while reading the road source.
///
/// A filter only excludes rows that carry the column; a source without a
/// `continent` column is never filtered on continent.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoadSourceConfig {
    pub continent:  Option<String>,
    pub sov_a3:     Option<String>,
    pub featurecla: Option<String>,
    /// Allow-list of road `type` values kept in the vertex table.
    /// Empty keeps every type.
    pub road_types: Vec<String>,
}

impl Default for RoadSourceConfig {
    fn default() -> Self {
        Self {
            continent:  Some("North America".into()),
            sov_a3:     Some("USA".into()),
            featurecla: Some("Road".into()),
            road_types: Vec::new(),
        }
    }
}

/// Road ↔ sensor matching parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Maximum planar distance (raw degrees) at which a sensor's volume is
    /// assigned to a road.  Distances equal to the radius are accepted.
    pub acceptance_radius: f64,
    /// Only sensor rows from this month participate.
    pub reference_month: u32,
    /// The traffic table stores west longitudes as positive numbers.
    pub negate_sensor_longitude: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            acceptance_radius:       2.0,
            reference_month:         1,
            negate_sensor_longitude: true,
        }
    }
}

/// Station ↔ road-vertex matching parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationConfig {
    pub search: StationSearch,
}

/// How the nearest road vertex is located for each station.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum StationSearch {
    /// Only vertices with `|lat - station.lat| <= half_width_deg` are
    /// candidates.  Misses the true nearest vertex when it lies outside
    /// the band.
    Window { half_width_deg: f64 },
    /// Global nearest vertex via an R-tree over every vertex.
    Exact,
}

impl Default for StationSearch {
    fn default() -> Self {
        StationSearch::Window { half_width_deg: 0.02 }
    }
}

/// Volume band edges and the colour palette bands draw from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BinConfig {
    /// Lower edges of each band; the last band is unbounded above.
    pub edges: Vec<f64>,
    pub palette: Vec<String>,
}

/// The seven darkest entries of the YlOrBr sequential scale.
pub const YL_OR_BR_7: [&str; 7] = [
    "rgb(254,227,145)",
    "rgb(254,196,79)",
    "rgb(254,153,41)",
    "rgb(236,112,20)",
    "rgb(204,76,2)",
    "rgb(153,52,4)",
    "rgb(102,37,6)",
];

impl Default for BinConfig {
    fn default() -> Self {
        Self {
            edges:   vec![0.0, 1_000.0, 5_000.0, 10_000.0],
            palette: YL_OR_BR_7.iter().map(|c| c.to_string()).collect(),
        }
    }
}
