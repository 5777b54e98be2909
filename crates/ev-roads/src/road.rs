//! Road segments and the road-source CSV loader.
//!
//! # CSV format
//!
//! One row per road.  `geometry` is WKT with x = longitude, y = latitude.
//!
//! ```csv
//! type,name,length_km,toll,geometry,continent,sov_a3,featurecla
//! Major Highway,I-75,12.4,0,"LINESTRING (-84.39 33.75, -84.38 33.80)",North America,USA,Road
//! Secondary Highway,,3.1,1,"MULTILINESTRING ((-84.2 33.7, -84.1 33.7), (-84.0 33.6, -83.9 33.6))",North America,USA,Road
//! ```
//!
//! `continent`, `sov_a3`, and `featurecla` are optional; when present they
//! are checked against [`RoadSourceConfig`].
//!
//! Rows with unparsable WKT, a geometry that is neither `LINESTRING` nor
//! `MULTILINESTRING`, or non-finite coordinates are skipped with a warning.
//! Skipping never renumbers the remaining roads: `RoadId` is the data-row
//! ordinal.

use std::io::Read;
use std::path::Path;

use geo_types::{Geometry, LineString};
use log::{info, warn};
use serde::Deserialize;
use wkt::TryFromWkt;

use ev_core::{GeoPoint, RoadId, RoadSourceConfig, SensorId};

use crate::{RoadError, RoadResult};

// ── Road model ────────────────────────────────────────────────────────────────

/// Descriptive attributes carried from the source onto every vertex row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoadAttrs {
    pub road_type: String,
    pub name:      String,
    /// `None` when the source value is empty or not a number.
    pub length_km: Option<f64>,
    pub toll:      bool,
}

/// The traffic sample assigned to a road by the volume matcher.
#[derive(Clone, Debug, PartialEq)]
pub struct TrafficAssignment {
    pub sensor:        SensorId,
    /// Planar distance from the sensor to the road's closest vertex.
    pub distance:      f64,
    pub volume:        f64,
    pub demand_factor: Option<f64>,
    pub state:         Option<String>,
}

/// A road: one or more line-string parts of `(lat, lon)` vertices.
#[derive(Clone, Debug, PartialEq)]
pub struct RoadSegment {
    pub id:      RoadId,
    pub parts:   Vec<Vec<GeoPoint>>,
    pub attrs:   RoadAttrs,
    /// `None` until matched, and after matching when no sensor lies within
    /// the acceptance radius.  Missing is not the same as zero traffic.
    pub traffic: Option<TrafficAssignment>,
}

impl RoadSegment {
    pub fn new(id: RoadId, parts: Vec<Vec<GeoPoint>>, attrs: RoadAttrs) -> Self {
        Self { id, parts, attrs, traffic: None }
    }

    /// All vertices of all parts, in part order then vertex order.
    pub fn vertices(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.parts.iter().flat_map(|p| p.iter().copied())
    }

    pub fn vertex_count(&self) -> usize {
        self.parts.iter().map(Vec::len).sum()
    }

    /// A road with no vertices cannot be matched to anything.
    pub fn is_degenerate(&self) -> bool {
        self.vertex_count() == 0
    }

    pub fn volume(&self) -> Option<f64> {
        self.traffic.as_ref().map(|t| t.volume)
    }

    pub fn demand_factor(&self) -> Option<f64> {
        self.traffic.as_ref().and_then(|t| t.demand_factor)
    }

    pub fn state(&self) -> Option<&str> {
        self.traffic.as_ref().and_then(|t| t.state.as_deref())
    }
}

// ── Geometry parsing ──────────────────────────────────────────────────────────

/// Parse a WKT `LINESTRING` or `MULTILINESTRING` into `(lat, lon)` parts.
///
/// The error string names what was wrong; callers log it and skip the row.
pub fn parse_geometry(wkt: &str) -> Result<Vec<Vec<GeoPoint>>, String> {
    let geometry: Geometry<f64> =
        Geometry::try_from_wkt_str(wkt).map_err(|e| format!("invalid WKT: {e}"))?;

    let lines: Vec<LineString<f64>> = match geometry {
        Geometry::LineString(ls) => vec![ls],
        Geometry::MultiLineString(mls) => mls.0,
        other => {
            return Err(format!(
                "unexpected geometry variant {}",
                geometry_kind(&other)
            ));
        }
    };

    lines
        .into_iter()
        .map(|ls| {
            ls.0.into_iter()
                .map(|c| {
                    let p = GeoPoint::new(c.y, c.x);
                    if p.is_finite() {
                        Ok(p)
                    } else {
                        Err(format!("non-finite coordinate {p}"))
                    }
                })
                .collect()
        })
        .collect()
}

fn geometry_kind(g: &Geometry<f64>) -> &'static str {
    match g {
        Geometry::Point(_) => "POINT",
        Geometry::Line(_) => "LINE",
        Geometry::LineString(_) => "LINESTRING",
        Geometry::Polygon(_) => "POLYGON",
        Geometry::MultiPoint(_) => "MULTIPOINT",
        Geometry::MultiLineString(_) => "MULTILINESTRING",
        Geometry::MultiPolygon(_) => "MULTIPOLYGON",
        Geometry::GeometryCollection(_) => "GEOMETRYCOLLECTION",
        Geometry::Rect(_) => "RECT",
        Geometry::Triangle(_) => "TRIANGLE",
        #[allow(unreachable_patterns)]
        _ => "UNKNOWN",
    }
}

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RoadRecord {
    #[serde(rename = "type")]
    road_type:  String,
    name:       String,
    #[serde(deserialize_with = "csv::invalid_option")]
    length_km:  Option<f64>,
    toll:       String,
    geometry:   String,
    #[serde(default)]
    continent:  Option<String>,
    #[serde(default)]
    sov_a3:     Option<String>,
    #[serde(default)]
    featurecla: Option<String>,
}

impl RoadRecord {
    fn passes(&self, config: &RoadSourceConfig) -> bool {
        column_matches(&config.continent, &self.continent)
            && column_matches(&config.sov_a3, &self.sov_a3)
            && column_matches(&config.featurecla, &self.featurecla)
    }
}

fn column_matches(wanted: &Option<String>, actual: &Option<String>) -> bool {
    match (wanted, actual) {
        (Some(w), Some(a)) => w == a.trim(),
        _ => true,
    }
}

/// `1`, `true`, `yes` (any case) are tolls; everything else is not.
fn parse_flag(s: &str) -> bool {
    let s = s.trim();
    s.eq_ignore_ascii_case("true")
        || s.eq_ignore_ascii_case("yes")
        || s.parse::<f64>().is_ok_and(|v| v != 0.0)
}

pub(crate) fn require_columns(
    headers:     &csv::StringRecord,
    source_name: &'static str,
    columns:     &[&'static str],
) -> RoadResult<()> {
    for &column in columns {
        if !headers.iter().any(|h| h.trim() == column) {
            return Err(RoadError::MissingColumn { source_name, column });
        }
    }
    Ok(())
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Roads read from a source, plus how many rows did not make it.
#[derive(Debug, Default)]
pub struct LoadedRoads {
    pub roads:    Vec<RoadSegment>,
    /// Rows dropped for malformed fields or geometry.
    pub skipped:  usize,
    /// Rows dropped by the continent / country / feature-class filters.
    pub filtered: usize,
}

/// Load roads from a CSV file.  See the module docs for the format.
pub fn load_roads_csv(path: &Path, config: &RoadSourceConfig) -> RoadResult<LoadedRoads> {
    let file = std::fs::File::open(path)?;
    load_roads_reader(file, config)
}

/// Like [`load_roads_csv`] but accepts any `Read` source.
pub fn load_roads_reader<R: Read>(reader: R, config: &RoadSourceConfig) -> RoadResult<LoadedRoads> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    require_columns(
        csv_reader.headers()?,
        "road source",
        &["type", "name", "length_km", "toll", "geometry"],
    )?;

    let mut loaded = LoadedRoads::default();

    for (row, result) in csv_reader.deserialize::<RoadRecord>().enumerate() {
        let id = RoadId(row as u32);
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("road row {row} skipped: {e}");
                loaded.skipped += 1;
                continue;
            }
        };

        if !record.passes(config) {
            loaded.filtered += 1;
            continue;
        }

        let parts = match parse_geometry(&record.geometry) {
            Ok(parts) => parts,
            Err(reason) => {
                warn!("road row {row} skipped: {reason}");
                loaded.skipped += 1;
                continue;
            }
        };

        let attrs = RoadAttrs {
            road_type: record.road_type,
            name:      record.name,
            length_km: record.length_km,
            toll:      parse_flag(&record.toll),
        };
        loaded.roads.push(RoadSegment::new(id, parts, attrs));
    }

    info!(
        "loaded {} roads ({} skipped, {} filtered out)",
        loaded.roads.len(),
        loaded.skipped,
        loaded.filtered
    );
    Ok(loaded)
}
