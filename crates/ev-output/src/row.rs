//! Plain data row types written by output backends.

use ev_core::RoadId;

/// One flattened road vertex, binned.
#[derive(Debug, Clone, PartialEq)]
pub struct RoadRow {
    pub road_num:  RoadId,
    /// Vertex position within its road, counted across parts.
    pub index:     u32,
    pub lat:       f64,
    pub lon:       f64,
    pub road_type: String,
    pub name:      String,
    pub length_km: Option<f64>,
    pub toll:      bool,
    /// Median-filled, rounded daily volume.
    pub volume:    i64,
    pub vol_color: String,
}

impl RoadRow {
    pub const HEADERS: [&'static str; 10] = [
        "road num", "index", "lat", "lon", "type", "name", "length_km", "toll", "volume", "vol_color",
    ];

    /// Field values in [`HEADERS`][Self::HEADERS] order.
    pub fn fields(&self) -> Vec<String> {
        vec![
            self.road_num.index().to_string(),
            self.index.to_string(),
            self.lat.to_string(),
            self.lon.to_string(),
            self.road_type.clone(),
            self.name.clone(),
            opt_to_string(self.length_km),
            (self.toll as u8).to_string(),
            self.volume.to_string(),
            self.vol_color.clone(),
        ]
    }
}

/// The vertex a station matched, with its planar distance.
#[derive(Debug, Clone, PartialEq)]
pub struct NearestRoad {
    pub road:     RoadRow,
    pub distance: f64,
}

/// One station as persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct StationRow {
    /// Source fields in source column order, connector list normalized.
    pub fields:   Vec<String>,
    /// e.g. `"132kW"`.
    pub capacity: String,
    pub ports:    f64,
    /// `None` when no vertex was a candidate.
    pub nearest:  Option<NearestRoad>,
}

impl StationRow {
    /// Station fields followed by `capacity`, `ports`.
    pub fn own_fields(&self) -> Vec<String> {
        let mut out = self.fields.clone();
        out.push(self.capacity.clone());
        out.push(self.ports.to_string());
        out
    }

    /// Formatted `min dis`, empty for no-match.
    pub fn distance_field(&self) -> String {
        opt_to_string(self.nearest.as_ref().map(|n| n.distance))
    }
}

/// One row of the vertex/station left join.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergedRow<'a> {
    pub road:    &'a RoadRow,
    pub station: Option<&'a StationRow>,
}

pub(crate) fn opt_to_string(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}
