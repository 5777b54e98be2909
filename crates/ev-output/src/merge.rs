//! Vertex/station left join.
//!
//! Stations attach to every vertex row whose `(lat, lon)` equals the
//! coordinates of the vertex the station matched.  Vertices shared by
//! several roads therefore all carry the station.

use std::collections::HashMap;

use log::debug;

use crate::{MergedRow, RoadRow, StationRow};

/// Bit-exact coordinate key.  `-0.0` and `0.0` compare equal as floats, so
/// both are folded onto `0.0`.
fn coord_key(lat: f64, lon: f64) -> (u64, u64) {
    ((lat + 0.0).to_bits(), (lon + 0.0).to_bits())
}

/// Left-join `roads` with the matched `stations`.
///
/// Output order is road order; a road row with several stations yields one
/// row per station in station order; a road row with none yields one row
/// with `station: None`.  Unmatched stations do not appear.
pub fn merge_rows<'a>(roads: &'a [RoadRow], stations: &'a [StationRow]) -> Vec<MergedRow<'a>> {
    let mut by_coord: HashMap<(u64, u64), Vec<&'a StationRow>> = HashMap::new();
    for s in stations {
        if let Some(n) = &s.nearest {
            by_coord.entry(coord_key(n.road.lat, n.road.lon)).or_default().push(s);
        }
    }

    let mut out = Vec::with_capacity(roads.len());
    let mut joined = 0usize;
    for road in roads {
        match by_coord.get(&coord_key(road.lat, road.lon)) {
            Some(matched) => {
                joined += matched.len();
                out.extend(matched.iter().map(|s| MergedRow { road, station: Some(*s) }));
            }
            None => out.push(MergedRow { road, station: None }),
        }
    }
    debug!("merged {} road rows with {} station attachments", roads.len(), joined);
    out
}
