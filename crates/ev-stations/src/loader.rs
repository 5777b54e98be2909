//! CSV station loader.
//!
//! # CSV format
//!
//! The cleaned charging-station export.  Only `Latitude` and `Longitude`
//! are required; every other column is carried through verbatim.
//!
//! ```csv
//! Station Name,Street Address,City,State,ZIP,Latitude,Longitude,EV Level1 EVSE Num,EV Level2 EVSE Num,EV DC Fast Count,EV Connector Types
//! Midtown Deck,10 10th St,Atlanta,GA,30309,33.781,-84.386,,4,2,J1772 CHADEMO
//! ```
//!
//! Rows whose coordinates do not parse are skipped with a warning.  Port
//! counts that do not parse count as zero.

use std::io::Read;
use std::path::Path;

use log::{info, warn};

use ev_core::{GeoPoint, StationId};

use crate::station::{PortCounts, StationRecord, normalize_connectors, parse_count};
use crate::{StationError, StationResult};

pub const COL_NAME:       &str = "Station Name";
pub const COL_LATITUDE:   &str = "Latitude";
pub const COL_LONGITUDE:  &str = "Longitude";
pub const COL_LEVEL1:     &str = "EV Level1 EVSE Num";
pub const COL_LEVEL2:     &str = "EV Level2 EVSE Num";
pub const COL_DC_FAST:    &str = "EV DC Fast Count";
pub const COL_CONNECTORS: &str = "EV Connector Types";

/// Stations plus the source header, needed to write them back out.
#[derive(Debug, Default)]
pub struct StationTable {
    pub headers:  Vec<String>,
    pub stations: Vec<StationRecord>,
    pub skipped:  usize,
    connector_column: Option<usize>,
}

impl StationTable {
    /// Source fields of `station` with the connector column normalized
    /// (`"J1772 CHADEMO"` → `"J1772, CHADEMO"`).
    pub fn output_fields(&self, station: &StationRecord) -> Vec<String> {
        let mut fields = station.raw.clone();
        if let Some(field) = self.connector_column.and_then(|c| fields.get_mut(c)) {
            *field = station.connector_label();
        }
        fields
    }
}

/// Load stations from a CSV file.
pub fn load_stations_csv(path: &Path) -> StationResult<StationTable> {
    let file = std::fs::File::open(path)?;
    load_stations_reader(file)
}

/// Like [`load_stations_csv`] but accepts any `Read` source.
pub fn load_stations_reader<R: Read>(reader: R) -> StationResult<StationTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let headers: Vec<String> = csv_reader.headers()?.iter().map(|h| h.trim().to_owned()).collect();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let lat_col = column(COL_LATITUDE).ok_or(StationError::MissingColumn(COL_LATITUDE))?;
    let lon_col = column(COL_LONGITUDE).ok_or(StationError::MissingColumn(COL_LONGITUDE))?;
    let name_col = column(COL_NAME);
    let level1_col = column(COL_LEVEL1);
    let level2_col = column(COL_LEVEL2);
    let dc_col = column(COL_DC_FAST);
    let connector_col = column(COL_CONNECTORS);

    let mut stations = Vec::new();
    let mut skipped = 0usize;

    for (row, result) in csv_reader.records().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("station row {row} skipped: {e}");
                skipped += 1;
                continue;
            }
        };
        let field = |col: Option<usize>| col.and_then(|c| record.get(c)).unwrap_or("");

        let lat = field(Some(lat_col)).trim().parse::<f64>();
        let lon = field(Some(lon_col)).trim().parse::<f64>();
        let pos = match (lat, lon) {
            (Ok(lat), Ok(lon)) if GeoPoint::new(lat, lon).is_finite() => GeoPoint::new(lat, lon),
            _ => {
                warn!(
                    "station row {row} skipped: unusable coordinates ({:?}, {:?})",
                    field(Some(lat_col)),
                    field(Some(lon_col))
                );
                skipped += 1;
                continue;
            }
        };

        stations.push(StationRecord {
            id:   StationId(row as u32),
            name: field(name_col).trim().to_owned(),
            pos,
            ports: PortCounts {
                level1:  parse_count(field(level1_col)),
                level2:  parse_count(field(level2_col)),
                dc_fast: parse_count(field(dc_col)),
            },
            connector_types: normalize_connectors(field(connector_col)),
            raw: record.iter().map(str::to_owned).collect(),
        });
    }

    info!("loaded {} stations ({} skipped)", stations.len(), skipped);
    Ok(StationTable {
        headers,
        stations,
        skipped,
        connector_column: connector_col,
    })
}
