//! Traffic-count samples and their CSV loader.
//!
//! # CSV format
//!
//! ```csv
//! lat,long,month,dailytraffic,demandfactor,state
//! 33.75,84.39,1,41000,0.93,GA
//! 33.75,84.39,2,39000,0.91,GA
//! ```
//!
//! `long` is stored west-positive in the published counts; the loader
//! negates it unless `negate_sensor_longitude` is off.  Extra columns are
//! ignored.  Only rows from the configured reference month are kept.

use std::io::Read;
use std::path::Path;

use log::{info, warn};
use serde::Deserialize;

use ev_core::{GeoPoint, MatchConfig, SensorId};

use crate::RoadResult;
use crate::road::require_columns;

/// One traffic-count sample.  Immutable reference data.
#[derive(Clone, Debug, PartialEq)]
pub struct SensorPoint {
    /// Row ordinal in the full traffic-count table, before month filtering.
    pub id:            SensorId,
    pub pos:           GeoPoint,
    pub daily_traffic: f64,
    pub month:         u32,
    pub demand_factor: Option<f64>,
    pub state:         Option<String>,
}

#[derive(Deserialize)]
struct SensorRecord {
    lat:          f64,
    long:         f64,
    month:        u32,
    dailytraffic: f64,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    demandfactor: Option<f64>,
    #[serde(default)]
    state:        Option<String>,
}

/// Sensors from the reference month, plus how many rows were malformed.
#[derive(Debug, Default)]
pub struct LoadedSensors {
    pub sensors: Vec<SensorPoint>,
    pub skipped: usize,
    /// Well-formed rows from other months.
    pub other_months: usize,
}

/// Load reference-month sensors from a CSV file.
pub fn load_sensors_csv(path: &Path, config: &MatchConfig) -> RoadResult<LoadedSensors> {
    let file = std::fs::File::open(path)?;
    load_sensors_reader(file, config)
}

/// Like [`load_sensors_csv`] but accepts any `Read` source.
pub fn load_sensors_reader<R: Read>(reader: R, config: &MatchConfig) -> RoadResult<LoadedSensors> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    require_columns(
        csv_reader.headers()?,
        "sensor source",
        &["lat", "long", "month", "dailytraffic"],
    )?;

    let mut loaded = LoadedSensors::default();

    for (row, result) in csv_reader.deserialize::<SensorRecord>().enumerate() {
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                warn!("sensor row {row} skipped: {e}");
                loaded.skipped += 1;
                continue;
            }
        };

        if record.month != config.reference_month {
            loaded.other_months += 1;
            continue;
        }

        let lon = if config.negate_sensor_longitude { -record.long } else { record.long };
        let pos = GeoPoint::new(record.lat, lon);
        if !pos.is_finite() || !record.dailytraffic.is_finite() {
            warn!("sensor row {row} skipped: non-finite position or volume");
            loaded.skipped += 1;
            continue;
        }

        loaded.sensors.push(SensorPoint {
            id:            SensorId(row as u32),
            pos,
            daily_traffic: record.dailytraffic,
            month:         record.month,
            demand_factor: record.demandfactor,
            state:         record.state.filter(|s| !s.trim().is_empty()),
        });
    }

    info!(
        "loaded {} month-{} sensors ({} skipped, {} from other months)",
        loaded.sensors.len(),
        config.reference_month,
        loaded.skipped,
        loaded.other_months
    );
    Ok(loaded)
}
