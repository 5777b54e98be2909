//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `sorted_roads.csv`
//! - `EV_data_capacity.csv`
//! - `merged.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;
use log::info;

use crate::writer::OutputWriter;
use crate::{MergedRow, OutputResult, RoadRow, StationRow};

pub const ROADS_FILE:    &str = "sorted_roads.csv";
pub const STATIONS_FILE: &str = "EV_data_capacity.csv";
pub const MERGED_FILE:   &str = "merged.csv";

/// Prefix on the matched-vertex columns of the station table.
const ROAD_PREFIX: &str = "r_";
const DISTANCE_COLUMN: &str = "min dis";

/// Writes pipeline output to three CSV files.
pub struct CsvWriter {
    roads:          Writer<File>,
    stations:       Writer<File>,
    merged:         Writer<File>,
    /// Width of the station source fields, for padding unmatched merge rows.
    station_width:  usize,
    finished:       bool,
}

impl CsvWriter {
    /// Open (or create) the three CSV files in `dir` and write the header
    /// rows.  `station_headers` is the station source header, which the
    /// station and merged tables carry through.
    pub fn new(dir: &Path, station_headers: &[String]) -> OutputResult<Self> {
        let mut roads = Writer::from_path(dir.join(ROADS_FILE))?;
        roads.write_record(RoadRow::HEADERS)?;

        let mut station_own: Vec<String> = station_headers.to_vec();
        station_own.push("capacity".into());
        station_own.push("ports".into());

        let mut stations = Writer::from_path(dir.join(STATIONS_FILE))?;
        let mut header = station_own.clone();
        header.extend(RoadRow::HEADERS.iter().map(|h| format!("{ROAD_PREFIX}{h}")));
        header.push(DISTANCE_COLUMN.into());
        stations.write_record(&header)?;

        let mut merged = Writer::from_path(dir.join(MERGED_FILE))?;
        let mut header: Vec<String> = RoadRow::HEADERS.iter().map(|h| h.to_string()).collect();
        header.extend(station_own);
        header.push(DISTANCE_COLUMN.into());
        merged.write_record(&header)?;

        info!("writing CSV output to {}", dir.display());
        Ok(Self {
            roads,
            stations,
            merged,
            station_width: station_headers.len() + 2,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_roads(&mut self, rows: &[RoadRow]) -> OutputResult<()> {
        for row in rows {
            self.roads.write_record(row.fields())?;
        }
        Ok(())
    }

    fn write_stations(&mut self, rows: &[StationRow]) -> OutputResult<()> {
        let empty_road = vec![String::new(); RoadRow::HEADERS.len()];
        for row in rows {
            let mut record = row.own_fields();
            match &row.nearest {
                Some(n) => record.extend(n.road.fields()),
                None => record.extend(empty_road.iter().cloned()),
            }
            record.push(row.distance_field());
            self.stations.write_record(&record)?;
        }
        Ok(())
    }

    fn write_merged(&mut self, rows: &[MergedRow<'_>]) -> OutputResult<()> {
        for row in rows {
            let mut record = row.road.fields();
            match row.station {
                Some(s) => {
                    record.extend(s.own_fields());
                    record.push(s.distance_field());
                }
                None => {
                    record.extend(std::iter::repeat_n(String::new(), self.station_width));
                    record.push(String::new());
                }
            }
            self.merged.write_record(&record)?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.roads.flush()?;
        self.stations.flush()?;
        self.merged.flush()?;
        Ok(())
    }
}
