//! Unit tests for ev-roads.
//!
//! All tests use hand-crafted roads and sensors so they run without any
//! source files.

#[cfg(test)]
mod helpers {
    use ev_core::{GeoPoint, RoadId, SensorId};

    use crate::{RoadAttrs, RoadSegment, SensorPoint};

    pub fn road(id: u32, parts: &[&[(f64, f64)]]) -> RoadSegment {
        let parts = parts
            .iter()
            .map(|p| p.iter().map(|&(lat, lon)| GeoPoint::new(lat, lon)).collect())
            .collect();
        let attrs = RoadAttrs {
            road_type: "Major Highway".into(),
            name:      format!("R{id}"),
            length_km: Some(1.0),
            toll:      false,
        };
        RoadSegment::new(RoadId(id), parts, attrs)
    }

    pub fn sensor(id: u32, lat: f64, lon: f64, volume: f64) -> SensorPoint {
        SensorPoint {
            id:            SensorId(id),
            pos:           GeoPoint::new(lat, lon),
            daily_traffic: volume,
            month:         1,
            demand_factor: Some(0.9),
            state:         Some("GA".into()),
        }
    }
}

// ── Volume matching ───────────────────────────────────────────────────────────

#[cfg(test)]
mod matching {
    use ev_core::SensorId;

    use super::helpers::{road, sensor};
    use crate::RoadVolumeMatcher;

    #[test]
    fn nearest_sensor_volume_assigned() {
        let sensors = vec![
            sensor(0, 10.0, 10.0, 500.0),
            sensor(1, 0.5, 0.0, 42_000.0),
        ];
        let m = RoadVolumeMatcher::new(&sensors, 2.0);
        let r = road(0, &[&[(0.0, 0.0), (0.0, 1.0)]]);

        let t = m.assign(&r).unwrap();
        assert_eq!(t.sensor, SensorId(1));
        assert_eq!(t.volume, 42_000.0);
        assert_eq!(t.distance, 0.5);
        assert_eq!(t.demand_factor, Some(0.9));
        assert_eq!(t.state.as_deref(), Some("GA"));
    }

    #[test]
    fn beyond_radius_left_missing() {
        let sensors = vec![sensor(0, 3.0, 0.0, 1_000.0)];
        let m = RoadVolumeMatcher::new(&sensors, 2.0);
        let r = road(0, &[&[(0.0, 0.0)]]);

        // Nearest exists but is 3.0 away.
        assert_eq!(m.nearest(&r).unwrap().distance, 3.0);
        assert!(m.assign(&r).is_none());
    }

    #[test]
    fn exactly_at_radius_accepted() {
        let sensors = vec![sensor(0, 2.0, 0.0, 7.0)];
        let m = RoadVolumeMatcher::new(&sensors, 2.0);
        assert_eq!(m.assign(&road(0, &[&[(0.0, 0.0)]])).unwrap().volume, 7.0);
    }

    #[test]
    fn observed_zero_is_not_missing() {
        let sensors = vec![sensor(0, 0.0, 0.0, 0.0)];
        let m = RoadVolumeMatcher::new(&sensors, 2.0);
        let (roads, _) = m.enrich(vec![road(0, &[&[(0.1, 0.1)]])]);
        assert_eq!(roads[0].volume(), Some(0.0));
    }

    #[test]
    fn tie_breaks_to_lowest_sensor_id() {
        // Sensors 5 and 2 are both exactly 1.0 from the single vertex.
        let sensors = vec![
            sensor(5, 1.0, 0.0, 555.0),
            sensor(2, -1.0, 0.0, 222.0),
            sensor(9, 0.0, 1.0, 999.0),
        ];
        let m = RoadVolumeMatcher::new(&sensors, 2.0);
        let t = m.assign(&road(0, &[&[(0.0, 0.0)]])).unwrap();
        assert_eq!(t.sensor, SensorId(2));
        assert_eq!(t.volume, 222.0);
    }

    #[test]
    fn tie_across_different_vertices() {
        // Sensor 4 is 1.0 from the first vertex, sensor 1 is 1.0 from the last.
        let sensors = vec![sensor(4, -1.0, 0.0, 4.0), sensor(1, 0.0, 6.0, 1.0)];
        let m = RoadVolumeMatcher::new(&sensors, 2.0);
        let t = m.assign(&road(0, &[&[(0.0, 0.0), (0.0, 5.0)]])).unwrap();
        assert_eq!(t.sensor, SensorId(1));
    }

    #[test]
    fn multi_part_uses_minimum_over_all_parts() {
        let sensors = vec![sensor(0, 50.0, 50.0, 123.0)];
        let m = RoadVolumeMatcher::new(&sensors, 2.0);
        // First part is far away; second part passes right by the sensor.
        let r = road(0, &[&[(0.0, 0.0), (0.0, 1.0)], &[(49.0, 50.0), (50.5, 50.0)]]);
        let t = m.assign(&r).unwrap();
        assert_eq!(t.distance, 0.5);
        assert_eq!(t.volume, 123.0);
    }

    #[test]
    fn degenerate_road_unmatched_without_error() {
        let sensors = vec![sensor(0, 0.0, 0.0, 10.0)];
        let m = RoadVolumeMatcher::new(&sensors, 2.0);
        let empty = road(0, &[]);
        let empty_part = road(1, &[&[]]);
        assert!(m.nearest(&empty).is_none());

        let (roads, stats) = m.enrich(vec![empty, empty_part, road(2, &[&[(0.0, 0.0)]])]);
        assert!(roads[0].traffic.is_none());
        assert!(roads[1].traffic.is_none());
        assert_eq!(roads[2].volume(), Some(10.0));
        assert_eq!(stats.degenerate, 2);
        assert_eq!(stats.matched, 1);
        assert_eq!(stats.out_of_range, 0);
    }

    #[test]
    fn no_sensors_leaves_everything_missing() {
        let m = RoadVolumeMatcher::new(&[], 2.0);
        let (roads, stats) = m.enrich(vec![road(0, &[&[(0.0, 0.0)]])]);
        assert!(roads[0].traffic.is_none());
        assert_eq!(stats.degenerate, 1);
    }

    #[test]
    fn enrich_preserves_road_order() {
        let sensors = vec![sensor(0, 0.0, 0.0, 1.0), sensor(1, 20.0, 0.0, 2.0)];
        let m = RoadVolumeMatcher::new(&sensors, 2.0);
        let roads = vec![
            road(7, &[&[(20.0, 0.5)]]),
            road(3, &[&[(0.0, 0.5)]]),
            road(5, &[&[(10.0, 0.0)]]),
        ];
        let (out, stats) = m.enrich(roads);
        let ids: Vec<u32> = out.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, [7, 3, 5]);
        assert_eq!(out[0].volume(), Some(2.0));
        assert_eq!(out[1].volume(), Some(1.0));
        assert_eq!(out[2].volume(), None);
        assert_eq!(stats.out_of_range, 1);
    }

    #[test]
    fn index_agrees_with_brute_force() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        let mut rng = SmallRng::seed_from_u64(17);
        // Coarse grid coordinates so exact ties actually occur.
        let coord = |rng: &mut SmallRng| (rng.gen_range(0..40) as f64) * 0.25;

        let sensors: Vec<_> = (0..60)
            .map(|i| {
                let (lat, lon) = (coord(&mut rng), coord(&mut rng));
                sensor(i, lat, lon, i as f64 * 100.0)
            })
            .collect();
        let roads: Vec<_> = (0..80)
            .map(|i| {
                let n = rng.gen_range(1..5);
                let pts: Vec<(f64, f64)> = (0..n).map(|_| (coord(&mut rng), coord(&mut rng))).collect();
                road(i, &[pts.as_slice()])
            })
            .collect();

        let m = RoadVolumeMatcher::new(&sensors, 2.0);
        for r in &roads {
            // Per-sensor minimum distance over vertices, then lowest-id argmin.
            let mut best: Option<(f64, SensorId)> = None;
            for s in &sensors {
                let d = r.vertices().map(|v| v.planar_distance_2(s.pos)).fold(f64::INFINITY, f64::min);
                best = match best {
                    Some(b) if (b.0, b.1) <= (d, s.id) => Some(b),
                    _ => Some((d, s.id)),
                };
            }
            let (d2, id) = best.unwrap();
            let got = m.nearest(r).unwrap();
            assert_eq!(got.sensor, id, "road {}", r.id);
            assert_eq!(got.distance, d2.sqrt());
        }
    }

    #[test]
    fn rerun_is_identical() {
        let sensors = vec![sensor(0, 0.0, 0.0, 1.0), sensor(1, 1.0, 1.0, 2.0)];
        let m = RoadVolumeMatcher::new(&sensors, 2.0);
        let roads = vec![road(0, &[&[(0.5, 0.5)]]), road(1, &[&[(0.9, 0.9)]])];
        let (a, sa) = m.enrich(roads.clone());
        let (b, sb) = m.enrich(roads);
        assert_eq!(a, b);
        assert_eq!(sa, sb);
    }
}

// ── Vertex table ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod vertices {
    use ev_core::{RoadId, VertexId};

    use super::helpers::road;
    use crate::{VertexTable, filter_roads};

    fn table() -> VertexTable {
        let mut a = road(0, &[&[(3.0, 0.0), (1.0, 0.0)], &[(2.0, 5.0)]]);
        a.attrs.road_type = "Major Highway".into();
        let mut b = road(1, &[&[(1.0, -1.0), (0.5, 0.0)]]);
        b.attrs.road_type = "Secondary Highway".into();
        VertexTable::from_roads(&[a, b])
    }

    #[test]
    fn one_row_per_vertex() {
        assert_eq!(table().len(), 5);
    }

    #[test]
    fn sorted_by_lat_then_lon() {
        let t = table();
        let coords: Vec<(f64, f64)> = t.rows().iter().map(|r| (r.pos.lat, r.pos.lon)).collect();
        assert_eq!(coords, [(0.5, 0.0), (1.0, -1.0), (1.0, 0.0), (2.0, 5.0), (3.0, 0.0)]);
    }

    #[test]
    fn seq_counts_across_parts() {
        let t = table();
        let mut road0: Vec<_> = t.rows().iter().filter(|r| r.road == RoadId(0)).collect();
        road0.sort_by_key(|r| r.seq);
        let coords: Vec<(f64, f64)> = road0.iter().map(|r| (r.pos.lat, r.pos.lon)).collect();
        assert_eq!(coords, [(3.0, 0.0), (1.0, 0.0), (2.0, 5.0)]);
        assert_eq!(road0.iter().map(|r| r.seq).collect::<Vec<_>>(), [0, 1, 2]);
    }

    #[test]
    fn identical_positions_ordered_by_road() {
        let t = VertexTable::from_roads(&[road(4, &[&[(1.0, 1.0)]]), road(2, &[&[(1.0, 1.0)]])]);
        assert_eq!(t.get(VertexId(0)).unwrap().road, RoadId(2));
        assert_eq!(t.get(VertexId(1)).unwrap().road, RoadId(4));
    }

    #[test]
    fn degenerate_roads_contribute_no_rows() {
        let t = VertexTable::from_roads(&[road(0, &[]), road(1, &[&[(0.0, 0.0)]])]);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn lat_window_bounds_inclusive() {
        let t = table();
        assert_eq!(t.lat_window(1.0, 0.5), 0..3); // 0.5, 1.0, 1.0
        assert_eq!(t.lat_window(2.5, 0.5), 3..5); // 2.0, 3.0
        assert!(t.lat_window(10.0, 0.02).is_empty());
        assert!(t.lat_window(-10.0, 0.02).is_empty());
    }

    #[test]
    fn filter_returns_new_table() {
        let base = table();
        let secondary = filter_roads(&base, |r| r.attrs.road_type == "Secondary Highway");
        assert_eq!(secondary.len(), 2);
        assert!(secondary.rows().iter().all(|r| r.road == RoadId(1)));
        // Base is unchanged and the result keeps table order.
        assert_eq!(base.len(), 5);
        assert!(secondary.rows()[0].pos.lat <= secondary.rows()[1].pos.lat);
    }
}

// ── Loaders ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loaders {
    use std::io::Cursor;

    use ev_core::{MatchConfig, RoadId, RoadSourceConfig, SensorId};

    use crate::{RoadError, load_roads_reader, load_sensors_reader, parse_geometry};

    const ROADS_CSV: &str = "\
type,name,length_km,toll,geometry,continent,sov_a3,featurecla\n\
Major Highway,I-75,12.4,0,\"LINESTRING (-84.39 33.75, -84.38 33.80)\",North America,USA,Road\n\
Major Highway,A1,3.0,0,\"LINESTRING (2.0 48.0, 2.1 48.1)\",Europe,FRA,Road\n\
Secondary Highway,,3.1,1,\"MULTILINESTRING ((-84.2 33.7, -84.1 33.7), (-84.0 33.6, -83.9 33.6))\",North America,USA,Road\n\
Ferry Route,F1,9.0,0,\"POINT (-80.0 25.0)\",North America,USA,Road\n\
Major Highway,Bad,1.0,0,\"LINESTRING (oops)\",North America,USA,Road\n\
Beltway,I-285,n/a,yes,\"LINESTRING (-84.3 33.9, -84.2 33.9)\",North America,USA,Road\n\
";

    #[test]
    fn roads_loaded_with_filters_and_skips() {
        let loaded = load_roads_reader(Cursor::new(ROADS_CSV), &RoadSourceConfig::default()).unwrap();
        let ids: Vec<u32> = loaded.roads.iter().map(|r| r.id.0).collect();
        // Row 1 is filtered (Europe); rows 3 and 4 skipped (POINT, bad WKT).
        assert_eq!(ids, [0, 2, 5]);
        assert_eq!(loaded.filtered, 1);
        assert_eq!(loaded.skipped, 2);
    }

    #[test]
    fn wkt_axes_become_lat_lon() {
        let loaded = load_roads_reader(Cursor::new(ROADS_CSV), &RoadSourceConfig::default()).unwrap();
        let first = &loaded.roads[0];
        assert_eq!(first.parts[0][0].lat, 33.75);
        assert_eq!(first.parts[0][0].lon, -84.39);
        assert_eq!(first.attrs.name, "I-75");
        assert_eq!(first.attrs.length_km, Some(12.4));
        assert!(!first.attrs.toll);
    }

    #[test]
    fn multilinestring_keeps_parts() {
        let loaded = load_roads_reader(Cursor::new(ROADS_CSV), &RoadSourceConfig::default()).unwrap();
        let multi = loaded.roads.iter().find(|r| r.id == RoadId(2)).unwrap();
        assert_eq!(multi.parts.len(), 2);
        assert_eq!(multi.vertex_count(), 4);
        assert!(multi.attrs.toll);
        assert_eq!(multi.attrs.name, "");
    }

    #[test]
    fn malformed_length_is_none_not_fatal() {
        let loaded = load_roads_reader(Cursor::new(ROADS_CSV), &RoadSourceConfig::default()).unwrap();
        let beltway = loaded.roads.iter().find(|r| r.id == RoadId(5)).unwrap();
        assert_eq!(beltway.attrs.length_km, None);
        assert!(beltway.attrs.toll);
    }

    #[test]
    fn filters_disabled_keep_everything_parseable() {
        let config = RoadSourceConfig { continent: None, sov_a3: None, featurecla: None, road_types: vec![] };
        let loaded = load_roads_reader(Cursor::new(ROADS_CSV), &config).unwrap();
        assert_eq!(loaded.roads.len(), 4);
        assert_eq!(loaded.filtered, 0);
    }

    #[test]
    fn source_without_filter_columns() {
        let csv = "type,name,length_km,toll,geometry\nRoad,X,1,0,\"LINESTRING (0 0, 1 1)\"\n";
        let loaded = load_roads_reader(Cursor::new(csv), &RoadSourceConfig::default()).unwrap();
        assert_eq!(loaded.roads.len(), 1);
    }

    #[test]
    fn missing_geometry_column_is_an_error() {
        let csv = "type,name,length_km,toll\nRoad,X,1,0\n";
        let err = load_roads_reader(Cursor::new(csv), &RoadSourceConfig::default()).unwrap_err();
        assert!(matches!(err, RoadError::MissingColumn { column: "geometry", .. }));
    }

    #[test]
    fn geometry_variants() {
        assert_eq!(parse_geometry("LINESTRING (1 2, 3 4)").unwrap().len(), 1);
        assert!(parse_geometry("POLYGON ((0 0, 1 0, 1 1, 0 0))").unwrap_err().contains("POLYGON"));
        assert!(parse_geometry("not wkt").is_err());
    }

    const SENSORS_CSV: &str = "\
station_id,lat,long,month,dailytraffic,demandfactor,state\n\
A,33.75,84.39,1,41000,0.93,GA\n\
A,33.75,84.39,2,39000,0.91,GA\n\
B,34.00,84.00,1,not-a-number,0.5,GA\n\
C,40.00,75.00,1,12000,,\n\
";

    #[test]
    fn sensors_filtered_to_reference_month() {
        let loaded = load_sensors_reader(Cursor::new(SENSORS_CSV), &MatchConfig::default()).unwrap();
        let ids: Vec<SensorId> = loaded.sensors.iter().map(|s| s.id).collect();
        // Ids are row ordinals in the full table.
        assert_eq!(ids, [SensorId(0), SensorId(3)]);
        assert_eq!(loaded.other_months, 1);
        assert_eq!(loaded.skipped, 1);
    }

    #[test]
    fn sensor_longitude_negated() {
        let loaded = load_sensors_reader(Cursor::new(SENSORS_CSV), &MatchConfig::default()).unwrap();
        assert_eq!(loaded.sensors[0].pos.lon, -84.39);

        let raw = MatchConfig { negate_sensor_longitude: false, ..MatchConfig::default() };
        let loaded = load_sensors_reader(Cursor::new(SENSORS_CSV), &raw).unwrap();
        assert_eq!(loaded.sensors[0].pos.lon, 84.39);
    }

    #[test]
    fn optional_sensor_fields_may_be_empty() {
        let loaded = load_sensors_reader(Cursor::new(SENSORS_CSV), &MatchConfig::default()).unwrap();
        let c = &loaded.sensors[1];
        assert_eq!(c.daily_traffic, 12_000.0);
        assert_eq!(c.demand_factor, None);
        assert_eq!(c.state, None);
    }

    #[test]
    fn other_reference_month() {
        let config = MatchConfig { reference_month: 2, ..MatchConfig::default() };
        let loaded = load_sensors_reader(Cursor::new(SENSORS_CSV), &config).unwrap();
        assert_eq!(loaded.sensors.len(), 1);
        assert_eq!(loaded.sensors[0].daily_traffic, 39_000.0);
    }
}
