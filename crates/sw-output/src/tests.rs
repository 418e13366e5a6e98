//! Integration tests for sw-output.

#[cfg(test)]
mod fixtures {
    use sw_core::{GeoPoint, RoutePath};
    use sw_pipeline::BuildOutcome;
    use sw_route::CandidateSites;
    use sw_synth::{ElevationProfile, calculate_manholes_and_pipes, project_profile};

    /// 250 m straight north, flat ground: pump, two interval chambers and a
    /// terminal manhole.
    pub fn outcome(generation: u64) -> BuildOutcome {
        let points: Vec<GeoPoint> = (0..=5)
            .map(|i| GeoPoint::new(54.0 + i as f64 * 50.0 / 111_195.0, 25.0))
            .collect();
        let route = RoutePath::new(points).unwrap();
        let profile = ElevationProfile::new(&route, vec![100.0; 6]).unwrap();
        let network =
            calculate_manholes_and_pipes(&route, profile.elevations(), &CandidateSites::empty(), None).unwrap();
        let projection = project_profile(&network, &profile).unwrap();
        BuildOutcome {
            generation,
            route,
            road_distance_m: 250.0,
            candidate_sites: vec![],
            profile,
            network,
            projection,
        }
    }
}

#[cfg(test)]
mod rows {
    use super::fixtures::outcome;
    use crate::{ProfileSeries, manhole_rows, pipe_rows, profile_rows};

    #[test]
    fn one_row_per_chamber_and_pipe() {
        let out = outcome(3);
        let manholes = manhole_rows(3, &out.network);
        assert_eq!(manholes.len(), out.network.manholes().len());
        assert_eq!(manholes[0].kind, "pump");
        assert_eq!(manholes[0].label, "Pump: depth 1.50 m");
        assert!(manholes.iter().all(|r| r.generation == 3));

        let pipes = pipe_rows(3, &out.network);
        assert_eq!(pipes.len(), 5);
        assert!(pipes.windows(2).all(|w| w[0].distance_end_m == w[1].distance_start_m));
    }

    #[test]
    fn profile_surface_then_pipe() {
        let out = outcome(1);
        let rows = profile_rows(1, &out.projection);
        assert_eq!(rows.len(), 6 + 2 * 5);
        assert!(rows[..6].iter().all(|r| r.series == ProfileSeries::Surface));
        assert!(rows[6..].iter().all(|r| r.series == ProfileSeries::Pipe));
    }
}

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use super::fixtures::outcome;
    use crate::csv::CsvWriter;
    use crate::writer::OutputWriter;
    use crate::{OutputObserver, manhole_rows};
    use sw_pipeline::BuildObserver;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn headers(path: &std::path::Path) -> Vec<String> {
        let mut rdr = csv::Reader::from_path(path).unwrap();
        rdr.headers().unwrap().iter().map(str::to_owned).collect()
    }

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("manholes.csv").exists());
        assert!(dir.path().join("pipes.csv").exists());
        assert!(dir.path().join("profile.csv").exists());
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("a").join("b");
        let _w = CsvWriter::new(&nested).unwrap();
        assert!(nested.join("pipes.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        assert_eq!(headers(&dir.path().join("profile.csv")), [
            "generation",
            "series",
            "distance_m",
            "elevation_m"
        ]);
        let manholes = headers(&dir.path().join("manholes.csv"));
        assert_eq!(manholes.first().map(String::as_str), Some("generation"));
        assert_eq!(manholes.last().map(String::as_str), Some("label"));
    }

    #[test]
    fn manhole_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let out = outcome(2);
        w.write_manholes(&manhole_rows(2, &out.network)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("manholes.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), out.network.manholes().len());
        assert_eq!(&rows[0][0], "2"); // generation
        assert_eq!(&rows[0][2], "pump");
        assert_eq!(&rows[0][6], "1.500"); // depth_m
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn observer_writes_completed_builds() {
        let dir = tmp();
        let mut obs = OutputObserver::new(CsvWriter::new(dir.path()).unwrap());
        obs.on_build_complete(&outcome(1));
        obs.on_build_complete(&outcome(2));
        assert_eq!(obs.written(), 2);
        assert!(obs.take_error().is_none());
        obs.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("pipes.csv")).unwrap();
        let generations: Vec<String> = rdr.records().map(|r| r.unwrap()[0].to_owned()).collect();
        assert_eq!(generations.len(), 10);
        assert_eq!(generations[0], "1");
        assert_eq!(generations[9], "2");
    }
}
