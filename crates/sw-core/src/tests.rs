//! Unit tests for sw-core primitives.

#[cfg(test)]
mod geo {
    use crate::{GeoPoint, RoadAnchor};

    #[test]
    fn key_rounds_to_five_decimals() {
        let a = GeoPoint::new(1.000_001, 2.000_001);
        let b = GeoPoint::new(1.000_002, 2.000_002);
        assert_eq!(a.key(), b.key());
        assert!(a.same_site(b));

        let c = GeoPoint::new(1.000_02, 2.0);
        assert!(!a.same_site(c));
    }

    #[test]
    fn key_display() {
        let p = GeoPoint::new(54.687_156, 25.279_651);
        assert_eq!(p.key().to_string(), "54.68716,25.27965");
    }

    #[test]
    fn within_deg_is_strict_per_axis() {
        let a = GeoPoint::new(54.0, 25.0);
        assert!(a.within_deg(GeoPoint::new(54.000_05, 25.000_05), 0.000_1));
        assert!(!a.within_deg(GeoPoint::new(54.000_2, 25.0), 0.000_1));
        assert!(!a.within_deg(GeoPoint::new(54.0, 25.000_2), 0.000_1));
    }

    #[test]
    fn anchor_axis_swap() {
        let anchor = RoadAnchor::new(25.1, 54.2);
        let p = anchor.to_geo();
        assert_eq!(p, GeoPoint::new(54.2, 25.1));
        assert_eq!(RoadAnchor::from(p), anchor);
    }

    #[test]
    fn finiteness() {
        assert!(GeoPoint::new(0.0, 0.0).is_finite());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_finite());
        assert!(!GeoPoint::new(0.0, f64::INFINITY).is_finite());
    }
}

#[cfg(test)]
mod geodesy {
    use crate::GeoPoint;
    use crate::geodesy::{UNDEFINED_DISTANCE, distance, path_length, project_onto_segment, turn_angle};

    #[test]
    fn zero_distance() {
        let p = GeoPoint::new(54.687, 25.279);
        assert_eq!(distance(p, p), 0.0);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = distance(GeoPoint::new(54.0, 25.0), GeoPoint::new(55.0, 25.0));
        assert!((d - 111_194.93).abs() < 0.1, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let a = GeoPoint::new(54.68, 25.27);
        let b = GeoPoint::new(54.70, 25.31);
        assert!((distance(a, b) - distance(b, a)).abs() < 1e-9);
    }

    #[test]
    fn non_finite_is_undefined() {
        let ok = GeoPoint::new(54.0, 25.0);
        let bad = GeoPoint::new(f64::NAN, 25.0);
        assert_eq!(distance(ok, bad), UNDEFINED_DISTANCE);
        assert_eq!(distance(bad, ok), UNDEFINED_DISTANCE);
        // Never wins a minimum.
        let min = [distance(ok, bad), distance(ok, GeoPoint::new(54.1, 25.0))]
            .into_iter()
            .fold(f64::INFINITY, f64::min);
        assert!(min.is_finite());
    }

    #[test]
    fn project_start_point_is_unchanged() {
        let a = GeoPoint::new(54.0, 25.0);
        let b = GeoPoint::new(54.0, 25.01);
        assert_eq!(project_onto_segment(a, a, b), a);
    }

    #[test]
    fn project_onto_degenerate_segment() {
        let a = GeoPoint::new(54.0, 25.0);
        let p = GeoPoint::new(54.3, 25.7);
        assert_eq!(project_onto_segment(p, a, a), a);
    }

    #[test]
    fn project_interior_and_clamped() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 2.0);

        let mid = project_onto_segment(GeoPoint::new(1.0, 1.0), a, b);
        assert!((mid.lat - 0.0).abs() < 1e-12);
        assert!((mid.lon - 1.0).abs() < 1e-12);

        assert_eq!(project_onto_segment(GeoPoint::new(0.5, 5.0), a, b), b);
        assert_eq!(project_onto_segment(GeoPoint::new(0.5, -3.0), a, b), a);
    }

    #[test]
    fn colinear_is_straight() {
        let angle = turn_angle(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.0, 0.002),
        );
        assert!((angle - 180.0).abs() < 1e-9, "got {angle}");
    }

    #[test]
    fn reversal_is_zero() {
        let angle = turn_angle(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.0, 0.0),
        );
        assert!(angle.abs() < 1e-9, "got {angle}");
    }

    #[test]
    fn right_angle() {
        let angle = turn_angle(
            GeoPoint::new(0.0, 0.0),
            GeoPoint::new(0.0, 0.001),
            GeoPoint::new(0.001, 0.001),
        );
        assert!((angle - 90.0).abs() < 1e-9, "got {angle}");
    }

    #[test]
    fn zero_length_leg_counts_as_straight() {
        let p = GeoPoint::new(0.0, 0.0);
        assert_eq!(turn_angle(p, p, GeoPoint::new(1.0, 1.0)), 180.0);
    }

    #[test]
    fn path_length_sums_steps() {
        let pts = [
            GeoPoint::new(54.0, 25.0),
            GeoPoint::new(54.001, 25.0),
            GeoPoint::new(54.001, 25.002),
        ];
        let expected = distance(pts[0], pts[1]) + distance(pts[1], pts[2]);
        assert!((path_length(&pts) - expected).abs() < 1e-9);
    }
}

#[cfg(test)]
mod route {
    use crate::{GeoPoint, RoutePath, SewerError};

    fn line(n: usize) -> Vec<GeoPoint> {
        (0..n).map(|i| GeoPoint::new(54.0 + i as f64 * 0.001, 25.0)).collect()
    }

    #[test]
    fn rejects_short_routes() {
        assert!(matches!(RoutePath::new(vec![]), Err(SewerError::DegenerateGeometry(_))));
        assert!(matches!(RoutePath::new(line(1)), Err(SewerError::DegenerateGeometry(_))));
    }

    #[test]
    fn rejects_consecutive_duplicates() {
        let mut pts = line(3);
        pts.insert(1, pts[1]);
        assert!(matches!(RoutePath::new(pts), Err(SewerError::DegenerateGeometry(_))));
    }

    #[test]
    fn rejects_nan() {
        let mut pts = line(3);
        pts[2].lon = f64::NAN;
        assert!(matches!(RoutePath::new(pts), Err(SewerError::DegenerateGeometry(_))));
    }

    #[test]
    fn cumulative_matches_total() {
        let route = RoutePath::new(line(6)).unwrap();
        let cum = route.cumulative_distances();
        assert_eq!(cum.len(), 6);
        assert_eq!(cum[0], 0.0);
        assert!(cum.windows(2).all(|w| w[1] > w[0]));
        assert!((cum[5] - route.total_length_m()).abs() < 1e-9);
        assert_eq!(route.step_lengths().len(), 5);
    }

    #[test]
    fn position_of_site_uses_rounded_key() {
        let route = RoutePath::new(line(4)).unwrap();
        let near = GeoPoint::new(54.002_000_4, 25.000_000_3);
        assert_eq!(route.position_of_site(near), Some(2));
        assert_eq!(route.position_of_site(GeoPoint::new(10.0, 10.0)), None);
    }
}

#[cfg(test)]
mod config {
    use crate::{SewerConfig, SewerError};

    #[test]
    fn defaults_are_the_design_values() {
        let c = SewerConfig::default();
        assert_eq!(c.initial_depth_m, 1.5);
        assert_eq!(c.max_depth_m, 3.0);
        assert_eq!(c.min_slope, 0.004);
        assert_eq!(c.manhole_interval_m, 100.0);
        assert_eq!(c.manhole_drop_m, 1.5);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn rejects_inverted_depths() {
        let c = SewerConfig { initial_depth_m: 4.0, ..SewerConfig::default() };
        assert!(matches!(c.validate(), Err(SewerError::Config(_))));
    }

    #[test]
    fn rejects_zero_interval() {
        let c = SewerConfig { manhole_interval_m: 0.0, ..SewerConfig::default() };
        assert!(c.validate().is_err());
    }
}
