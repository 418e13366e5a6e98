//! Unit tests for sw-pipeline.

#[cfg(test)]
mod fakes {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use sw_core::{GeoPoint, RoadAnchor, SewerError, SewerResult};
    use sw_route::RoutePolygon;

    use crate::{
        BuildObserver, BuildOutcome, BuildStep, ElevationService, PipelineError, RoadRoute,
        RoadRouter, RoadSnapper, TopologyQuery,
    };

    pub const OFFSET_DEG: f64 = 0.0002;

    pub fn start() -> GeoPoint {
        GeoPoint::new(54.0, 25.0)
    }

    pub fn end() -> GeoPoint {
        GeoPoint::new(54.0, 25.01)
    }

    /// The road runs 0.0002° south of the clicked points.
    pub fn anchor_of(p: GeoPoint) -> RoadAnchor {
        RoadAnchor::from_geo(GeoPoint::new(p.lat - OFFSET_DEG, p.lon))
    }

    /// Eleven points along the road, ~65 m apart.
    pub fn road_points() -> Vec<GeoPoint> {
        (0..=10)
            .map(|i| GeoPoint::new(54.0 - OFFSET_DEG, 25.0 + i as f64 * 0.001))
            .collect()
    }

    pub fn crossing() -> GeoPoint {
        GeoPoint::new(54.0 - OFFSET_DEG, 25.005)
    }

    pub struct OffsetSnapper {
        pub reachable: bool,
    }

    impl RoadSnapper for OffsetSnapper {
        async fn nearest_road(&self, point: GeoPoint) -> SewerResult<Option<RoadAnchor>> {
            Ok(self.reachable.then(|| anchor_of(point)))
        }
    }

    pub struct FakeRouter {
        pub routes: Vec<RoadRoute>,
        pub delay:  Duration,
    }

    impl FakeRouter {
        pub fn straight() -> Self {
            Self {
                routes: vec![RoadRoute { points: road_points(), distance_m: 655.0 }],
                delay:  Duration::ZERO,
            }
        }
    }

    impl RoadRouter for FakeRouter {
        async fn route(&self, _from: RoadAnchor, _to: RoadAnchor) -> SewerResult<Vec<RoadRoute>> {
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(self.routes.clone())
        }
    }

    pub struct FixedTopology {
        pub nodes: Vec<GeoPoint>,
    }

    impl TopologyQuery for FixedTopology {
        async fn shared_nodes(&self, _polygon: &RoutePolygon) -> SewerResult<Vec<GeoPoint>> {
            Ok(self.nodes.clone())
        }
    }

    pub struct FailingTopology;

    impl TopologyQuery for FailingTopology {
        async fn shared_nodes(&self, _polygon: &RoutePolygon) -> SewerResult<Vec<GeoPoint>> {
            Err(SewerError::external("topology query", "HTTP 504"))
        }
    }

    #[derive(Default)]
    pub struct CountingElevation {
        pub calls: AtomicUsize,
    }

    impl CountingElevation {
        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl ElevationService for CountingElevation {
        async fn elevations(&self, points: &[GeoPoint]) -> SewerResult<Vec<Option<f64>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![Some(100.0); points.len()])
        }
    }

    #[derive(Default)]
    pub struct RecordingObserver {
        pub started:   Option<u64>,
        pub steps:     Vec<BuildStep>,
        pub completed: Option<u64>,
        pub failed:    Option<PipelineError>,
    }

    impl BuildObserver for RecordingObserver {
        fn on_build_start(&mut self, generation: u64, _start: GeoPoint, _end: GeoPoint) {
            self.started = Some(generation);
        }
        fn on_step(&mut self, _generation: u64, step: BuildStep) {
            self.steps.push(step);
        }
        fn on_build_complete(&mut self, outcome: &BuildOutcome) {
            self.completed = Some(outcome.generation);
        }
        fn on_build_failed(&mut self, _generation: u64, error: &PipelineError) {
            self.failed = Some(error.clone());
        }
    }
}

// ── Generations ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod generation {
    use crate::{GenerationCounter, PipelineError};

    #[test]
    fn newer_ticket_supersedes_older() {
        let counter = GenerationCounter::new();
        let first = counter.begin();
        assert!(first.is_current());
        let second = counter.clone().begin();
        assert!(!first.is_current());
        assert!(second.is_current());
        assert_eq!(
            first.ensure_current(),
            Err(PipelineError::Superseded { generation: 1, current: 2 })
        );
        assert_eq!(counter.current(), 2);
    }
}

// ── Cache ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod cache {
    use super::fakes::CountingElevation;
    use crate::{CachedElevation, ElevationCache, ElevationService, request_key};
    use sw_core::GeoPoint;

    fn pts(lat: f64) -> Vec<GeoPoint> {
        vec![GeoPoint::new(lat, 25.0), GeoPoint::new(lat, 25.001)]
    }

    #[test]
    fn key_depends_on_exact_coordinates() {
        assert_eq!(request_key(&pts(54.0)), request_key(&pts(54.0)));
        assert_ne!(request_key(&pts(54.0)), request_key(&pts(54.000_000_1)));
    }

    #[test]
    fn oldest_entry_is_evicted() {
        let mut cache = ElevationCache::new(1);
        let (a, b) = (pts(54.0), pts(55.0));
        cache.insert(request_key(&a), &a, vec![Some(1.0); 2]);
        cache.insert(request_key(&b), &b, vec![Some(2.0); 2]);
        assert_eq!(cache.len(), 1);
        assert!(cache.get(request_key(&a), &a).is_none());
        assert_eq!(cache.get(request_key(&b), &b), Some(vec![Some(2.0); 2]));
    }

    #[test]
    fn colliding_key_with_other_points_misses() {
        let mut cache = ElevationCache::new(4);
        let a = pts(54.0);
        cache.insert(7, &a, vec![Some(1.0); 2]);
        assert!(cache.get(7, &pts(55.0)).is_none());
    }

    #[test]
    fn zero_capacity_disables_caching() {
        let mut cache = ElevationCache::new(0);
        let a = pts(54.0);
        cache.insert(request_key(&a), &a, vec![None; 2]);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn repeated_request_is_served_from_cache() {
        let cached = CachedElevation::new(CountingElevation::default(), 8);
        let a = pts(54.0);
        let first = cached.elevations(&a).await.unwrap();
        let second = cached.elevations(&a).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(cached.inner().calls(), 1);
        assert_eq!((cached.hits(), cached.misses()), (1, 1));
    }
}

// ── Pipeline ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod pipeline {
    use std::time::Duration;

    use super::fakes::*;
    use crate::{
        BuildPipeline, BuildRequest, BuildStep, NoopObserver, PipelineConfig, PipelineError,
        RoadRoute,
    };
    use sw_core::SewerError;
    use sw_synth::ManholeKind;

    fn pipeline_with(
        router: FakeRouter,
        config: PipelineConfig,
    ) -> BuildPipeline<OffsetSnapper, FakeRouter, FixedTopology, CountingElevation> {
        BuildPipeline::new(
            OffsetSnapper { reachable: true },
            router,
            FixedTopology { nodes: vec![crossing()] },
            CountingElevation::default(),
            config,
        )
        .unwrap()
    }

    fn request() -> BuildRequest {
        BuildRequest::new(start(), end())
    }

    #[tokio::test]
    async fn builds_network_from_start_to_end() {
        let pipeline = pipeline_with(FakeRouter::straight(), PipelineConfig::default());
        let mut obs = RecordingObserver::default();
        let out = pipeline.build(request(), &mut obs).await.unwrap();

        assert_eq!(out.generation, 1);
        assert_eq!(out.route.first(), start());
        assert_eq!(out.route.last(), end());
        assert_eq!(out.road_distance_m, 655.0);

        let net = &out.network;
        assert!(net.is_contiguous());
        assert_eq!(net.count(ManholeKind::Pump), 1);
        assert_eq!(net.pump().position, start());
        assert_eq!(net.terminal().position, end());

        // Topology crossing becomes a regular manhole.
        assert!(out.candidate_sites.iter().any(|p| p.same_site(crossing())));
        assert!(
            net.manholes()
                .iter()
                .any(|m| m.position.same_site(crossing()) && m.kind == ManholeKind::Manhole)
        );

        // Road access chamber at the start anchor.
        let access = anchor_of(start()).to_geo();
        assert!(
            net.manholes()
                .iter()
                .any(|m| m.position.same_site(access) && m.kind == ManholeKind::Manhole)
        );

        assert_eq!(out.projection.pipes.len(), 2 * net.pipes().len());
        assert_eq!(obs.started, Some(1));
        assert_eq!(obs.completed, Some(1));
        assert!(obs.failed.is_none());
        assert_eq!(obs.steps.first(), Some(&BuildStep::SnapStart));
        assert_eq!(obs.steps.last(), Some(&BuildStep::Project));
    }

    #[tokio::test]
    async fn no_road_nearby_is_input_unavailable() {
        let pipeline = BuildPipeline::new(
            OffsetSnapper { reachable: false },
            FakeRouter::straight(),
            FixedTopology { nodes: vec![] },
            CountingElevation::default(),
            PipelineConfig::default(),
        )
        .unwrap();
        let mut obs = RecordingObserver::default();
        let err = pipeline.build(request(), &mut obs).await.unwrap_err();
        assert!(matches!(err, PipelineError::Sewer(SewerError::InputUnavailable(_))));
        assert_eq!(obs.failed, Some(err));
        assert!(obs.completed.is_none());
        assert_eq!(pipeline.elevation_cache().inner().calls(), 0);
    }

    #[tokio::test]
    async fn empty_router_answer_is_input_unavailable() {
        let router = FakeRouter { routes: vec![], delay: Duration::ZERO };
        let pipeline = pipeline_with(router, PipelineConfig::default());
        let err = pipeline.build(request(), &mut NoopObserver).await.unwrap_err();
        assert!(matches!(err, PipelineError::Sewer(SewerError::InputUnavailable(_))));
    }

    #[tokio::test]
    async fn route_choice_selects_alternative() {
        let mut detour = road_points();
        detour.insert(5, crossing());
        detour[5].lat -= 0.001;
        let router = FakeRouter {
            routes: vec![
                RoadRoute { points: road_points(), distance_m: 655.0 },
                RoadRoute { points: detour, distance_m: 900.0 },
            ],
            delay:  Duration::ZERO,
        };
        let pipeline = pipeline_with(router, PipelineConfig::default());

        let out = pipeline
            .build(request().with_route_choice(1), &mut NoopObserver)
            .await
            .unwrap();
        assert_eq!(out.road_distance_m, 900.0);

        let err = pipeline
            .build(request().with_route_choice(2), &mut NoopObserver)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Sewer(SewerError::InputUnavailable(_))));
    }

    #[tokio::test]
    async fn topology_failure_degrades_to_angle_candidates() {
        let pipeline = BuildPipeline::new(
            OffsetSnapper { reachable: true },
            FakeRouter::straight(),
            FailingTopology,
            CountingElevation::default(),
            PipelineConfig::default(),
        )
        .unwrap();
        let out = pipeline.build(request(), &mut NoopObserver).await.unwrap();
        assert!(out.candidate_sites.is_empty());
        assert!(out.network.is_contiguous());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_router_times_out() {
        let router = FakeRouter { routes: vec![], delay: Duration::from_secs(60) };
        let config = PipelineConfig { call_timeout_ms: 100, ..PipelineConfig::default() };
        let pipeline = pipeline_with(router, config);
        let err = pipeline.build(request(), &mut NoopObserver).await.unwrap_err();
        assert_eq!(err, PipelineError::Timeout { service: "road router", after: Duration::from_millis(100) });
        assert!(err.is_external());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_build_supersedes_older() {
        let router = FakeRouter { delay: Duration::from_millis(50), ..FakeRouter::straight() };
        let pipeline = pipeline_with(router, PipelineConfig::default());
        let mut obs_a = RecordingObserver::default();
        let mut obs_b = RecordingObserver::default();

        let (a, b) = tokio::join!(pipeline.build(request(), &mut obs_a), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            pipeline.build(request(), &mut obs_b).await
        });

        assert_eq!(a.unwrap_err(), PipelineError::Superseded { generation: 1, current: 2 });
        assert_eq!(b.unwrap().generation, 2);
        assert!(obs_a.completed.is_none());
        assert!(!obs_a.steps.contains(&BuildStep::Elevation));
        assert_eq!(obs_b.completed, Some(2));
        assert_eq!(pipeline.elevation_cache().inner().calls(), 1);
    }

    #[tokio::test]
    async fn repeated_build_reuses_elevations() {
        let pipeline = pipeline_with(FakeRouter::straight(), PipelineConfig::default());
        let first = pipeline.build(request(), &mut NoopObserver).await.unwrap();
        let second = pipeline.build(request(), &mut NoopObserver).await.unwrap();
        assert_eq!(first.route, second.route);
        assert_eq!(pipeline.elevation_cache().inner().calls(), 1);
        assert_eq!(pipeline.elevation_cache().hits(), 1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PipelineConfig { call_timeout_ms: 0, ..PipelineConfig::default() };
        let result = BuildPipeline::new(
            OffsetSnapper { reachable: true },
            FakeRouter::straight(),
            FixedTopology { nodes: vec![] },
            CountingElevation::default(),
            config,
        );
        assert!(matches!(result, Err(PipelineError::Sewer(SewerError::Config(_)))));
    }
}

// ── Offline collaborators ─────────────────────────────────────────────────────

#[cfg(test)]
mod offline {
    use crate::{
        BuildPipeline, BuildRequest, ElevationService, NoopObserver, PipelineConfig, SampledElevation,
        TopologyQuery, WayTopology,
    };
    use sw_core::{GeoPoint, SewerError};
    use sw_route::{RoadGraphBuilder, RoutePolygon, SegmentSnapper};
    use sw_synth::ManholeKind;

    fn main_street() -> Vec<GeoPoint> {
        (0..=10).map(|i| GeoPoint::new(54.0, 25.0 + i as f64 * 0.001)).collect()
    }

    fn cross_street() -> Vec<GeoPoint> {
        (0..=4).map(|i| GeoPoint::new(53.998 + i as f64 * 0.001, 25.005)).collect()
    }

    fn crossing() -> GeoPoint {
        GeoPoint::new(54.0, 25.005)
    }

    fn ways() -> Vec<Vec<GeoPoint>> {
        vec![main_street(), cross_street()]
    }

    #[tokio::test]
    async fn way_topology_reports_shared_nodes_inside_bounds() {
        let topo = WayTopology::new(ways());
        let polygon = RoutePolygon::new(main_street());
        let nodes = topo.shared_nodes(&polygon).await.unwrap();
        assert_eq!(nodes.len(), 1);
        assert!(nodes[0].same_site(crossing()));

        let elsewhere = RoutePolygon::new(vec![GeoPoint::new(55.0, 26.0), GeoPoint::new(55.0, 26.01)]);
        assert!(topo.shared_nodes(&elsewhere).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn sampled_elevation_leaves_far_points_empty() {
        let elev = SampledElevation::new([(GeoPoint::new(54.0, 25.0), 120.0)], 30.0);
        let out = elev
            .elevations(&[GeoPoint::new(54.0001, 25.0), GeoPoint::new(54.01, 25.0)])
            .await
            .unwrap();
        assert_eq!(out, vec![Some(120.0), None]);
    }

    fn offline_pipeline() -> BuildPipeline<SegmentSnapper, sw_route::RoadGraph, WayTopology, SampledElevation> {
        let roads = ways();
        let snapper = SegmentSnapper::new(roads.iter().map(Vec::as_slice));
        let mut graph = RoadGraphBuilder::new();
        for road in &roads {
            graph.add_road(road);
        }
        let samples = main_street()
            .into_iter()
            .enumerate()
            .map(|(i, p)| (p, 120.0 - i as f64 * 0.5));
        BuildPipeline::new(
            snapper,
            graph.build(),
            WayTopology::new(roads),
            SampledElevation::new(samples, 30.0),
            PipelineConfig::default(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn end_to_end_over_in_memory_roads() {
        let pipeline = offline_pipeline();
        let start = GeoPoint::new(54.0003, 25.0);
        let end = GeoPoint::new(54.0003, 25.01);
        let out = pipeline.build(BuildRequest::new(start, end), &mut NoopObserver).await.unwrap();

        assert_eq!(out.route.first(), start);
        assert_eq!(out.route.last(), end);
        assert!(out.network.is_contiguous());
        assert_eq!(out.network.pump().position, start);
        assert!(
            out.network
                .manholes()
                .iter()
                .any(|m| m.position.same_site(crossing()) && m.kind == ManholeKind::Manhole)
        );
        // Clicked points lie beyond the sample radius and are filled from
        // their neighbours.
        assert_eq!(out.profile.elevations().first(), out.profile.elevations().get(1));
    }

    #[tokio::test]
    async fn click_far_from_roads_fails() {
        let pipeline = offline_pipeline();
        let err = pipeline
            .build(
                BuildRequest::new(GeoPoint::new(55.0, 25.0), GeoPoint::new(54.0003, 25.01)),
                &mut NoopObserver,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, crate::PipelineError::Sewer(SewerError::InputUnavailable(_))));
    }
}
