//! One route build, from two clicked points to a chart-ready network.
//!
//! # Build order
//!
//! ```text
//! snap start ─► snap end ─► route ─► assemble ─► topology ─► elevation ─► synthesize ─► project
//!     │             │          │                     │            │
//!     └─────────────┴──────────┴── ticket check ─────┴────────────┘   after every await
//! ```
//!
//! Each collaborator call is bounded by [`PipelineConfig::call_timeout`].
//! A build whose ticket has been superseded stops at the next check and
//! returns [`PipelineError::Superseded`]; nothing partial is published.

use std::future::Future;

use sw_core::{GeoPoint, RoutePath, SewerError};
use sw_route::{
    AssemblyInput, CandidateSites, IntersectionCandidate, RouteBuildContext, RoutePolygon,
    angle_candidates, assemble_route, reduce_intersections,
};
use sw_synth::{ElevationProfile, NetworkSynthesizer, ProfileProjection, SewerNetwork, project_profile};
use tracing::{debug, info, warn};

use crate::cache::CachedElevation;
use crate::generation::{BuildTicket, GenerationCounter};
use crate::observer::{BuildObserver, BuildStep};
use crate::services::{ElevationService, RoadRouter, RoadSnapper, TopologyQuery};
use crate::{PipelineConfig, PipelineError, PipelineResult};

/// Two user-chosen endpoints and the router alternative to use.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildRequest {
    pub start:        GeoPoint,
    pub end:          GeoPoint,
    /// Index into the router's alternatives.
    #[cfg_attr(feature = "serde", serde(default))]
    pub route_choice: usize,
}

impl BuildRequest {
    pub fn new(start: GeoPoint, end: GeoPoint) -> Self {
        Self { start, end, route_choice: 0 }
    }

    pub fn with_route_choice(mut self, index: usize) -> Self {
        self.route_choice = index;
        self
    }
}

/// Everything a successful build produces.
#[derive(Clone, Debug)]
pub struct BuildOutcome {
    pub generation:       u64,
    pub route:            RoutePath,
    /// Router's own length for the chosen alternative, metres.
    pub road_distance_m:  f64,
    pub candidate_sites:  Vec<GeoPoint>,
    pub profile:          ElevationProfile,
    pub network:          SewerNetwork,
    pub projection:       ProfileProjection,
}

/// Drives builds against one set of collaborators.
pub struct BuildPipeline<S, R, T, E> {
    snapper:     S,
    router:      R,
    topology:    T,
    elevation:   CachedElevation<E>,
    synthesizer: NetworkSynthesizer,
    config:      PipelineConfig,
    generations: GenerationCounter,
}

impl<S, R, T, E> BuildPipeline<S, R, T, E>
where
    S: RoadSnapper,
    R: RoadRouter,
    T: TopologyQuery,
    E: ElevationService,
{
    pub fn new(snapper: S, router: R, topology: T, elevation: E, config: PipelineConfig) -> PipelineResult<Self> {
        config.validate()?;
        let synthesizer = NetworkSynthesizer::new(config.sewer.clone())?;
        Ok(Self {
            snapper,
            router,
            topology,
            elevation: CachedElevation::new(elevation, config.elevation_cache_capacity),
            synthesizer,
            config,
            generations: GenerationCounter::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Shared counter; beginning a ticket on a clone supersedes running
    /// builds of this pipeline.
    pub fn generations(&self) -> GenerationCounter {
        self.generations.clone()
    }

    pub fn elevation_cache(&self) -> &CachedElevation<E> {
        &self.elevation
    }

    /// Run one build.  Starting a build supersedes every build still in
    /// flight on this pipeline.
    pub async fn build<O: BuildObserver>(&self, request: BuildRequest, observer: &mut O) -> PipelineResult<BuildOutcome> {
        let ticket = self.generations.begin();
        let generation = ticket.generation();
        observer.on_build_start(generation, request.start, request.end);

        let result = self.run(&ticket, request, observer).await;
        match &result {
            Ok(outcome) => observer.on_build_complete(outcome),
            Err(e) => observer.on_build_failed(generation, e),
        }
        result
    }

    async fn run<O: BuildObserver>(
        &self,
        ticket: &BuildTicket,
        request: BuildRequest,
        observer: &mut O,
    ) -> PipelineResult<BuildOutcome> {
        let generation = ticket.generation();
        let mut ctx = RouteBuildContext::new(generation);

        // ── Anchors ───────────────────────────────────────────────────────────
        observer.on_step(generation, BuildStep::SnapStart);
        let start_anchor = self
            .call("road snapper", self.snapper.nearest_road(request.start))
            .await?
            .ok_or_else(|| SewerError::input(format!("no road near start {}", request.start)))?;
        ticket.ensure_current()?;

        observer.on_step(generation, BuildStep::SnapEnd);
        let end_anchor = self
            .call("road snapper", self.snapper.nearest_road(request.end))
            .await?
            .ok_or_else(|| SewerError::input(format!("no road near end {}", request.end)))?;
        ticket.ensure_current()?;

        // ── Road route ────────────────────────────────────────────────────────
        observer.on_step(generation, BuildStep::Route);
        let alternatives = self.call("road router", self.router.route(start_anchor, end_anchor)).await?;
        ticket.ensure_current()?;

        let available = alternatives.len();
        if available == 0 {
            return Err(SewerError::input("router returned no route").into());
        }
        let chosen = alternatives.into_iter().nth(request.route_choice).ok_or_else(|| {
            SewerError::input(format!(
                "route choice {} out of range ({available} alternatives)",
                request.route_choice
            ))
        })?;
        info!(
            generation,
            alternatives = available,
            choice = request.route_choice,
            distance_m = chosen.distance_m,
            points = chosen.points.len(),
            "road route"
        );

        observer.on_step(generation, BuildStep::Assemble);
        let route = assemble_route(&mut ctx, &AssemblyInput {
            start:        request.start,
            end:          request.end,
            start_anchor,
            end_anchor,
            primary:      &chosen.points,
        })?;

        // ── Candidate sites ───────────────────────────────────────────────────
        observer.on_step(generation, BuildStep::Topology);
        let by_angle = angle_candidates(&chosen.points, self.config.intersection_angle_deg);
        let polygon = RoutePolygon::new(chosen.points.clone());
        let by_topology: Vec<IntersectionCandidate> =
            match self.call("topology query", self.topology.shared_nodes(&polygon)).await {
                Ok(nodes) => nodes.into_iter().map(IntersectionCandidate::topology).collect(),
                Err(e) => {
                    warn!(generation, error = %e, "topology unavailable, using turn angles only");
                    Vec::new()
                }
            };
        ticket.ensure_current()?;

        let candidate_sites = reduce_intersections(&by_angle, &by_topology);
        debug!(
            generation,
            by_angle = by_angle.len(),
            by_topology = by_topology.len(),
            sites = candidate_sites.len(),
            "candidate sites"
        );

        // ── Elevation ─────────────────────────────────────────────────────────
        observer.on_step(generation, BuildStep::Elevation);
        let raw = self.call("elevation service", self.elevation.elevations(route.points())).await?;
        ticket.ensure_current()?;
        let profile = ElevationProfile::from_raw(&route, &raw)?;

        // ── Network ───────────────────────────────────────────────────────────
        observer.on_step(generation, BuildStep::Synthesize);
        let sites = CandidateSites::new(&candidate_sites);
        let network = self
            .synthesizer
            .synthesize(&route, profile.elevations(), &sites, ctx.access_chamber())?;

        observer.on_step(generation, BuildStep::Project);
        let projection = project_profile(&network, &profile)?;

        ticket.ensure_current()?;
        Ok(BuildOutcome {
            generation,
            route,
            road_distance_m: chosen.distance_m,
            candidate_sites,
            profile,
            network,
            projection,
        })
    }

    /// Await `fut` for at most the configured call timeout.
    async fn call<F, V>(&self, service: &'static str, fut: F) -> PipelineResult<V>
    where
        F: Future<Output = sw_core::SewerResult<V>>,
    {
        let after = self.config.call_timeout();
        match tokio::time::timeout(after, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => Err(e.into()),
            Err(_) => Err(PipelineError::Timeout { service, after }),
        }
    }
}
