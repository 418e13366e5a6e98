//! Build observer trait for progress reporting.

use sw_core::GeoPoint;
use tracing::{debug, info, warn};

use crate::{BuildOutcome, PipelineError};

/// Steps of one build, in execution order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuildStep {
    SnapStart,
    SnapEnd,
    Route,
    Assemble,
    Topology,
    Elevation,
    Synthesize,
    Project,
}

impl BuildStep {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SnapStart => "snap_start",
            Self::SnapEnd => "snap_end",
            Self::Route => "route",
            Self::Assemble => "assemble",
            Self::Topology => "topology",
            Self::Elevation => "elevation",
            Self::Synthesize => "synthesize",
            Self::Project => "project",
        }
    }
}

/// Callbacks invoked by [`BuildPipeline::build`][crate::BuildPipeline::build].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Exactly one of `on_build_complete` and
/// `on_build_failed` is called per build.
pub trait BuildObserver {
    fn on_build_start(&mut self, _generation: u64, _start: GeoPoint, _end: GeoPoint) {}

    /// Called before each step begins.
    fn on_step(&mut self, _generation: u64, _step: BuildStep) {}

    fn on_build_complete(&mut self, _outcome: &BuildOutcome) {}

    fn on_build_failed(&mut self, _generation: u64, _error: &PipelineError) {}
}

/// A [`BuildObserver`] that does nothing.
pub struct NoopObserver;

impl BuildObserver for NoopObserver {}

/// Reports build progress through `tracing`.
pub struct TracingObserver;

impl BuildObserver for TracingObserver {
    fn on_build_start(&mut self, generation: u64, start: GeoPoint, end: GeoPoint) {
        info!(generation, %start, %end, "build started");
    }

    fn on_step(&mut self, generation: u64, step: BuildStep) {
        debug!(generation, step = step.as_str(), "build step");
    }

    fn on_build_complete(&mut self, outcome: &BuildOutcome) {
        info!(
            generation = outcome.generation,
            route_points = outcome.route.len(),
            manholes = outcome.network.manholes().len(),
            length_m = outcome.network.total_length_m(),
            "build complete"
        );
    }

    fn on_build_failed(&mut self, generation: u64, error: &PipelineError) {
        match error {
            PipelineError::Superseded { .. } => info!(generation, %error, "build discarded"),
            _ => warn!(generation, %error, "build failed"),
        }
    }
}
