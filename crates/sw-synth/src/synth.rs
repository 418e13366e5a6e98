//! Single-pass manhole and pipe synthesis.
//!
//! # Walk
//!
//! ```text
//! pump @ point 0, depth = initial
//! for each step (i-1 → i):
//!   ① acc   += step length
//!   ② depth += step × min_slope − Δsurface        (invert keeps falling)
//!   ③ emit pipe [depth before, depth after]
//!   ④ chamber at i if depth > max, i is a candidate site, or interval due
//!   ⑤ chamber resets depth to max(depth − drop, initial)
//! terminal chamber at the last point if the walk did not place one
//! ```
//!
//! The policy is greedy and local: no backtracking, O(N) in route points.

use sw_core::geodesy::distance;
use sw_core::tolerance::DISTANCE_EPSILON_M;
use sw_core::{RoutePath, SewerConfig, SewerError, SewerResult};
use sw_route::{AccessChamber, CandidateSites};
use tracing::{debug, info, warn};

use crate::{Manhole, ManholeKind, PipeSegment, SewerNetwork};

/// Runs the walk with a fixed [`SewerConfig`].
#[derive(Clone, Debug, Default)]
pub struct NetworkSynthesizer {
    config: SewerConfig,
}

impl NetworkSynthesizer {
    pub fn new(config: SewerConfig) -> SewerResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SewerConfig {
        &self.config
    }

    /// Lay a trunk line along `route`.
    ///
    /// `elevations` holds one surface elevation per route point.  `access`
    /// is the build's recorded road-access chamber, if any.
    pub fn synthesize(
        &self,
        route: &RoutePath,
        elevations: &[f64],
        sites: &CandidateSites,
        access: Option<AccessChamber>,
    ) -> SewerResult<SewerNetwork> {
        let cfg = &self.config;
        let pts = route.points();
        let n = pts.len();

        if elevations.len() != n {
            return Err(SewerError::input(format!(
                "expected {n} elevations, got {}",
                elevations.len()
            )));
        }
        if let Some(i) = elevations.iter().position(|e| !e.is_finite()) {
            return Err(SewerError::degenerate(format!("elevation {i} is not finite")));
        }

        let mut manholes = Vec::with_capacity(n / 4 + 3);
        let mut pipes = Vec::with_capacity(n - 1);
        let mut cumulative = Vec::with_capacity(n);

        let mut depth = cfg.initial_depth_m;
        let mut prev_elevation = elevations[0];
        let mut acc = 0.0_f64;
        let mut next_interval = cfg.manhole_interval_m;
        let mut last_chamber = 0usize;

        manholes.push(Manhole {
            position:            pts[0],
            kind:                ManholeKind::Pump,
            depth_m:             depth,
            surface_elevation_m: elevations[0],
            distance_m:          0.0,
        });
        cumulative.push(acc);

        for i in 1..n {
            let step = distance(pts[i - 1], pts[i]);
            let start_m = acc;
            acc += step;
            cumulative.push(acc);

            let rise = elevations[i] - prev_elevation;
            let fall = step * cfg.min_slope;
            let depth_start = depth;
            depth += fall - rise;

            pipes.push(PipeSegment {
                start:            pts[i - 1],
                end:              pts[i],
                depth_start_m:    depth_start,
                depth_end_m:      depth,
                distance_start_m: start_m,
                distance_end_m:   acc,
            });

            let too_deep = depth > cfg.max_depth_m;
            let at_site = sites.matches(pts[i]);
            let interval_due = acc + DISTANCE_EPSILON_M >= next_interval;

            if too_deep || at_site || interval_due {
                depth = (depth - cfg.manhole_drop_m).max(cfg.initial_depth_m);
                let kind = if at_site || i == n - 1 {
                    ManholeKind::Manhole
                } else {
                    ManholeKind::IntervalManhole
                };
                if depth > cfg.max_depth_m {
                    warn!(index = i, depth, "chamber still exceeds max depth after drop");
                }
                manholes.push(Manhole {
                    position:            pts[i],
                    kind,
                    depth_m:             depth,
                    surface_elevation_m: elevations[i],
                    distance_m:          acc,
                });
                if interval_due {
                    next_interval += cfg.manhole_interval_m;
                }
                last_chamber = i;
            }

            prev_elevation = elevations[i];
        }

        if last_chamber != n - 1 {
            if depth <= 0.0 {
                warn!(depth, "terminal invert is above the surface");
            }
            manholes.push(Manhole {
                position:            pts[n - 1],
                kind:                ManholeKind::Manhole,
                depth_m:             depth,
                surface_elevation_m: elevations[n - 1],
                distance_m:          acc,
            });
        }

        if let Some(chamber) = access {
            self.place_access_chamber(route, elevations, &cumulative, chamber, &mut manholes);
        }

        manholes.sort_by(|a, b| a.distance_m.total_cmp(&b.distance_m));

        let network = SewerNetwork::new(manholes, pipes);
        info!(
            manholes = network.manholes().len(),
            pipes = network.pipes().len(),
            length_m = network.total_length_m(),
            "synthesized sewer network"
        );
        Ok(network)
    }

    /// Append the access chamber unless its route position is already
    /// occupied.  An unmatched chamber falls back to distance 0, where the
    /// pump always sits, so it is never duplicated there.
    fn place_access_chamber(
        &self,
        route: &RoutePath,
        elevations: &[f64],
        cumulative: &[f64],
        chamber: AccessChamber,
        manholes: &mut Vec<Manhole>,
    ) {
        let (distance_m, surface) = match route.position_of_site(chamber.location) {
            Some(i) => (cumulative[i], elevations[i]),
            None => {
                warn!(location = %chamber.location, "access chamber not on route, using distance 0");
                (0.0, elevations[0])
            }
        };

        if manholes
            .iter()
            .any(|m| (m.distance_m - distance_m).abs() <= DISTANCE_EPSILON_M)
        {
            debug!(distance_m, "access chamber coincides with an existing chamber");
            return;
        }

        manholes.push(Manhole {
            position:            chamber.location,
            kind:                ManholeKind::Manhole,
            depth_m:             self.config.initial_depth_m,
            surface_elevation_m: surface,
            distance_m,
        });
    }
}

/// [`NetworkSynthesizer::synthesize`] with the default parameters.
pub fn calculate_manholes_and_pipes(
    route: &RoutePath,
    elevations: &[f64],
    sites: &CandidateSites,
    access: Option<AccessChamber>,
) -> SewerResult<SewerNetwork> {
    NetworkSynthesizer::default().synthesize(route, elevations, sites, access)
}
