//! Output types of the synthesizer.

use std::fmt;

use sw_core::GeoPoint;

// ── Manholes ──────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ManholeKind {
    /// Lift station at the head of the line.  Exactly one per network.
    Pump,
    /// Chamber at a road crossing, the access point, or the end of the line.
    Manhole,
    /// Chamber placed by the depth limit or the spacing rule.
    IntervalManhole,
}

impl ManholeKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ManholeKind::Pump => "pump",
            ManholeKind::Manhole => "manhole",
            ManholeKind::IntervalManhole => "interval_manhole",
        }
    }
}

impl fmt::Display for ManholeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Manhole {
    pub position:            GeoPoint,
    pub kind:                ManholeKind,
    /// Invert depth below the surface, metres.
    pub depth_m:             f64,
    pub surface_elevation_m: f64,
    /// Distance from the pump along the route, metres.
    pub distance_m:          f64,
}

impl Manhole {
    /// Absolute elevation of the pipe invert at this chamber.
    #[inline]
    pub fn invert_elevation_m(&self) -> f64 {
        self.surface_elevation_m - self.depth_m
    }

    /// Short map-popup label, e.g. `Pump: depth 1.50 m`.
    pub fn label(&self) -> String {
        let name = match self.kind {
            ManholeKind::Pump => "Pump",
            ManholeKind::Manhole | ManholeKind::IntervalManhole => "Manhole",
        };
        format!("{name}: depth {:.2} m", self.depth_m)
    }
}

// ── Pipes ─────────────────────────────────────────────────────────────────────

/// One straight pipe run between consecutive route points.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PipeSegment {
    pub start:            GeoPoint,
    pub end:              GeoPoint,
    pub depth_start_m:    f64,
    pub depth_end_m:      f64,
    pub distance_start_m: f64,
    pub distance_end_m:   f64,
}

impl PipeSegment {
    #[inline]
    pub fn length_m(&self) -> f64 {
        self.distance_end_m - self.distance_start_m
    }
}

// ── SewerNetwork ──────────────────────────────────────────────────────────────

/// A synthesized trunk line.  Immutable once built.
///
/// # Invariants
///
/// - `manholes` sorted by `distance_m`, no two at the same distance
/// - `manholes[0]` is the pump at distance `0`
/// - a manhole sits at the route's last point
/// - `pipes.len() == route points − 1`, pipes contiguous in walk order
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SewerNetwork {
    manholes: Vec<Manhole>,
    pipes:    Vec<PipeSegment>,
}

impl SewerNetwork {
    pub(crate) fn new(manholes: Vec<Manhole>, pipes: Vec<PipeSegment>) -> Self {
        Self { manholes, pipes }
    }

    #[inline]
    pub fn manholes(&self) -> &[Manhole] {
        &self.manholes
    }

    #[inline]
    pub fn pipes(&self) -> &[PipeSegment] {
        &self.pipes
    }

    pub fn pump(&self) -> &Manhole {
        &self.manholes[0]
    }

    /// The chamber furthest along the route.
    pub fn terminal(&self) -> &Manhole {
        &self.manholes[self.manholes.len() - 1]
    }

    /// Route length covered by the pipes, metres.
    pub fn total_length_m(&self) -> f64 {
        self.pipes.last().map_or(0.0, |p| p.distance_end_m)
    }

    pub fn count(&self, kind: ManholeKind) -> usize {
        self.manholes.iter().filter(|m| m.kind == kind).count()
    }

    /// Deepest invert anywhere on the line (pipe ends and chambers).
    pub fn max_depth_m(&self) -> f64 {
        self.pipes
            .iter()
            .flat_map(|p| [p.depth_start_m, p.depth_end_m])
            .chain(self.manholes.iter().map(|m| m.depth_m))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// `true` if every pipe ends exactly where the next one starts.
    pub fn is_contiguous(&self) -> bool {
        self.pipes.windows(2).all(|w| {
            w[0].end == w[1].start && w[0].distance_end_m == w[1].distance_start_m
        })
    }
}
