//! Per-build mutable state.
//!
//! State that must not outlive one route selection lives in a
//! [`RouteBuildContext`], created fresh for each build and dropped with it.

use sw_core::{GeoPoint, RoadAnchor};

/// The point where the property's access segment joins the road network.
///
/// Recorded once per build by the route assembler and appended to the
/// synthesized network as an extra chamber.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AccessChamber {
    pub location: GeoPoint,
}

/// State owned by exactly one route build.
#[derive(Clone, Debug, Default)]
pub struct RouteBuildContext {
    generation:     u64,
    access_chamber: Option<AccessChamber>,
}

impl RouteBuildContext {
    /// Fresh context for the build identified by `generation`.
    pub fn new(generation: u64) -> Self {
        Self { generation, access_chamber: None }
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Record the first road access of this build.
    ///
    /// Only the first call has an effect; returns `true` if it recorded.
    pub fn record_first_access(&mut self, anchor: RoadAnchor) -> bool {
        if self.access_chamber.is_some() {
            return false;
        }
        self.access_chamber = Some(AccessChamber { location: anchor.to_geo() });
        true
    }

    #[inline]
    pub fn access_chamber(&self) -> Option<AccessChamber> {
        self.access_chamber
    }
}
