//! Engineering parameters for the trunk line.
//!
//! The defaults are the fixed design values: 1.5 m cover at the pump, 3.0 m
//! maximum invert depth, 4 ‰ minimum slope, and an access manhole at least
//! every 100 m.

use crate::{SewerError, SewerResult};

/// Parameters consumed by the network synthesizer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SewerConfig {
    /// Invert depth at the pump and the floor for every reset, metres.
    pub initial_depth_m: f64,

    /// Depth above which a manhole is forced, metres.
    pub max_depth_m: f64,

    /// Minimum fall per metre of horizontal run (0.004 = 4 ‰).
    pub min_slope: f64,

    /// Maximum spacing between access manholes, metres.
    pub manhole_interval_m: f64,

    /// Depth recovered by the drop structure at each manhole, metres.
    pub manhole_drop_m: f64,
}

impl SewerConfig {
    pub const INITIAL_DEPTH_M: f64 = 1.5;
    pub const MAX_DEPTH_M: f64 = 3.0;
    pub const MIN_SLOPE: f64 = 4.0 / 1000.0;
    pub const MANHOLE_INTERVAL_M: f64 = 100.0;
    pub const MANHOLE_DROP_M: f64 = 1.5;

    /// Reject parameter sets the synthesizer cannot honour.
    pub fn validate(&self) -> SewerResult<()> {
        let positive = [
            ("initial_depth_m", self.initial_depth_m),
            ("max_depth_m", self.max_depth_m),
            ("manhole_interval_m", self.manhole_interval_m),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(SewerError::Config(format!("{name} must be positive, got {v}")));
            }
        }
        if !(self.min_slope.is_finite() && self.min_slope >= 0.0) {
            return Err(SewerError::Config(format!(
                "min_slope must be non-negative, got {}",
                self.min_slope
            )));
        }
        if !(self.manhole_drop_m.is_finite() && self.manhole_drop_m >= 0.0) {
            return Err(SewerError::Config(format!(
                "manhole_drop_m must be non-negative, got {}",
                self.manhole_drop_m
            )));
        }
        if self.initial_depth_m > self.max_depth_m {
            return Err(SewerError::Config(format!(
                "initial_depth_m ({}) exceeds max_depth_m ({})",
                self.initial_depth_m, self.max_depth_m
            )));
        }
        Ok(())
    }
}

impl Default for SewerConfig {
    fn default() -> Self {
        Self {
            initial_depth_m:    Self::INITIAL_DEPTH_M,
            max_depth_m:        Self::MAX_DEPTH_M,
            min_slope:          Self::MIN_SLOPE,
            manhole_interval_m: Self::MANHOLE_INTERVAL_M,
            manhole_drop_m:     Self::MANHOLE_DROP_M,
        }
    }
}
