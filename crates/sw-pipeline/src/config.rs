//! Pipeline configuration.

use std::time::Duration;

use sw_core::tolerance::INTERSECTION_ANGLE_DEG;
use sw_core::{SewerConfig, SewerError};

use crate::PipelineResult;

/// Knobs for one [`BuildPipeline`](crate::BuildPipeline).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PipelineConfig {
    /// Upper bound for each collaborator call, milliseconds.
    pub call_timeout_ms: u64,

    /// Maximum number of memoised elevation lookups.
    pub elevation_cache_capacity: usize,

    /// Interior route points bending more sharply than this become
    /// candidate manhole sites, degrees.
    pub intersection_angle_deg: f64,

    pub sewer: SewerConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            call_timeout_ms:          10_000,
            elevation_cache_capacity: 4096,
            intersection_angle_deg:   INTERSECTION_ANGLE_DEG,
            sewer:                    SewerConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.call_timeout_ms == 0 {
            return Err(SewerError::Config("call_timeout_ms must be positive".into()).into());
        }
        if !(self.intersection_angle_deg > 0.0 && self.intersection_angle_deg <= 180.0) {
            return Err(SewerError::Config(format!(
                "intersection_angle_deg must be in (0, 180], got {}",
                self.intersection_angle_deg
            ))
            .into());
        }
        self.sewer.validate()?;
        Ok(())
    }
}
