//! JSON scenario: road geometry, surveyed elevations and build requests.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use sw_core::GeoPoint;
use sw_pipeline::{BuildRequest, PipelineConfig};

#[derive(Debug, Deserialize)]
pub struct ElevationSample {
    pub point:       GeoPoint,
    pub elevation_m: f64,
}

#[derive(Debug, Deserialize)]
pub struct Scenario {
    /// Road polylines; also the ways of the topology query.
    pub roads:             Vec<Vec<GeoPoint>>,
    pub elevation_samples: Vec<ElevationSample>,
    #[serde(default = "default_sample_radius")]
    pub sample_radius_m:   f64,
    pub requests:          Vec<BuildRequest>,
    #[serde(default)]
    pub config:            PipelineConfig,
}

fn default_sample_radius() -> f64 {
    30.0
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("opening scenario {}", path.display()))?;
        let scenario: Scenario = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing scenario {}", path.display()))?;
        if scenario.roads.is_empty() {
            bail!("scenario has no roads");
        }
        if scenario.requests.is_empty() {
            bail!("scenario has no build requests");
        }
        Ok(scenario)
    }
}
