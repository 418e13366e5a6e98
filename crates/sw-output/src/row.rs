//! Plain data row types written by output backends.

use sw_synth::{ProfileProjection, SewerNetwork};

/// One chamber of a built network.
#[derive(Debug, Clone, PartialEq)]
pub struct ManholeRow {
    pub generation:          u64,
    pub index:               u32,
    pub kind:                &'static str,
    pub lat:                 f64,
    pub lon:                 f64,
    pub distance_m:          f64,
    pub depth_m:             f64,
    pub surface_elevation_m: f64,
    pub invert_elevation_m:  f64,
    pub label:               String,
}

/// One pipe run between consecutive route points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeRow {
    pub generation:       u64,
    pub index:            u32,
    pub start_lat:        f64,
    pub start_lon:        f64,
    pub end_lat:          f64,
    pub end_lon:          f64,
    pub distance_start_m: f64,
    pub distance_end_m:   f64,
    pub depth_start_m:    f64,
    pub depth_end_m:      f64,
    pub length_m:         f64,
}

/// Which chart series a [`ProfileRow`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileSeries {
    Surface,
    Pipe,
}

impl ProfileSeries {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Surface => "surface",
            Self::Pipe => "pipe",
        }
    }
}

/// One point of the elevation chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileRow {
    pub generation:  u64,
    pub series:      ProfileSeries,
    pub distance_m:  f64,
    pub elevation_m: f64,
}

pub fn manhole_rows(generation: u64, network: &SewerNetwork) -> Vec<ManholeRow> {
    network
        .manholes()
        .iter()
        .enumerate()
        .map(|(i, m)| ManholeRow {
            generation,
            index: i as u32,
            kind: m.kind.as_str(),
            lat: m.position.lat,
            lon: m.position.lon,
            distance_m: m.distance_m,
            depth_m: m.depth_m,
            surface_elevation_m: m.surface_elevation_m,
            invert_elevation_m: m.invert_elevation_m(),
            label: m.label(),
        })
        .collect()
}

pub fn pipe_rows(generation: u64, network: &SewerNetwork) -> Vec<PipeRow> {
    network
        .pipes()
        .iter()
        .enumerate()
        .map(|(i, p)| PipeRow {
            generation,
            index: i as u32,
            start_lat: p.start.lat,
            start_lon: p.start.lon,
            end_lat: p.end.lat,
            end_lon: p.end.lon,
            distance_start_m: p.distance_start_m,
            distance_end_m: p.distance_end_m,
            depth_start_m: p.depth_start_m,
            depth_end_m: p.depth_end_m,
            length_m: p.length_m(),
        })
        .collect()
}

/// Surface points first, then pipe points, each in distance order.
pub fn profile_rows(generation: u64, projection: &ProfileProjection) -> Vec<ProfileRow> {
    let surface = projection.surface.iter().map(|p| (ProfileSeries::Surface, p));
    let pipes = projection.pipes.iter().map(|p| (ProfileSeries::Pipe, p));
    surface
        .chain(pipes)
        .map(|(series, p)| ProfileRow {
            generation,
            series,
            distance_m: p.distance_m,
            elevation_m: p.elevation_m,
        })
        .collect()
}
