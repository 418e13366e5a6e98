//! corridor — offline sewer trunk-line layout over a JSON scenario.
//!
//! Roads, surveyed elevations and build requests come from the scenario
//! file.  Every request runs through the full build pipeline against
//! in-memory collaborators; completed builds are written as CSV and one SVG
//! elevation profile per build.

mod chart;
mod scenario;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use sw_output::{CsvWriter, OutputObserver};
use sw_pipeline::{
    BuildObserver, BuildOutcome, BuildPipeline, BuildStep, PipelineError, SampledElevation,
    TracingObserver, WayTopology,
};
use sw_route::{RoadGraphBuilder, SegmentSnapper};
use sw_synth::ProfileProjection;

use scenario::Scenario;

#[derive(Parser, Debug)]
#[command(version, about = "Lay out a sewer trunk line along roads from a JSON scenario")]
struct Args {
    #[arg(short, long, default_value = "demos/corridor/scenario.json")]
    scenario: PathBuf,
    #[arg(short, long, default_value = "output/corridor")]
    output_dir: PathBuf,
    #[arg(long, help = "Override every request's router alternative")]
    route_choice: Option<usize>,
}

// ── Observer wrapper ──────────────────────────────────────────────────────────

/// Logs progress, writes CSV, and keeps each projection for charting.
struct DemoObserver {
    log:         TracingObserver,
    output:      OutputObserver<CsvWriter>,
    projections: Vec<(u64, ProfileProjection)>,
}

impl BuildObserver for DemoObserver {
    fn on_build_start(&mut self, generation: u64, start: sw_core::GeoPoint, end: sw_core::GeoPoint) {
        self.log.on_build_start(generation, start, end);
    }

    fn on_step(&mut self, generation: u64, step: BuildStep) {
        self.log.on_step(generation, step);
    }

    fn on_build_complete(&mut self, outcome: &BuildOutcome) {
        self.log.on_build_complete(outcome);
        self.output.on_build_complete(outcome);
        self.projections.push((outcome.generation, outcome.projection.clone()));
    }

    fn on_build_failed(&mut self, generation: u64, error: &PipelineError) {
        self.log.on_build_failed(generation, error);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let scenario = Scenario::load(&args.scenario)?;
    println!("=== corridor — sewer trunk-line layout ===");
    println!(
        "Roads: {}  |  Elevation samples: {}  |  Requests: {}",
        scenario.roads.len(),
        scenario.elevation_samples.len(),
        scenario.requests.len()
    );

    // 1. In-memory collaborators.
    let snapper = SegmentSnapper::new(scenario.roads.iter().map(Vec::as_slice));
    let mut graph = RoadGraphBuilder::new();
    for road in &scenario.roads {
        graph.add_road(road);
    }
    let graph = graph.build();
    println!("Road graph: {} nodes, {} edges", graph.node_count(), graph.edge_count());
    let topology = WayTopology::new(scenario.roads.clone());
    let elevation = SampledElevation::new(
        scenario.elevation_samples.iter().map(|s| (s.point, s.elevation_m)),
        scenario.sample_radius_m,
    );

    // 2. Pipeline and output.
    let pipeline = BuildPipeline::new(snapper, graph, topology, elevation, scenario.config.clone())?;
    let mut obs = DemoObserver {
        log:         TracingObserver,
        output:      OutputObserver::new(CsvWriter::new(&args.output_dir)?),
        projections: Vec::new(),
    };

    // 3. Builds.  A failed build is reported and the next one still runs.
    let t0 = Instant::now();
    for (i, request) in scenario.requests.iter().enumerate() {
        let request = match args.route_choice {
            Some(choice) => request.with_route_choice(choice),
            None => *request,
        };
        match pipeline.build(request, &mut obs).await {
            Ok(outcome) => print_summary(i, &outcome),
            Err(e) => eprintln!("request {i}: {e}"),
        }
    }
    let elapsed = t0.elapsed();

    // 4. Charts and CSV.
    for (generation, projection) in &obs.projections {
        let path = args.output_dir.join(format!("profile_{generation}.svg"));
        chart::render_profile(projection, &format!("Build {generation}: elevation profile"), &path)?;
        println!("Profile chart: {}", path.display());
    }
    let written = obs.output.written();
    obs.output.finish()?;

    let cache = pipeline.elevation_cache();
    println!();
    println!("Builds written: {written} in {:.3} s", elapsed.as_secs_f64());
    println!("Elevation cache: {} hits, {} misses", cache.hits(), cache.misses());
    println!("CSV output: {}", args.output_dir.display());
    Ok(())
}

fn print_summary(index: usize, outcome: &BuildOutcome) {
    let net = &outcome.network;
    println!();
    println!(
        "Request {index} (build {}): {} route points, {:.1} m of pipe, {} chambers, router {:.1} m",
        outcome.generation,
        outcome.route.len(),
        net.total_length_m(),
        net.manholes().len(),
        outcome.road_distance_m,
    );
    println!("{:<18} {:>10} {:>9} {:>10}", "Kind", "Dist (m)", "Depth", "Invert");
    println!("{}", "-".repeat(50));
    for m in net.manholes() {
        println!(
            "{:<18} {:>10.1} {:>9.2} {:>10.2}",
            m.kind.as_str(),
            m.distance_m,
            m.depth_m,
            m.invert_elevation_m()
        );
    }
}
