//! Elevation profile chart: ground line, pipe invert, chambers.

use std::path::Path;

use anyhow::Result;
use plotters::prelude::*;
use sw_synth::{ManholeKind, ProfileProjection};

pub fn render_profile(projection: &ProfileProjection, title: &str, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, (1000, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let (x0, x1) = projection.x_range();
    let (y0, y1) = projection.y_range();

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x0..x1.max(x0 + 1.0), y0..y1)?;

    chart
        .configure_mesh()
        .x_desc("Distance (m)")
        .y_desc("Elevation (m)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            projection.surface.iter().map(|p| (p.distance_m, p.elevation_m)),
            GREEN.stroke_width(2),
        ))?
        .label("Ground")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], GREEN));

    chart
        .draw_series(LineSeries::new(
            projection.pipes.iter().map(|p| (p.distance_m, p.elevation_m)),
            BLUE.stroke_width(2),
        ))?
        .label("Pipe invert")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 10, y)], BLUE));

    for (kind, color) in [
        (ManholeKind::Pump, RED),
        (ManholeKind::Manhole, BLACK),
        (ManholeKind::IntervalManhole, MAGENTA),
    ] {
        let points = projection
            .manholes
            .iter()
            .filter(|m| m.kind == kind)
            .map(|m| (m.at.distance_m, m.at.elevation_m));
        chart
            .draw_series(PointSeries::of_element(points, 4, color, &|c, s, st| {
                EmptyElement::at(c) + Circle::new((0, 0), s, st.filled())
            }))?
            .label(kind.as_str())
            .legend(move |(x, y)| Circle::new((x + 5, y), 4, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
