//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `manholes.csv`
//! - `pipes.csv`
//! - `profile.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{ManholeRow, OutputResult, PipeRow, ProfileRow};

/// Writes network output to three CSV files.
pub struct CsvWriter {
    manholes: Writer<File>,
    pipes:    Writer<File>,
    profile:  Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the three CSV files and write the
    /// header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut manholes = Writer::from_path(dir.join("manholes.csv"))?;
        manholes.write_record([
            "generation",
            "index",
            "kind",
            "lat",
            "lon",
            "distance_m",
            "depth_m",
            "surface_elevation_m",
            "invert_elevation_m",
            "label",
        ])?;

        let mut pipes = Writer::from_path(dir.join("pipes.csv"))?;
        pipes.write_record([
            "generation",
            "index",
            "start_lat",
            "start_lon",
            "end_lat",
            "end_lon",
            "distance_start_m",
            "distance_end_m",
            "depth_start_m",
            "depth_end_m",
            "length_m",
        ])?;

        let mut profile = Writer::from_path(dir.join("profile.csv"))?;
        profile.write_record(["generation", "series", "distance_m", "elevation_m"])?;

        Ok(Self { manholes, pipes, profile, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_manholes(&mut self, rows: &[ManholeRow]) -> OutputResult<()> {
        for row in rows {
            self.manholes.write_record(&[
                row.generation.to_string(),
                row.index.to_string(),
                row.kind.to_owned(),
                format!("{:.7}", row.lat),
                format!("{:.7}", row.lon),
                format!("{:.3}", row.distance_m),
                format!("{:.3}", row.depth_m),
                format!("{:.3}", row.surface_elevation_m),
                format!("{:.3}", row.invert_elevation_m),
                row.label.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_pipes(&mut self, rows: &[PipeRow]) -> OutputResult<()> {
        for row in rows {
            self.pipes.write_record(&[
                row.generation.to_string(),
                row.index.to_string(),
                format!("{:.7}", row.start_lat),
                format!("{:.7}", row.start_lon),
                format!("{:.7}", row.end_lat),
                format!("{:.7}", row.end_lon),
                format!("{:.3}", row.distance_start_m),
                format!("{:.3}", row.distance_end_m),
                format!("{:.3}", row.depth_start_m),
                format!("{:.3}", row.depth_end_m),
                format!("{:.3}", row.length_m),
            ])?;
        }
        Ok(())
    }

    fn write_profile(&mut self, rows: &[ProfileRow]) -> OutputResult<()> {
        for row in rows {
            self.profile.write_record(&[
                row.generation.to_string(),
                row.series.as_str().to_owned(),
                format!("{:.3}", row.distance_m),
                format!("{:.3}", row.elevation_m),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.manholes.flush()?;
        self.pipes.flush()?;
        self.profile.flush()?;
        Ok(())
    }
}
