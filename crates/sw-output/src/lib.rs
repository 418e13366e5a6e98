//! `sw-output` — output writers for built sewer networks.
//!
//! | Backend | Files created                                  |
//! |---------|------------------------------------------------|
//! | CSV     | `manholes.csv`, `pipes.csv`, `profile.csv`     |
//!
//! Backends implement [`OutputWriter`] and are driven by [`OutputObserver`],
//! which implements `sw_pipeline::BuildObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sw_output::{CsvWriter, OutputObserver};
//!
//! let mut obs = OutputObserver::new(CsvWriter::new(Path::new("./output"))?);
//! pipeline.build(request, &mut obs).await?;
//! obs.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::OutputObserver;
pub use row::{ManholeRow, PipeRow, ProfileRow, ProfileSeries, manhole_rows, pipe_rows, profile_rows};
pub use writer::OutputWriter;
