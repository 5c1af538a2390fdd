//! `pb-output`: trace writers for pathbudget worlds.
//!
//! | Backend | Files created                                  |
//! |---------|------------------------------------------------|
//! | CSV     | `pilot_snapshots.csv`, `tick_summaries.csv`    |
//!
//! Backends implement [`OutputWriter`] and are driven by [`TraceObserver`],
//! which implements `pb_world::WorldObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pb_output::{CsvWriter, TraceObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = TraceObserver::new(writer, &config);
//! world.run(&mut obs)?;
//! if let Some(e) = obs.take_error() {
//!     log::error!("output error: {e}");
//! }
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
pub use observer::TraceObserver;
pub use row::{PilotSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;
