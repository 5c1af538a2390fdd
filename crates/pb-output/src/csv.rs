//! CSV backend: `pilot_snapshots.csv` and `tick_summaries.csv` in one
//! directory.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::writer::OutputWriter;
use crate::{OutputResult, PilotSnapshotRow, TickSummaryRow};

pub const SNAPSHOT_FILE: &str = "pilot_snapshots.csv";
pub const SUMMARY_FILE: &str = "tick_summaries.csv";

pub const SNAPSHOT_HEADER: [&str; 9] = [
    "agent_id",
    "tick",
    "x",
    "y",
    "z",
    "moving",
    "current_energy",
    "predicted_energy",
    "max_energy",
];

pub const SUMMARY_HEADER: [&str; 4] = ["tick", "elapsed_ms", "moving_agents", "commits"];

/// A CSV file whose header is written on open, so it exists even when no
/// rows follow.
struct Table(csv::Writer<File>);

impl Table {
    fn create(path: &Path, header: &[&str]) -> OutputResult<Self> {
        let mut w = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
        w.write_record(header)?;
        Ok(Table(w))
    }

    fn append<R: Serialize>(&mut self, row: &R) -> OutputResult<()> {
        self.0.serialize(row)?;
        Ok(())
    }

    fn flush(&mut self) -> OutputResult<()> {
        self.0.flush()?;
        Ok(())
    }
}

/// Writes snapshots and tick summaries as CSV.
pub struct CsvWriter {
    snapshots: Table,
    summaries: Table,
    closed:    bool,
}

impl CsvWriter {
    /// Create `dir` if missing and truncate both files to their headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            snapshots: Table::create(&dir.join(SNAPSHOT_FILE), &SNAPSHOT_HEADER)?,
            summaries: Table::create(&dir.join(SUMMARY_FILE), &SUMMARY_HEADER)?,
            closed:    false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[PilotSnapshotRow]) -> OutputResult<()> {
        rows.iter().try_for_each(|row| self.snapshots.append(row))
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.append(row)
    }

    fn finish(&mut self) -> OutputResult<()> {
        if !self.closed {
            self.closed = true;
            self.snapshots.flush()?;
            self.summaries.flush()?;
        }
        Ok(())
    }
}
