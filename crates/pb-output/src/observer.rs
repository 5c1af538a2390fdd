//! `TraceObserver<W>`: bridges `WorldObserver` to an `OutputWriter`.

use pb_core::{SimClock, Tick, WorldConfig};
use pb_world::{Pilot, WorldEvent, WorldObserver};

use crate::row::{PilotSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`WorldObserver`] that writes pilot snapshots and tick summaries to any
/// [`OutputWriter`].
///
/// Errors from the writer are stored internally because `WorldObserver`
/// methods have no return value.  After `world.run()` returns, check for
/// errors with [`take_error`][Self::take_error].
pub struct TraceObserver<W: OutputWriter> {
    writer:       W,
    clock:        SimClock,
    tick_commits: u64,
    last_error:   Option<OutputError>,
}

impl<W: OutputWriter> TraceObserver<W> {
    /// Create an observer backed by `writer`, using `config` for elapsed
    /// time conversion.
    pub fn new(writer: W, config: &WorldConfig) -> Self {
        Self {
            writer,
            clock:        config.make_clock(),
            tick_commits: 0,
            last_error:   None,
        }
    }

    /// Take the stored write error (if any) after `world.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  `run` does this on its own; call it after driving
    /// the world with `run_ticks`.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> WorldObserver for TraceObserver<W> {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.tick_commits = 0;
    }

    fn on_event(&mut self, event: &WorldEvent) {
        if matches!(event, WorldEvent::Committed { .. }) {
            self.tick_commits += 1;
        }
    }

    fn on_tick_end(&mut self, tick: Tick, moving: usize) {
        let row = TickSummaryRow {
            tick:          tick.0,
            elapsed_ms:    self.clock.ms_at(tick),
            moving_agents: moving as u64,
            commits:       self.tick_commits,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, pilots: &[Pilot]) {
        let rows: Vec<PilotSnapshotRow> = pilots
            .iter()
            .map(|pilot| {
                let pos = pilot.position();
                PilotSnapshotRow {
                    agent_id:         pilot.id.0,
                    tick:             tick.0,
                    x:                pos.x,
                    y:                pos.y,
                    z:                pos.z,
                    moving:           pilot.planner.state().is_moving(),
                    current_energy:   pilot.planner.current_energy(),
                    predicted_energy: pilot.planner.predicted_energy(),
                    max_energy:       pilot.planner.max_energy(),
                }
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_snapshots(&rows);
            self.store_err(result);
        }
    }

    fn on_world_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
