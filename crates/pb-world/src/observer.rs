//! World observer trait for progress reporting and data collection.

use pb_core::Tick;
use pb_motion::RejectReason;

use crate::{Pilot, WorldEvent};

/// Callbacks invoked by [`World::run`][crate::World::run] at key points in
/// the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: arrival counter
///
/// ```rust,ignore
/// struct Arrivals(usize);
///
/// impl WorldObserver for Arrivals {
///     fn on_event(&mut self, event: &WorldEvent) {
///         if matches!(event, WorldEvent::MoveEnded { .. }) {
///             self.0 += 1;
///         }
///     }
/// }
/// ```
pub trait WorldObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per event, in ascending agent order.
    fn on_event(&mut self, _event: &WorldEvent) {}

    /// Called at the end of each tick.  `moving` is the number of pilots
    /// with a move in progress after the tick.
    fn on_tick_end(&mut self, _tick: Tick, _moving: usize) {}

    /// Called every `config.output_interval_ticks` ticks with read-only
    /// access to every pilot.
    fn on_snapshot(&mut self, _tick: Tick, _pilots: &[Pilot]) {}

    /// Called once after the final tick of [`World::run`][crate::World::run].
    fn on_world_end(&mut self, _final_tick: Tick) {}
}

/// A [`WorldObserver`] that does nothing.
pub struct NoopObserver;

impl WorldObserver for NoopObserver {}

/// Reports events through the `log` facade.
///
/// Commits, move ends and resets go to `info`; rejected clicks to `trace`,
/// except unreachable targets which go to `debug`.
#[derive(Debug, Default)]
pub struct LogObserver {
    events: u64,
}

impl LogObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events seen so far.
    pub fn event_count(&self) -> u64 {
        self.events
    }
}

impl WorldObserver for LogObserver {
    fn on_event(&mut self, event: &WorldEvent) {
        self.events += 1;
        match *event {
            WorldEvent::EnergyReset { agent, tick, energy } => {
                log::info!("{tick} {agent}: energy reset to {energy:.3}");
            }
            WorldEvent::MoveEnded { agent, tick, end } => {
                log::info!(
                    "{tick} {agent}: move to {} ended ({:?}, started {})",
                    end.destination, end.reason, end.started
                );
            }
            WorldEvent::Committed { agent, tick, destination, residual, reached_full_path } => {
                log::info!(
                    "{tick} {agent}: moving to {destination}, residual {residual:.3}{}",
                    if reached_full_path { "" } else { " (truncated)" }
                );
            }
            WorldEvent::Rejected { agent, tick, target, reason: RejectReason::NoPath } => {
                log::debug!("{tick} {agent}: no path to {target}");
            }
            WorldEvent::Rejected { agent, tick, target, reason } => {
                log::trace!("{tick} {agent}: click on {target} ignored ({reason:?})");
            }
        }
    }

    fn on_tick_end(&mut self, tick: Tick, moving: usize) {
        log::trace!("{tick} done, {moving} moving");
    }

    fn on_world_end(&mut self, final_tick: Tick) {
        log::info!("world finished at {final_tick} after {} events", self.events);
    }
}
