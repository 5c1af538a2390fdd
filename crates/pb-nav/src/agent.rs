//! Navigation control: the `NavAgent` trait and a kinematic reference body.

use std::collections::VecDeque;

use pb_core::Position;

use crate::{NavError, NavQuery, NavResult};

// ── NavAgent trait ────────────────────────────────────────────────────────────

/// The path-following body the movement core steers.
///
/// This mirrors what an engine's navigation agent exposes: a destination
/// setter plus the status flags the movement state machine polls every tick
/// to decide when a move has finished.
pub trait NavAgent {
    /// Current world position.
    fn position(&self) -> Position;

    /// Start travelling towards `destination`.  Path computation may be
    /// deferred; until it completes [`is_path_pending`](Self::is_path_pending)
    /// reports `true`.
    fn set_destination(&mut self, destination: Position);

    /// `true` while a requested path is still being computed.
    fn is_path_pending(&self) -> bool;

    /// `true` while the agent holds a path it has not finished following.
    fn has_path(&self) -> bool;

    /// `true` while traversal is halted: before a freshly requested move has
    /// started, or after the host stopped the agent.
    fn is_traversal_halted(&self) -> bool;
}

// ── KinematicAgent ────────────────────────────────────────────────────────────

/// Moves at a constant `speed` (world units per tick) along polylines
/// obtained from a [`NavQuery`].
///
/// Lifecycle of one move:
///
/// 1. `set_destination` records the target; the agent is path-pending and
///    halted.
/// 2. The next [`step`](Self::step) resolves the path and releases the halt
///    without moving.
/// 3. Following steps advance along the path; reaching its end clears it.
///
/// [`stop`](Self::stop) halts the agent mid-path, as a host would when it
/// takes control away from navigation.
#[derive(Debug, Clone)]
pub struct KinematicAgent {
    position: Position,
    speed:    f32,
    pending:  Option<Position>,
    route:    VecDeque<Position>,
    halted:   bool,
    stopped:  bool,
    /// Total distance travelled since construction.
    odometer: f32,
}

impl KinematicAgent {
    pub fn new(position: Position, speed: f32) -> NavResult<Self> {
        if !(speed.is_finite() && speed > 0.0) {
            return Err(NavError::InvalidSpeed(speed));
        }
        if !position.is_finite() {
            return Err(NavError::NonFinite(position));
        }
        Ok(Self {
            position,
            speed,
            pending:  None,
            route:    VecDeque::new(),
            halted:   false,
            stopped:  false,
            odometer: 0.0,
        })
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn odometer(&self) -> f32 {
        self.odometer
    }

    /// Remaining corners of the path currently being followed.
    pub fn remaining_route(&self) -> impl Iterator<Item = &Position> {
        self.route.iter()
    }

    /// Final point of the active (or pending) move, if any.
    pub fn destination(&self) -> Option<Position> {
        self.pending.or_else(|| self.route.back().copied())
    }

    /// Halt traversal in place.  The path is kept.
    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Undo [`stop`](Self::stop).
    pub fn resume(&mut self) {
        self.stopped = false;
    }

    /// Advance one tick.
    pub fn step<Q: NavQuery + ?Sized>(&mut self, nav: &Q) {
        if let Some(dest) = self.pending.take() {
            let path = nav.find_path(self.position, dest);
            // The first corner is where we stand.
            self.route = path.into_iter().skip(1).collect();
            self.halted = false;
            if self.route.is_empty() {
                log::debug!("kinematic agent at {} found no path to {dest}", self.position);
            }
            return;
        }
        if self.halted || self.stopped {
            return;
        }

        let mut budget = self.speed;
        while budget > 0.0 {
            let Some(&corner) = self.route.front() else { break };
            let next = self.position.step_towards(corner, budget);
            let moved = self.position.distance(next);
            budget -= moved;
            self.odometer += moved;
            self.position = next;
            if next == corner {
                self.route.pop_front();
            } else {
                break;
            }
        }
    }
}

impl NavAgent for KinematicAgent {
    fn position(&self) -> Position {
        self.position
    }

    fn set_destination(&mut self, destination: Position) {
        self.pending = Some(destination);
        self.route.clear();
        self.halted = true;
    }

    fn is_path_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn has_path(&self) -> bool {
        !self.route.is_empty()
    }

    fn is_traversal_halted(&self) -> bool {
        self.halted || self.stopped
    }
}
