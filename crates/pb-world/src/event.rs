//! Events the world reports to observers.

use pb_core::{AgentId, Position, Tick};
use pb_motion::{MoveEnd, RejectReason};

/// Something that happened to one pilot during one tick.
///
/// Within a tick, events are reported in ascending `AgentId` order, and for
/// a single pilot in the order they occurred (reset, move end, then input).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WorldEvent {
    /// The energy-reset broadcast reached the pilot.
    EnergyReset {
        agent:  AgentId,
        tick:   Tick,
        energy: f32,
    },

    /// The pilot's move finished.
    MoveEnded {
        agent: AgentId,
        tick:  Tick,
        end:   MoveEnd,
    },

    /// A click started a move.
    Committed {
        agent:             AgentId,
        tick:              Tick,
        destination:       Position,
        residual:          f32,
        reached_full_path: bool,
    },

    /// A click was refused.
    Rejected {
        agent:  AgentId,
        tick:   Tick,
        target: Position,
        reason: RejectReason,
    },
}

impl WorldEvent {
    pub fn agent(&self) -> AgentId {
        match *self {
            WorldEvent::EnergyReset { agent, .. }
            | WorldEvent::MoveEnded { agent, .. }
            | WorldEvent::Committed { agent, .. }
            | WorldEvent::Rejected { agent, .. } => agent,
        }
    }

    pub fn tick(&self) -> Tick {
        match *self {
            WorldEvent::EnergyReset { tick, .. }
            | WorldEvent::MoveEnded { tick, .. }
            | WorldEvent::Committed { tick, .. }
            | WorldEvent::Rejected { tick, .. } => tick,
        }
    }
}
