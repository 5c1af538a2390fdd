//! A pilot: one agent as the world hosts it.

use pb_core::{AgentId, Position};
use pb_motion::{GhostPreview, MovementPlanner};
use pb_nav::{KinematicAgent, NavAgent};

/// Bundles an agent's movement planner with the navigation body it steers
/// and the preview a renderer would draw.
///
/// The world owns every pilot and hands out `&mut Pilot` to one worker at a
/// time, so a planner never has more than one writer.
#[derive(Debug)]
pub struct Pilot {
    pub id:      AgentId,
    pub planner: MovementPlanner,
    pub body:    KinematicAgent,
    pub preview: GhostPreview,
}

impl Pilot {
    #[inline]
    pub fn position(&self) -> Position {
        self.body.position()
    }

    /// Read-only summary handed to pointer controllers.
    pub fn view(&self) -> PilotView {
        PilotView {
            agent:            self.id,
            position:         self.body.position(),
            current_energy:   self.planner.current_energy(),
            predicted_energy: self.planner.predicted_energy(),
            max_energy:       self.planner.max_energy(),
            moving:           self.planner.state().is_moving(),
            can_act:          self.planner.can_act(),
        }
    }
}

/// What an input source may know about the pilot it drives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PilotView {
    pub agent:            AgentId,
    pub position:         Position,
    pub current_energy:   f32,
    pub predicted_energy: f32,
    pub max_energy:       f32,
    pub moving:           bool,
    pub can_act:          bool,
}
