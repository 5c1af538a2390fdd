//! The `PointerController` trait: where hover and click input comes from.

use pb_core::{AgentRng, Position, Tick};

use crate::PilotView;

/// One tick of pointer input for one pilot.
///
/// `hover` is the surface point under the pointer, or `None` when the
/// pointer hits nothing.  `click` asks to commit a move to `hover`; a click
/// without a hover point is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerSample {
    pub hover: Option<Position>,
    pub click: bool,
}

impl PointerSample {
    /// Pointer over `target`, no click.
    pub fn hover(target: Position) -> Self {
        Self { hover: Some(target), click: false }
    }

    /// Pointer over `target`, clicked.
    pub fn click(target: Position) -> Self {
        Self { hover: Some(target), click: true }
    }
}

/// Pluggable input source.
///
/// Called once per pilot per tick.  Per-pilot state must live outside the
/// controller (the pilot view, the tick, the per-agent RNG), because the
/// world may poll many pilots at once on Rayon's pool.
///
/// # Example
///
/// ```rust,ignore
/// struct AlwaysEast;
///
/// impl PointerController for AlwaysEast {
///     fn poll(&self, view: &PilotView, _tick: Tick, _rng: &mut AgentRng) -> PointerSample {
///         let p = view.position;
///         PointerSample::click(Position::new(p.x + 1.0, p.y, p.z))
///     }
/// }
/// ```
pub trait PointerController: Send + Sync {
    fn poll(&self, view: &PilotView, tick: Tick, rng: &mut AgentRng) -> PointerSample;
}

/// No pointer, ever.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopController;

impl PointerController for NoopController {
    fn poll(&self, _view: &PilotView, _tick: Tick, _rng: &mut AgentRng) -> PointerSample {
        PointerSample::default()
    }
}

/// Wanders around a rectangle: while the pilot can act it hovers a random
/// point and clicks with probability `click_probability`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WanderController {
    pub min:               Position,
    pub max:               Position,
    pub click_probability: f64,
}

impl WanderController {
    pub fn new(min: Position, max: Position, click_probability: f64) -> Self {
        Self { min, max, click_probability }
    }
}

impl PointerController for WanderController {
    fn poll(&self, view: &PilotView, _tick: Tick, rng: &mut AgentRng) -> PointerSample {
        if !view.can_act {
            return PointerSample::default();
        }
        let target = rng.point_in(self.min, self.max);
        PointerSample {
            hover: Some(target),
            click: rng.gen_bool(self.click_probability),
        }
    }
}
