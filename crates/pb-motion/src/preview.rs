//! Preview presentation.
//!
//! The planner hands every fresh prediction to a [`PreviewPresenter`] and
//! asks it to clear when a move ends.  Rendering is the host's business.

use pb_core::Position;
use pb_energy::ReachabilityResult;

pub trait PreviewPresenter {
    /// Show the reachable part of the hovered path.
    fn show(&mut self, preview: &ReachabilityResult);

    /// Remove any visible preview.
    fn clear(&mut self);
}

impl<P: PreviewPresenter + ?Sized> PreviewPresenter for &mut P {
    fn show(&mut self, preview: &ReachabilityResult) {
        (**self).show(preview);
    }

    fn clear(&mut self) {
        (**self).clear();
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopPresenter;

impl PreviewPresenter for NoopPresenter {
    fn show(&mut self, _preview: &ReachabilityResult) {}
    fn clear(&mut self) {}
}

/// Keeps the state a renderer would draw: the preview line and a ghost
/// marker at its end.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GhostPreview {
    line:    Vec<Position>,
    ghost:   Option<Position>,
    visible: bool,
}

impl GhostPreview {
    pub fn new() -> Self {
        Self::default()
    }

    /// The drawn polyline (empty when hidden).
    pub fn line(&self) -> &[Position] {
        &self.line
    }

    /// Where the ghost marker stands, if shown.
    pub fn ghost(&self) -> Option<Position> {
        self.ghost
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }
}

impl PreviewPresenter for GhostPreview {
    fn show(&mut self, preview: &ReachabilityResult) {
        self.line.clear();
        self.line.extend_from_slice(&preview.path);
        self.ghost = preview.destination();
        self.visible = true;
    }

    fn clear(&mut self) {
        self.line.clear();
        self.ghost = None;
        self.visible = false;
    }
}
