//! The movement planner: previews, commits, and per-tick advancement.

use pb_core::{Position, Tick};
use pb_energy::{EnergyBudget, ReachabilityResult, ResetSubscription};
use pb_nav::{NavAgent, NavQuery};

use crate::{MoveEnd, MovementState, MovementStateMachine, PreviewPresenter};

/// Result of a click.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommitOutcome {
    /// The move began.
    Started {
        destination:       Position,
        residual:          f32,
        reached_full_path: bool,
    },
    /// The move was refused; energy and state are unchanged.
    Rejected(RejectReason),
}

impl CommitOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, CommitOutcome::Started { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// A move is already in progress.
    Busy,
    /// Energy is below the act threshold.
    Exhausted,
    /// The navigator found no path, or the path goes nowhere.
    NoPath,
}

/// What one call to [`MovementPlanner::advance`] did.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AdvanceReport {
    /// An energy reset was applied.
    pub reset: bool,
    /// The move in progress ended.
    pub ended: Option<MoveEnd>,
}

/// Last hover prediction, kept so an immediate click reuses it.
#[derive(Debug, Clone)]
struct CachedPreview {
    target: Position,
    origin: Position,
    energy: f32,
    result: ReachabilityResult,
}

/// Couples one agent's [`EnergyBudget`] with its [`MovementStateMachine`].
///
/// The planner is the only writer of the budget.  It is `Send`, so hosts may
/// process many planners on worker threads as long as each planner is
/// reached through a unique `&mut`.
#[derive(Debug)]
pub struct MovementPlanner {
    budget:           EnergyBudget,
    machine:          MovementStateMachine,
    resets:           Option<ResetSubscription>,
    preview:          Option<CachedPreview>,
    predicted_energy: f32,
}

impl MovementPlanner {
    pub fn new(budget: EnergyBudget) -> Self {
        let predicted_energy = budget.current();
        Self {
            budget,
            machine: MovementStateMachine::new(),
            resets: None,
            preview: None,
            predicted_energy,
        }
    }

    /// Listen to an energy-reset broadcast.
    pub fn with_reset_subscription(mut self, subscription: ResetSubscription) -> Self {
        self.resets = Some(subscription);
        self
    }

    // ── Read-only views ───────────────────────────────────────────────────

    /// Energy that would remain after moving to the hovered target; equals
    /// the current level when nothing is hovered.
    #[inline]
    pub fn predicted_energy(&self) -> f32 {
        self.predicted_energy
    }

    #[inline]
    pub fn max_energy(&self) -> f32 {
        self.budget.max()
    }

    #[inline]
    pub fn current_energy(&self) -> f32 {
        self.budget.current()
    }

    pub fn budget(&self) -> &EnergyBudget {
        &self.budget
    }

    pub fn state(&self) -> &MovementState {
        self.machine.state()
    }

    /// The cached hover prediction, if any.
    pub fn preview(&self) -> Option<&ReachabilityResult> {
        self.preview.as_ref().map(|c| &c.result)
    }

    /// Idle and at or above the act threshold.
    #[inline]
    pub fn can_act(&self) -> bool {
        self.machine.is_idle() && self.budget.is_actionable()
    }

    // ── Commands ──────────────────────────────────────────────────────────

    /// Predict a move to `target` and show it.
    pub fn on_hover_target<Q, A, P>(
        &mut self,
        target:    Position,
        nav:       &Q,
        agent:     &A,
        presenter: &mut P,
    ) -> &ReachabilityResult
    where
        Q: NavQuery + ?Sized,
        A: NavAgent + ?Sized,
        P: PreviewPresenter + ?Sized,
    {
        let origin = agent.position();
        let result = self.budget.predict(&nav.find_path(origin, target));
        log::trace!(
            "preview {origin} -> {target}: {} corners, residual {:.3}",
            result.path.len(),
            result.residual
        );

        presenter.show(&result);
        self.predicted_energy = result.residual;
        let cached = self.preview.insert(CachedPreview {
            target,
            origin,
            energy: self.budget.current(),
            result,
        });
        &cached.result
    }

    /// Nothing is hovered: the prediction falls back to the current level.
    pub fn clear_hover(&mut self) {
        self.preview = None;
        self.predicted_energy = self.budget.current();
    }

    /// Commit a move towards `target`.
    ///
    /// Ignored unless [`can_act`](Self::can_act).  The cached hover
    /// prediction is reused when it was made for the same target, origin and
    /// energy level; otherwise the path is predicted afresh and `presenter`
    /// is updated to match it (or cleared when there is nowhere to go).
    pub fn on_commit_target<Q, A, P>(
        &mut self,
        target:    Position,
        nav:       &Q,
        agent:     &mut A,
        presenter: &mut P,
        now:       Tick,
    ) -> CommitOutcome
    where
        Q: NavQuery + ?Sized,
        A: NavAgent + ?Sized,
        P: PreviewPresenter + ?Sized,
    {
        if !self.machine.is_idle() {
            log::trace!("commit to {target} ignored: already moving");
            return CommitOutcome::Rejected(RejectReason::Busy);
        }
        if !self.budget.is_actionable() {
            log::trace!("commit to {target} ignored: energy {:.3} below threshold", self.budget.current());
            return CommitOutcome::Rejected(RejectReason::Exhausted);
        }

        let origin = agent.position();
        let current = self.budget.current();
        let result = match self.preview.take() {
            Some(c) if c.target == target && c.origin == origin && c.energy.to_bits() == current.to_bits() => {
                c.result
            }
            _ => {
                let fresh = self.budget.predict(&nav.find_path(origin, target));
                if fresh.moves_agent() {
                    presenter.show(&fresh);
                } else {
                    presenter.clear();
                }
                fresh
            }
        };

        let Some(destination) = result.destination().filter(|_| result.moves_agent()) else {
            log::debug!("commit to {target} ignored: no path from {origin}");
            self.predicted_energy = current;
            return CommitOutcome::Rejected(RejectReason::NoPath);
        };

        if self.machine.begin(destination, now).is_err() {
            return CommitOutcome::Rejected(RejectReason::Busy);
        }
        self.budget.commit(result.residual);
        self.predicted_energy = self.budget.current();
        agent.set_destination(destination);

        log::info!(
            "move committed at {now}: {origin} -> {destination}, energy {current:.3} -> {:.3}",
            self.budget.current()
        );
        CommitOutcome::Started {
            destination,
            residual: result.residual,
            reached_full_path: result.reached_full_path,
        }
    }

    /// Refill energy to max.  Does not touch a move in progress.
    pub fn apply_reset(&mut self) {
        self.budget.reset();
        self.preview = None;
        self.predicted_energy = self.budget.current();
    }

    /// Per-tick update: apply a pending broadcast reset, then poll the
    /// state machine.  A finished move clears the preview.
    pub fn advance<A, P>(&mut self, agent: &A, presenter: &mut P) -> AdvanceReport
    where
        A: NavAgent + ?Sized,
        P: PreviewPresenter + ?Sized,
    {
        let reset = self.resets.as_mut().is_some_and(ResetSubscription::poll);
        if reset {
            self.apply_reset();
            log::debug!("energy reset applied: {:.3}", self.budget.current());
        }

        let ended = self.machine.advance(agent);
        if let Some(end) = &ended {
            presenter.clear();
            log::info!("move to {} ended ({:?})", end.destination, end.reason);
        }
        AdvanceReport { reset, ended }
    }
}
