//! The `World` struct and its tick loop.

use pb_core::{AgentId, AgentRng, PbError, SimClock, Tick, WorldConfig};
use pb_energy::ResetBroadcaster;
use pb_motion::CommitOutcome;
use pb_nav::NavQuery;

use crate::{Pilot, PointerController, WorldEvent, WorldObserver, WorldResult};

// ── World ─────────────────────────────────────────────────────────────────────

/// The headless host that drives every pilot.
///
/// `World<Q, C>` owns the pilots, one navigator `Q` shared by all of them,
/// one pointer controller `C`, and the energy-reset broadcaster.  Each tick
/// every pilot, in ascending `AgentId` order:
///
/// 1. **Body**: the navigation body steps along its path.
/// 2. **Planner**: a pending energy reset is applied, then the state machine
///    polls the body; a finished move clears the preview.
/// 3. **Input**: the controller is polled.  While the pilot can act a hover
///    point refreshes the preview (or clears the prediction when the pointer
///    hits nothing) and a click commits.  A click while busy or exhausted is
///    reported as rejected.
///
/// Pilots never read each other, so with the `parallel` feature the per-pilot
/// work runs on Rayon's pool; events are merged back in agent order.
///
/// Create via [`WorldBuilder`][crate::WorldBuilder].
pub struct World<Q: NavQuery, C: PointerController> {
    /// Run configuration (total ticks, seed, tick duration, …).
    pub config: WorldConfig,

    /// Tracks the current tick.
    pub clock: SimClock,

    /// Path queries for every pilot.
    pub nav: Q,

    /// Input source for every pilot.
    pub controller: C,

    /// Pilots indexed by `AgentId`.
    pub pilots: Vec<Pilot>,

    /// Per-pilot deterministic RNGs, separate from `pilots` for the
    /// split-borrow pattern.
    pub rngs: Vec<AgentRng>,

    pub(crate) resets: ResetBroadcaster,

    #[cfg(feature = "parallel")]
    pub(crate) pool: Option<rayon::ThreadPool>,
}

impl<Q: NavQuery, C: PointerController> World<Q, C> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: WorldObserver>(&mut self, observer: &mut O) -> WorldResult<()> {
        log::info!(
            "running {} pilots from {} to {}",
            self.pilots.len(),
            self.clock.now,
            self.config.end_tick()
        );
        while self.clock.now < self.config.end_tick() {
            self.tick_once(observer);
        }
        observer.on_world_end(self.clock.now);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: WorldObserver>(&mut self, n: u64, observer: &mut O) -> WorldResult<()> {
        for _ in 0..n {
            self.tick_once(observer);
        }
        Ok(())
    }

    /// Broadcast an energy reset.  Every pilot refills on its next tick.
    pub fn request_reset(&self) {
        self.resets.request_reset();
    }

    /// A handle that can request resets from another thread.
    pub fn reset_handle(&self) -> ResetBroadcaster {
        self.resets.clone()
    }

    #[inline]
    pub fn current_tick(&self) -> Tick {
        self.clock.now
    }

    pub fn pilot(&self, id: AgentId) -> WorldResult<&Pilot> {
        self.pilots.get(id.index()).ok_or_else(|| PbError::UnknownAgent(id).into())
    }

    pub fn pilot_mut(&mut self, id: AgentId) -> WorldResult<&mut Pilot> {
        self.pilots.get_mut(id.index()).ok_or_else(|| PbError::UnknownAgent(id).into())
    }

    /// Pilots with a move in progress.
    pub fn moving_count(&self) -> usize {
        self.pilots.iter().filter(|p| p.planner.state().is_moving()).count()
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn tick_once<O: WorldObserver>(&mut self, observer: &mut O) {
        let now = self.clock.now;
        observer.on_tick_start(now);

        for event in self.process_tick(now) {
            observer.on_event(&event);
        }

        observer.on_tick_end(now, self.moving_count());
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.pilots);
        }
        self.clock.advance();
    }

    /// Step every pilot and return the tick's events in agent order.
    fn process_tick(&mut self, now: Tick) -> Vec<WorldEvent> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let nav        = &self.nav;
        let controller = &self.controller;
        let pilots     = &mut self.pilots;
        let rngs       = &mut self.rngs;

        #[cfg(not(feature = "parallel"))]
        {
            let mut events = Vec::new();
            for (pilot, rng) in pilots.iter_mut().zip(rngs.iter_mut()) {
                step_pilot(pilot, rng, nav, controller, now, &mut events);
            }
            events
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let work = || -> Vec<Vec<WorldEvent>> {
                pilots
                    .par_iter_mut()
                    .zip(rngs.par_iter_mut())
                    .map(|(pilot, rng)| {
                        let mut events = Vec::new();
                        step_pilot(pilot, rng, nav, controller, now, &mut events);
                        events
                    })
                    .collect()
            };
            // Indexed collect keeps pilot order.
            let per_pilot = match &self.pool {
                Some(pool) => pool.install(work),
                None => work(),
            };
            per_pilot.into_iter().flatten().collect()
        }
    }
}

// ── Per-pilot step ────────────────────────────────────────────────────────────

/// One tick of one pilot.  Touches nothing but `pilot` and `rng`.
fn step_pilot<Q, C>(
    pilot:      &mut Pilot,
    rng:        &mut AgentRng,
    nav:        &Q,
    controller: &C,
    now:        Tick,
    events:     &mut Vec<WorldEvent>,
) where
    Q: NavQuery + ?Sized,
    C: PointerController + ?Sized,
{
    let agent = pilot.id;
    pilot.body.step(nav);

    let report = pilot.planner.advance(&pilot.body, &mut pilot.preview);
    if report.reset {
        events.push(WorldEvent::EnergyReset {
            agent,
            tick:   now,
            energy: pilot.planner.current_energy(),
        });
    }
    if let Some(end) = report.ended {
        events.push(WorldEvent::MoveEnded { agent, tick: now, end });
    }

    let sample = controller.poll(&pilot.view(), now, rng);
    if pilot.planner.can_act() {
        match sample.hover {
            Some(target) => {
                pilot.planner.on_hover_target(target, nav, &pilot.body, &mut pilot.preview);
            }
            None => pilot.planner.clear_hover(),
        }
    }

    let Some(target) = sample.hover.filter(|_| sample.click) else {
        return;
    };
    let event = match pilot.planner.on_commit_target(target, nav, &mut pilot.body, &mut pilot.preview, now) {
        CommitOutcome::Started { destination, residual, reached_full_path } => WorldEvent::Committed {
            agent,
            tick: now,
            destination,
            residual,
            reached_full_path,
        },
        CommitOutcome::Rejected(reason) => WorldEvent::Rejected { agent, tick: now, target, reason },
    };
    events.push(event);
}
