//! Fluent builder for constructing a [`World`].

use pb_core::{AgentId, AgentRng, PbError, Position, WorldConfig};
use pb_energy::{EnergyBudget, EnergyConfig, ResetBroadcaster};
use pb_motion::{GhostPreview, MovementPlanner};
use pb_nav::{KinematicAgent, NavQuery};

use crate::{Pilot, PointerController, World, WorldResult};

/// Body speed used when [`WorldBuilder::speed`] is not called, in world
/// units per tick.
pub const DEFAULT_SPEED: f32 = 0.1;

/// Fluent builder for [`World<Q, C>`].
///
/// # Required inputs
///
/// - [`WorldConfig`]: total ticks, seed, tick duration, …
/// - `Q: NavQuery`: the navigator every pilot uses
/// - `C: PointerController`: the input source
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                    |
/// |-----------------|----------------------------|
/// | `.energy(cfg)`  | `EnergyConfig::default()`  |
/// | `.speed(s)`     | [`DEFAULT_SPEED`]          |
/// | `.spawn(p)`     | no pilots                  |
///
/// # Example
///
/// ```rust,ignore
/// let mut world = WorldBuilder::new(config, OpenFloor, NoopController)
///     .spawn(Position::ORIGIN)
///     .build()?;
/// world.run(&mut NoopObserver)?;
/// ```
pub struct WorldBuilder<Q: NavQuery, C: PointerController> {
    config:     WorldConfig,
    nav:        Q,
    controller: C,
    energy:     EnergyConfig,
    speed:      f32,
    spawns:     Vec<Position>,
}

impl<Q: NavQuery, C: PointerController> WorldBuilder<Q, C> {
    pub fn new(config: WorldConfig, nav: Q, controller: C) -> Self {
        Self {
            config,
            nav,
            controller,
            energy: EnergyConfig::default(),
            speed:  DEFAULT_SPEED,
            spawns: Vec::new(),
        }
    }

    /// Energy settings shared by every pilot.
    pub fn energy(mut self, energy: EnergyConfig) -> Self {
        self.energy = energy;
        self
    }

    /// Body speed shared by every pilot, in world units per tick.
    pub fn speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Add a pilot at `position`.  Pilots get consecutive `AgentId`s in
    /// spawn order.
    pub fn spawn(mut self, position: Position) -> Self {
        self.spawns.push(position);
        self
    }

    pub fn spawn_many(mut self, positions: impl IntoIterator<Item = Position>) -> Self {
        self.spawns.extend(positions);
        self
    }

    /// Validate inputs, create the reset broadcaster, and return a
    /// ready-to-run [`World`].
    pub fn build(self) -> WorldResult<World<Q, C>> {
        self.config.validate()?;

        let resets = ResetBroadcaster::new();
        let mut pilots = Vec::with_capacity(self.spawns.len());
        let mut rngs = Vec::with_capacity(self.spawns.len());

        for (i, &position) in self.spawns.iter().enumerate() {
            let id = AgentId::from_index(i)
                .ok_or_else(|| PbError::Config(format!("too many pilots ({})", self.spawns.len())))?;
            let budget = EnergyBudget::from_config(&self.energy)?;
            let body = KinematicAgent::new(position, self.speed)?;

            pilots.push(Pilot {
                id,
                planner: MovementPlanner::new(budget).with_reset_subscription(resets.subscribe()),
                body,
                preview: GhostPreview::new(),
            });
            rngs.push(AgentRng::new(self.config.seed, id));
        }

        #[cfg(feature = "parallel")]
        let pool = match self.config.num_threads {
            Some(n) => Some(
                rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| crate::WorldError::ThreadPool(e.to_string()))?,
            ),
            None => None,
        };

        log::debug!("world built with {} pilots", pilots.len());

        Ok(World {
            clock:      self.config.make_clock(),
            config:     self.config,
            nav:        self.nav,
            controller: self.controller,
            pilots,
            rngs,
            resets,
            #[cfg(feature = "parallel")]
            pool,
        })
    }
}
