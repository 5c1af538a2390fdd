//! `pb-world`: headless tick-loop host for the pathbudget framework.
//!
//! # Tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   for pilot in ascending AgentId (parallel with the `parallel` feature):
//!     ① Body    : KinematicAgent::step along the current path.
//!     ② Planner : apply a pending energy reset, poll for move completion.
//!     ③ Input   : PointerController::poll; hover previews, click commits.
//!   report events in agent order, then tick end and snapshots.
//! ```
//!
//! # Crate layout
//!
//! | Module         | Contents                                                  |
//! |----------------|-----------------------------------------------------------|
//! | [`world`]      | `World` and its tick loop                                 |
//! | [`builder`]    | `WorldBuilder`                                            |
//! | [`pilot`]      | `Pilot`, `PilotView`                                      |
//! | [`controller`] | `PointerController`, `NoopController`, `WanderController` |
//! | [`script`]     | `ScriptedController` and its CSV loader                   |
//! | [`event`]      | `WorldEvent`                                              |
//! | [`observer`]   | `WorldObserver`, `NoopObserver`, `LogObserver`            |
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Processes pilots on Rayon's thread pool.               |
//! | `serde`    | Serde derives on the configuration types it re-uses.   |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use pb_core::{Position, WorldConfig};
//! use pb_nav::OpenFloor;
//! use pb_world::{LogObserver, WanderController, WorldBuilder};
//!
//! let wander = WanderController::new(Position::new(-5.0, -5.0, 0.0), Position::new(5.0, 5.0, 0.0), 0.05);
//! let mut world = WorldBuilder::new(WorldConfig::default(), OpenFloor, wander)
//!     .spawn_many([Position::ORIGIN, Position::new(1.0, 0.0, 0.0)])
//!     .build()?;
//! world.run(&mut LogObserver::new())?;
//! ```

pub mod builder;
pub mod controller;
pub mod error;
pub mod event;
pub mod observer;
pub mod pilot;
pub mod script;
pub mod world;

#[cfg(test)]
mod tests;

pub use builder::{DEFAULT_SPEED, WorldBuilder};
pub use controller::{NoopController, PointerController, PointerSample, WanderController};
pub use error::{WorldError, WorldResult};
pub use event::WorldEvent;
pub use observer::{LogObserver, NoopObserver, WorldObserver};
pub use pilot::{Pilot, PilotView};
pub use script::{ScriptedController, load_script_csv, load_script_reader};
pub use world::World;
