//! `pb-nav`: navigation collaborators consumed by the movement core.
//!
//! The movement planner treats pathfinding and path following as black
//! boxes.  This crate defines those boxes as traits and ships reference
//! implementations that make the framework usable without a game engine.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`graph`]   | `NavGraph`, `Edge`, `LinkHit`, `NavGraphBuilder`            |
//! | [`query`]   | `NavQuery` trait, `GraphNavigator`, `OpenFloor`             |
//! | [`agent`]   | `NavAgent` trait, `KinematicAgent`                          |
//! | [`error`]   | `NavError`, `NavResult<T>`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `Edge`.                   |

pub mod agent;
pub mod error;
pub mod graph;
pub mod query;


pub use agent::{KinematicAgent, NavAgent};
pub use error::{NavError, NavResult};
pub use graph::{Edge, LinkHit, NavGraph, NavGraphBuilder};
pub use query::{GraphNavigator, NavQuery, OpenFloor};
