//! `pb-core`: shared vocabulary of the `pathbudget` crates.
//!
//! Positions, ticks, IDs, world configuration and seeded randomness.  Every
//! other `pb-*` crate depends on this one; it depends on none of them.
//!
//! | Module    | Provides                                   |
//! |-----------|--------------------------------------------|
//! | [`ids`]   | `AgentId`, `NodeId`, `EdgeId`              |
//! | [`geo`]   | `Position` and its vector helpers          |
//! | [`time`]  | `Tick`, `SimClock`, `WorldConfig`          |
//! | [`rng`]   | `AgentRng`, `SimRng`                       |
//! | [`error`] | `PbError`, `PbResult`                      |
//!
//! With the `serde` feature, IDs, `Position`, `Tick` and `WorldConfig`
//! derive `Serialize` and `Deserialize`.

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


pub use error::{PbError, PbResult};
pub use geo::Position;
pub use ids::{AgentId, EdgeId, NodeId};
pub use rng::{AgentRng, SimRng};
pub use time::{SimClock, Tick, WorldConfig};
