//! `pb-energy`: the energy side of path-budgeted movement.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`reach`]   | `budget_path`: truncate a polyline to what an energy pool affords |
//! | [`budget`]  | `EnergyBudget`, `EnergyConfig`, `ACT_THRESHOLD`                   |
//! | [`reset`]   | `ResetBroadcaster` / `ResetSubscription`: the energy-reset event |
//! | [`error`]   | `EnergyError`, `EnergyResult<T>`                                  |
//!
//! # Cost model
//!
//! One unit of energy buys one unit of travelled distance.  A prediction
//! never mutates anything; energy is only consumed when the movement planner
//! commits a move, and then by overwriting `current` with the residual the
//! prediction reported.

pub mod budget;
pub mod error;
pub mod reach;
pub mod reset;


pub use budget::{ACT_THRESHOLD, EnergyBudget, EnergyConfig};
pub use error::{EnergyError, EnergyResult};
pub use reach::{ReachabilityResult, budget_path, path_length};
pub use reset::{ResetBroadcaster, ResetSubscription};
