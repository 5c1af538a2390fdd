//! Rows written by output backends.
//!
//! Both rows serialise field-by-field in declaration order, which is also
//! the column order of the CSV files.  Floats are written with four decimal
//! places and booleans as `0`/`1`.

use serde::{Serialize, Serializer};

/// One pilot's state at a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PilotSnapshotRow {
    pub agent_id:         u32,
    pub tick:             u64,
    #[serde(serialize_with = "fixed4")]
    pub x:                f32,
    #[serde(serialize_with = "fixed4")]
    pub y:                f32,
    #[serde(serialize_with = "fixed4")]
    pub z:                f32,
    /// A move is in progress.
    #[serde(serialize_with = "flag")]
    pub moving:           bool,
    #[serde(serialize_with = "fixed4")]
    pub current_energy:   f32,
    /// Residual of the hovered target, or `current_energy` when nothing is
    /// hovered.
    #[serde(serialize_with = "fixed4")]
    pub predicted_energy: f32,
    #[serde(serialize_with = "fixed4")]
    pub max_energy:       f32,
}

/// Per-tick totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TickSummaryRow {
    pub tick:          u64,
    pub elapsed_ms:    u64,
    pub moving_agents: u64,
    /// Moves started this tick.
    pub commits:       u64,
}

fn fixed4<S: Serializer>(v: &f32, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&format_args!("{v:.4}"))
}

fn flag<S: Serializer>(v: &bool, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*v))
}
