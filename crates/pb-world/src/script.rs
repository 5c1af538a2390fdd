//! Scripted pointer input loaded from CSV.
//!
//! # CSV format
//!
//! One row per pilot per tick that has input.  Ticks without a row produce
//! an empty sample (no hover, no click).
//!
//! ```csv
//! agent_id,tick,x,y,z,click
//! 0,0,3.0,4.0,0.0,false
//! 0,1,3.0,4.0,0.0,true
//! 1,5,,,,false
//! ```
//!
//! Leaving `x`, `y` and `z` empty means the pointer hits nothing that tick.
//! `click` accepts `true`/`false` or `1`/`0`.  When several rows share the
//! same agent and tick, the last one wins.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use pb_core::{AgentId, AgentRng, Position, Tick};

use crate::{PilotView, PointerController, PointerSample, WorldError, WorldResult};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ScriptRecord {
    agent_id: u32,
    tick:     u64,
    x:        Option<f32>,
    y:        Option<f32>,
    z:        Option<f32>,
    click:    String,
}

// ── ScriptedController ────────────────────────────────────────────────────────

/// Replays pre-recorded pointer samples keyed by `(agent, tick)`.
#[derive(Debug, Clone, Default)]
pub struct ScriptedController {
    samples: BTreeMap<(AgentId, Tick), PointerSample>,
}

impl ScriptedController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `sample` for `agent` at `tick`, replacing any earlier entry.
    pub fn insert(&mut self, agent: AgentId, tick: Tick, sample: PointerSample) {
        self.samples.insert((agent, tick), sample);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, agent: AgentId, tick: Tick, sample: PointerSample) -> Self {
        self.insert(agent, tick, sample);
        self
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Last tick with any scripted input.
    pub fn last_tick(&self) -> Option<Tick> {
        self.samples.keys().map(|&(_, t)| t).max()
    }

    pub fn sample(&self, agent: AgentId, tick: Tick) -> Option<&PointerSample> {
        self.samples.get(&(agent, tick))
    }
}

impl PointerController for ScriptedController {
    fn poll(&self, view: &PilotView, tick: Tick, _rng: &mut AgentRng) -> PointerSample {
        self.sample(view.agent, tick).copied().unwrap_or_default()
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Load a [`ScriptedController`] from a CSV file.
pub fn load_script_csv(path: &Path) -> WorldResult<ScriptedController> {
    let file = std::fs::File::open(path)?;
    load_script_reader(file)
}

/// Like [`load_script_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedding a script in a
/// binary.
pub fn load_script_reader<R: Read>(reader: R) -> WorldResult<ScriptedController> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut script = ScriptedController::new();

    for (line, result) in csv_reader.deserialize::<ScriptRecord>().enumerate() {
        let row = result.map_err(|e| WorldError::Script(e.to_string()))?;
        // Header is line 1.
        let sample = parse_sample(&row).map_err(|msg| WorldError::Script(format!("row {}: {msg}", line + 2)))?;
        script.insert(AgentId(row.agent_id), Tick(row.tick), sample);
    }

    log::debug!("loaded {} scripted pointer samples", script.len());
    Ok(script)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_sample(row: &ScriptRecord) -> Result<PointerSample, String> {
    let hover = match (row.x, row.y, row.z) {
        (Some(x), Some(y), Some(z)) => {
            let p = Position::new(x, y, z);
            if !p.is_finite() {
                return Err(format!("non-finite position {p}"));
            }
            Some(p)
        }
        (None, None, None) => None,
        _ => return Err("x, y and z must be all set or all empty".into()),
    };
    let click = match row.click.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => true,
        "false" | "0" | "" => false,
        other => return Err(format!("invalid click value '{other}'")),
    };
    Ok(PointerSample { hover, click })
}
