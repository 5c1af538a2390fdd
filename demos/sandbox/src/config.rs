//! JSON run configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use pb_core::WorldConfig;
use pb_energy::EnergyConfig;

/// Everything the sandbox reads from its JSON file.  Missing fields take
/// the defaults below.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    pub world:             WorldConfig,
    pub energy:            EnergyConfig,
    /// Number of pilots spawned on random arena nodes.
    pub pilots:            usize,
    /// World units per tick.
    pub speed:             f32,
    /// Per-tick click chance of an idle wandering pilot.
    pub click_probability: f64,
    /// Broadcast an energy reset every N ticks.  0 disables resets.
    pub reset_every_ticks: u64,
    /// Replay this pointer script instead of wandering.
    pub script:            Option<PathBuf>,
    pub output_dir:        PathBuf,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            world: WorldConfig {
                total_ticks:           1_200,
                seed:                  42,
                output_interval_ticks: 10,
                ..WorldConfig::default()
            },
            energy:            EnergyConfig::default(),
            pilots:            6,
            speed:             0.08,
            click_probability: 0.04,
            reset_every_ticks: 300,
            script:            None,
            output_dir:        PathBuf::from("output/sandbox"),
        }
    }
}

impl SandboxConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}
