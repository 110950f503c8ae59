//! Turn-runner configuration.

use std::path::Path;

use ca_core::{DispatchConfig, Tick};
use serde::{Deserialize, Serialize};

use crate::{SimError, SimResult};

/// Settings for one run.  `dispatch` is handed unchanged to every agent's
/// coordinators; its `seed` also seeds the per-agent RNGs.
///
/// ```json
/// { "max_turns": 12, "dispatch": { "seed": 7, "sample_size": 30 } }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Upper bound on turns for [`Sim::run`][crate::Sim::run]; a run also
    /// stops once every plan is exhausted.
    pub max_turns: u64,

    /// Simulated minute every agent's clock starts at.
    pub start_tick: Tick,

    pub dispatch: DispatchConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            max_turns:  24,
            start_tick: Tick::ZERO,
            dispatch:   DispatchConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn from_json_str(json: &str) -> SimResult<Self> {
        let cfg: SimConfig = serde_json::from_str(json).map_err(|e| SimError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &Path) -> SimResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| SimError::Config(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> SimResult<()> {
        if self.max_turns == 0 {
            return Err(SimError::Config("max_turns must be at least 1".into()));
        }
        self.dispatch.validate()?;
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.dispatch.seed
    }
}
