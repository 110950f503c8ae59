//! Dispatch-pipeline configuration.
//!
//! Applications typically keep this in a JSON file next to their map and
//! population data.  Every field has a default, so a file only needs the
//! values it overrides:
//!
//! ```json
//! { "sample_size": 30, "seed": 7 }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// Tunables shared by the mobility and social coordinators.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Number of candidates the gravity model resamples (with replacement).
    pub sample_size: usize,

    /// Maximum number of places requested from the map service per query.
    pub search_limit: usize,

    /// Travel radius used when the oracle gives no usable answer, metres.
    pub default_radius_m: u32,

    /// Smallest radius the oracle may choose, metres.
    pub min_radius_m: u32,

    /// Largest radius the oracle may choose, metres.
    pub max_radius_m: u32,

    /// Simulated minutes consumed by choosing a destination.
    pub placement_minutes: u32,

    /// Simulated minutes consumed by an actual move.
    pub relocation_minutes: u32,

    /// Timeout for free-text generation requests (message composition and
    /// contact selection), seconds.
    pub generation_timeout_secs: u64,

    /// Master seed for per-agent RNGs.
    pub seed: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            sample_size:             50,
            search_limit:            50,
            default_radius_m:        10_000,
            min_radius_m:            3_000,
            max_radius_m:            200_000,
            placement_minutes:       5,
            relocation_minutes:      45,
            generation_timeout_secs: 300,
            seed:                    0,
        }
    }
}

impl DispatchConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        let cfg: DispatchConfig = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Read, parse, and validate a JSON file.
    pub fn from_json_file(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if self.sample_size == 0 {
            return Err(CoreError::Config("sample_size must be at least 1".into()));
        }
        if self.search_limit == 0 {
            return Err(CoreError::Config("search_limit must be at least 1".into()));
        }
        if self.min_radius_m > self.max_radius_m {
            return Err(CoreError::Config(format!(
                "min_radius_m ({}) exceeds max_radius_m ({})",
                self.min_radius_m, self.max_radius_m
            )));
        }
        if !(self.min_radius_m..=self.max_radius_m).contains(&self.default_radius_m) {
            return Err(CoreError::Config(format!(
                "default_radius_m ({}) outside [{}, {}]",
                self.default_radius_m, self.min_radius_m, self.max_radius_m
            )));
        }
        Ok(())
    }

    /// The generation timeout as a `Duration`.
    pub fn generation_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.generation_timeout_secs)
    }
}
