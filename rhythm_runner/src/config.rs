//! Runtime configuration.
//!
//! All values have defaults matching the shipped game; a TOML file can
//! override any subset of them.

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::Result;
use crate::{runner_bail, runner_err, runner_info};

/// How a node's bounding box is cut during bulk construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Subdivision {
    /// 8 regions around the box center (split on X, Y and Z)
    #[default]
    Octants,
    /// 4 regions split on X and Z, each spanning the full Y range
    Quadrants,
}

/// Spatial tree tunables.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpatialConfig {
    /// Leaf capacity; a fuller leaf is subdivided (build) or split (insert)
    pub objects_per_leaf: usize,
    /// Depth past which leaves are allowed to overflow instead of splitting
    pub max_depth: u32,
    /// Region decomposition used by bulk construction
    pub subdivision: Subdivision,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            objects_per_leaf: 20,
            max_depth: 16,
            subdivision: Subdivision::Octants,
        }
    }
}

/// Player-versus-obstacle classification tolerances (world units).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CollisionConfig {
    pub tolerance_x: f32,
    pub tolerance_y: f32,
    pub tolerance_z: f32,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            tolerance_x: 0.2,
            tolerance_y: 0.42,
            tolerance_z: 0.2,
        }
    }
}

/// Root configuration structure.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RunnerConfig {
    pub spatial: SpatialConfig,
    pub collision: CollisionConfig,
}

impl RunnerConfig {
    /// Parse and validate a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: RunnerConfig = toml::from_str(contents).map_err(|e| {
            runner_err!("runner::Config", InvalidConfig, "Failed to parse config: {}", e)
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or use defaults if the file is absent.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            runner_info!(
                "runner::Config",
                "No config at {}, using defaults",
                path.display()
            );
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            runner_err!(
                "runner::Config",
                InvalidConfig,
                "Failed to read {}: {}",
                path.display(),
                e
            )
        })?;
        Self::from_toml_str(&contents)
    }

    /// Reject values the spatial tree and collision check cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.spatial.objects_per_leaf == 0 {
            runner_bail!("runner::Config", InvalidConfig, "objects_per_leaf must be at least 1");
        }

        let tolerances = [
            ("tolerance_x", self.collision.tolerance_x),
            ("tolerance_y", self.collision.tolerance_y),
            ("tolerance_z", self.collision.tolerance_z),
        ];
        for (name, value) in tolerances {
            if !value.is_finite() || value < 0.0 {
                runner_bail!(
                    "runner::Config",
                    InvalidConfig,
                    "{} must be a finite, non-negative number (got {})",
                    name,
                    value
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
