//! Configuration types describing a simulation to load or save.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::Layout;
use crate::compute::{GridError, Label, Parameters, RuleError, Topology};

/// Top-level simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Grid height in cells.
    pub rows: usize,
    /// Grid width in cells.
    pub cols: usize,
    /// Edge policy.
    #[serde(default)]
    pub topology: Topology,
    /// Rule set and its parameters.
    pub rules: RuleConfig,
    /// Initial per-cell labels.
    pub layout: Layout,
    /// Seed for the simulation's random source. Random when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rows: 20,
            cols: 20,
            topology: Topology::Bounded,
            rules: RuleConfig {
                variant: "segregation".to_string(),
                parameters: Parameters::from_iter([(
                    "threshold".to_string(),
                    serde_json::json!(0.5),
                )]),
            },
            layout: Layout::Random {
                weights: vec![(Label::Empty, 1.0), (Label::Red, 2.0), (Label::Blue, 2.0)],
                seed: 42,
            },
            seed: Some(42),
        }
    }
}

/// Rule variant name and its named parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleConfig {
    pub variant: String,
    #[serde(default)]
    pub parameters: Parameters,
}

impl SimulationConfig {
    /// Get total grid size (rows * cols).
    #[inline]
    pub fn grid_size(&self) -> usize {
        self.rows * self.cols
    }

    /// Validate configuration parameters that do not need a built grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.rules.variant.trim().is_empty() {
            return Err(ConfigError::MissingVariant);
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Write this configuration as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_json()?).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Grid dimensions (rows, cols) must be non-zero")]
    InvalidDimensions,
    #[error("Rule variant must be named")]
    MissingVariant,
    #[error("Layout weights are invalid: {0}")]
    InvalidWeights(String),
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error(transparent)]
    Rules(#[from] RuleError),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
