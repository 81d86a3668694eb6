//! Initial cell layouts.

use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::compute::Label;

/// How the grid's initial labels are produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Layout {
    /// Explicit `rows x cols` labels.
    Cells {
        cells: Vec<Vec<Label>>,
    },
    /// Every cell carries the same label.
    Uniform {
        label: Label,
    },
    /// Each cell drawn independently with the given relative weights.
    Random {
        weights: Vec<(Label, f64)>,
        /// Random seed.
        seed: u64,
    },
}

impl Layout {
    /// Produce initial labels for a `rows x cols` grid.
    ///
    /// `Cells` is returned as given; its shape is checked when the grid is built.
    pub fn generate(&self, rows: usize, cols: usize) -> Result<Vec<Vec<Label>>, ConfigError> {
        match self {
            Layout::Cells { cells } => Ok(cells.clone()),
            Layout::Uniform { label } => Ok(vec![vec![*label; cols]; rows]),
            Layout::Random { weights, seed } => {
                let dist = WeightedIndex::new(weights.iter().map(|&(_, weight)| weight))
                    .map_err(|e| ConfigError::InvalidWeights(e.to_string()))?;
                let mut rng = StdRng::seed_from_u64(*seed);
                Ok((0..rows)
                    .map(|_| {
                        (0..cols)
                            .map(|_| weights[dist.sample(&mut rng)].0)
                            .collect()
                    })
                    .collect())
            }
        }
    }
}
