//! Simulation session - owns the grid, the rule engine and the random source.
//!
//! Drives one generation per [`Simulation::step`]: row-major sweep,
//! end-of-sweep reconciliation and commit, all inside [`RuleEngine::tick`].

use std::collections::BTreeMap;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::schema::{ConfigError, Layout, RuleConfig, SimulationConfig};

use super::{Grid, GridError, Label, RuleEngine, RuleError};

/// A loaded simulation.
pub struct Simulation {
    grid: Grid,
    engine: RuleEngine,
    rng: StdRng,
    seed: u64,
}

impl Simulation {
    /// Pair a grid with a rule engine. Fails if the grid holds labels the
    /// rule set does not understand.
    pub fn new(grid: Grid, engine: RuleEngine, seed: u64) -> Result<Self, RuleError> {
        engine.validate(&grid)?;
        Ok(Self {
            grid,
            engine,
            rng: StdRng::seed_from_u64(seed),
            seed,
        })
    }

    /// Build a simulation from a declarative configuration.
    pub fn from_config(config: &SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let labels = config.layout.generate(config.rows, config.cols)?;
        let grid = Grid::new(config.rows, config.cols, config.topology, labels)?;
        let engine = RuleEngine::new(&config.rules.variant, &config.rules.parameters)?;
        let seed = config.seed.unwrap_or_else(rand::random);

        log::info!(
            "Loaded {} on a {}x{} {} grid (seed {})",
            engine.name(),
            config.rows,
            config.cols,
            config.topology,
            seed
        );
        Ok(Self::new(grid, engine, seed)?)
    }

    /// Advance one generation.
    pub fn step(&mut self) {
        self.engine.tick(&mut self.grid, &mut self.rng);
    }

    /// Advance `steps` generations.
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Committed label at `(row, col)`.
    pub fn label(&self, row: usize, col: usize) -> Result<Label, GridError> {
        self.grid.label(row, col)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    pub fn generation(&self) -> u64 {
        self.engine.generation()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Describe the current state as a configuration that reloads to it.
    pub fn to_config(&self) -> SimulationConfig {
        SimulationConfig {
            rows: self.grid.rows(),
            cols: self.grid.cols(),
            topology: self.grid.topology(),
            rules: RuleConfig {
                variant: self.engine.rules().id().to_string(),
                parameters: self.engine.parameters(),
            },
            layout: Layout::Cells {
                cells: self.grid.labels(),
            },
            seed: Some(self.seed),
        }
    }
}

/// Simulation statistics for monitoring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub generation: u64,
    /// Cell count per committed label.
    pub census: BTreeMap<Label, usize>,
}

impl SimulationStats {
    pub fn from_simulation(simulation: &Simulation) -> Self {
        Self {
            generation: simulation.generation(),
            census: simulation.grid().census(),
        }
    }

    /// Number of cells carrying `label`.
    pub fn count(&self, label: Label) -> usize {
        self.census.get(&label).copied().unwrap_or(0)
    }
}
