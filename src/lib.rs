//! Gridsim - discrete-time grid automata with deferred-commit rule sets.
//!
//! Every tick sweeps the grid in row-major order, lets the active rule set
//! stage provisional states, runs a single end-of-sweep reconciliation and
//! then commits all staged cells at once. Rule sets:
//!
//! - Life-like birth/survival tables
//! - Schelling segregation
//! - Wa-Tor predator/prey
//! - Sugarscape foraging
//!
//! # Architecture
//!
//! - `schema`: Configuration and initial layout types
//! - `compute`: Cells, grid topology, rule engine and the simulation driver
//!
//! # Example
//!
//! ```rust
//! use gridsim::compute::{Grid, Label, Parameters, RuleEngine, Simulation, Topology};
//!
//! let labels = vec![
//!     vec![Label::Empty, Label::Blue, Label::Blue],
//!     vec![Label::Blue, Label::Red, Label::Blue],
//!     vec![Label::Blue, Label::Blue, Label::Blue],
//! ];
//! let grid = Grid::new(3, 3, Topology::Bounded, labels).unwrap();
//! let engine = RuleEngine::new("segregation", &Parameters::new()).unwrap();
//!
//! let mut simulation = Simulation::new(grid, engine, 7).unwrap();
//! simulation.step();
//!
//! assert_eq!(simulation.label(1, 1).unwrap(), Label::Empty);
//! assert_eq!(simulation.label(0, 0).unwrap(), Label::Red);
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{Grid, Label, RuleEngine, Simulation, SimulationStats, Topology};
pub use schema::{Layout, SimulationConfig};
