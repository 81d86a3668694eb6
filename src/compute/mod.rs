//! Compute module - Grid, cells and the rule engine.

mod cell;
mod engine;
mod grid;
mod label;
mod rules;
mod simulation;
mod worklist;

pub use cell::*;
pub use engine::*;
pub use grid::*;
pub use label::*;
pub use rules::*;
pub use simulation::*;
pub use worklist::*;
