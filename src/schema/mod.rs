//! Schema module - Configuration and initial layout types for simulations.

mod config;
mod layout;

pub use config::*;
pub use layout::*;
