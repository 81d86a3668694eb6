//! Life-like birth/survival rule over the Moore neighborhood.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::RuleError;
use crate::compute::{Color, Label, Neighborhood, Position, Sweep};

/// Birth and survival neighbor counts (B/S notation).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LifeConfig {
    /// Live-neighbor counts that turn a dead cell alive.
    pub birth: Vec<u8>,
    /// Live-neighbor counts that keep a live cell alive.
    pub survival: Vec<u8>,
}

impl Default for LifeConfig {
    /// Conway's B3/S23.
    fn default() -> Self {
        Self {
            birth: vec![3],
            survival: vec![2, 3],
        }
    }
}

#[derive(Debug, Clone)]
pub struct LifeRules {
    config: LifeConfig,
    birth: [bool; 9],
    survival: [bool; 9],
}

impl LifeRules {
    pub const ID: &'static str = "life";
    pub const ALPHABET: &'static [Label] = &[Label::Dead, Label::Alive];

    pub fn new(config: LifeConfig) -> Result<Self, RuleError> {
        let birth = count_table(&config.birth, "birth")?;
        let survival = count_table(&config.survival, "survival")?;
        Ok(Self {
            config,
            birth,
            survival,
        })
    }

    pub fn config(&self) -> &LifeConfig {
        &self.config
    }

    pub(crate) fn color(label: Label) -> Option<Color> {
        match label {
            Label::Alive => Some(Color::BLACK),
            Label::Dead => Some(Color::WHITE),
            _ => None,
        }
    }

    /// Decisions depend only on the committed snapshot, so sweep order is irrelevant.
    pub fn apply<R: Rng + ?Sized>(&mut self, pos: Position, sweep: &mut Sweep<'_, R>) {
        let current = sweep.cell(pos).current();
        let alive = sweep
            .window(pos, Neighborhood::Moore)
            .neighbors()
            .filter(|cell| cell.current() == Label::Alive)
            .count();

        let next = match current {
            Label::Alive if self.survival[alive] => Label::Alive,
            Label::Alive => Label::Dead,
            Label::Dead if self.birth[alive] => Label::Alive,
            _ => return,
        };
        if next != current {
            sweep.stage(pos, next);
        }
    }
}

fn count_table(counts: &[u8], name: &'static str) -> Result<[bool; 9], RuleError> {
    let mut table = [false; 9];
    for &count in counts {
        let slot = table.get_mut(count as usize).ok_or_else(|| RuleError::OutOfRange {
            variant: LifeRules::ID,
            name,
            reason: format!("{count} exceeds the 8 cells of a Moore neighborhood"),
        })?;
        *slot = true;
    }
    Ok(table)
}
