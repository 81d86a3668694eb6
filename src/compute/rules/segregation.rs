//! Schelling segregation: dissatisfied agents relocate to empty cells.
//!
//! Agents are never moved during the sweep. Each cell is classified against
//! the committed snapshot, and the end-of-sweep hook pairs a shuffled list of
//! dissatisfied agents with the queue of empty cells.

use std::collections::VecDeque;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::RuleError;
use crate::compute::{Color, Label, Neighborhood, Position, Sweep, Window};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SegregationConfig {
    /// Minimum fraction of like occupied neighbors an agent accepts.
    pub threshold: f64,
}

impl Default for SegregationConfig {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

#[derive(Debug, Clone)]
pub struct SegregationRules {
    config: SegregationConfig,
    /// Agents that want to move, in sweep order until shuffled.
    dissatisfied: Vec<Position>,
    /// Empty cells, in sweep order.
    vacancies: VecDeque<Position>,
}

impl SegregationRules {
    pub const ID: &'static str = "segregation";
    pub const ALPHABET: &'static [Label] = &[Label::Empty, Label::Red, Label::Blue];

    pub fn new(config: SegregationConfig) -> Result<Self, RuleError> {
        if !(0.0..=1.0).contains(&config.threshold) {
            return Err(RuleError::OutOfRange {
                variant: Self::ID,
                name: "threshold",
                reason: format!("{} is not within [0, 1]", config.threshold),
            });
        }
        Ok(Self {
            config,
            dissatisfied: Vec::new(),
            vacancies: VecDeque::new(),
        })
    }

    pub fn config(&self) -> &SegregationConfig {
        &self.config
    }

    pub(crate) fn color(label: Label) -> Option<Color> {
        match label {
            Label::Red => Some(Color::RED),
            Label::Blue => Some(Color::BLUE),
            Label::Empty => Some(Color::WHITE),
            _ => None,
        }
    }

    pub fn apply<R: Rng + ?Sized>(&mut self, pos: Position, sweep: &mut Sweep<'_, R>) {
        match sweep.cell(pos).current() {
            Label::Empty => self.vacancies.push_back(pos),
            group @ (Label::Red | Label::Blue) => {
                let window = sweep.window(pos, Neighborhood::Moore);
                if !satisfied(&window, group, self.config.threshold) {
                    self.dissatisfied.push(pos);
                }
            }
            _ => {}
        }
    }

    /// Pair shuffled dissatisfied agents with empty cells. Whatever is left
    /// over on either side is dropped; satisfaction is recomputed next tick.
    pub fn end_of_sweep<R: Rng + ?Sized>(&mut self, sweep: &mut Sweep<'_, R>) {
        self.dissatisfied.shuffle(sweep.rng());

        let wanting = self.dissatisfied.len();
        let mut moved = 0;
        for (agent, vacancy) in self.dissatisfied.drain(..).zip(self.vacancies.drain(..)) {
            sweep.swap(agent, vacancy);
            moved += 1;
        }

        if moved < wanting {
            log::debug!("{} dissatisfied agents found no empty cell", wanting - moved);
        }
    }
}

/// Zero occupied neighbors counts as satisfied for any threshold.
fn satisfied(window: &Window<'_>, group: Label, threshold: f64) -> bool {
    let (occupied, alike) = window
        .neighbors()
        .filter(|cell| cell.current() != Label::Empty)
        .fold((0usize, 0usize), |(occupied, alike), cell| {
            (occupied + 1, alike + usize::from(cell.current() == group))
        });

    occupied == 0 || alike as f64 / occupied as f64 >= threshold
}
