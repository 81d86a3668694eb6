//! Sugarscape foraging: agents harvest regrowing sugar and move toward the
//! richest neighboring patch.
//!
//! Patch stock lives in the rule set, indexed like the grid. Regrowth is
//! applied to each cell as the sweep reaches it; agent moves are staged and
//! committed like any other rule.

use std::collections::HashMap;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::RuleError;
use crate::compute::{Cell, Color, Label, Neighborhood, Position, Sweep};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SugarscapeConfig {
    /// Patch capacity, also the starting stock of every patch.
    pub max_sugar: u32,
    /// Sugar added to every patch per tick, up to capacity.
    pub growback_rate: u32,
    /// Sugar an agent burns per tick.
    pub metabolism: u32,
    /// Reserve an agent starts with.
    pub initial_reserve: u32,
}

impl Default for SugarscapeConfig {
    fn default() -> Self {
        Self {
            max_sugar: 4,
            growback_rate: 1,
            metabolism: 1,
            initial_reserve: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Patch {
    sugar: u32,
    capacity: u32,
}

impl Patch {
    fn harvest(&mut self) -> u32 {
        std::mem::take(&mut self.sugar)
    }

    fn grow(&mut self, rate: u32) {
        self.sugar = self.sugar.saturating_add(rate).min(self.capacity);
    }
}

#[derive(Debug, Clone)]
pub struct SugarscapeRules {
    config: SugarscapeConfig,
    /// Row-major patch stock; sized on the first sweep.
    patches: Vec<Patch>,
    /// Agent reserves keyed by committed position.
    reserves: HashMap<Position, u32>,
    /// Reserves keyed by the position each agent will occupy after commit.
    pending: HashMap<Position, u32>,
}

impl SugarscapeRules {
    pub const ID: &'static str = "sugarscape";
    pub const ALPHABET: &'static [Label] = &[Label::Patch, Label::Agent];

    pub fn new(config: SugarscapeConfig) -> Result<Self, RuleError> {
        if config.max_sugar == 0 {
            return Err(RuleError::OutOfRange {
                variant: Self::ID,
                name: "max_sugar",
                reason: "patch capacity must be non-zero".to_string(),
            });
        }
        Ok(Self {
            config,
            patches: Vec::new(),
            reserves: HashMap::new(),
            pending: HashMap::new(),
        })
    }

    pub fn config(&self) -> &SugarscapeConfig {
        &self.config
    }

    pub(crate) fn color(label: Label) -> Option<Color> {
        match label {
            Label::Patch => Some(Color::rgb(250, 220, 120)),
            Label::Agent => Some(Color::RED),
            _ => None,
        }
    }

    /// Sugar stock at a flat row-major index, if patches are initialized.
    pub fn sugar(&self, index: usize) -> Option<u32> {
        self.patches.get(index).map(|patch| patch.sugar)
    }

    /// Reserve of the agent committed at `pos`.
    pub fn reserve(&self, pos: Position) -> Option<u32> {
        self.reserves.get(&pos).copied()
    }

    fn ensure_patches(&mut self, len: usize) {
        if self.patches.len() != len {
            let full = Patch {
                sugar: self.config.max_sugar,
                capacity: self.config.max_sugar,
            };
            self.patches = vec![full; len];
        }
    }

    pub fn apply<R: Rng + ?Sized>(&mut self, pos: Position, sweep: &mut Sweep<'_, R>) {
        self.ensure_patches(sweep.grid().len());
        let index = sweep.grid().index_of(pos);

        if sweep.cell(pos).current() == Label::Agent {
            self.forage(pos, index, sweep);
        }
        self.patches[index].grow(self.config.growback_rate);
    }

    fn forage<R: Rng + ?Sized>(&mut self, pos: Position, index: usize, sweep: &mut Sweep<'_, R>) {
        let reserve = self
            .reserves
            .remove(&pos)
            .unwrap_or(self.config.initial_reserve)
            .saturating_add(self.patches[index].harvest());

        let Some(reserve) = reserve.checked_sub(self.config.metabolism) else {
            log::trace!("agent at ({}, {}) starved", pos.row, pos.col);
            sweep.stage(pos, Label::Patch);
            return;
        };

        let dest = self.richest_patch(pos, sweep);
        if let Some(dest) = dest {
            sweep.swap(pos, dest);
        }
        self.pending.insert(dest.unwrap_or(pos), reserve);
    }

    /// Unclaimed neighboring patch with the most sugar, ties broken at random.
    fn richest_patch<R: Rng + ?Sized>(
        &self,
        pos: Position,
        sweep: &mut Sweep<'_, R>,
    ) -> Option<Position> {
        let grid = sweep.grid();
        let mut open: Vec<(Position, u32)> = sweep
            .window(pos, Neighborhood::VonNeumann)
            .cardinal()
            .filter(|cell| cell.current() == Label::Patch && cell.next().is_none())
            .map(Cell::position)
            .map(|p| (p, self.patches[grid.index_of(p)].sugar))
            .collect();
        open.sort();
        open.dedup();

        let best = open.iter().map(|&(_, sugar)| sugar).max()?;
        let richest: Vec<Position> = open
            .into_iter()
            .filter(|&(_, sugar)| sugar == best)
            .map(|(p, _)| p)
            .collect();
        richest.choose(sweep.rng()).copied()
    }

    /// Re-key agent reserves by where each agent stands after commit.
    pub fn end_of_sweep(&mut self) {
        self.reserves = std::mem::take(&mut self.pending);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{Grid, RuleEngine, Rules, Topology};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn rules(engine: &RuleEngine) -> &SugarscapeRules {
        match engine.rules() {
            Rules::Sugarscape(rules) => rules,
            other => panic!("unexpected rules {}", other.name()),
        }
    }

    fn engine(config: SugarscapeConfig) -> RuleEngine {
        RuleEngine::from_rules(Rules::Sugarscape(SugarscapeRules::new(config).unwrap()))
    }

    fn agent_then_patch() -> Grid {
        let labels = vec![vec![Label::Agent, Label::Patch]];
        Grid::new(1, 2, Topology::Bounded, labels).unwrap()
    }

    #[test]
    fn test_agent_harvests_and_moves() {
        let mut grid = agent_then_patch();
        let mut engine = engine(SugarscapeConfig::default());
        engine.tick(&mut grid, &mut StdRng::seed_from_u64(0));

        assert_eq!(grid.labels(), vec![vec![Label::Patch, Label::Agent]]);
        // 5 starting reserve + 4 harvested - 1 metabolism.
        assert_eq!(rules(&engine).reserve(Position::new(0, 1)), Some(8));
        // Harvested patch regrew by one; the destination was already full.
        assert_eq!(rules(&engine).sugar(0), Some(1));
        assert_eq!(rules(&engine).sugar(1), Some(4));
    }

    #[test]
    fn test_agent_prefers_richer_patch() {
        let config = SugarscapeConfig {
            growback_rate: 0,
            ..SugarscapeConfig::default()
        };
        let mut sugarscape = SugarscapeRules::new(config).unwrap();
        sugarscape.patches = [1, 4, 3]
            .map(|sugar| Patch { sugar, capacity: 4 })
            .to_vec();
        let mut engine = RuleEngine::from_rules(Rules::Sugarscape(sugarscape));
        let labels = vec![vec![Label::Patch, Label::Agent, Label::Patch]];
        let mut grid = Grid::new(1, 3, Topology::Bounded, labels).unwrap();
        engine.tick(&mut grid, &mut StdRng::seed_from_u64(0));

        assert_eq!(grid.labels(), vec![vec![Label::Patch, Label::Patch, Label::Agent]]);
        assert_eq!(rules(&engine).reserve(Position::new(0, 2)), Some(8));
        assert_eq!(rules(&engine).sugar(1), Some(0));
    }

    #[test]
    fn test_agents_never_collide() {
        let config = SugarscapeConfig {
            metabolism: 0,
            ..SugarscapeConfig::default()
        };
        let labels = vec![vec![Label::Patch, Label::Agent, Label::Patch, Label::Agent]];
        let mut grid = Grid::new(1, 4, Topology::Wrapping, labels).unwrap();
        let mut engine = engine(config);
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            engine.tick(&mut grid, &mut rng);
            assert_eq!(grid.census()[&Label::Agent], 2);
            assert_eq!(rules(&engine).reserves.len(), 2);
        }
    }

    #[test]
    fn test_agent_starves_without_sugar() {
        let config = SugarscapeConfig {
            max_sugar: 1,
            growback_rate: 0,
            metabolism: 3,
            initial_reserve: 0,
        };
        let mut grid = Grid::new(1, 1, Topology::Bounded, vec![vec![Label::Agent]]).unwrap();
        let mut engine = engine(config);
        engine.tick(&mut grid, &mut StdRng::seed_from_u64(0));
        assert_eq!(grid.label(0, 0).unwrap(), Label::Patch);
        assert_eq!(rules(&engine).reserve(Position::new(0, 0)), None);
    }

    #[test]
    fn test_reserve_saturates_instead_of_overflowing() {
        let config = SugarscapeConfig {
            initial_reserve: u32::MAX,
            metabolism: 0,
            ..SugarscapeConfig::default()
        };
        let mut grid = agent_then_patch();
        let mut engine = engine(config);
        engine.tick(&mut grid, &mut StdRng::seed_from_u64(0));

        assert_eq!(grid.labels(), vec![vec![Label::Patch, Label::Agent]]);
        assert_eq!(rules(&engine).reserve(Position::new(0, 1)), Some(u32::MAX));
    }

    #[test]
    fn test_regrowth_caps_at_capacity() {
        let mut patch = Patch { sugar: 3, capacity: 4 };
        patch.grow(5);
        assert_eq!(patch.sugar, 4);
        assert_eq!(patch.harvest(), 4);
        assert_eq!(patch.sugar, 0);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = SugarscapeConfig {
            max_sugar: 0,
            ..SugarscapeConfig::default()
        };
        assert!(SugarscapeRules::new(config).is_err());
    }
}
