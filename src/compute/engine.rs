//! Rule engine: sweep, end-of-sweep reconciliation and deferred commit.
//!
//! One call to [`RuleEngine::tick`] runs the full protocol:
//!
//! 1. Every cell is handed to the active rule set in row-major order. Rules
//!    read committed labels from the grid, may read labels staged earlier
//!    in the same sweep, and stage new ones through [`Sweep`].
//! 2. The rule set's end-of-sweep hook runs exactly once.
//! 3. Every staged cell is committed and the worklist is emptied.
//!
//! Cells that were never staged keep their committed label.

use rand::Rng;

use super::{
    Cell, Color, Grid, Label, Neighborhood, Parameters, Position, RuleError, Rules, Window,
    Worklist,
};

/// Mutable view of one tick, handed to rule sets.
///
/// All cross-cell effects go through here so that every staged cell is
/// queued for commit exactly once.
pub struct Sweep<'a, R: Rng + ?Sized> {
    grid: &'a mut Grid,
    worklist: &'a mut Worklist,
    rng: &'a mut R,
}

impl<'a, R: Rng + ?Sized> Sweep<'a, R> {
    pub fn new(grid: &'a mut Grid, worklist: &'a mut Worklist, rng: &'a mut R) -> Self {
        Self {
            grid,
            worklist,
            rng,
        }
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &*self.grid
    }

    #[inline]
    pub fn cell(&self, pos: Position) -> &Cell {
        self.grid.cell(pos)
    }

    #[inline]
    pub fn window(&self, pos: Position, kind: Neighborhood) -> Window<'_> {
        self.grid.window(pos, kind)
    }

    /// Injected random source.
    #[inline]
    pub fn rng(&mut self) -> &mut R {
        &mut *self.rng
    }

    /// Stage `label` as the next state of `pos` and queue it for commit.
    pub fn stage(&mut self, pos: Position, label: Label) {
        self.grid.cell_mut(pos).set_next(label);
        self.worklist.push(pos);
        log::trace!("staged ({}, {}) -> {}", pos.row, pos.col, label);
    }

    /// Withdraw a staged state so the cell keeps its committed label.
    pub fn unstage(&mut self, pos: Position) {
        self.grid.cell_mut(pos).clear_next();
        self.worklist.remove(pos);
        log::trace!("unstaged ({}, {})", pos.row, pos.col);
    }

    /// Record that the agent at `from` claimed `to`.
    pub fn set_intended(&mut self, from: Position, to: Position) {
        self.grid.cell_mut(from).set_intended(to);
    }

    /// Exchange the committed labels of two cells at commit time.
    pub fn swap(&mut self, from: Position, to: Position) {
        let moving = self.grid.cell(from).current();
        let displaced = self.grid.cell(to).current();
        self.stage(to, moving);
        self.stage(from, displaced);
        self.set_intended(from, to);
    }
}

/// Active rule set plus the per-tick deferred worklist.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Rules,
    worklist: Worklist,
    generation: u64,
}

impl RuleEngine {
    /// Build the rule set named by `variant` from a named parameter map.
    pub fn new(variant: &str, parameters: &Parameters) -> Result<Self, RuleError> {
        Rules::from_parameters(variant, parameters).map(Self::from_rules)
    }

    pub fn from_rules(rules: Rules) -> Self {
        Self {
            rules,
            worklist: Worklist::new(),
            generation: 0,
        }
    }

    /// Advance `grid` by one generation.
    pub fn tick<R: Rng + ?Sized>(&mut self, grid: &mut Grid, rng: &mut R) {
        let mut sweep = Sweep::new(grid, &mut self.worklist, rng);

        for pos in sweep.grid().positions() {
            self.rules.apply(pos, &mut sweep);
        }
        self.rules.end_of_sweep(&mut sweep);

        let staged = self.worklist.len();
        for pos in self.worklist.drain() {
            grid.cell_mut(pos).commit();
        }
        self.generation += 1;

        log::debug!(
            "{} generation {}: committed {} cells",
            self.rules.name(),
            self.generation,
            staged
        );
    }

    /// Check that every committed label in `grid` belongs to this rule set.
    pub fn validate(&self, grid: &Grid) -> Result<(), RuleError> {
        let alphabet = self.rules.alphabet();
        match grid.iter().find(|cell| !alphabet.contains(&cell.current())) {
            Some(cell) => Err(RuleError::LabelNotInAlphabet {
                label: cell.current(),
                variant: self.rules.name(),
                row: cell.row(),
                col: cell.col(),
            }),
            None => Ok(()),
        }
    }

    #[inline]
    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    /// Ticks completed so far.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn name(&self) -> &'static str {
        self.rules.name()
    }

    pub fn alphabet(&self) -> &'static [Label] {
        self.rules.alphabet()
    }

    /// Current parameter values, including counters the rule set evolves.
    pub fn parameters(&self) -> Parameters {
        self.rules.parameters()
    }

    pub fn display_attribute(&self, label: Label) -> Color {
        self.rules.display_attribute(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::Topology;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn params(json: serde_json::Value) -> Parameters {
        match json {
            serde_json::Value::Object(map) => map,
            _ => Parameters::new(),
        }
    }

    #[test]
    fn test_unknown_variant() {
        assert!(matches!(
            RuleEngine::new("langton", &Parameters::new()),
            Err(RuleError::UnknownVariant(name)) if name == "langton"
        ));
    }

    #[test]
    fn test_variant_names_are_normalized() {
        let names = [
            "Segregation",
            "Predator Prey",
            "predator_prey",
            "Game-of-Life",
            "SUGARSCAPE",
        ];
        for name in names {
            assert!(RuleEngine::new(name, &Parameters::new()).is_ok(), "{name}");
        }
    }

    #[test]
    fn test_validate_rejects_foreign_labels() {
        let engine = RuleEngine::new("segregation", &Parameters::new()).unwrap();
        let grid = Grid::filled(2, 2, Topology::Bounded, Label::Fish).unwrap();
        assert!(matches!(
            engine.validate(&grid),
            Err(RuleError::LabelNotInAlphabet { label: Label::Fish, .. })
        ));
    }

    #[test]
    fn test_blinker_oscillates() {
        let mut engine = RuleEngine::new("life", &Parameters::new()).unwrap();
        let mut labels = vec![vec![Label::Dead; 5]; 5];
        for c in 1..4 {
            labels[2][c] = Label::Alive;
        }
        let mut grid = Grid::new(5, 5, Topology::Bounded, labels.clone()).unwrap();
        let mut rng = StdRng::seed_from_u64(0);

        engine.tick(&mut grid, &mut rng);
        for r in 1..4 {
            assert_eq!(grid.label(r, 2).unwrap(), Label::Alive);
        }
        assert_eq!(grid.label(2, 1).unwrap(), Label::Dead);

        engine.tick(&mut grid, &mut rng);
        assert_eq!(grid.labels(), labels);
        assert_eq!(engine.generation(), 2);
    }

    #[test]
    fn test_commit_clears_provisional_slots() {
        let parameters = params(serde_json::json!({ "threshold": 0.5 }));
        let mut engine = RuleEngine::new("segregation", &parameters).unwrap();
        let labels = vec![
            vec![Label::Empty, Label::Blue, Label::Blue],
            vec![Label::Blue, Label::Red, Label::Blue],
            vec![Label::Blue, Label::Blue, Label::Blue],
        ];
        let mut grid = Grid::new(3, 3, Topology::Bounded, labels).unwrap();
        engine.tick(&mut grid, &mut StdRng::seed_from_u64(3));

        for cell in grid.iter() {
            assert_eq!(cell.next(), None);
            assert_eq!(cell.intended(), None);
        }
    }

    #[test]
    fn test_parameters_and_display_dispatch() {
        let parameters = params(serde_json::json!({ "threshold": 0.3 }));
        let engine = RuleEngine::new("segregation", &parameters).unwrap();
        assert_eq!(engine.parameters()["threshold"], serde_json::json!(0.3));
        assert_eq!(engine.display_attribute(Label::Red), Color::RED);
        assert_eq!(engine.display_attribute(Label::Shark), Color::ERROR);
        assert_eq!(engine.name(), "Segregation");
    }

    fn life_grid() -> impl Strategy<Value = Vec<Vec<Label>>> {
        let label = prop::bool::ANY.prop_map(|alive| {
            if alive { Label::Alive } else { Label::Dead }
        });
        prop::collection::vec(prop::collection::vec(label, 6), 6)
    }

    proptest! {
        #[test]
        fn prop_unstaged_cells_keep_their_state(labels in life_grid(), wrap in any::<bool>()) {
            let topology = if wrap { Topology::Wrapping } else { Topology::Bounded };
            let mut grid = Grid::new(6, 6, topology, labels).unwrap();
            let before = grid.clone();
            let mut engine = RuleEngine::new("life", &Parameters::new()).unwrap();
            let mut rng = StdRng::seed_from_u64(1);

            // Stage through a sweep of our own to learn which cells the rule touches.
            let mut probe = before.clone();
            let mut worklist = Worklist::new();
            {
                let mut rules = engine.rules().clone();
                let mut sweep = Sweep::new(&mut probe, &mut worklist, &mut rng);
                for pos in before.positions() {
                    rules.apply(pos, &mut sweep);
                }
            }

            engine.tick(&mut grid, &mut rng);
            for pos in before.positions() {
                if !worklist.contains(pos) {
                    prop_assert_eq!(grid.cell(pos).current(), before.cell(pos).current());
                }
            }
        }
    }
}
