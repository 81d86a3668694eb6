//! Wa-Tor style predator/prey ecology on the von Neumann neighborhood.
//!
//! Fish move into open water. Sharks eat an adjacent fish or move like
//! fish, and starve once the shared energy pool is spent. Because commit is
//! deferred, a shark processed after a fish can still catch it: the fish's
//! staged move is withdrawn and the shark takes the fish's original cell.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::compute::{Cell, Color, Label, Neighborhood, Position, Sweep};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PredatorPreyConfig {
    /// Shared shark energy pool.
    pub shark_energy: u32,
    /// Ticks between shark births.
    pub shark_breed_time: u32,
    /// Ticks between fish births.
    pub fish_breed_time: u32,
    /// Ticks left until sharks may breed. Defaults to `shark_breed_time`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shark_breed_countdown: Option<u32>,
    /// Ticks left until fish may breed. Defaults to `fish_breed_time`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fish_breed_countdown: Option<u32>,
}

impl Default for PredatorPreyConfig {
    fn default() -> Self {
        Self {
            shark_energy: 5,
            shark_breed_time: 6,
            fish_breed_time: 3,
            shark_breed_countdown: None,
            fish_breed_countdown: None,
        }
    }
}

/// Species-wide reproduction cooldown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breeding {
    breed_time: u32,
    countdown: u32,
    acted: bool,
    /// Births staged this sweep that are still standing.
    births: u32,
}

impl Breeding {
    fn new(breed_time: u32, countdown: Option<u32>) -> Self {
        Self {
            breed_time,
            countdown: countdown.unwrap_or(breed_time),
            acted: false,
            births: 0,
        }
    }

    /// Ticks left before the species may breed.
    pub fn countdown(&self) -> u32 {
        self.countdown
    }

    /// Label left behind at a vacated cell.
    fn vacated(&mut self, species: Label) -> Label {
        if self.countdown == 0 {
            self.births += 1;
            species
        } else {
            Label::Water
        }
    }

    /// A staged birth was taken back.
    fn withdraw_birth(&mut self) {
        self.births = self.births.saturating_sub(1);
    }

    /// Reset after a birth, otherwise count down if the species acted.
    fn settle(&mut self) {
        if self.births > 0 {
            self.countdown = self.breed_time;
        } else if self.acted {
            self.countdown = self.countdown.saturating_sub(1);
        }
        self.acted = false;
        self.births = 0;
    }
}

#[derive(Debug, Clone)]
pub struct PredatorPreyRules {
    energy: u32,
    shark: Breeding,
    fish: Breeding,
}

impl PredatorPreyRules {
    pub const ID: &'static str = "predator_prey";
    pub const ALPHABET: &'static [Label] = &[Label::Water, Label::Fish, Label::Shark];

    pub fn new(config: PredatorPreyConfig) -> Self {
        Self {
            energy: config.shark_energy,
            shark: Breeding::new(config.shark_breed_time, config.shark_breed_countdown),
            fish: Breeding::new(config.fish_breed_time, config.fish_breed_countdown),
        }
    }

    /// Snapshot of the current counters as a config.
    pub fn config(&self) -> PredatorPreyConfig {
        PredatorPreyConfig {
            shark_energy: self.energy,
            shark_breed_time: self.shark.breed_time,
            fish_breed_time: self.fish.breed_time,
            shark_breed_countdown: Some(self.shark.countdown),
            fish_breed_countdown: Some(self.fish.countdown),
        }
    }

    pub fn energy(&self) -> u32 {
        self.energy
    }

    pub fn shark_breeding(&self) -> &Breeding {
        &self.shark
    }

    pub fn fish_breeding(&self) -> &Breeding {
        &self.fish
    }

    pub(crate) fn color(label: Label) -> Option<Color> {
        match label {
            Label::Fish => Some(Color::TEAL),
            Label::Shark => Some(Color::GRAY),
            Label::Water => Some(Color::BLUE),
            _ => None,
        }
    }

    pub fn apply<R: Rng + ?Sized>(&mut self, pos: Position, sweep: &mut Sweep<'_, R>) {
        match sweep.cell(pos).current() {
            Label::Fish => self.handle_fish(pos, sweep),
            Label::Shark => self.handle_shark(pos, sweep),
            _ => {}
        }
    }

    pub fn end_of_sweep(&mut self) {
        self.shark.settle();
        self.fish.settle();
    }

    fn handle_fish<R: Rng + ?Sized>(&mut self, pos: Position, sweep: &mut Sweep<'_, R>) {
        // Caught by a shark processed earlier in this sweep.
        if sweep.cell(pos).next() == Some(Label::Shark) {
            return;
        }
        self.fish.acted = true;

        let water = candidates(sweep, pos, open_water);
        if let Some(&dest) = water.choose(sweep.rng()) {
            let left = self.fish.vacated(Label::Fish);
            relocate(sweep, pos, dest, Label::Fish, left);
        }
    }

    fn handle_shark<R: Rng + ?Sized>(&mut self, pos: Position, sweep: &mut Sweep<'_, R>) {
        self.shark.acted = true;

        let prey = candidates(sweep, pos, uncaught_fish);
        if let Some(&fish) = prey.choose(sweep.rng()) {
            self.eat(sweep, pos, fish);
            self.energy = self.energy.saturating_add(1);
            return;
        }

        if self.energy == 0 {
            log::trace!("shark at ({}, {}) starved", pos.row, pos.col);
            sweep.stage(pos, Label::Water);
            return;
        }

        let water = candidates(sweep, pos, open_water);
        if let Some(&dest) = water.choose(sweep.rng()) {
            let left = self.shark.vacated(Label::Shark);
            relocate(sweep, pos, dest, Label::Shark, left);
        }
        self.energy -= 1;
    }

    fn eat<R: Rng + ?Sized>(&mut self, sweep: &mut Sweep<'_, R>, shark: Position, fish: Position) {
        // The fish already staged a move this sweep; take it back so the
        // fish is caught where it stood.
        if let Some(fled_to) = sweep.cell(fish).intended() {
            log::trace!(
                "undoing fish move ({}, {}) -> ({}, {})",
                fish.row,
                fish.col,
                fled_to.row,
                fled_to.col
            );
            sweep.unstage(fled_to);
            if sweep.cell(fish).next() == Some(Label::Fish) {
                self.fish.withdraw_birth();
            }
        }

        let left = self.shark.vacated(Label::Shark);
        sweep.stage(fish, Label::Shark);
        sweep.stage(shark, left);
        sweep.set_intended(shark, fish);
    }
}

/// Water nobody has claimed yet this sweep.
fn open_water(cell: &Cell) -> bool {
    cell.current() == Label::Water && cell.next().is_none()
}

/// Fish no other shark has claimed this sweep.
fn uncaught_fish(cell: &Cell) -> bool {
    cell.current() == Label::Fish && cell.next() != Some(Label::Shark)
}

/// Matching cardinal neighbors, deduplicated (narrow wrapping grids fold
/// opposite neighbors onto the same cell).
fn candidates<R: Rng + ?Sized>(
    sweep: &Sweep<'_, R>,
    pos: Position,
    accept: fn(&Cell) -> bool,
) -> Vec<Position> {
    let mut found: Vec<Position> = sweep
        .window(pos, Neighborhood::VonNeumann)
        .cardinal()
        .filter(|cell| accept(cell))
        .map(Cell::position)
        .collect();
    found.sort();
    found.dedup();
    found
}

fn relocate<R: Rng + ?Sized>(
    sweep: &mut Sweep<'_, R>,
    from: Position,
    to: Position,
    species: Label,
    left: Label,
) {
    sweep.stage(to, species);
    sweep.stage(from, left);
    sweep.set_intended(from, to);
}
