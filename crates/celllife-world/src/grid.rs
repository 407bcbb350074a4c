//! Square, bounded grid of cells and its step engine.

use crate::snapshot::GridSnapshot;
use celllife_core::{Cell, Error, GridConfig, PopulationStats, Result};
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{instrument, trace};

/// Normal and mutated neighbour counts around one coordinate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NeighbourCounts {
    pub normal: u32,
    pub mutated: u32,
}

/// What happened during one call to [`Grid::advance`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Cells whose kind changed in the transition phase
    pub changed: usize,
    /// Normal cells turned into mutated cells by the mutation pass
    pub mutations: usize,
}

/// A size x size grid without wrapping at its edges.
///
/// The random source is owned by the grid and drives both construction and
/// the mutation pass, so a seeded generator gives a reproducible run.
#[derive(Debug, Clone)]
pub struct Grid<R = ChaCha8Rng> {
    size: usize,
    mutation_chance: f64,
    cells: Vec<Cell>,
    // Back buffer for the transition phase; contents are stale between steps
    scratch: Vec<Cell>,
    rng: R,
}

impl Grid<ChaCha8Rng> {
    /// Create a grid using a ChaCha8 generator seeded with `seed`
    pub fn seeded(config: &GridConfig, seed: u64) -> Result<Self> {
        Self::new(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<R: Rng> Grid<R> {
    /// Populate a grid where every cell is independently normal with
    /// probability `life_chance`, dead otherwise. No cell starts mutated.
    pub fn new(config: &GridConfig, mut rng: R) -> Result<Self> {
        config.validate()?;

        let cells: Vec<Cell> = (0..config.size * config.size)
            .map(|_| {
                if rng.gen::<f64>() < config.life_chance {
                    Cell::normal()
                } else {
                    Cell::Dead
                }
            })
            .collect();

        Ok(Self {
            size: config.size,
            mutation_chance: config.mutation_chance,
            scratch: cells.clone(),
            cells,
            rng,
        })
    }

    /// Rebuild a grid from a snapshot, continuing with the given generator
    pub fn from_snapshot(snapshot: GridSnapshot, rng: R) -> Result<Self> {
        GridConfig::new(snapshot.size, 0.0, snapshot.mutation_chance).validate()?;

        let expected = snapshot.size * snapshot.size;
        if snapshot.cells.len() != expected {
            return Err(Error::InvalidState(format!(
                "snapshot holds {} cells, expected {} for size {}",
                snapshot.cells.len(),
                expected,
                snapshot.size
            )));
        }

        Ok(Self {
            size: snapshot.size,
            mutation_chance: snapshot.mutation_chance,
            scratch: snapshot.cells.clone(),
            cells: snapshot.cells,
            rng,
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn mutation_chance(&self) -> f64 {
        self.mutation_chance
    }

    /// Run one step: the transition phase followed by the mutation pass.
    pub fn simulate_step(&mut self) {
        self.advance();
    }

    /// Same as [`Grid::simulate_step`], reporting what changed
    #[instrument(level = "trace", skip(self), fields(size = self.size))]
    pub fn advance(&mut self) -> StepOutcome {
        let mut outcome = StepOutcome::default();

        // Transition phase: every cell reads neighbours from `cells` only
        for index in 0..self.cells.len() {
            let (x, y) = self.index_to_coordinate(index);
            let counts = self.count_neighbours(x, y);
            let current = self.cells[index];
            let next = current.next_stage(counts.normal, counts.mutated);
            if next.kind() != current.kind() {
                outcome.changed += 1;
            }
            self.scratch[index] = next;
        }

        std::mem::swap(&mut self.cells, &mut self.scratch);

        // Mutation pass over the committed grid
        for index in 0..self.cells.len() {
            if self.cells[index].is_alive() && self.mutate_index(index) {
                outcome.mutations += 1;
            }
        }

        trace!(
            changed = outcome.changed,
            mutations = outcome.mutations,
            "Grid advanced"
        );
        outcome
    }

    /// Attempt to mutate the normal cell at (x, y).
    ///
    /// Returns false without drawing when the coordinate is invalid or the
    /// cell there is not normal.
    pub fn mutate_cell(&mut self, x: i32, y: i32) -> bool {
        match self.index(x, y) {
            Some(index) => self.mutate_index(index),
            None => false,
        }
    }

    fn mutate_index(&mut self, index: usize) -> bool {
        if !self.cells[index].is_normal() {
            return false;
        }
        if self.rng.gen::<f64>() < self.mutation_chance {
            self.cells[index] = Cell::Mutated;
            true
        } else {
            false
        }
    }
}

impl<R> Grid<R> {
    pub fn is_valid_coordinate(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.size && (y as usize) < self.size
    }

    /// Count normal and mutated cells among the 8 neighbours of (x, y).
    /// Neighbours past the edge contribute nothing; an invalid centre
    /// yields zero counts.
    pub fn count_neighbours(&self, x: i32, y: i32) -> NeighbourCounts {
        let mut counts = NeighbourCounts::default();
        if !self.is_valid_coordinate(x, y) {
            return counts;
        }

        for dy in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dy == 0 {
                    continue;
                }
                let (Some(nx), Some(ny)) = (x.checked_add(dx), y.checked_add(dy)) else {
                    continue;
                };
                match self.get_cell(nx, ny) {
                    Some(Cell::Normal { .. }) => counts.normal += 1,
                    Some(Cell::Mutated) => counts.mutated += 1,
                    _ => {}
                }
            }
        }

        counts
    }

    pub fn count_normal_neighbours(&self, x: i32, y: i32) -> u32 {
        self.count_neighbours(x, y).normal
    }

    pub fn count_mutated_neighbours(&self, x: i32, y: i32) -> u32 {
        self.count_neighbours(x, y).mutated
    }

    /// Cell at (x, y), or `None` outside the grid
    pub fn get_cell(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|index| self.cells[index])
    }

    /// Overwrite the cell at (x, y); ignored outside the grid
    pub fn set_cell(&mut self, x: i32, y: i32, cell: Cell) {
        if let Some(index) = self.index(x, y) {
            self.cells[index] = cell;
        }
    }

    pub fn is_normal_cell(&self, x: i32, y: i32) -> bool {
        self.get_cell(x, y).is_some_and(|cell| cell.is_normal())
    }

    pub fn is_mutated_cell(&self, x: i32, y: i32) -> bool {
        self.get_cell(x, y).is_some_and(|cell| cell.is_mutated())
    }

    pub fn stats(&self) -> PopulationStats {
        PopulationStats::from_cells(&self.cells)
    }

    /// True when at least a tenth of the living cells are mutated.
    /// A grid with no living cells has no outbreak.
    pub fn is_outbreak_occurring(&self) -> bool {
        self.stats().is_outbreak()
    }

    pub fn snapshot(&self) -> GridSnapshot {
        GridSnapshot {
            size: self.size,
            mutation_chance: self.mutation_chance,
            cells: self.cells.clone(),
        }
    }

    /// Iterator over all cells with their (x, y) coordinates, row by row
    pub fn iter(&self) -> impl Iterator<Item = ((i32, i32), &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_coordinate(i), cell))
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if self.is_valid_coordinate(x, y) {
            Some(y as usize * self.size + x as usize)
        } else {
            None
        }
    }

    fn index_to_coordinate(&self, index: usize) -> (i32, i32) {
        ((index % self.size) as i32, (index / self.size) as i32)
    }
}
