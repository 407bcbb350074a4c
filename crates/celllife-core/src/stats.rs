//! Population statistics and outbreak detection.

use crate::Cell;
use serde::{Deserialize, Serialize};

/// Minimum share of living cells that must be mutated for an outbreak
pub const OUTBREAK_THRESHOLD: f64 = 0.1;

/// Census of a grid at one point in time
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PopulationStats {
    pub dead: usize,
    pub normal: usize,
    pub mutated: usize,
    /// Mean stamina over normal cells, 0.0 when there are none
    pub mean_stamina: f64,
}

impl PopulationStats {
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = &'a Cell>) -> Self {
        let mut stats = Self::default();
        let mut stamina_total = 0.0;

        for cell in cells {
            match cell {
                Cell::Dead => stats.dead += 1,
                Cell::Normal { stamina } => {
                    stats.normal += 1;
                    stamina_total += stamina;
                }
                Cell::Mutated => stats.mutated += 1,
            }
        }

        if stats.normal > 0 {
            stats.mean_stamina = stamina_total / stats.normal as f64;
        }
        stats
    }

    /// Normal plus mutated cells
    pub fn living(&self) -> usize {
        self.normal + self.mutated
    }

    pub fn total(&self) -> usize {
        self.dead + self.living()
    }

    /// Share of living cells that are mutated, `None` when nothing is alive
    pub fn mutated_ratio(&self) -> Option<f64> {
        match self.living() {
            0 => None,
            living => Some(self.mutated as f64 / living as f64),
        }
    }

    /// An empty population never counts as an outbreak.
    pub fn is_outbreak(&self) -> bool {
        self.mutated_ratio().is_some_and(|ratio| ratio >= OUTBREAK_THRESHOLD)
    }
}
