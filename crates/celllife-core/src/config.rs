//! Configuration types for the simulation.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Largest number of cells a grid may hold (a 4096 x 4096 grid).
/// The grid keeps two buffers of this many cells.
pub const MAX_CELLS: usize = 1 << 24;

/// Largest number of steps a single run may take. A run keeps one report
/// per step.
pub const MAX_STEPS: u64 = 1_000_000;

/// Grid construction parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Side length; the grid holds size x size cells
    pub size: usize,
    /// Probability of each cell starting out as a normal cell (0.0 to 1.0)
    pub life_chance: f64,
    /// Probability that a normal cell mutates during a mutation pass (0.0 to 1.0)
    pub mutation_chance: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 64,
            life_chance: 0.3,
            mutation_chance: 0.01,
        }
    }
}

impl GridConfig {
    pub fn new(size: usize, life_chance: f64, mutation_chance: f64) -> Self {
        Self {
            size,
            life_chance,
            mutation_chance,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.size == 0 {
            return Err(Error::Validation("grid size must be positive".to_string()));
        }
        // MAX_CELLS also keeps every coordinate within i32
        match self.size.checked_mul(self.size) {
            Some(cells) if cells <= MAX_CELLS => {}
            _ => {
                return Err(Error::Validation(format!(
                    "grid size {} exceeds the limit of {} cells",
                    self.size, MAX_CELLS
                )));
            }
        }
        validate_probability("life_chance", self.life_chance)?;
        validate_probability("mutation_chance", self.mutation_chance)?;
        Ok(())
    }
}

/// Parameters for a full simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of steps to run
    pub num_steps: u64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Emit a progress event every this many steps (0 disables progress logging)
    pub log_interval: u64,
    /// Grid configuration
    pub grid: GridConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_steps: 1_000,
            seed: 0,
            log_interval: 100,
            grid: GridConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimulationConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_steps > MAX_STEPS {
            return Err(Error::Validation(format!(
                "num_steps {} exceeds the limit of {}",
                self.num_steps, MAX_STEPS
            )));
        }
        self.grid.validate()
    }
}

fn validate_probability(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )))
    }
}
