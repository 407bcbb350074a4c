//! In-memory checkpoints of a grid.

use celllife_core::{Cell, Result};
use serde::{Deserialize, Serialize};

/// Full grid state, cells stored row by row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    pub size: usize,
    pub mutation_chance: f64,
    pub cells: Vec<Cell>,
}

impl GridSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
