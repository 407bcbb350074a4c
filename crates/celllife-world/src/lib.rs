//! Grid engine for the CellLife automaton.
//!
//! A [`Grid`] holds the cells and advances them one step at a time; a
//! [`Simulation`] drives a seeded grid for a configured number of steps and
//! records what happened along the way.

pub mod grid;
pub mod simulation;
pub mod snapshot;

pub use grid::{Grid, NeighbourCounts, StepOutcome};
pub use simulation::{Simulation, SimulationResult, StepReport};
pub use snapshot::GridSnapshot;
