//! Simulation runner that drives a seeded grid step by step.

use crate::grid::Grid;
use celllife_core::{PopulationStats, Result, SimulationConfig};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Upper bound on the report buffer reserved before a run starts
const PREALLOCATED_REPORTS: u64 = 4096;

pub struct Simulation {
    grid: Grid<ChaCha8Rng>,
    config: SimulationConfig,
    step: u64,
    outbreak_active: bool,
    outbreak_steps: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::seeded(&config.grid, config.seed)?;

        debug!(
            size = config.grid.size,
            life_chance = config.grid.life_chance,
            mutation_chance = config.grid.mutation_chance,
            seed = config.seed,
            "Simulation created"
        );

        Ok(Self {
            grid,
            config,
            step: 0,
            outbreak_active: false,
            outbreak_steps: 0,
        })
    }

    pub fn grid(&self) -> &Grid<ChaCha8Rng> {
        &self.grid
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Number of steps completed so far
    pub fn steps_taken(&self) -> u64 {
        self.step
    }

    /// Advance the grid by one step and report the resulting population
    pub fn step(&mut self) -> StepReport {
        let outcome = self.grid.advance();
        self.step += 1;

        let stats = self.grid.stats();
        let outbreak = stats.is_outbreak();
        if outbreak {
            self.outbreak_steps += 1;
        }

        if outbreak && !self.outbreak_active {
            warn!(
                event = "outbreak_started",
                step = self.step,
                living = stats.living(),
                mutated = stats.mutated,
                "Mutation outbreak detected"
            );
        } else if !outbreak && self.outbreak_active {
            info!(
                event = "outbreak_ended",
                step = self.step,
                living = stats.living(),
                mutated = stats.mutated,
                "Mutation outbreak over"
            );
        }
        self.outbreak_active = outbreak;

        StepReport {
            step: self.step,
            stats,
            outbreak,
            changed: outcome.changed,
            mutations: outcome.mutations,
        }
    }

    /// Run the simulation for the configured number of steps
    #[instrument(skip(self), fields(num_steps = self.config.num_steps, seed = self.config.seed))]
    pub fn run(&mut self) -> SimulationResult {
        info!("Starting simulation for {} steps", self.config.num_steps);

        let mut reports =
            Vec::with_capacity(self.config.num_steps.min(PREALLOCATED_REPORTS) as usize);
        for _ in 0..self.config.num_steps {
            let report = self.step();

            if self.config.log_interval > 0 && report.step % self.config.log_interval == 0 {
                info!(
                    "Step {}/{}: {} normal, {} mutated",
                    report.step,
                    self.config.num_steps,
                    report.stats.normal,
                    report.stats.mutated
                );
            }
            reports.push(report);
        }

        let result = SimulationResult {
            total_steps: self.step,
            outbreak_steps: self.outbreak_steps,
            final_stats: self.grid.stats(),
            reports,
        };

        info!(
            event = "run_summary",
            total_steps = result.total_steps,
            outbreak_steps = result.outbreak_steps,
            living = result.final_stats.living(),
            mutated = result.final_stats.mutated,
            mean_stamina = result.final_stats.mean_stamina,
            "Simulation complete"
        );

        result
    }
}

/// State of the grid after one step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    /// 1-based index of the step just completed
    pub step: u64,
    pub stats: PopulationStats,
    pub outbreak: bool,
    /// Cells whose kind changed during the transition phase
    pub changed: usize,
    /// Cells mutated during the mutation pass
    pub mutations: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub total_steps: u64,
    /// Steps that ended with an outbreak in progress
    pub outbreak_steps: u64,
    pub final_stats: PopulationStats,
    pub reports: Vec<StepReport>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use celllife_core::GridConfig;

    fn config(
        size: usize,
        life_chance: f64,
        mutation_chance: f64,
        num_steps: u64,
    ) -> SimulationConfig {
        SimulationConfig {
            num_steps,
            seed: 42,
            log_interval: 5,
            grid: GridConfig::new(size, life_chance, mutation_chance),
        }
    }

    #[test]
    fn test_simulation_creation() {
        let sim = Simulation::new(config(16, 0.3, 0.01, 10)).unwrap();
        assert_eq!(sim.steps_taken(), 0);
        assert_eq!(sim.grid().size(), 16);
        assert_eq!(sim.config().seed, 42);

        assert!(Simulation::new(config(0, 0.3, 0.01, 10)).is_err());
    }

    #[test]
    fn test_run_records_every_step() {
        let mut sim = Simulation::new(config(16, 0.4, 0.02, 12)).unwrap();
        let result = sim.run();

        assert_eq!(result.total_steps, 12);
        assert_eq!(result.reports.len(), 12);
        assert_eq!(result.reports.last().unwrap().stats, result.final_stats);
        for (i, report) in result.reports.iter().enumerate() {
            assert_eq!(report.step, i as u64 + 1);
            assert_eq!(report.stats.total(), 256);
        }
        let outbreaks = result.reports.iter().filter(|r| r.outbreak).count() as u64;
        assert_eq!(outbreaks, result.outbreak_steps);
    }

    #[test]
    fn test_same_seed_same_run() {
        let a = Simulation::new(config(20, 0.35, 0.05, 25)).unwrap().run();
        let b = Simulation::new(config(20, 0.35, 0.05, 25)).unwrap().run();
        assert_eq!(a, b);
    }

    #[test]
    fn test_oversized_run_rejected() {
        let err = Simulation::new(config(2, 0.5, 0.1, u64::MAX)).err().unwrap();
        assert!(matches!(err, celllife_core::Error::Validation(_)));
    }

    #[test]
    fn test_zero_step_run() {
        let result = Simulation::new(config(4, 0.5, 0.1, 0)).unwrap().run();
        assert_eq!(result.total_steps, 0);
        assert!(result.reports.is_empty());
        assert_eq!(result.final_stats.total(), 16);
    }

    #[test]
    fn test_dead_world_stays_dead() {
        let result = Simulation::new(config(10, 0.0, 1.0, 5)).unwrap().run();
        assert_eq!(result.final_stats.dead, 100);
        assert_eq!(result.outbreak_steps, 0);
        assert!(result.reports.iter().all(|r| r.changed == 0 && r.mutations == 0));
    }

    #[test]
    fn test_certain_mutation_leaves_no_normal_cells() {
        let mut sim = Simulation::new(config(24, 0.5, 1.0, 1)).unwrap();
        let report = sim.step();

        assert_eq!(report.stats.normal, 0);
        assert_eq!(report.outbreak, report.stats.living() > 0);
        assert!(report.mutations <= report.stats.mutated);
    }

    #[test]
    fn test_step_report_serialization() {
        let mut sim = Simulation::new(config(8, 0.5, 0.1, 1)).unwrap();
        let report = sim.step();
        let value = serde_json::to_value(report).unwrap();
        assert_eq!(value["step"], 1);
        assert_eq!(value["outbreak"], report.outbreak);
        assert_eq!(value["stats"]["normal"], report.stats.normal);
        assert_eq!(value["mutations"], report.mutations);
    }
}
