//! Annealing for the 0/1 knapsack problem.

use rand::Rng;

use super::config::AnnealConfig;
use super::runner::Annealer;
use super::types::{flip_random, AnnealProblem, StepResult};
use crate::error::Result;
use crate::instance::KnapsackInstance;

/// Knapsack as an annealing problem.
///
/// Overweight selections score `capacity - weight` (negative), feasible
/// ones their total value, so any feasible selection beats any infeasible
/// one.
#[derive(Debug, Clone, Copy)]
pub struct KnapsackProblem<'a> {
    instance: &'a KnapsackInstance,
}

impl<'a> KnapsackProblem<'a> {
    pub fn new(instance: &'a KnapsackInstance) -> Self {
        Self { instance }
    }
}

impl AnnealProblem for KnapsackProblem<'_> {
    type Config = Vec<bool>;

    fn initial_config<R: Rng>(&self, _rng: &mut R) -> Vec<bool> {
        vec![false; self.instance.len()]
    }

    fn transition<R: Rng>(&self, config: &Vec<bool>, rng: &mut R) -> Vec<bool> {
        flip_random(config, rng)
    }

    fn objective(&self, config: &Vec<bool>) -> f64 {
        let weight = self.instance.weight_of(config);
        let capacity = self.instance.capacity();
        if weight > capacity {
            -((weight - capacity) as f64)
        } else {
            self.instance.value_of(config) as f64
        }
    }
}

/// Simulated annealing solver for knapsack instances.
///
/// # Examples
///
/// ```
/// use u_kop::anneal::KnapsackAnnealSolver;
/// use u_kop::instance::KnapsackInstance;
///
/// let instance = KnapsackInstance::new(4, vec![1, 2, 3], vec![4, 5, 6]).unwrap();
/// let config = KnapsackAnnealSolver::default_config().with_seed(42);
/// let mut solver = KnapsackAnnealSolver::new(config).unwrap();
/// let objective = solver.solve(&instance);
/// assert!(objective <= 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct KnapsackAnnealSolver {
    annealer: Annealer<Vec<bool>>,
}

impl KnapsackAnnealSolver {
    /// Engine defaults with a sliding window of 25 steps.
    pub fn default_config() -> AnnealConfig {
        AnnealConfig::default().with_sliding_window_size(25)
    }

    pub fn new(config: AnnealConfig) -> Result<Self> {
        Ok(Self {
            annealer: Annealer::new(config)?,
        })
    }

    /// Anneals with the seed from the configuration and returns the final
    /// objective.
    pub fn solve(&mut self, instance: &KnapsackInstance) -> f64 {
        self.annealer.solve(&KnapsackProblem::new(instance))
    }

    pub fn solve_with_rng<R: Rng>(&mut self, instance: &KnapsackInstance, rng: &mut R) -> f64 {
        self.annealer
            .solve_with_rng(&KnapsackProblem::new(instance), rng)
    }

    /// Final configuration of the last run; empty before the first run.
    pub fn config(&self) -> &[bool] {
        self.annealer
            .current()
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn objective(&self) -> f64 {
        self.annealer.objective()
    }

    pub fn temperature(&self) -> f64 {
        self.annealer.temperature()
    }

    pub fn history(&self) -> &[StepResult] {
        self.annealer.history()
    }

    pub fn steps_still(&self) -> usize {
        self.annealer.steps_still()
    }
}

impl Default for KnapsackAnnealSolver {
    fn default() -> Self {
        Self {
            annealer: Annealer::new(Self::default_config()).expect("default config is valid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> KnapsackInstance {
        KnapsackInstance::new(4, vec![1, 2, 3], vec![4, 5, 6]).unwrap()
    }

    #[test]
    fn test_objective_feasible_and_penalized() {
        let inst = sample();
        let problem = KnapsackProblem::new(&inst);
        assert_eq!(problem.objective(&vec![false, false, false]), 0.0);
        assert_eq!(problem.objective(&vec![true, false, true]), 10.0);
        // weight 5 on capacity 4
        assert_eq!(problem.objective(&vec![false, true, true]), -1.0);
        assert_eq!(problem.objective(&vec![true, true, true]), -2.0);
    }

    #[test]
    fn test_initial_config_empty_selection() {
        let inst = sample();
        let problem = KnapsackProblem::new(&inst);
        let mut rng = u_numflow::random::create_rng(1);
        assert_eq!(problem.initial_config(&mut rng), vec![false; 3]);
    }

    #[test]
    fn test_solve_ends_feasible() {
        let inst = KnapsackInstance::new(
            30,
            vec![12, 7, 11, 8, 9, 5, 14, 6, 10, 3],
            vec![24, 13, 23, 15, 16, 9, 30, 11, 19, 5],
        )
        .unwrap();
        let config = KnapsackAnnealSolver::default_config()
            .with_initial_temperature(50.0)
            .with_final_temperature(0.01)
            .with_cooling_coefficient(0.95)
            .with_inner_cycle(50)
            .with_seed(42);
        let mut solver = KnapsackAnnealSolver::new(config).unwrap();
        let objective = solver.solve(&inst);

        assert!(
            objective >= 0.0,
            "expected feasible end state, got {objective}"
        );
        assert!(inst.is_feasible(solver.config()));
        assert_eq!(objective, inst.value_of(solver.config()) as f64);
        assert_eq!(solver.objective(), objective);
        assert!(solver.temperature() <= 0.01);
        let last = solver.history().last().map(|s| s.objective);
        assert_eq!(last, Some(objective));
    }

    #[test]
    fn test_config_empty_before_solve() {
        let solver = KnapsackAnnealSolver::default();
        assert!(solver.config().is_empty());
        assert!(solver.history().is_empty());
    }

    #[test]
    fn test_estimated_temperature_run_terminates() {
        let config = KnapsackAnnealSolver::default_config().with_seed(3);
        let mut solver = KnapsackAnnealSolver::new(config).unwrap();
        solver.solve(&sample());
        assert_eq!(solver.config().len(), 3);
        assert!(!solver.history().is_empty());
    }
}
