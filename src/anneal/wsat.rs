//! Annealing for weighted 3-SAT.

use std::fmt;
use std::str::FromStr;

use rand::Rng;

use super::config::AnnealConfig;
use super::runner::Annealer;
use super::types::{flip_random, AnnealProblem, StepResult};
use crate::error::{KopError, Result};
use crate::instance::WsatInstance;

/// How assignments violating some clause are scored.
///
/// Every strategy yields a penalty that is negated by the objective, so
/// violating assignments never outscore satisfying ones with positive
/// weight.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PenaltyStrategy {
    /// Penalty = number of unsatisfied clauses.
    #[default]
    Simple,

    /// Penalty = fraction of unsatisfied clauses times the maximum score.
    Weighted,

    /// Blends the unsatisfied fraction with the weighted-sum shortfall.
    /// Higher `weights_importance` (in [0, 1]) favors heavier assignments.
    Greedy {
        /// Share of the penalty driven by the weighted-sum shortfall.
        weights_importance: f64,
    },
}

impl PenaltyStrategy {
    /// Importance used by the `"greedy"` name.
    pub const DEFAULT_WEIGHTS_IMPORTANCE: f64 = 0.2;

    /// Greedy strategy with a checked `weights_importance`.
    pub fn greedy(weights_importance: f64) -> Result<Self> {
        let strategy = PenaltyStrategy::Greedy { weights_importance };
        strategy.validate()?;
        Ok(strategy)
    }

    /// Parses a strategy name, applying `weights_importance` to `"greedy"`.
    pub fn from_name(name: &str, weights_importance: f64) -> Result<Self> {
        match name {
            "simple" => Ok(PenaltyStrategy::Simple),
            "weighted" => Ok(PenaltyStrategy::Weighted),
            "greedy" => Self::greedy(weights_importance),
            other => Err(KopError::Configuration(format!(
                "undefined penalization strategy '{other}'"
            ))),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if let PenaltyStrategy::Greedy { weights_importance } = *self {
            if !(0.0..=1.0).contains(&weights_importance) {
                return Err(KopError::Configuration(format!(
                    "weights_importance must be in [0, 1], got {weights_importance}"
                )));
            }
        }
        Ok(())
    }

    /// Penalty for an assignment leaving `unsatisfied` of `n_clauses`
    /// clauses violated. `n_clauses` must be positive.
    pub fn penalty(
        &self,
        unsatisfied: usize,
        n_clauses: usize,
        weighted_sum: f64,
        max_score: f64,
    ) -> f64 {
        let invalid_ratio = unsatisfied as f64 / n_clauses as f64;
        match *self {
            PenaltyStrategy::Simple => unsatisfied as f64,
            PenaltyStrategy::Weighted => invalid_ratio * max_score,
            PenaltyStrategy::Greedy { weights_importance } => {
                if max_score == 0.0 {
                    return unsatisfied as f64;
                }
                let score_ratio = (max_score - weighted_sum) / max_score * weights_importance;
                let invalid_ratio = invalid_ratio * (1.0 - weights_importance);
                max_score * (invalid_ratio + score_ratio)
            }
        }
    }
}

impl FromStr for PenaltyStrategy {
    type Err = KopError;

    fn from_str(name: &str) -> Result<Self> {
        Self::from_name(name, Self::DEFAULT_WEIGHTS_IMPORTANCE)
    }
}

impl fmt::Display for PenaltyStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PenaltyStrategy::Simple => write!(f, "simple"),
            PenaltyStrategy::Weighted => write!(f, "weighted"),
            PenaltyStrategy::Greedy { .. } => write!(f, "greedy"),
        }
    }
}

/// Weighted 3-SAT as an annealing problem.
///
/// Satisfying assignments score the weighted sum of true variables;
/// violating ones score the negated penalty of the strategy.
#[derive(Debug, Clone, Copy)]
pub struct WsatProblem<'a> {
    instance: &'a WsatInstance,
    strategy: PenaltyStrategy,
    max_score: f64,
}

impl<'a> WsatProblem<'a> {
    pub fn new(instance: &'a WsatInstance, strategy: PenaltyStrategy) -> Self {
        Self {
            instance,
            strategy,
            max_score: instance.max_score() as f64,
        }
    }
}

impl AnnealProblem for WsatProblem<'_> {
    type Config = Vec<bool>;

    fn initial_config<R: Rng>(&self, _rng: &mut R) -> Vec<bool> {
        vec![false; self.instance.n_vars()]
    }

    fn transition<R: Rng>(&self, config: &Vec<bool>, rng: &mut R) -> Vec<bool> {
        flip_random(config, rng)
    }

    fn objective(&self, config: &Vec<bool>) -> f64 {
        let weighted_sum = self.instance.weighted_sum(config) as f64;
        let unsatisfied = self.instance.unsatisfied_count(config);
        if unsatisfied == 0 {
            return weighted_sum;
        }
        -self.strategy.penalty(
            unsatisfied,
            self.instance.n_clauses(),
            weighted_sum,
            self.max_score,
        )
    }
}

/// Simulated annealing solver for weighted 3-SAT instances.
///
/// # Examples
///
/// ```
/// use u_kop::anneal::{PenaltyStrategy, WsatAnnealSolver};
/// use u_kop::instance::WsatInstance;
///
/// let instance: WsatInstance = "3 2 4 2 1 1 2 3 -1 -2 -3".parse().unwrap();
/// let strategy: PenaltyStrategy = "weighted".parse().unwrap();
/// let config = WsatAnnealSolver::default_config().with_seed(1);
/// let mut solver = WsatAnnealSolver::new(config, strategy).unwrap();
/// solver.solve(&instance);
/// assert_eq!(solver.config().len(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct WsatAnnealSolver {
    annealer: Annealer<Vec<bool>>,
    strategy: PenaltyStrategy,
}

impl WsatAnnealSolver {
    /// Engine defaults with a sliding window of 25 steps.
    pub fn default_config() -> AnnealConfig {
        AnnealConfig::default().with_sliding_window_size(25)
    }

    pub fn new(config: AnnealConfig, strategy: PenaltyStrategy) -> Result<Self> {
        strategy.validate()?;
        Ok(Self {
            annealer: Annealer::new(config)?,
            strategy,
        })
    }

    pub fn strategy(&self) -> PenaltyStrategy {
        self.strategy
    }

    /// Anneals with the seed from the configuration and returns the final
    /// objective.
    pub fn solve(&mut self, instance: &WsatInstance) -> f64 {
        self.annealer
            .solve(&WsatProblem::new(instance, self.strategy))
    }

    pub fn solve_with_rng<R: Rng>(&mut self, instance: &WsatInstance, rng: &mut R) -> f64 {
        self.annealer
            .solve_with_rng(&WsatProblem::new(instance, self.strategy), rng)
    }

    /// Final assignment of the last run; empty before the first run.
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instance::Clause;

    fn sample() -> WsatInstance {
        // x1 v x2 v x3, !x1 v !x2 v !x3, x1 v !x2 v x3
        WsatInstance::new(
            vec![4, 2, 1],
            vec![Clause([1, 2, 3]), Clause([-1, -2, -3]), Clause([1, -2, 3])],
        )
        .unwrap()
    }

    #[test]
    fn test_strategy_from_name() {
        let simple: PenaltyStrategy = "simple".parse().unwrap();
        let weighted: PenaltyStrategy = "weighted".parse().unwrap();
        assert_eq!(simple, PenaltyStrategy::Simple);
        assert_eq!(weighted, PenaltyStrategy::Weighted);
        assert_eq!(
            "greedy".parse::<PenaltyStrategy>().unwrap(),
            PenaltyStrategy::Greedy {
                weights_importance: 0.2
            }
        );
        assert_eq!(
            PenaltyStrategy::from_name("greedy", 0.7).unwrap(),
            PenaltyStrategy::Greedy {
                weights_importance: 0.7
            }
        );
    }

    #[test]
    fn test_unknown_strategy_is_configuration_error() {
        let err = "optimistic".parse::<PenaltyStrategy>().unwrap_err();
        assert!(matches!(err, KopError::Configuration(_)));
    }

    #[test]
    fn test_greedy_importance_out_of_range() {
        assert!(PenaltyStrategy::greedy(1.5).is_err());
        assert!(PenaltyStrategy::greedy(-0.1).is_err());
        let bad = PenaltyStrategy::Greedy {
            weights_importance: 2.0,
        };
        let config = WsatAnnealSolver::default_config();
        assert!(WsatAnnealSolver::new(config, bad).is_err());
    }

    #[test]
    fn test_objective_satisfied_returns_weighted_sum() {
        let inst = sample();
        let problem = WsatProblem::new(&inst, PenaltyStrategy::Simple);
        assert_eq!(problem.objective(&vec![true, false, true]), 5.0);
        assert_eq!(problem.objective(&vec![true, false, false]), 4.0);
    }

    #[test]
    fn test_objective_penalties() {
        let inst = sample();
        // all false violates only the first clause
        let config = vec![false, false, false];

        let simple = WsatProblem::new(&inst, PenaltyStrategy::Simple);
        assert_eq!(simple.objective(&config), -1.0);

        let weighted = WsatProblem::new(&inst, PenaltyStrategy::Weighted);
        assert!((weighted.objective(&config) - (-7.0 / 3.0)).abs() < 1e-12);

        let greedy = WsatProblem::new(&inst, PenaltyStrategy::greedy(0.5).unwrap());
        // 7 * (1/3 * 0.5 + 7/7 * 0.5)
        let expected = -7.0 * (1.0 / 6.0 + 0.5);
        assert!((greedy.objective(&config) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_negative_when_unsatisfied() {
        let inst = sample();
        let problem = WsatProblem::new(&inst, PenaltyStrategy::greedy(0.2).unwrap());
        for config in [
            vec![false, false, false],
            vec![true, true, true],
            vec![false, true, false],
        ] {
            assert!(inst.unsatisfied_count(&config) > 0);
            assert!(problem.objective(&config) < 0.0);
        }
    }

    #[test]
    fn test_greedy_zero_weights_falls_back_to_simple() {
        let inst = WsatInstance::new(vec![0, 0, 0], vec![Clause([1, 2, 3])]).unwrap();
        let problem = WsatProblem::new(&inst, PenaltyStrategy::greedy(0.4).unwrap());
        assert_eq!(problem.objective(&vec![false, false, false]), -1.0);
    }

    #[test]
    fn test_solve_reaches_satisfying_assignment() {
        let inst = sample();
        let config = WsatAnnealSolver::default_config()
            .with_initial_temperature(10.0)
            .with_final_temperature(0.01)
            .with_cooling_coefficient(0.95)
            .with_inner_cycle(30)
            .with_seed(11);
        let mut solver = WsatAnnealSolver::new(config, PenaltyStrategy::Weighted).unwrap();
        let objective = solver.solve(&inst);

        assert!(
            objective > 0.0,
            "expected satisfying end state, got {objective}"
        );
        assert_eq!(inst.unsatisfied_count(solver.config()), 0);
        assert_eq!(objective, inst.weighted_sum(solver.config()) as f64);
    }
}
