//! Deterministic knapsack solvers.
//!
//! Every solver owns a [`SolverState`] that is reset at the start of each
//! solve and frozen once it returns, so the configuration can be read back
//! with [`KnapsackSolver::config`] until the next solve.
//!
//! | Solver                   | Kind      | Complexity          |
//! |--------------------------|-----------|---------------------|
//! | [`BruteForceSolver`]     | exact     | O(2^n)              |
//! | [`BranchAndBoundSolver`] | exact     | O(2^n), pruned      |
//! | [`DynamicSolver`]        | exact     | O(n * sum(values))  |
//! | [`FptasSolver`]          | (1 - eps) | O(n^3 / eps)        |
//! | [`GreedySolver`]         | heuristic | O(n log n)          |
//! | [`ReduxSolver`]          | heuristic | O(n log n)          |
//!
//! # Examples
//!
//! ```
//! use u_kop::instance::KnapsackInstance;
//! use u_kop::solve::{BranchAndBoundSolver, DynamicSolver, KnapsackSolver};
//!
//! let instance = KnapsackInstance::new(4, vec![1, 2, 3], vec![4, 5, 6]).unwrap();
//!
//! let mut dp = DynamicSolver::new();
//! let mut bb = BranchAndBoundSolver::default();
//! assert_eq!(dp.solve(&instance), 10);
//! assert_eq!(bb.solve(&instance), 10);
//! assert_eq!(dp.config(), &[true, false, true]);
//! ```

mod dynamic;
mod exact;
mod greedy;
mod state;

pub use dynamic::{DynamicSolver, FptasSolver};
pub use exact::{
    BranchAndBound, BranchAndBoundSolver, BruteForce, BruteForceSolver, ExactSolver, PruneStrategy,
};
pub use greedy::{GreedySolver, ReduxSolver};
pub use state::{SearchResult, SolverState};

use crate::instance::KnapsackInstance;

/// A solver for the 0/1 knapsack problem.
///
/// Solving takes `&mut self`: one solver runs one solve at a time. Use
/// separate solver values for independent solves.
pub trait KnapsackSolver {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Solves the instance and returns the best value found.
    fn solve(&mut self, instance: &KnapsackInstance) -> u64;

    /// State left behind by the last solve.
    fn state(&self) -> &SolverState;

    /// Best configuration of the last solve.
    fn config(&self) -> &[bool] {
        self.state().config()
    }

    /// Whether the last solve completed with a configuration.
    fn is_solvable(&self) -> bool {
        self.state().is_solvable()
    }

    /// Snapshot of the last solve.
    fn result(&self) -> SearchResult {
        self.state().result()
    }
}
