//! Exhaustive include/exclude search with pluggable pruning.
//!
//! # Algorithm
//!
//! Items are decided from the last index down to index 0. At each node the
//! search first explores leaving the item out, then taking it (only if it
//! still fits), and returns the better of the two. A [`PruneStrategy`] may
//! cut a subtree before it is expanded.
//!
//! Leaves update the best record only on a strictly greater value, so the
//! first optimal configuration found wins.

use tracing::debug;

use super::state::SolverState;
use super::KnapsackSolver;
use crate::instance::KnapsackInstance;

/// Decides whether a search node can be discarded.
pub trait PruneStrategy {
    fn name(&self) -> &'static str;

    /// `best` is the best value recorded so far, `value` the value of the
    /// partial selection and `value_remaining` the sum of values of the
    /// items not yet decided.
    fn should_prune(
        &self,
        best: u64,
        capacity_left: i64,
        value: u64,
        value_remaining: u64,
    ) -> bool;
}

/// Never prunes: enumerates every feasible subset.
#[derive(Debug, Clone, Copy, Default)]
pub struct BruteForce;

impl PruneStrategy for BruteForce {
    fn name(&self) -> &'static str {
        "brute_force"
    }

    #[inline]
    fn should_prune(
        &self,
        _best: u64,
        _capacity_left: i64,
        _value: u64,
        _value_remaining: u64,
    ) -> bool {
        false
    }
}

/// Prunes infeasible nodes and nodes whose optimistic bound cannot beat
/// the best value found so far.
#[derive(Debug, Clone, Copy, Default)]
pub struct BranchAndBound;

impl PruneStrategy for BranchAndBound {
    fn name(&self) -> &'static str {
        "branch_and_bound"
    }

    #[inline]
    fn should_prune(
        &self,
        best: u64,
        capacity_left: i64,
        value: u64,
        value_remaining: u64,
    ) -> bool {
        capacity_left < 0 || best > value + value_remaining
    }
}

/// Exact knapsack solver parameterized by its pruning strategy.
#[derive(Debug, Clone, Default)]
pub struct ExactSolver<P: PruneStrategy> {
    prune: P,
    state: SolverState,
    nodes: u64,
}

/// Exhaustive search without pruning.
pub type BruteForceSolver = ExactSolver<BruteForce>;

/// Exhaustive search with two-sided bound pruning.
pub type BranchAndBoundSolver = ExactSolver<BranchAndBound>;

impl<P: PruneStrategy> ExactSolver<P> {
    pub fn new(prune: P) -> Self {
        Self {
            prune,
            state: SolverState::new(),
            nodes: 0,
        }
    }

    /// Number of search nodes visited by the last solve.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Solves in optimization mode (`target = None`) or decides whether
    /// exactly `target` is reachable.
    ///
    /// In decision mode the return value is `target` when a configuration
    /// was found and 0 otherwise; [`SolverState::is_solvable`] tells the two
    /// apart when `target` is 0.
    pub fn solve_target(&mut self, instance: &KnapsackInstance, target: Option<u64>) -> u64 {
        self.state.reset(instance, target);

        let n = instance.len();
        let capacity = i64::try_from(instance.capacity()).unwrap_or(i64::MAX);
        let mut search = Search {
            instance,
            prune: &self.prune,
            state: &mut self.state,
            capacity,
            config: vec![false; n],
            nodes: 0,
        };
        let best = search.visit(n, capacity, 0, instance.value_sum());
        self.nodes = search.nodes;

        let value = match target {
            None => {
                self.state.solved = true;
                best
            }
            Some(_) => self.state.value,
        };

        debug!(
            event = "solve_end",
            solver = self.prune.name(),
            items = n,
            value,
            nodes = self.nodes,
            solved = self.state.solved,
        );
        value
    }
}

impl<P: PruneStrategy> KnapsackSolver for ExactSolver<P> {
    fn name(&self) -> &'static str {
        self.prune.name()
    }

    fn solve(&mut self, instance: &KnapsackInstance) -> u64 {
        self.solve_target(instance, None)
    }

    fn state(&self) -> &SolverState {
        &self.state
    }
}

struct Search<'a, P> {
    instance: &'a KnapsackInstance,
    prune: &'a P,
    state: &'a mut SolverState,
    capacity: i64,
    config: Vec<bool>,
    nodes: u64,
}

impl<P: PruneStrategy> Search<'_, P> {
    /// Returns the best value reachable from this node on top of `value`.
    fn visit(
        &mut self,
        remaining: usize,
        capacity_left: i64,
        value: u64,
        value_remaining: u64,
    ) -> u64 {
        self.nodes += 1;

        if let Some(target) = self.state.target {
            if self.state.solved || value > target || value + value_remaining < target {
                return 0;
            }
        }

        if self
            .prune
            .should_prune(self.state.value, capacity_left, value, value_remaining)
        {
            return 0;
        }

        if remaining == 0 {
            self.leaf(capacity_left, value);
            return 0;
        }

        let idx = remaining - 1;
        let item_value = self.instance.values()[idx];
        let item_weight = i64::try_from(self.instance.weights()[idx]).unwrap_or(i64::MAX);

        self.config[idx] = false;
        let without = self.visit(idx, capacity_left, value, value_remaining - item_value);

        if item_weight > capacity_left {
            return without;
        }

        self.config[idx] = true;
        let with = self.visit(
            idx,
            capacity_left - item_weight,
            value + item_value,
            value_remaining - item_value,
        ) + item_value;
        self.config[idx] = false;

        with.max(without)
    }

    fn leaf(&mut self, capacity_left: i64, value: u64) {
        let improves = match self.state.target {
            None => value > self.state.value,
            Some(target) => value == target,
        };
        if improves {
            let weight = (self.capacity - capacity_left) as u64;
            self.state.record(value, weight, &self.config);
            if self.state.target.is_some() {
                self.state.solved = true;
            }
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
    fn test_brute_force_sample() {
        let mut solver = BruteForceSolver::default();
        assert_eq!(solver.solve(&sample()), 10);
        assert_eq!(solver.config(), &[true, false, true]);
        assert_eq!(solver.state().weight(), 4);
        assert!(solver.is_solvable());
    }

    #[test]
    fn test_branch_and_bound_sample() {
        let mut solver = BranchAndBoundSolver::default();
        assert_eq!(solver.solve(&sample()), 10);
        assert_eq!(solver.config(), &[true, false, true]);
    }

    #[test]
    fn test_branch_and_bound_visits_fewer_nodes() {
        let inst = KnapsackInstance::new(
            30,
            vec![12, 7, 11, 8, 9, 5, 14, 6, 10, 3, 4, 13],
            vec![24, 13, 23, 15, 16, 9, 30, 11, 19, 5, 7, 25],
        )
        .unwrap();
        let mut brute = BruteForceSolver::default();
        let mut bb = BranchAndBoundSolver::default();
        assert_eq!(brute.solve(&inst), bb.solve(&inst));
        assert!(bb.nodes() < brute.nodes());
    }

    #[test]
    fn test_zero_capacity() {
        let inst = KnapsackInstance::new(0, vec![1, 2], vec![3, 4]).unwrap();
        let mut solver = BranchAndBoundSolver::default();
        assert_eq!(solver.solve(&inst), 0);
        assert_eq!(solver.config(), &[false, false]);
        assert!(solver.is_solvable());
    }

    #[test]
    fn test_first_optimum_wins_on_ties() {
        // items 0 and 1 are interchangeable; item 1 is decided first and the
        // exclude branch is explored first, so item 0 is the one kept
        let inst = KnapsackInstance::new(1, vec![1, 1], vec![5, 5]).unwrap();
        let mut solver = BruteForceSolver::default();
        assert_eq!(solver.solve(&inst), 5);
        assert_eq!(solver.config(), &[true, false]);
    }

    #[test]
    fn test_decision_mode_reachable() {
        let mut solver = BranchAndBoundSolver::default();
        assert_eq!(solver.solve_target(&sample(), Some(9)), 9);
        assert!(solver.is_solvable());
        assert_eq!(solver.config(), &[true, true, false]);
    }

    #[test]
    fn test_decision_mode_unreachable() {
        let mut solver = BruteForceSolver::default();
        // 15 needs every item, which weighs 6 > 4
        assert_eq!(solver.solve_target(&sample(), Some(15)), 0);
        assert!(!solver.is_solvable());
    }

    #[test]
    fn test_config_stable_after_solve() {
        let mut solver = BranchAndBoundSolver::default();
        solver.solve(&sample());
        let first = solver.config().to_vec();
        assert_eq!(solver.config(), first.as_slice());
        assert_eq!(solver.result().config, first);
    }
}
