//! Ratio-greedy construction and the redux refinement.

use tracing::debug;

use super::state::SolverState;
use super::KnapsackSolver;
use crate::instance::KnapsackInstance;

/// Value per unit of weight. Weightless items sort first.
fn ratio(weight: u64, value: u64) -> f64 {
    if weight == 0 {
        f64::INFINITY
    } else {
        value as f64 / weight as f64
    }
}

/// Fills `state` greedily by descending value/weight ratio.
///
/// The sort is stable, so items with equal ratio keep their index order.
fn greedy_fill(instance: &KnapsackInstance, state: &mut SolverState) {
    let weights = instance.weights();
    let values = instance.values();

    let ratios: Vec<f64> = weights
        .iter()
        .zip(values)
        .map(|(&w, &v)| ratio(w, v))
        .collect();
    let mut order: Vec<usize> = (0..instance.len()).collect();
    order.sort_by(|&a, &b| ratios[b].total_cmp(&ratios[a]));

    let mut capacity_left = instance.capacity();
    for idx in order {
        if weights[idx] <= capacity_left {
            capacity_left -= weights[idx];
            state.value += values[idx];
            state.config[idx] = true;
        }
    }
    state.weight = instance.capacity() - capacity_left;
    state.solved = true;
}

/// Most valuable item that fits on its own, as `(index, value, weight)`.
///
/// The lowest index wins among equally valuable items.
fn best_item(instance: &KnapsackInstance) -> Option<(usize, u64, u64)> {
    let mut best: Option<(usize, u64, u64)> = None;
    for (idx, (&w, &v)) in instance.weights().iter().zip(instance.values()).enumerate() {
        if w <= instance.capacity() && best.is_none_or(|(_, best_v, _)| v > best_v) {
            best = Some((idx, v, w));
        }
    }
    best
}

/// Greedy heuristic: take items by descending value/weight ratio while
/// they fit.
#[derive(Debug, Clone, Default)]
pub struct GreedySolver {
    state: SolverState,
}

impl GreedySolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KnapsackSolver for GreedySolver {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve(&mut self, instance: &KnapsackInstance) -> u64 {
        self.state.reset(instance, None);
        greedy_fill(instance, &mut self.state);

        debug!(
            event = "solve_end",
            solver = "greedy",
            items = instance.len(),
            value = self.state.value,
        );
        self.state.value
    }

    fn state(&self) -> &SolverState {
        &self.state
    }
}

/// Greedy followed by a comparison with the single most valuable item
/// that fits alone.
///
/// Guards against the greedy worst case where one heavy, valuable item is
/// skipped in favor of many small items with better ratios. The result is
/// at least half the optimum.
///
/// # Examples
///
/// ```
/// use u_kop::instance::KnapsackInstance;
/// use u_kop::solve::{GreedySolver, KnapsackSolver, ReduxSolver};
///
/// let instance = KnapsackInstance::new(10, vec![1, 10], vec![2, 10]).unwrap();
/// assert_eq!(GreedySolver::new().solve(&instance), 2);
/// assert_eq!(ReduxSolver::new().solve(&instance), 10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReduxSolver {
    state: SolverState,
}

impl ReduxSolver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KnapsackSolver for ReduxSolver {
    fn name(&self) -> &'static str {
        "redux"
    }

    fn solve(&mut self, instance: &KnapsackInstance) -> u64 {
        self.state.reset(instance, None);
        greedy_fill(instance, &mut self.state);
        let greedy_value = self.state.value;

        let mut replaced = false;
        if let Some((idx, value, weight)) = best_item(instance) {
            if value > greedy_value {
                self.state.config.fill(false);
                self.state.config[idx] = true;
                self.state.value = value;
                self.state.weight = weight;
                replaced = true;
            }
        }

        debug!(
            event = "solve_end",
            solver = "redux",
            items = instance.len(),
            value = self.state.value,
            greedy_value,
            replaced,
        );
        self.state.value
    }

    fn state(&self) -> &SolverState {
        &self.state
    }
}
