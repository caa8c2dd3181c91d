//! Dynamic programming over values, and the FPTAS built on top of it.
//!
//! # Algorithm
//!
//! `table[i][j]` holds the minimum total weight needed to reach exactly
//! value `j` using a subset of the first `i` items:
//!
//! ```text
//! table[0][0] = 0, table[0][j > 0] = unreachable, table[i][0] = 0
//! table[i][j] = table[i-1][j]                                   if j < v[i-1]
//!             = min(table[i-1][j], table[i-1][j-v[i-1]] + w[i-1]) otherwise
//! ```
//!
//! The optimum is the largest `j` with `table[n][j] <= capacity`. Item
//! `i-1` belongs to the selection iff `table[i][j] != table[i-1][j]` while
//! walking `i` from `n` down to 1.
//!
//! # References
//!
//! - Ibarra & Kim (1975), "Fast Approximation Algorithms for the Knapsack and
//!   Sum of Subset Problems"

use tracing::{debug, warn};

use super::state::SolverState;
use super::KnapsackSolver;
use crate::error::{KopError, Result};
use crate::instance::KnapsackInstance;

const UNREACHABLE: u64 = u64::MAX;

/// Row-major `(n + 1) x (value_sum + 1)` weight table.
///
/// The backing buffer is kept between solves and only grows.
#[derive(Debug, Clone, Default)]
struct DpTable {
    cells: Vec<u64>,
    rows: usize,
    cols: usize,
}

impl DpTable {
    #[inline]
    fn get(&self, i: usize, j: usize) -> u64 {
        self.cells[i * self.cols + j]
    }

    /// Fills the table for `values`.
    ///
    /// Fails when `(n + 1) * (sum(values) + 1)` cells are not addressable
    /// or cannot be allocated; this is the size limit of the algorithm.
    fn fill(&mut self, weights: &[u64], values: &[u64]) -> Result<()> {
        let value_sum: u64 = values.iter().sum();
        let rows = values.len() + 1;
        let cols = usize::try_from(value_sum)
            .ok()
            .and_then(|sum| sum.checked_add(1));
        let len = cols.and_then(|cols| rows.checked_mul(cols));
        let (Some(cols), Some(len)) = (cols, len) else {
            return Err(KopError::InvalidInstance(format!(
                "dp table of {rows} x ({value_sum} + 1) cells is not addressable"
            )));
        };

        self.cells.clear();
        self.cells.try_reserve(len).map_err(|_| {
            KopError::InvalidInstance(format!("cannot allocate dp table of {len} cells"))
        })?;
        self.cells.resize(len, UNREACHABLE);
        self.rows = rows;
        self.cols = cols;
        self.cells[0] = 0;

        for i in 1..rows {
            let v = values[i - 1] as usize;
            let w = weights[i - 1];
            let window = &mut self.cells[(i - 1) * cols..(i + 1) * cols];
            let (prev, row) = window.split_at_mut(cols);
            row[0] = 0;
            for j in 1..cols {
                row[j] = if j < v {
                    prev[j]
                } else {
                    prev[j].min(prev[j - v].saturating_add(w))
                };
            }
        }
        Ok(())
    }

    /// Largest value whose minimum weight fits the capacity.
    fn best_value(&self, capacity: u64) -> Option<usize> {
        let n = self.rows - 1;
        (1..self.cols).rev().find(|&j| self.get(n, j) <= capacity)
    }

    fn reaches(&self, value: u64, capacity: u64) -> bool {
        (value as usize) < self.cols && self.get(self.rows - 1, value as usize) <= capacity
    }

    /// Marks the items forming value `target` in `config`.
    fn backtrace(&self, mut target: usize, values: &[u64], config: &mut [bool]) {
        for i in (1..self.rows).rev() {
            if self.get(i, target) != self.get(i - 1, target) {
                config[i - 1] = true;
                target -= values[i - 1] as usize;
            }
        }
    }
}

/// Runs the table on `values` (possibly rescaled) and writes the selected
/// configuration into `state`. Returns the reached value in the scale of
/// `values`, or `None` when the decision target is unreachable.
fn run_table(
    table: &mut DpTable,
    state: &mut SolverState,
    instance: &KnapsackInstance,
    values: &[u64],
    target: Option<u64>,
) -> Result<Option<u64>> {
    let capacity = instance.capacity();
    table.fill(instance.weights(), values)?;

    let reached = match target {
        None => table.best_value(capacity).unwrap_or(0),
        Some(t) if table.reaches(t, capacity) => t as usize,
        Some(_) => return Ok(None),
    };
    if reached > 0 {
        table.backtrace(reached, values, &mut state.config);
    }
    Ok(Some(reached as u64))
}

/// Exact pseudo-polynomial solver.
///
/// Runs in `O(n * sum(values))` time and memory.
#[derive(Debug, Clone, Default)]
pub struct DynamicSolver {
    state: SolverState,
    table: DpTable,
}

impl DynamicSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Solves in optimization mode (`target = None`) or decides whether
    /// exactly `target` is reachable within capacity.
    ///
    /// An instance too large for the table leaves the solver unsolved with
    /// value 0; use [`DynamicSolver::try_solve_target`] to get the error.
    pub fn solve_target(&mut self, instance: &KnapsackInstance, target: Option<u64>) -> u64 {
        match self.try_solve_target(instance, target) {
            Ok(value) => value,
            Err(err) => {
                warn!(event = "solve_failed", solver = "dynamic", error = %err);
                0
            }
        }
    }

    /// Like [`DynamicSolver::solve_target`], but reports a table that
    /// cannot be addressed or allocated as [`KopError::InvalidInstance`].
    pub fn try_solve_target(
        &mut self,
        instance: &KnapsackInstance,
        target: Option<u64>,
    ) -> Result<u64> {
        self.state.reset(instance, target);

        let reached = run_table(
            &mut self.table,
            &mut self.state,
            instance,
            instance.values(),
            target,
        )?;
        if let Some(value) = reached {
            self.state.value = value;
            self.state.weight = instance.weight_of(&self.state.config);
            self.state.solved = true;
        }

        debug!(
            event = "solve_end",
            solver = "dynamic",
            items = instance.len(),
            value = self.state.value,
            table_cells = self.table.cells.len(),
            solved = self.state.solved,
        );
        Ok(self.state.value)
    }
}

impl KnapsackSolver for DynamicSolver {
    fn name(&self) -> &'static str {
        "dynamic"
    }

    fn solve(&mut self, instance: &KnapsackInstance) -> u64 {
        self.solve_target(instance, None)
    }

    fn state(&self) -> &SolverState {
        &self.state
    }
}

/// Fully polynomial-time approximation scheme.
///
/// Values are divided by `coef = max_viable_value * eps / viable_count`
/// and rounded before running the dynamic programming table, so the table
/// width no longer depends on the magnitude of the values. The result is
/// at least `(1 - eps)` times the optimum.
///
/// # Examples
///
/// ```
/// use u_kop::instance::KnapsackInstance;
/// use u_kop::solve::{FptasSolver, KnapsackSolver};
///
/// let instance = KnapsackInstance::new(4, vec![1, 2, 3], vec![400, 500, 600]).unwrap();
/// let mut solver = FptasSolver::new(0.1).unwrap();
/// assert!(solver.solve(&instance) >= 900);
/// ```
#[derive(Debug, Clone)]
pub struct FptasSolver {
    eps: f64,
    state: SolverState,
    table: DpTable,
}

impl FptasSolver {
    /// Creates a solver with relative error bound `eps` in (0, 1).
    pub fn new(eps: f64) -> Result<Self> {
        if !(eps > 0.0 && eps < 1.0) {
            return Err(KopError::Configuration(format!(
                "fptas eps must be in (0, 1), got {eps}"
            )));
        }
        Ok(Self {
            eps,
            state: SolverState::new(),
            table: DpTable::default(),
        })
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    /// Rescaled values, or `None` when no item with positive value fits.
    ///
    /// Items heavier than the capacity can never be selected, so they get
    /// a scaled value of 0 and do not widen the table.
    fn scaled_values(&self, instance: &KnapsackInstance) -> Option<Vec<u64>> {
        let capacity = instance.capacity();
        let fits = |&(&w, _): &(&u64, &u64)| w <= capacity;

        let viable_count = instance
            .weights()
            .iter()
            .zip(instance.values())
            .filter(fits)
            .count();
        let max_viable = instance
            .weights()
            .iter()
            .zip(instance.values())
            .filter(fits)
            .map(|(_, &v)| v)
            .max()?;
        if max_viable == 0 {
            return None;
        }

        let coef = max_viable as f64 * self.eps / viable_count as f64;
        Some(
            instance
                .weights()
                .iter()
                .zip(instance.values())
                .map(|(&w, &v)| {
                    if w <= capacity {
                        (v as f64 / coef).round() as u64
                    } else {
                        0
                    }
                })
                .collect(),
        )
    }
}

impl KnapsackSolver for FptasSolver {
    fn name(&self) -> &'static str {
        "fptas"
    }

    fn solve(&mut self, instance: &KnapsackInstance) -> u64 {
        self.state.reset(instance, None);

        if let Some(scaled) = self.scaled_values(instance) {
            let filled = run_table(&mut self.table, &mut self.state, instance, &scaled, None);
            if let Err(err) = filled {
                warn!(event = "solve_failed", solver = "fptas", error = %err);
                return 0;
            }
            self.state.value = instance.value_of(&self.state.config);
            self.state.weight = instance.weight_of(&self.state.config);
        }
        self.state.solved = true;

        debug!(
            event = "solve_end",
            solver = "fptas",
            items = instance.len(),
            eps = self.eps,
            value = self.state.value,
        );
        self.state.value
    }

    fn state(&self) -> &SolverState {
        &self.state
    }
}
