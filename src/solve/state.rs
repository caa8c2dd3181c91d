//! Best-found tracking shared by the deterministic solvers.

use crate::instance::KnapsackInstance;

/// Outcome of one solve.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    /// Objective value of `config`.
    pub value: u64,

    /// Total weight of `config`.
    pub weight: u64,

    /// Selected items.
    pub config: Vec<bool>,

    /// Set by the algorithm once it has settled on `config`. In decision
    /// mode it stays `false` when the target value is unreachable.
    pub solved: bool,
}

/// Mutable state of a solver between two solves.
///
/// `target` distinguishes optimization (`None`) from the decision mode
/// (`Some(t)`: is exactly value `t` reachable within capacity).
#[derive(Debug, Clone, Default)]
pub struct SolverState {
    pub(crate) value: u64,
    pub(crate) weight: u64,
    pub(crate) config: Vec<bool>,
    pub(crate) values_sum: u64,
    pub(crate) target: Option<u64>,
    pub(crate) solved: bool,
}

impl SolverState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the best-found record for a new solve of `instance`.
    pub fn reset(&mut self, instance: &KnapsackInstance, target: Option<u64>) {
        self.value = 0;
        self.weight = 0;
        self.config.clear();
        self.config.resize(instance.len(), false);
        self.values_sum = instance.value_sum();
        self.target = target;
        self.solved = false;
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    pub fn weight(&self) -> u64 {
        self.weight
    }

    pub fn config(&self) -> &[bool] {
        &self.config
    }

    /// Sum of all item values of the current instance.
    pub fn values_sum(&self) -> u64 {
        self.values_sum
    }

    pub fn target(&self) -> Option<u64> {
        self.target
    }

    /// True in optimization mode.
    pub fn is_constructive(&self) -> bool {
        self.target.is_none()
    }

    /// Explicit flag set by the algorithm; an empty optimal selection
    /// still counts as solved.
    pub fn is_solvable(&self) -> bool {
        self.solved
    }

    /// Records `config` as the best selection.
    pub(crate) fn record(&mut self, value: u64, weight: u64, config: &[bool]) {
        self.value = value;
        self.weight = weight;
        self.config.clear();
        self.config.extend_from_slice(config);
    }

    pub fn result(&self) -> SearchResult {
        SearchResult {
            value: self.value,
            weight: self.weight,
            config: self.config.clone(),
            solved: self.solved,
        }
    }
}
