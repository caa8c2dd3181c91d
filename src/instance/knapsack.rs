//! 0/1 knapsack instance.

use crate::error::{KopError, Result};

/// A 0/1 knapsack instance: choose a subset of items maximizing total
/// value without exceeding the capacity.
///
/// # Examples
///
/// ```
/// use u_kop::instance::KnapsackInstance;
///
/// let instance = KnapsackInstance::new(4, vec![1, 2, 3], vec![4, 5, 6]).unwrap();
/// assert_eq!(instance.len(), 3);
/// assert_eq!(instance.value_sum(), 15);
/// assert!(instance.is_feasible(&[true, false, true]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KnapsackInstance {
    capacity: u64,
    weights: Vec<u64>,
    values: Vec<u64>,
}

impl KnapsackInstance {
    /// Creates an instance, checking that weights and values have equal
    /// length and that neither total overflows `u64`.
    pub fn new(capacity: u64, weights: Vec<u64>, values: Vec<u64>) -> Result<Self> {
        if weights.len() != values.len() {
            return Err(KopError::InvalidInstance(format!(
                "{} weights but {} values",
                weights.len(),
                values.len()
            )));
        }
        for (what, items) in [("weights", &weights), ("values", &values)] {
            let total = items.iter().try_fold(0u64, |acc, &x| acc.checked_add(x));
            if total.is_none() {
                return Err(KopError::InvalidInstance(format!(
                    "sum of {what} overflows u64"
                )));
            }
        }
        Ok(Self {
            capacity,
            weights,
            values,
        })
    }

    /// Creates an instance with a declared item count, which must match
    /// both array lengths.
    pub fn with_size(
        n: usize,
        capacity: u64,
        weights: Vec<u64>,
        values: Vec<u64>,
    ) -> Result<Self> {
        if weights.len() != n {
            return Err(KopError::InvalidInstance(format!(
                "declared {n} items but got {} weights",
                weights.len()
            )));
        }
        Self::new(capacity, weights, values)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    pub fn values(&self) -> &[u64] {
        &self.values
    }

    /// Sum of all item values; an upper bound on any solution.
    pub fn value_sum(&self) -> u64 {
        self.values.iter().sum()
    }

    /// Total weight of the selected items.
    pub fn weight_of(&self, config: &[bool]) -> u64 {
        self.weights
            .iter()
            .zip(config)
            .filter(|&(_, &on)| on)
            .map(|(&w, _)| w)
            .sum()
    }

    /// Total value of the selected items.
    pub fn value_of(&self, config: &[bool]) -> u64 {
        self.values
            .iter()
            .zip(config)
            .filter(|&(_, &on)| on)
            .map(|(&v, _)| v)
            .sum()
    }

    /// Whether the selected items fit into the knapsack.
    pub fn is_feasible(&self, config: &[bool]) -> bool {
        self.weight_of(config) <= self.capacity
    }
}
