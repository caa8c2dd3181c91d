//! Weighted 3-SAT instance.

use crate::error::{KopError, Result};

/// A disjunction of three signed, 1-based literals.
///
/// A positive literal `k` requires variable `k - 1` to be true, a negative
/// literal `-k` requires it to be false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clause(pub [i32; 3]);

impl Clause {
    pub fn literals(&self) -> &[i32; 3] {
        &self.0
    }

    /// True when at least one literal's polarity matches the assignment.
    ///
    /// Literals pointing past the end of `config` never match.
    ///
    /// ```
    /// use u_kop::instance::Clause;
    ///
    /// let clause = Clause([1, -2, 3]);
    /// assert!(clause.is_satisfied(&[true, true, false]));
    /// assert!(!clause.is_satisfied(&[false, true, false]));
    /// ```
    pub fn is_satisfied(&self, config: &[bool]) -> bool {
        self.0.iter().any(|&lit| {
            let idx = lit.unsigned_abs() as usize;
            idx > 0 && config.get(idx - 1).is_some_and(|&value| value == (lit > 0))
        })
    }
}

/// A weighted 3-SAT instance: find an assignment satisfying every clause
/// that maximizes the total weight of true variables.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WsatInstance {
    weights: Vec<u64>,
    clauses: Vec<Clause>,
}

impl WsatInstance {
    /// Creates an instance, checking every literal refers to an existing
    /// variable.
    pub fn new(weights: Vec<u64>, clauses: Vec<Clause>) -> Result<Self> {
        let n_vars = weights.len();
        for (i, clause) in clauses.iter().enumerate() {
            for &lit in clause.literals() {
                if lit == 0 {
                    return Err(KopError::InvalidInstance(format!(
                        "clause {i} contains literal 0"
                    )));
                }
                if lit.unsigned_abs() as usize > n_vars {
                    return Err(KopError::InvalidInstance(format!(
                        "clause {i} references variable {} of {n_vars}",
                        lit.unsigned_abs()
                    )));
                }
            }
        }
        Ok(Self { weights, clauses })
    }

    /// Creates an instance with declared variable and clause counts.
    pub fn with_size(
        n_vars: usize,
        n_clauses: usize,
        weights: Vec<u64>,
        clauses: Vec<Clause>,
    ) -> Result<Self> {
        if weights.len() != n_vars {
            return Err(KopError::InvalidInstance(format!(
                "declared {n_vars} variables but got {} weights",
                weights.len()
            )));
        }
        if clauses.len() != n_clauses {
            return Err(KopError::InvalidInstance(format!(
                "declared {n_clauses} clauses but got {}",
                clauses.len()
            )));
        }
        Self::new(weights, clauses)
    }

    pub fn n_vars(&self) -> usize {
        self.weights.len()
    }

    pub fn n_clauses(&self) -> usize {
        self.clauses.len()
    }

    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Weighted sum with every variable true.
    pub fn max_score(&self) -> u64 {
        self.weights.iter().sum()
    }

    /// Weighted sum of the true variables.
    pub fn weighted_sum(&self, config: &[bool]) -> u64 {
        self.weights
            .iter()
            .zip(config)
            .filter(|&(_, &on)| on)
            .map(|(&w, _)| w)
            .sum()
    }

    /// Number of clauses the assignment leaves unsatisfied.
    pub fn unsatisfied_count(&self, config: &[bool]) -> usize {
        self.clauses
            .iter()
            .filter(|c| !c.is_satisfied(config))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clause_partial_match() {
        // literal 2 fails, literal 1 matches
        let clause = Clause([1, -2, 3]);
        assert!(clause.is_satisfied(&[true, true, false]));
    }

    #[test]
    fn test_clause_all_negative() {
        let clause = Clause([-1, -2, -3]);
        assert!(!clause.is_satisfied(&[true, true, true]));
        assert!(clause.is_satisfied(&[true, false, true]));
    }

    #[test]
    fn test_new_rejects_zero_literal() {
        let err = WsatInstance::new(vec![1, 1, 1], vec![Clause([1, 0, 2])]).unwrap_err();
        assert!(matches!(err, KopError::InvalidInstance(_)));
    }

    #[test]
    fn test_new_rejects_out_of_range_literal() {
        assert!(WsatInstance::new(vec![1, 1], vec![Clause([1, -3, 2])]).is_err());
    }

    #[test]
    fn test_with_size_checks_counts() {
        let clauses = vec![Clause([1, 2, -3])];
        assert!(WsatInstance::with_size(3, 2, vec![1, 2, 3], clauses.clone()).is_err());
        assert!(WsatInstance::with_size(2, 1, vec![1, 2, 3], clauses.clone()).is_err());
        assert!(WsatInstance::with_size(3, 1, vec![1, 2, 3], clauses).is_ok());
    }

    #[test]
    fn test_scores() {
        let clauses = vec![Clause([1, 2, 3]), Clause([-1, -2, -3])];
        let inst = WsatInstance::new(vec![2, 4, 1], clauses).unwrap();
        assert_eq!(inst.max_score(), 7);
        assert_eq!(inst.weighted_sum(&[true, false, true]), 3);
        assert_eq!(inst.unsatisfied_count(&[true, false, true]), 0);
        assert_eq!(inst.unsatisfied_count(&[true, true, true]), 1);
        assert_eq!(inst.unsatisfied_count(&[false, false, false]), 1);
    }
}
