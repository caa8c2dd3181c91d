//! Core trait for annealing problems.

use rand::Rng;

/// Defines a problem for the annealing engine.
///
/// The user implements the initial configuration, the neighbor move and
/// the objective. The engine handles temperature, acceptance and
/// convergence.
///
/// # Maximization
///
/// The objective is maximized. Infeasible configurations should score
/// below every feasible one so the walk is pulled back into feasibility.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_kop::anneal::AnnealProblem;
///
/// struct OneMax(usize);
///
/// impl AnnealProblem for OneMax {
///     type Config = Vec<bool>;
///
///     fn initial_config<R: Rng>(&self, _rng: &mut R) -> Vec<bool> {
///         vec![false; self.0]
///     }
///
///     fn transition<R: Rng>(&self, config: &Vec<bool>, rng: &mut R) -> Vec<bool> {
///         let mut next = config.clone();
///         let i = rng.random_range(0..next.len());
///         next[i] = !next[i];
///         next
///     }
///
///     fn objective(&self, config: &Vec<bool>) -> f64 {
///         config.iter().filter(|&&b| b).count() as f64
///     }
/// }
/// ```
pub trait AnnealProblem {
    /// The configuration representation.
    type Config: Clone;

    /// Creates the configuration the walk starts from.
    fn initial_config<R: Rng>(&self, rng: &mut R) -> Self::Config;

    /// Generates a random neighbor of `config`.
    fn transition<R: Rng>(&self, config: &Self::Config, rng: &mut R) -> Self::Config;

    /// Scores a configuration. Higher is better.
    fn objective(&self, config: &Self::Config) -> f64;
}

/// One step of the cooling loop.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StepResult {
    /// Objective of the configuration held after the step.
    pub objective: f64,

    /// Whether the proposed neighbor was accepted.
    pub accepted: bool,
}

/// Returns a copy of `config` with one uniformly chosen flag flipped.
///
/// An empty configuration is returned unchanged.
pub fn flip_random<R: Rng>(config: &[bool], rng: &mut R) -> Vec<bool> {
    let mut next = config.to_vec();
    if !next.is_empty() {
        let idx = rng.random_range(0..next.len());
        next[idx] = !next[idx];
    }
    next
}
