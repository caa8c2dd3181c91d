//! Simulated Annealing (SA).
//!
//! A single-solution local search that accepts worsening moves with a
//! probability shrinking as the temperature cools, allowing the walk to
//! escape local optima. The engine ([`Annealer`]) is problem-agnostic;
//! problems plug in through [`AnnealProblem`].
//!
//! Ready-made specializations:
//!
//! - [`KnapsackAnnealSolver`]: one-bit flips over item selections.
//! - [`WsatAnnealSolver`]: one-bit flips over variable assignments, with a
//!   configurable [`PenaltyStrategy`] for violated clauses.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod knapsack;
mod runner;
mod types;
mod wsat;

pub use config::AnnealConfig;
pub use knapsack::{KnapsackAnnealSolver, KnapsackProblem};
pub use runner::{metropolis, Annealer};
pub use types::{flip_random, AnnealProblem, StepResult};
pub use wsat::{PenaltyStrategy, WsatAnnealSolver, WsatProblem};
