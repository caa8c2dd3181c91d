//! Combinatorial optimization solvers for the 0/1 knapsack problem and
//! weighted 3-SAT.
//!
//! - **Instances** ([`instance`]): validated, immutable problem data with
//!   text-format parsers.
//! - **Deterministic knapsack solvers** ([`solve`]): brute force,
//!   branch and bound, dynamic programming by value, FPTAS, greedy and
//!   greedy-redux, behind the [`solve::KnapsackSolver`] trait.
//! - **Simulated Annealing** ([`anneal`]): a problem-agnostic engine with
//!   Metropolis acceptance and geometric cooling, specialized for knapsack
//!   and weighted 3-SAT.
//! - **Measurement** ([`measure`]): timing and relative error against
//!   reference solutions.
//!
//! # Logging
//!
//! Solvers emit [`tracing`] events (`debug` per solve, `info` per annealing
//! run). No subscriber is installed; consumers choose their own.

pub mod anneal;
pub mod error;
pub mod instance;
pub mod measure;
pub mod solve;

pub use error::{KopError, Result};
