//! Problem instances.
//!
//! Instances are immutable once built and validated. Solvers borrow them
//! for the duration of a solve and never modify them.
//!
//! - [`KnapsackInstance`]: capacity plus per-item weights and values.
//! - [`WsatInstance`]: per-variable weights plus 3-literal clauses.
//!
//! Both can be read from the one-instance-per-line text formats via
//! [`std::str::FromStr`]; see [`parse`] for the reference-solution formats.

mod knapsack;
pub mod parse;
mod wsat;

pub use knapsack::KnapsackInstance;
pub use wsat::{Clause, WsatInstance};
