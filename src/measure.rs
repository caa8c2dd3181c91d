//! Timing and error measurement against reference solutions.
//!
//! Solvers are measured one instance at a time: wall-clock duration of the
//! solve plus the relative error against a known optimum, when available.
//!
//! # Examples
//!
//! ```
//! use u_kop::instance::{parse, KnapsackInstance};
//! use u_kop::measure::measure_knapsack;
//! use u_kop::solve::GreedySolver;
//!
//! let instance: KnapsackInstance = "1 3 4 1 4 2 5 3 6".parse().unwrap();
//! let reference = parse::knapsack_solution("1 3 10 1 0 1").unwrap();
//!
//! let stats = measure_knapsack(&mut GreedySolver::new(), [(instance, Some(reference))]);
//! assert_eq!(stats.n_solved, 1);
//! assert!((stats.err_max.unwrap() - 0.1).abs() < 1e-12);
//! ```

use std::time::{Duration, Instant};

use tracing::debug;

use crate::instance::KnapsackInstance;
use crate::solve::KnapsackSolver;

/// Known optimum of an instance.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReferenceSolution {
    pub value: i64,
    pub config: Vec<bool>,
}

/// `(reference - value) / reference`, or 0 when the reference is 0.
pub fn relative_error(reference: i64, value: f64) -> f64 {
    if reference == 0 {
        0.0
    } else {
        (reference as f64 - value) / reference as f64
    }
}

/// Runs `f` and returns its result with the elapsed wall-clock time.
pub fn measure_time<T, F: FnOnce() -> T>(f: F) -> (T, Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}

/// Aggregated timing and error statistics over a batch of solves.
///
/// A measurement with negative error (solver beat the reference) is
/// counted as invalid and otherwise ignored. An error above 1 means the
/// solver returned a negative objective and counts as unsolved.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunStats {
    pub time_sum: Duration,
    pub time_max: Option<Duration>,
    pub err_sum: f64,
    pub err_max: Option<f64>,
    pub n_valid: usize,
    pub n_invalid: usize,
    pub n_solved: usize,
    pub n_unsolved: usize,
}

impl RunStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one measurement.
    pub fn add(&mut self, time: Duration, err: f64) {
        if err < 0.0 || err.is_nan() {
            self.n_invalid += 1;
            return;
        }
        self.n_valid += 1;
        self.time_sum += time;
        self.time_max = Some(self.time_max.map_or(time, |t| t.max(time)));

        if err > 1.0 {
            self.n_unsolved += 1;
            return;
        }
        self.n_solved += 1;
        self.err_sum += err;
        self.err_max = Some(self.err_max.map_or(err, |e| e.max(err)));
    }

    /// Number of measurements recorded, valid or not.
    pub fn total(&self) -> usize {
        self.n_valid + self.n_invalid
    }

    /// Mean solve time over valid measurements.
    pub fn time_avg(&self) -> Option<Duration> {
        u32::try_from(self.n_valid)
            .ok()
            .filter(|&n| n > 0)
            .map(|n| self.time_sum / n)
    }

    /// Mean relative error over solved measurements.
    pub fn err_avg(&self) -> Option<f64> {
        (self.n_solved > 0).then(|| self.err_sum / self.n_solved as f64)
    }
}

/// Solves every instance with `solve` and aggregates the results.
///
/// Instances without a reference contribute their time with zero error.
pub fn measure<I, F>(
    instances: impl IntoIterator<Item = (I, Option<ReferenceSolution>)>,
    mut solve: F,
) -> RunStats
where
    F: FnMut(&I) -> f64,
{
    let mut stats = RunStats::new();
    for (instance, reference) in instances {
        let (value, elapsed) = measure_time(|| solve(&instance));
        let err = reference.map_or(0.0, |r| relative_error(r.value, value));
        stats.add(elapsed, err);
    }
    debug!(
        event = "measure_end",
        instances = stats.total(),
        valid = stats.n_valid,
        solved = stats.n_solved,
    );
    stats
}

/// [`measure`] for any [`KnapsackSolver`].
pub fn measure_knapsack<S>(
    solver: &mut S,
    instances: impl IntoIterator<Item = (KnapsackInstance, Option<ReferenceSolution>)>,
) -> RunStats
where
    S: KnapsackSolver + ?Sized,
{
    measure(instances, |instance| solver.solve(instance) as f64)
}
