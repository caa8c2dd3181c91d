//! Annealing configuration.

use crate::error::{KopError, Result};

/// Configuration for the simulated annealing engine.
///
/// # Examples
///
/// ```
/// use u_kop::anneal::AnnealConfig;
///
/// let config = AnnealConfig::default()
///     .with_initial_temperature(100.0)
///     .with_final_temperature(0.01)
///     .with_cooling_coefficient(0.98)
///     .with_inner_cycle(50)
///     .with_seed(42);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnnealConfig {
    /// Geometric cooling factor in (0, 1), applied after every inner cycle.
    pub cooling_coefficient: f64,

    /// Starting temperature. `None` estimates it from the acceptance ratio
    /// of trial steps.
    pub initial_temperature: Option<f64>,

    /// The run stops once the temperature drops to this value. `None`
    /// stops instead after `sliding_window_size / 2` consecutive
    /// rejections.
    pub final_temperature: Option<f64>,

    /// Steps performed at each temperature.
    pub inner_cycle: usize,

    /// Target acceptance ratio for initial temperature estimation.
    pub start_acceptance_ratio: f64,

    /// Trial steps per estimation round; also drives stall detection.
    pub sliding_window_size: usize,

    /// Hard budget on cooling-loop steps. 0 = no limit.
    pub max_steps: usize,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for AnnealConfig {
    fn default() -> Self {
        Self {
            cooling_coefficient: 0.99,
            initial_temperature: None,
            final_temperature: None,
            inner_cycle: 1,
            start_acceptance_ratio: 0.9,
            sliding_window_size: 30,
            max_steps: 0,
            seed: None,
        }
    }
}

impl AnnealConfig {
    pub fn with_cooling_coefficient(mut self, coefficient: f64) -> Self {
        self.cooling_coefficient = coefficient;
        self
    }

    pub fn with_initial_temperature(mut self, t: f64) -> Self {
        self.initial_temperature = Some(t);
        self
    }

    pub fn with_final_temperature(mut self, t: f64) -> Self {
        self.final_temperature = Some(t);
        self
    }

    pub fn with_inner_cycle(mut self, n: usize) -> Self {
        self.inner_cycle = n;
        self
    }

    pub fn with_start_acceptance_ratio(mut self, ratio: f64) -> Self {
        self.start_acceptance_ratio = ratio;
        self
    }

    pub fn with_sliding_window_size(mut self, n: usize) -> Self {
        self.sliding_window_size = n;
        self
    }

    pub fn with_max_steps(mut self, n: usize) -> Self {
        self.max_steps = n;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if !(self.cooling_coefficient > 0.0 && self.cooling_coefficient < 1.0) {
            return Err(KopError::Configuration(format!(
                "cooling_coefficient must be in (0, 1), got {}",
                self.cooling_coefficient
            )));
        }
        if let Some(t) = self.initial_temperature {
            if !(t > 0.0) {
                return Err(KopError::Configuration(format!(
                    "initial_temperature must be positive, got {t}"
                )));
            }
        }
        if let Some(t) = self.final_temperature {
            if !(t >= 0.0) {
                return Err(KopError::Configuration(format!(
                    "final_temperature must be non-negative, got {t}"
                )));
            }
            if self.initial_temperature.is_some_and(|t0| t >= t0) {
                return Err(KopError::Configuration(
                    "final_temperature must be less than initial_temperature".into(),
                ));
            }
        }
        if self.inner_cycle == 0 {
            return Err(KopError::Configuration(
                "inner_cycle must be at least 1".into(),
            ));
        }
        if !(self.start_acceptance_ratio > 0.0 && self.start_acceptance_ratio <= 1.0) {
            return Err(KopError::Configuration(format!(
                "start_acceptance_ratio must be in (0, 1], got {}",
                self.start_acceptance_ratio
            )));
        }
        if self.sliding_window_size == 0 {
            return Err(KopError::Configuration(
                "sliding_window_size must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
