//! SA configuration.

use crate::error::ConfigError;

/// Probability of accepting a move that leaves the cost unchanged.
///
/// Lets the search drift across plateaus without turning into a random walk.
pub const PLATEAU_ACCEPTANCE_PROBABILITY: f64 = 0.1;

/// Configuration of one simulated annealing pass.
///
/// The temperature follows `T_i = initial_temperature / (1 + i)` for
/// iteration `i`, so it cools monotonically and never reaches zero.
///
/// # Examples
///
/// ```
/// use u_timetable::sa::SaConfig;
///
/// let config = SaConfig::new(60, 60.0);
/// assert!(config.validate().is_ok());
/// assert!((config.temperature_at(2) - 20.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaConfig {
    /// Number of proposed moves.
    pub iterations: usize,

    /// Temperature at the first iteration.
    pub initial_temperature: f64,
}

impl SaConfig {
    pub fn new(iterations: usize, initial_temperature: f64) -> Self {
        Self {
            iterations,
            initial_temperature,
        }
    }

    /// Temperature used at iteration `i` (zero-based).
    #[inline]
    pub fn temperature_at(&self, i: usize) -> f64 {
        self.initial_temperature / (1.0 + i as f64)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.initial_temperature > 0.0 && self.initial_temperature.is_finite()) {
            return Err(ConfigError::NonPositiveTemperature {
                value: self.initial_temperature,
            });
        }
        Ok(())
    }
}
