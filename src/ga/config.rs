//! Solver configuration.
//!
//! [`SolverConfig`] holds every parameter of the evolutionary loop. There is
//! no `Default`: the cost weights and iteration counts depend too much on
//! the instance to pick them silently.

use std::fmt;
use std::sync::Arc;

use super::operators::Mating;
use crate::cost::Weights;
use crate::error::ConfigError;
use crate::sa::SaConfig;

/// Rule producing the swap-mutation probability of the next generation.
///
/// The result is always clamped to `[0, max_mutation_probability]`.
///
/// # Examples
///
/// ```
/// use u_timetable::ga::MutationSchedule;
///
/// let schedule = MutationSchedule::Geometric { factor: 2.0 };
/// assert!((schedule.next(0, 0.01, 0.05) - 0.02).abs() < 1e-12);
/// // Capped at the maximum.
/// assert!((schedule.next(1, 0.04, 0.05) - 0.05).abs() < 1e-12);
/// ```
#[derive(Clone)]
pub enum MutationSchedule {
    /// Keep the probability as is.
    Constant,
    /// `p * factor`.
    Geometric { factor: f64 },
    /// `p + step`.
    Linear { step: f64 },
    /// Caller-supplied `(generation, p) -> p'`.
    Custom(Arc<dyn Fn(usize, f64) -> f64 + Send + Sync>),
}

impl MutationSchedule {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(usize, f64) -> f64 + Send + Sync + 'static,
    {
        MutationSchedule::Custom(Arc::new(f))
    }

    /// Probability to use after `generation` when `current` was in effect.
    pub fn next(&self, generation: usize, current: f64, max: f64) -> f64 {
        let raw = match self {
            MutationSchedule::Constant => current,
            MutationSchedule::Geometric { factor } => current * factor,
            MutationSchedule::Linear { step } => current + step,
            MutationSchedule::Custom(f) => f(generation, current),
        };
        // f64::max drops NaN in favour of the other operand.
        raw.max(0.0).min(max)
    }
}

impl fmt::Debug for MutationSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationSchedule::Constant => write!(f, "Constant"),
            MutationSchedule::Geometric { factor } => {
                f.debug_struct("Geometric").field("factor", factor).finish()
            }
            MutationSchedule::Linear { step } => f.debug_struct("Linear").field("step", step).finish(),
            MutationSchedule::Custom(_) => write!(f, "Custom(..)"),
        }
    }
}

/// Configuration for the [`Solver`](super::Solver).
///
/// ```
/// use u_timetable::cost::Weights;
/// use u_timetable::ga::{Mating, MutationSchedule, SolverConfig};
/// use u_timetable::sa::SaConfig;
///
/// let config = SolverConfig {
///     weights: Weights::uniform(200.0, 2.0),
///     population_size: 64,
///     elitism: 1,
///     max_iterations: 500,
///     initial_mutation_probability: 0.0005,
///     max_mutation_probability: 0.005,
///     mutation_schedule: MutationSchedule::Geometric { factor: 1.0005 },
///     parent_count: 3,
///     parallelism: 4,
///     seed: 69,
///     annealing: SaConfig::new(60, 60.0),
///     annealing_probability: 0.1,
///     construction_alpha: 0.1,
///     refine_initial: false,
///     mating: vec![Mating::RouletteWheel, Mating::Random],
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Weights of the cost terms.
    pub weights: Weights,

    /// Number of individuals per generation.
    pub population_size: usize,

    /// Number of best individuals copied unchanged into the next generation.
    ///
    /// Must be smaller than `population_size`.
    pub elitism: usize,

    /// Number of generations.
    pub max_iterations: usize,

    /// Swap-mutation probability of the first generation.
    pub initial_mutation_probability: f64,

    /// Upper bound of the swap-mutation probability.
    pub max_mutation_probability: f64,

    /// How the swap-mutation probability evolves between generations.
    pub mutation_schedule: MutationSchedule,

    /// Parents drawn by roulette wheel for each offspring. At least 2.
    pub parent_count: usize,

    /// Worker threads; also the number of work partitions.
    pub parallelism: usize,

    /// Seed of the root random generator.
    ///
    /// Results are reproducible for a fixed seed and `parallelism`.
    pub seed: u64,

    /// Annealing pass used by [`Mutation::Anneal`](super::Mutation::Anneal)
    /// and by `refine_initial`.
    pub annealing: SaConfig,

    /// Probability that a generation mutates by annealing instead of swaps.
    pub annealing_probability: f64,

    /// Greediness of the initial construction, in `[0, 1]`.
    pub construction_alpha: f64,

    /// Run one annealing pass on every constructed table.
    pub refine_initial: bool,

    /// Mating strategies; generation `i` uses `mating[i % mating.len()]`.
    pub mating: Vec<Mating>,
}

impl SolverConfig {
    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.weights.validate()?;
        if self.population_size == 0 {
            return Err(ConfigError::ZeroPopulation);
        }
        if self.elitism >= self.population_size {
            return Err(ConfigError::ElitismTooLarge {
                elitism: self.elitism,
                population_size: self.population_size,
            });
        }
        if self.max_iterations == 0 {
            return Err(ConfigError::ZeroIterations);
        }
        if self.parallelism == 0 {
            return Err(ConfigError::ZeroParallelism);
        }
        if self.parent_count < 2 {
            return Err(ConfigError::TooFewParents {
                parent_count: self.parent_count,
            });
        }
        check_probability("initial_mutation_probability", self.initial_mutation_probability)?;
        check_probability("max_mutation_probability", self.max_mutation_probability)?;
        check_probability("annealing_probability", self.annealing_probability)?;
        if self.initial_mutation_probability > self.max_mutation_probability {
            return Err(ConfigError::MutationProbabilityAboveMax {
                initial: self.initial_mutation_probability,
                max: self.max_mutation_probability,
            });
        }
        if !(0.0..=1.0).contains(&self.construction_alpha) {
            return Err(ConfigError::AlphaOutOfRange {
                value: self.construction_alpha,
            });
        }
        if self.mating.is_empty() {
            return Err(ConfigError::EmptyMatingRotation);
        }
        self.annealing.validate()
    }

    /// Mating strategy of `generation`.
    ///
    /// # Panics
    /// Panics if the rotation is empty; [`validate`](Self::validate) rejects that.
    pub fn mating_at(&self, generation: usize) -> Mating {
        self.mating[generation % self.mating.len()]
    }
}

fn check_probability(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { name, value })
    }
}
