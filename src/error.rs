//! Error types.
//!
//! Every fallible operation in the crate returns one of the enums below.
//! Broken internal bookkeeping (for example assigning two teachers to the
//! same group in one period) is not represented here: it panics.

use std::fmt;

/// Invalid problem data handed to [`ProblemInstance::new`](crate::model::ProblemInstance::new).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstanceError {
    /// `day_count` or `slot_count` is zero.
    EmptyDimension,
    /// The same teacher appears twice in the teacher list.
    DuplicateTeacher { id: String },
    /// The same group appears twice in the group list.
    DuplicateGroup { id: String },
    /// A requirement or unavailability names a teacher that is not listed.
    UnknownTeacher { id: String },
    /// A requirement names a group that is not listed.
    UnknownGroup { id: String },
    /// Two requirements share the same (teacher, group) pair.
    DuplicateRequirement { teacher: String, group: String },
    /// A requirement asks for more meetings than the week has periods.
    TooManyOccurrences {
        teacher: String,
        group: String,
        weekly_occurrences: usize,
        period_count: usize,
    },
    /// An unavailability lies outside the `day_count × slot_count` grid.
    PeriodOutOfRange {
        teacher: String,
        day: usize,
        slot: usize,
    },
}

impl fmt::Display for InstanceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstanceError::EmptyDimension => {
                write!(f, "day_count and slot_count must be positive")
            }
            InstanceError::DuplicateTeacher { id } => write!(f, "duplicate teacher '{id}'"),
            InstanceError::DuplicateGroup { id } => write!(f, "duplicate group '{id}'"),
            InstanceError::UnknownTeacher { id } => write!(f, "unknown teacher '{id}'"),
            InstanceError::UnknownGroup { id } => write!(f, "unknown group '{id}'"),
            InstanceError::DuplicateRequirement { teacher, group } => {
                write!(f, "duplicate requirement for teacher '{teacher}' and group '{group}'")
            }
            InstanceError::TooManyOccurrences {
                teacher,
                group,
                weekly_occurrences,
                period_count,
            } => write!(
                f,
                "teacher '{teacher}' and group '{group}' need {weekly_occurrences} meetings \
                 but the week only has {period_count} periods"
            ),
            InstanceError::PeriodOutOfRange { teacher, day, slot } => write!(
                f,
                "unavailability of teacher '{teacher}' at day {day}, slot {slot} is out of range"
            ),
        }
    }
}

impl std::error::Error for InstanceError {}

/// Rejected solver configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    ZeroPopulation,
    ElitismTooLarge { elitism: usize, population_size: usize },
    ZeroParallelism,
    TooFewParents { parent_count: usize },
    ZeroIterations,
    /// A probability parameter is outside `[0, 1]`.
    ProbabilityOutOfRange { name: &'static str, value: f64 },
    /// `initial_mutation_probability` exceeds `max_mutation_probability`.
    MutationProbabilityAboveMax { initial: f64, max: f64 },
    NonPositiveTemperature { value: f64 },
    /// A cost weight is negative, NaN or infinite.
    InvalidWeight { name: &'static str, value: f64 },
    EmptyMatingRotation,
    /// The construction greediness is outside `[0, 1]`.
    AlphaOutOfRange { value: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ZeroPopulation => write!(f, "population_size must be positive"),
            ConfigError::ElitismTooLarge {
                elitism,
                population_size,
            } => write!(
                f,
                "elitism ({elitism}) must be smaller than population_size ({population_size})"
            ),
            ConfigError::ZeroParallelism => write!(f, "parallelism must be positive"),
            ConfigError::TooFewParents { parent_count } => {
                write!(f, "parent_count must be at least 2, got {parent_count}")
            }
            ConfigError::ZeroIterations => write!(f, "max_iterations must be at least 1"),
            ConfigError::ProbabilityOutOfRange { name, value } => {
                write!(f, "{name} must be in [0, 1], got {value}")
            }
            ConfigError::MutationProbabilityAboveMax { initial, max } => write!(
                f,
                "initial mutation probability {initial} exceeds the maximum {max}"
            ),
            ConfigError::NonPositiveTemperature { value } => {
                write!(f, "initial_temperature must be positive, got {value}")
            }
            ConfigError::InvalidWeight { name, value } => {
                write!(f, "weight '{name}' must be finite and non-negative, got {value}")
            }
            ConfigError::EmptyMatingRotation => {
                write!(f, "mating rotation must contain at least one strategy")
            }
            ConfigError::AlphaOutOfRange { value } => {
                write!(f, "construction alpha must be in [0, 1], got {value}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// The greedy constructor could not place a pending lesson.
///
/// Retrying with the same inputs reproduces the failure, so it is never
/// retried internally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    /// `group` has no free period left for a meeting with `teacher`.
    NoFreePeriod { group: usize, teacher: usize },
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstructionError::NoFreePeriod { group, teacher } => write!(
                f,
                "group {group} has no free period left for a lesson with teacher {teacher}"
            ),
        }
    }
}

impl std::error::Error for ConstructionError {}

/// Any failure of [`Solver`](crate::ga::Solver) creation or execution.
#[derive(Debug)]
pub enum SolveError {
    Config(ConfigError),
    Construction(ConstructionError),
    /// The worker pool could not be started.
    ThreadPool(rayon::ThreadPoolBuildError),
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::Config(e) => write!(f, "invalid configuration: {e}"),
            SolveError::Construction(e) => write!(f, "construction failed: {e}"),
            SolveError::ThreadPool(e) => write!(f, "cannot build worker pool: {e}"),
        }
    }
}

impl std::error::Error for SolveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SolveError::Config(e) => Some(e),
            SolveError::Construction(e) => Some(e),
            SolveError::ThreadPool(e) => Some(e),
        }
    }
}

impl From<ConfigError> for SolveError {
    fn from(e: ConfigError) -> Self {
        SolveError::Config(e)
    }
}

impl From<ConstructionError> for SolveError {
    fn from(e: ConstructionError) -> Self {
        SolveError::Construction(e)
    }
}

impl From<rayon::ThreadPoolBuildError> for SolveError {
    fn from(e: rayon::ThreadPoolBuildError) -> Self {
        SolveError::ThreadPool(e)
    }
}
