//! Genetic algorithm over timetables.
//!
//! A generational GA with elitism. Offspring are assembled group by group
//! from several roulette-selected parents, then mutated either by a single
//! period swap or by a full simulated annealing pass. Initialization and
//! breeding are partitioned over a fixed rayon pool; every worker owns its
//! random generator, which keeps runs reproducible.
//!
//! # Key Types
//!
//! - [`SolverConfig`]: Algorithm parameters
//! - [`Solver`]: Executes the evolutionary loop
//! - [`Population`]: Final individuals and per-generation statistics
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*
//! - Colorni, Dorigo & Maniezzo (1992), "A Genetic Algorithm to Solve the
//!   Timetable Problem"

mod config;
pub mod operators;
mod runner;
mod selection;
mod types;

pub use config::{MutationSchedule, SolverConfig};
pub use operators::{Mating, Mutation};
pub use runner::Solver;
pub use selection::RouletteWheel;
pub use types::{GenerationStats, Individual, Population};
