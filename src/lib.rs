//! Weekly lesson timetabling for teachers and student groups.
//!
//! Given teachers, groups, weekly meeting requirements per (teacher, group)
//! pair and teacher unavailability, the crate searches for a day × slot
//! assignment that minimizes a weighted sum of hard violations (teacher
//! clashes, group idleness, unavailability, daily overload) and soft
//! preferences (teacher idleness, double lessons).
//!
//! - **Model**: [`model::ProblemInstance`] resolves entities to dense indices;
//!   [`model::Timetable`] is the `period × group` grid being optimized.
//! - **Cost**: [`cost::CostFunction`] scores a timetable, whole or per group.
//! - **Construction**: [`construct::Constructor`] builds randomized greedy
//!   tables that always meet the weekly requirements.
//! - **Simulated Annealing (SA)**: [`sa::LocalSearch`] improves a single table
//!   with period swaps.
//! - **Genetic Algorithm (GA)**: [`ga::Solver`] evolves a population on a
//!   fixed worker pool, using SA as an occasional strong mutation.
//! - **Reporting**: [`report`] renders results.
//!
//! # Example
//!
//! ```
//! use u_timetable::cost::Weights;
//! use u_timetable::ga::{Mating, MutationSchedule, Solver, SolverConfig};
//! use u_timetable::model::{Group, ProblemInstance, Teacher};
//! use u_timetable::sa::SaConfig;
//!
//! let instance = ProblemInstance::builder(2, 3)
//!     .teacher(Teacher::with_id("t0"))
//!     .teacher(Teacher::with_id("t1"))
//!     .group(Group::with_id("g0"))
//!     .group(Group::with_id("g1"))
//!     .requirement("t0", "g0", 2, 1, 0)
//!     .requirement("t1", "g0", 1, 1, 0)
//!     .requirement("t1", "g1", 2, 1, 0)
//!     .build()
//!     .unwrap();
//!
//! let config = SolverConfig {
//!     weights: Weights::uniform(200.0, 2.0),
//!     population_size: 8,
//!     elitism: 1,
//!     max_iterations: 10,
//!     initial_mutation_probability: 0.01,
//!     max_mutation_probability: 0.05,
//!     mutation_schedule: MutationSchedule::Constant,
//!     parent_count: 3,
//!     parallelism: 2,
//!     seed: 7,
//!     annealing: SaConfig::new(20, 10.0),
//!     annealing_probability: 0.1,
//!     construction_alpha: 0.1,
//!     refine_initial: false,
//!     mating: vec![Mating::RouletteWheel, Mating::Random],
//! };
//!
//! let population = Solver::new(&instance, config).unwrap().run().unwrap();
//! let best = population.best().unwrap();
//! assert!(best.table().meets_weekly_requirements(&instance));
//! ```

pub mod construct;
pub mod cost;
pub mod error;
pub mod ga;
pub mod model;
pub mod report;
pub mod sa;

pub use error::{ConfigError, ConstructionError, InstanceError, SolveError};
