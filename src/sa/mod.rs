//! Simulated Annealing (SA).
//!
//! A single-solution local search over period swaps. Accepts worsening moves
//! with a probability that decreases as the temperature cools, allowing the
//! search to leave local optima. Used standalone or as the strong mutation of
//! the [`Solver`](crate::ga::Solver).
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Metropolis et al. (1953), "Equation of State Calculations by Fast
//!   Computing Machines"

mod config;
mod runner;
mod types;

pub use config::{SaConfig, PLATEAU_ACCEPTANCE_PROBABILITY};
pub use runner::{LocalSearch, SaResult};
pub use types::SwapMove;
