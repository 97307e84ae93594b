//! Greedy timetable construction.
//!
//! [`Constructor`] produces complete, randomized timetables that meet every
//! weekly requirement. It seeds the initial population of the
//! [`Solver`](crate::ga::Solver).
//!
//! # References
//!
//! - Feo & Resende (1995), "Greedy Randomized Adaptive Search Procedures"

mod greedy;

pub use greedy::Constructor;
