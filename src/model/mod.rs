//! Problem data model.
//!
//! # Key Types
//!
//! - [`ProblemInstance`]: immutable problem with teachers, groups, lesson
//!   requirements and teacher unavailability, resolved to dense indices
//! - [`Indexer`]: entity ↔ index mapping used by the instance
//! - [`Timetable`]: the `period × group` assignment grid the solver evolves
//!
//! Periods are always linearized day-major:
//! `period = day * slot_count + slot`.

mod indexer;
mod instance;
mod timetable;

pub use indexer::Indexer;
pub use instance::{
    Group, LessonPair, LessonRequirement, Period, ProblemInstance, ProblemInstanceBuilder,
    Teacher,
};
pub use timetable::Timetable;
