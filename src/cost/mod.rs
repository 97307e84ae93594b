//! Timetable cost evaluation.
//!
//! [`CostFunction`] maps a [`Timetable`](crate::model::Timetable) to a
//! structured [`TotalCost`]: hard-constraint violations ([`HardCost`]) and
//! soft-preference deviations ([`SoftCost`]). The scalar objective is a
//! weighted sum with caller-supplied [`Weights`].

mod function;
mod types;

pub use function::CostFunction;
pub use types::{
    DeviationRule, HardCost, HardWeights, SoftCost, SoftWeights, TotalCost, Weights,
    DOUBLE_LESSON_DEVIATION,
};
