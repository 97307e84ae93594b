//! Cost components and weights.

use std::iter::Sum;
use std::ops::Add;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// How realized double lessons are compared with their weekly target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DeviationRule {
    /// `|target - realized|`: too many doubles cost as much as too few.
    Absolute,
    /// `max(0, target - realized)`: only missing doubles cost.
    Shortfall,
}

impl DeviationRule {
    #[inline]
    pub fn apply(self, target: usize, realized: usize) -> usize {
        match self {
            DeviationRule::Absolute => target.abs_diff(realized),
            DeviationRule::Shortfall => target.saturating_sub(realized),
        }
    }
}

/// The deviation rule used by [`CostFunction`](super::CostFunction).
pub const DOUBLE_LESSON_DEVIATION: DeviationRule = DeviationRule::Absolute;

/// Hard-constraint violations. A usable timetable has all fields at zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HardCost {
    /// Extra groups a teacher meets in a period they already teach.
    pub teacher_clashes: u32,
    /// Free slots a group waits between day start and its lessons.
    pub group_idleness: u32,
    /// Meetings placed on a period the teacher is unavailable.
    pub teacher_unavailabilities: u32,
    /// Meetings beyond a pair's daily cap.
    pub daily_exceedances: u32,
}

impl HardCost {
    pub fn is_zero(&self) -> bool {
        *self == HardCost::default()
    }

    pub fn total(&self, weights: &HardWeights) -> f64 {
        self.teacher_clashes as f64 * weights.teacher_clashes
            + self.group_idleness as f64 * weights.group_idleness
            + self.teacher_unavailabilities as f64 * weights.teacher_unavailabilities
            + self.daily_exceedances as f64 * weights.daily_exceedances
    }
}

impl Add for HardCost {
    type Output = HardCost;

    fn add(self, rhs: HardCost) -> HardCost {
        HardCost {
            teacher_clashes: self.teacher_clashes + rhs.teacher_clashes,
            group_idleness: self.group_idleness + rhs.group_idleness,
            teacher_unavailabilities: self.teacher_unavailabilities + rhs.teacher_unavailabilities,
            daily_exceedances: self.daily_exceedances + rhs.daily_exceedances,
        }
    }
}

/// Soft-preference deviations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftCost {
    /// Free slots a teacher waits between day start and their lessons.
    pub teacher_idleness: u32,
    /// Distance of realized double lessons from their targets.
    pub double_lesson_deviation: u32,
}

impl SoftCost {
    pub fn total(&self, weights: &SoftWeights) -> f64 {
        self.teacher_idleness as f64 * weights.teacher_idleness
            + self.double_lesson_deviation as f64 * weights.double_lesson_deviation
    }
}

impl Add for SoftCost {
    type Output = SoftCost;

    fn add(self, rhs: SoftCost) -> SoftCost {
        SoftCost {
            teacher_idleness: self.teacher_idleness + rhs.teacher_idleness,
            double_lesson_deviation: self.double_lesson_deviation + rhs.double_lesson_deviation,
        }
    }
}

/// Structured cost of a timetable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TotalCost {
    pub hard: HardCost,
    pub soft: SoftCost,
}

impl TotalCost {
    /// Weighted scalar cost, truncated toward zero.
    pub fn total(&self, weights: &Weights) -> u64 {
        (self.hard.total(&weights.hard) + self.soft.total(&weights.soft)) as u64
    }
}

impl Add for TotalCost {
    type Output = TotalCost;

    fn add(self, rhs: TotalCost) -> TotalCost {
        TotalCost {
            hard: self.hard + rhs.hard,
            soft: self.soft + rhs.soft,
        }
    }
}

impl Sum for TotalCost {
    fn sum<I: Iterator<Item = TotalCost>>(iter: I) -> TotalCost {
        iter.fold(TotalCost::default(), Add::add)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HardWeights {
    pub teacher_clashes: f64,
    pub group_idleness: f64,
    pub teacher_unavailabilities: f64,
    pub daily_exceedances: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SoftWeights {
    pub teacher_idleness: f64,
    pub double_lesson_deviation: f64,
}

/// Coefficients of the scalar cost.
///
/// # Examples
///
/// ```
/// use u_timetable::cost::{HardCost, SoftCost, TotalCost, Weights};
///
/// let weights = Weights::uniform(200.0, 2.0);
/// let cost = TotalCost {
///     hard: HardCost { teacher_clashes: 1, ..HardCost::default() },
///     soft: SoftCost { teacher_idleness: 3, double_lesson_deviation: 0 },
/// };
/// assert_eq!(cost.total(&weights), 206);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Weights {
    pub hard: HardWeights,
    pub soft: SoftWeights,
}

impl Weights {
    /// One weight for every hard field and one for every soft field.
    pub fn uniform(hard: f64, soft: f64) -> Self {
        Self {
            hard: HardWeights {
                teacher_clashes: hard,
                group_idleness: hard,
                teacher_unavailabilities: hard,
                daily_exceedances: hard,
            },
            soft: SoftWeights {
                teacher_idleness: soft,
                double_lesson_deviation: soft,
            },
        }
    }

    /// Every weight must be finite and non-negative.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let named = [
            ("teacher_clashes", self.hard.teacher_clashes),
            ("group_idleness", self.hard.group_idleness),
            ("teacher_unavailabilities", self.hard.teacher_unavailabilities),
            ("daily_exceedances", self.hard.daily_exceedances),
            ("teacher_idleness", self.soft.teacher_idleness),
            ("double_lesson_deviation", self.soft.double_lesson_deviation),
        ];
        for (name, value) in named {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidWeight { name, value });
            }
        }
        Ok(())
    }
}
