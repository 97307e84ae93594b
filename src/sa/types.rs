//! The move shared by annealing and GA mutation.

use rand::Rng;

use crate::model::Timetable;

/// Exchange of one group's assignments between two periods.
///
/// Both cells move together, so the result is still a permutation of the
/// group's week: no meeting is lost or duplicated. A move is its own
/// inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapMove {
    pub group: usize,
    pub from: usize,
    pub to: usize,
}

impl SwapMove {
    /// A uniformly random group with two uniformly random periods.
    ///
    /// Returns `None` for a table without groups or periods.
    pub fn random<R: Rng>(table: &Timetable, rng: &mut R) -> Option<Self> {
        if table.group_count() == 0 || table.period_count() == 0 {
            return None;
        }
        Some(Self {
            group: rng.random_range(0..table.group_count()),
            from: rng.random_range(0..table.period_count()),
            to: rng.random_range(0..table.period_count()),
        })
    }

    #[inline]
    pub fn apply(&self, table: &mut Timetable) {
        table.swap_periods(self.group, self.from, self.to);
    }
}
